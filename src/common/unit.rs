//! Unit conversion utilities.
//!
//! Slide geometry is expressed in EMUs (English Metric Units) and PDF
//! geometry in points. Both are derived from inches here.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const PT_PER_INCH: f32 = 72.0;

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub const fn inches_to_pt(inches: f32) -> f32 {
    inches * PT_PER_INCH
}

/// Font size in points to the hundredths used by DrawingML `sz` attributes.
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * 100.0).round() as u32
}
