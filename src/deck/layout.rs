//! Slide geometry.
//!
//! All frames are in EMUs and derived from the slide size, so every canvas
//! size gets the same proportions: 0.5" side margins, a caption band at the
//! top and a footer band at the bottom.
use crate::common::unit::inches_to_emu;

/// Position and extent of a shape in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Place a picture of `pixels` on a `slide` so it fills the free area while
/// keeping its aspect ratio.
///
/// The free area is the slide minus 0.5" on every side. A caption moves the
/// top of the area down to 1.5" and shortens it by 2.5" in total. The picture
/// is centred horizontally on the slide and vertically inside the area.
pub(crate) fn fit_picture(slide: (i64, i64), pixels: (u32, u32), captioned: bool) -> Frame {
    let (slide_w, slide_h) = slide;
    let max_w = (slide_w - inches_to_emu(1.0)).max(1);
    let (top_offset, max_h) = if captioned {
        (inches_to_emu(1.5), slide_h - inches_to_emu(2.5))
    } else {
        (inches_to_emu(0.5), slide_h - inches_to_emu(1.0))
    };
    let max_h = max_h.max(1);

    let (iw, ih) = (pixels.0.max(1) as f64, pixels.1.max(1) as f64);
    let scale = (max_w as f64 / iw).min(max_h as f64 / ih);
    let width = ((iw * scale) as i64).max(1);
    let height = ((ih * scale) as i64).max(1);

    Frame::new(
        (slide_w - width) / 2,
        top_offset + (max_h - height) / 2,
        width,
        height,
    )
}

/// Caption band above a picture.
pub(crate) fn caption(slide: (i64, i64)) -> Frame {
    Frame::new(
        inches_to_emu(0.5),
        inches_to_emu(0.3),
        slide.0 - inches_to_emu(1.0),
        inches_to_emu(0.8),
    )
}

/// Footer band at the bottom of every slide.
pub(crate) fn footer(slide: (i64, i64)) -> Frame {
    Frame::new(
        inches_to_emu(0.5),
        slide.1 - inches_to_emu(0.8),
        slide.0 - inches_to_emu(1.0),
        inches_to_emu(0.5),
    )
}

/// Heading of the summary and placeholder slides.
pub(crate) fn heading(slide: (i64, i64)) -> Frame {
    Frame::new(
        inches_to_emu(0.5),
        inches_to_emu(0.4),
        slide.0 - inches_to_emu(1.0),
        inches_to_emu(1.0),
    )
}

/// Body text below [`heading`].
pub(crate) fn body(slide: (i64, i64)) -> Frame {
    Frame::new(
        inches_to_emu(0.8),
        inches_to_emu(1.6),
        slide.0 - inches_to_emu(1.6),
        slide.1 - inches_to_emu(2.5),
    )
}

/// Title line of the title slide.
pub(crate) fn title(slide: (i64, i64)) -> Frame {
    Frame::new(
        inches_to_emu(1.0),
        inches_to_emu(2.0),
        slide.0 - inches_to_emu(2.0),
        inches_to_emu(1.5),
    )
}

/// Block of the title slide starting `top` inches down, running to 1.2"
/// above the bottom edge.
pub(crate) fn title_block(slide: (i64, i64), top: f64) -> Frame {
    let y = inches_to_emu(top);
    Frame::new(
        inches_to_emu(1.0),
        y,
        slide.0 - inches_to_emu(2.0),
        slide.1 - inches_to_emu(1.2) - y,
    )
}
