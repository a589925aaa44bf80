//! Image/other classification of file records.
//!
//! A record is an [`Classification::Image`] only if its declared media type
//! starts with `image/` *and* its bytes decode as a raster image. Anything
//! else, including a declared image that fails to decode, is
//! [`Classification::Other`]. Classification never fails: a single bad file
//! must not abort an export.
use crate::batch::FileRecord;
use crate::common::DecodeWarning;
use image::{ColorType, ImageFormat, ImageReader};
use std::io::Cursor;

/// Facts about a successfully decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterInfo {
    /// Container format detected from the bytes
    pub format: ImageFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Decoded color layout
    pub color: ColorType,
}

impl RasterInfo {
    /// Width over height.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }
}

/// Label assigned to a record before assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A decodable raster image
    Image(RasterInfo),
    /// Everything else
    Other,
}

impl Classification {
    #[inline]
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }
}

/// Classify a record, dropping any decode warning.
pub fn classify(record: &FileRecord) -> Classification {
    classify_with_warning(record).0
}

/// Classify a record and report why a declared image was downgraded.
///
/// The warning is `Some` only when the media type claimed an image but the
/// content did not decode. It is also logged.
pub fn classify_with_warning(record: &FileRecord) -> (Classification, Option<DecodeWarning>) {
    if !record.media_type().starts_with("image/") {
        return (Classification::Other, None);
    }

    match decode_raster(record.content()) {
        Ok(info) => (Classification::Image(info), None),
        Err(reason) => {
            tracing::warn!(
                id = %record.id(),
                name = record.display_name(),
                media_type = record.media_type(),
                %reason,
                "declared image failed to decode; listing it as a file"
            );
            let warning = DecodeWarning {
                record: record.id(),
                display_name: record.display_name().to_string(),
                reason,
            };
            (Classification::Other, Some(warning))
        },
    }
}

/// Fully decode `content` and describe the result.
fn decode_raster(content: &[u8]) -> Result<RasterInfo, String> {
    let reader = ImageReader::new(Cursor::new(content))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    let format = reader
        .format()
        .ok_or_else(|| "unrecognized image format".to_string())?;
    let image = reader.decode().map_err(|e| e.to_string())?;
    if image.width() == 0 || image.height() == 0 {
        return Err("image has no pixels".to_string());
    }

    Ok(RasterInfo {
        format,
        width: image.width(),
        height: image.height(),
        color: image.color(),
    })
}
