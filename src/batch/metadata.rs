//! Per-record metadata captured once at ingestion.
use chrono::{DateTime, Utc};
use exif::Tag;
use image::{ImageDecoder, ImageReader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl MetadataValue {
    /// Borrow the value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the value as a flag, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Ordered key/value metadata for one record.
///
/// Built once when the record enters the batch and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetadataValue>);

impl Metadata {
    /// Well-known keys
    pub const INGESTED_AT: &'static str = "ingested_at";
    pub const WIDTH: &'static str = "width";
    pub const HEIGHT: &'static str = "height";
    pub const FORMAT: &'static str = "format";
    pub const COLOR_TYPE: &'static str = "color_type";
    pub const HAS_EXIF: &'static str = "has_exif";
    pub const EXIF_BYTES: &'static str = "exif_bytes";
    pub const IS_CAMERA: &'static str = "is_camera";

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pixel dimensions, when the record was probed as an image.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let w = self.get(Self::WIDTH)?.as_integer()?;
        let h = self.get(Self::HEIGHT)?.as_integer()?;
        Some((u32::try_from(w).ok()?, u32::try_from(h).ok()?))
    }

    /// Whether the image carried an EXIF block at all.
    pub fn has_exif(&self) -> bool {
        self.get(Self::HAS_EXIF)
            .and_then(MetadataValue::as_bool)
            .unwrap_or(false)
    }

    /// Whether the EXIF block names a camera, lens, exposure or GPS fix.
    pub fn is_camera(&self) -> bool {
        self.get(Self::IS_CAMERA)
            .and_then(MetadataValue::as_bool)
            .unwrap_or(false)
    }

    fn insert(&mut self, key: &str, value: MetadataValue) {
        self.0.insert(key.to_string(), value);
    }

    /// Extract metadata from freshly uploaded content.
    ///
    /// Images are only probed (header and EXIF), not fully decoded; a probe
    /// failure simply leaves the image keys out.
    pub(crate) fn extract(content: &[u8], media_type: &str, ingested_at: DateTime<Utc>) -> Self {
        let mut metadata = Self::default();
        metadata.insert(Self::INGESTED_AT, MetadataValue::Text(ingested_at.to_rfc3339()));

        if media_type.starts_with("image/") {
            match probe_image(content) {
                Ok(probe) => {
                    metadata.insert(Self::WIDTH, MetadataValue::Integer(probe.width.into()));
                    metadata.insert(Self::HEIGHT, MetadataValue::Integer(probe.height.into()));
                    metadata.insert(Self::FORMAT, MetadataValue::Text(probe.format));
                    metadata.insert(Self::COLOR_TYPE, MetadataValue::Text(probe.color_type));
                    let exif = probe.exif.as_deref().unwrap_or_default();
                    metadata.insert(Self::HAS_EXIF, MetadataValue::Bool(!exif.is_empty()));
                    if !exif.is_empty() {
                        metadata.insert(Self::EXIF_BYTES, MetadataValue::Integer(exif.len() as i64));
                    }
                    metadata.insert(Self::IS_CAMERA, MetadataValue::Bool(is_camera_exif(exif)));
                },
                Err(e) => {
                    tracing::debug!(error = %e, "image header probe failed; no image metadata recorded");
                },
            }
        }

        metadata
    }
}

struct ImageProbe {
    width: u32,
    height: u32,
    format: String,
    color_type: String,
    exif: Option<Vec<u8>>,
}

fn probe_image(content: &[u8]) -> image::ImageResult<ImageProbe> {
    let reader = ImageReader::new(Cursor::new(content)).with_guessed_format()?;
    let format = reader
        .format()
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_default();
    let mut decoder = reader.into_decoder()?;
    let (width, height) = decoder.dimensions();
    let color_type = format!("{:?}", decoder.color_type());
    // Not every decoder can surface EXIF; treat errors as "none"
    let exif = decoder.exif_metadata().ok().flatten();

    Ok(ImageProbe {
        width,
        height,
        format,
        color_type,
        exif,
    })
}

/// Tags that only a capture device writes.
const CAMERA_TAGS: &[Tag] = &[
    Tag::Make,
    Tag::Model,
    Tag::LensModel,
    Tag::FNumber,
    Tag::FocalLength,
    Tag::ExposureTime,
    Tag::PhotographicSensitivity,
    Tag::DateTimeOriginal,
    Tag::GPSLatitude,
    Tag::GPSLongitude,
];

/// Whether a raw EXIF block (with or without the `Exif\0\0` marker) holds
/// any camera tag.
fn is_camera_exif(raw: &[u8]) -> bool {
    if raw.is_empty() {
        return false;
    }
    let tiff = raw.strip_prefix(b"Exif\0\0").unwrap_or(raw);
    match exif::Reader::new().read_raw(tiff.to_vec()) {
        Ok(exif) => exif.fields().any(|field| CAMERA_TAGS.contains(&field.tag)),
        Err(e) => {
            tracing::debug!(error = %e, "unreadable EXIF block; not treated as a camera image");
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{exif_tiff, jpeg_with_exif, png_bytes};

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_image_metadata() {
        let md = Metadata::extract(&png_bytes(40, 30), "image/png", fixed_time());
        assert_eq!(md.dimensions(), Some((40, 30)));
        assert_eq!(md.get(Metadata::FORMAT).and_then(|v| v.as_text()), Some("image/png"));
        assert!(!md.has_exif());
        assert!(!md.is_camera());
        assert_eq!(
            md.get(Metadata::INGESTED_AT).and_then(|v| v.as_text()),
            Some("2025-03-01T12:00:00+00:00")
        );
    }

    #[test]
    fn test_camera_tags_are_detected() {
        assert!(is_camera_exif(&exif_tiff(0x010F))); // Make
        assert!(is_camera_exif(&exif_tiff(0x0110))); // Model

        let mut marked = b"Exif\0\0".to_vec();
        marked.extend(exif_tiff(0x010F));
        assert!(is_camera_exif(&marked));
    }

    #[test]
    fn test_software_only_exif_is_not_camera() {
        assert!(!is_camera_exif(&exif_tiff(0x0131))); // Software
        assert!(!is_camera_exif(b"not exif"));
        assert!(!is_camera_exif(&[]));
    }

    #[test]
    fn test_jpeg_exif_flags() {
        let camera = Metadata::extract(&jpeg_with_exif(16, 16, 0x010F), "image/jpeg", fixed_time());
        assert!(camera.has_exif());
        assert!(camera.is_camera());

        let edited = Metadata::extract(&jpeg_with_exif(16, 16, 0x0131), "image/jpeg", fixed_time());
        assert!(edited.has_exif());
        assert!(!edited.is_camera());
    }

    #[test]
    fn test_non_image_only_gets_timestamp() {
        let md = Metadata::extract(b"%PDF-1.4", "application/pdf", fixed_time());
        assert_eq!(md.len(), 1);
        assert!(md.dimensions().is_none());
    }

    #[test]
    fn test_corrupt_image_has_no_dimensions() {
        let md = Metadata::extract(&[0x89, b'P', b'N', b'G'], "image/png", fixed_time());
        assert!(md.dimensions().is_none());
        assert!(md.get(Metadata::INGESTED_AT).is_some());
    }
}
