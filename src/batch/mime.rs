//! Media type guessing for uploads that arrive without one.
use phf::phf_map;

/// Fallback when neither the host nor the extension tells us anything.
pub const OCTET_STREAM: &str = "application/octet-stream";

static EXTENSION_MEDIA_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    // Raster and vector images
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "mpo" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "bmp" => "image/bmp",
    "tif" => "image/tiff",
    "tiff" => "image/tiff",
    "ico" => "image/x-icon",
    "heic" => "image/heic",
    "heif" => "image/heif",
    "avif" => "image/avif",
    "svg" => "image/svg+xml",
    // Documents
    "pdf" => "application/pdf",
    "txt" => "text/plain",
    "csv" => "text/csv",
    "md" => "text/markdown",
    "json" => "application/json",
    "doc" => "application/msword",
    "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "xls" => "application/vnd.ms-excel",
    "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "ppt" => "application/vnd.ms-powerpoint",
    "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "zip" => "application/zip",
};

/// Guess a media type from the extension of `file_name`.
///
/// Matching is case-insensitive. Unknown or missing extensions yield
/// [`OCTET_STREAM`].
pub fn guess_media_type(file_name: &str) -> &'static str {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    EXTENSION_MEDIA_TYPES
        .get(ext.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(guess_media_type("photo.JPG"), "image/jpeg");
        assert_eq!(guess_media_type("scan.tiff"), "image/tiff");
        assert_eq!(guess_media_type("report.final.pdf"), "application/pdf");
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(guess_media_type("Makefile"), OCTET_STREAM);
        assert_eq!(guess_media_type("archive.xyz"), OCTET_STREAM);
    }
}
