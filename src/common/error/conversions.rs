//! Translation of serializer failures into [`Error::Encoding`].
//!
//! Assemblers never let `zip`, `lopdf` or `image` error types escape their
//! public signatures. Every fallible library call is tagged with the export
//! kind it belongs to through [`EncodingContext::encoding`].

use super::types::{Error, Result};
use crate::export::ExportKind;

/// Attach an export kind to a library error.
pub trait EncodingContext<T> {
    /// Convert the error side into [`Error::Encoding`] for `kind`.
    fn encoding(self, kind: ExportKind) -> Result<T>;
}

impl<T, E: std::fmt::Display> EncodingContext<T> for std::result::Result<T, E> {
    #[inline]
    fn encoding(self, kind: ExportKind) -> Result<T> {
        self.map_err(|e| Error::encoding(kind, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_context_tags_kind() {
        let failed: std::result::Result<(), std::fmt::Error> = Err(std::fmt::Error);
        let err = failed.encoding(ExportKind::Archive).unwrap_err();
        assert_eq!(err.export_kind(), Some(ExportKind::Archive));
        assert!(err.to_string().starts_with("archive export failed"));
    }

    #[test]
    fn test_encoding_context_passes_ok_through() {
        let ok: std::result::Result<u8, std::fmt::Error> = Ok(7);
        assert_eq!(ok.encoding(ExportKind::Deck).unwrap(), 7);
    }
}
