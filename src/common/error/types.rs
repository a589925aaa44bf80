//! Error and warning types shared by the store and the assemblers.
use crate::batch::RecordId;
use crate::export::ExportKind;
use serde::Serialize;
use thiserror::Error;

/// Main error type for u2p operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed ingestion request or reference to an unknown record
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// The serializer for one export kind could not produce output
    #[error("{kind} export failed: {message}")]
    Encoding { kind: ExportKind, message: String },
}

impl Error {
    /// Build an [`Error::Encoding`] for the given export kind.
    pub fn encoding(kind: ExportKind, message: impl Into<String>) -> Self {
        Error::Encoding {
            kind,
            message: message.into(),
        }
    }

    /// Export kind this error belongs to, if it is an encoding failure.
    pub fn export_kind(&self) -> Option<ExportKind> {
        match self {
            Error::Encoding { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Reasons an upload or a batch edit is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    /// The upload carried zero bytes
    #[error("'{display_name}' has no content")]
    EmptyContent { display_name: String },

    /// The upload had no file name
    #[error("upload #{position} has no file name")]
    EmptyDisplayName { position: usize },

    /// No record with this identity is in the batch
    #[error("no record with id {0}")]
    UnknownRecord(RecordId),
}

/// A declared image that failed to decode and was downgraded to "other".
///
/// Warnings are informational only. Hosts may show them next to the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeWarning {
    /// Identity of the record that failed to decode
    pub record: RecordId,
    /// File name of the record, for display
    pub display_name: String,
    /// Decoder message
    pub reason: String,
}

impl std::fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' is not a readable image and was listed as a file: {}",
            self.display_name, self.reason
        )
    }
}

/// Result type for u2p operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_is_input_or_encoding() {
        let errors = [
            Error::from(InvalidInputError::EmptyDisplayName { position: 0 }),
            Error::encoding(ExportKind::Deck, "boom"),
        ];
        for err in errors {
            match &err {
                Error::InvalidInput(_) => assert_eq!(err.export_kind(), None),
                Error::Encoding { kind, .. } => assert_eq!(err.export_kind(), Some(*kind)),
            }
        }
    }
}
