//! Error taxonomy for batch ingestion and export.
//!
//! Three kinds of problem can surface while working with a batch:
//!
//! - [`InvalidInputError`]: an upload was rejected before it entered the batch.
//! - [`DecodeWarning`]: a declared image could not be decoded. This is never an
//!   `Err`; the record is classified as "other" and the warning travels with the
//!   export result.
//! - [`Error::Encoding`]: a serializer failed to produce one export kind. Other
//!   kinds and the batch itself are unaffected.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use conversions::EncodingContext;
pub use types::{DecodeWarning, Error, InvalidInputError, Result};
