//! Common types and utilities shared by the store and the assemblers.

// Submodule declarations
pub mod error;
pub mod id;
pub mod size;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use error::{DecodeWarning, Error, InvalidInputError, Result};
pub use id::RecordId;
pub use size::human_size;
