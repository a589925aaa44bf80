//! U2P - Upload to Present
//!
//! Turn a batch of uploaded files into three downloadable artifacts, entirely
//! in memory:
//!
//! - **Deck**: a `.pptx` with one slide per image and a summary slide that
//!   lists every other file
//! - **Document**: a `.pdf` with one page per file
//! - **Archive**: a `.zip` of the original uploads
//!
//! Nothing is written to disk. A batch lives as long as its owner keeps it,
//! and every export is a pure function of a batch snapshot, so exports can
//! run concurrently with each other and with further edits.
//!
//! # Example
//!
//! ```rust
//! use u2p::{ExportKind, Session};
//!
//! # fn main() -> u2p::Result<()> {
//! let mut session = Session::new();
//! session
//!     .batch_mut()
//!     .add(b"meeting notes".to_vec(), "notes.txt", "text/plain")?;
//!
//! let deck = session.export(ExportKind::Deck)?;
//! assert!(deck.filename.ends_with(".pptx"));
//! // One summary slide listing notes.txt
//! assert_eq!(deck.item_count, 1);
//!
//! let bundle = session.export_all();
//! assert!(bundle.iter().all(|r| r.is_ok()));
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `pdf` (default): the document export, backed by `lopdf`

/// In-memory file record store and session context
pub mod batch;

/// Image/other classification with decode fallback
pub mod classify;

/// Shared error taxonomy, identifiers and unit helpers
pub mod common;

/// Export options
pub mod config;

/// Export facade and concurrent export of all kinds
pub mod export;

/// OOXML packaging and the PowerPoint writer
pub mod ooxml;

mod archive;
mod deck;
#[cfg(feature = "pdf")]
mod document;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use batch::{Batch, FileRecord, RecordId, Session, Upload};
pub use classify::{Classification, classify};
pub use common::{DecodeWarning, Error, InvalidInputError, Result};
pub use config::{ExportOptions, SlideSize};
pub use export::{ExportBundle, ExportKind, ExportResult, Exporter};
