//! Office Open XML writing.
//!
//! Only the pieces needed to emit a presentation package are here:
//!
//! - `opc`: Open Packaging Convention container (content types, relationships, ZIP)
//! - `pptx`: PresentationML slides, shapes and the package writer

pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
