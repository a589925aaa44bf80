//! PowerPoint (.pptx) presentation writing.
//!
//! Slides are built in memory with [`MutablePresentation`] and serialized to
//! an OOXML package with one master, one blank layout and one theme.
//!
//! # Example
//!
//! ```rust
//! use u2p::ooxml::pptx::{Alignment, MutablePresentation};
//!
//! let mut pres = MutablePresentation::new();
//! pres.add_slide()
//!     .add_text_box(["Attached Files"], 457_200, 457_200, 8_229_600, 914_400)
//!     .font_size(24.0)
//!     .bold(true)
//!     .align(Alignment::Center);
//!
//! let bytes = pres.to_bytes().unwrap();
//! assert!(bytes.starts_with(b"PK"));
//! ```

pub mod format;
pub mod template;
pub mod writer;

pub use format::{Alignment, ImageFormat, TextFormat};
pub use writer::{CoreProperties, MutablePresentation, MutableShape, MutableSlide};
