//! Mutable presentation writer components for PPTX.

mod package;
pub mod pres;
pub(crate) mod relmap;
pub mod shape;
pub mod slide;

// Re-export main types
pub use pres::{CoreProperties, MutablePresentation};
pub use shape::MutableShape;
pub use slide::MutableSlide;
