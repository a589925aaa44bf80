//! XML text helpers for hand-written package parts.

mod escape;

pub use escape::escape_xml;
