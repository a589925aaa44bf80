//! Open Packaging Convention (OPC) writer.
//!
//! An OPC package is a ZIP archive of parts, a `[Content_Types].xml` map and
//! `.rels` parts that link them. This module builds such packages in memory.

pub mod constants;
pub mod packuri;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;

pub use packuri::PackURI;
pub use pkgwriter::{OpcPackage, PackageWriter};
pub use rel::Relationships;
