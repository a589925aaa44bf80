//! Package writer for OPC packages.
//!
//! This module collects parts in memory and serializes them, together with
//! `[Content_Types].xml` and every relationships part, into a ZIP container.

use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use crate::ooxml::opc::rel::Relationships;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

/// One part waiting to be written.
#[derive(Debug)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
    compress: bool,
}

impl Part {
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }
}

/// An in-memory OPC package under construction.
///
/// Parts are written in the order they were added.
#[derive(Debug, Default)]
pub struct OpcPackage {
    rels: Relationships,
    parts: Vec<Part>,
}

impl OpcPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Package-level relationships (`/_rels/.rels`).
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Add an XML or other compressible part.
    pub fn add_part(
        &mut self,
        partname: &str,
        content_type: &str,
        blob: impl Into<Vec<u8>>,
        rels: Relationships,
    ) -> Result<()> {
        self.push(partname, content_type, blob.into(), rels, true)
    }

    /// Add an already-compressed binary part such as a JPEG or PNG.
    pub fn add_media(&mut self, partname: &str, content_type: &str, blob: impl Into<Vec<u8>>) -> Result<()> {
        self.push(partname, content_type, blob.into(), Relationships::new(), false)
    }

    fn push(
        &mut self,
        partname: &str,
        content_type: &str,
        blob: Vec<u8>,
        rels: Relationships,
        compress: bool,
    ) -> Result<()> {
        self.parts.push(Part {
            partname: PackURI::new(partname)?,
            content_type: content_type.to_string(),
            blob,
            rels,
            compress,
        });
        Ok(())
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

/// Package writer that serializes an OPC package to ZIP bytes.
pub struct PackageWriter;

impl PackageWriter {
    /// Serialize an OPC package to bytes.
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let mut phys_writer = PhysPkgWriter::new();

        // Write [Content_Types].xml
        let cti = ContentTypesItem::from_package(package);
        phys_writer.write(&PackURI::new(CONTENT_TYPES_URI)?, cti.to_xml()?.as_bytes())?;

        // Write package-level relationships (_rels/.rels)
        let rels_uri = PackURI::new(PACKAGE_URI)?.rels_uri()?;
        phys_writer.write(&rels_uri, package.rels().to_xml().as_bytes())?;

        // Write all parts and their relationships
        for part in package.iter_parts() {
            if part.compress {
                phys_writer.write(part.partname(), part.blob())?;
            } else {
                phys_writer.write_stored(part.partname(), part.blob())?;
            }

            if !part.rels().is_empty() {
                let rels_uri = part.partname().rels_uri()?;
                phys_writer.write(&rels_uri, part.rels().to_xml().as_bytes())?;
            }
        }

        phys_writer.finish()
    }
}

/// Helper for building [Content_Types].xml content.
///
/// Manages Default and Override elements for content type mapping. Both maps
/// are ordered so the output is stable.
struct ContentTypesItem {
    /// Default content types by extension
    defaults: BTreeMap<String, String>,

    /// Override content types by partname
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();

        // Add standard defaults
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn from_package(package: &OpcPackage) -> Self {
        let mut cti = Self::new();

        for part in package.iter_parts() {
            cti.add_content_type(part.partname(), part.content_type());
        }

        cti
    }

    /// Uses a default mapping if the extension matches a well-known type,
    /// otherwise uses an override for the specific partname.
    fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext();

        if Self::is_default_content_type(ext, content_type) {
            self.defaults
                .insert(ext.to_string(), content_type.to_string());
        } else {
            self.overrides
                .insert(partname.to_string(), content_type.to_string());
        }
    }

    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", ct::PNG)
                | ("jpeg", ct::JPEG)
                | ("gif", ct::GIF)
                | ("bmp", ct::BMP)
                | ("tiff", ct::TIFF)
        )
    }

    fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );

        for (ext, content_type) in &self.defaults {
            write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            )?;
        }

        for (partname, content_type) in &self.overrides {
            write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            )?;
        }

        xml.push_str("</Types>");

        Ok(xml)
    }
}
