//! Export facade.
//!
//! One entry point per artifact kind over a batch snapshot. Every export is a
//! pure function of the records and the options, so the three kinds can run
//! side by side on the same snapshot; [`Exporter::export_all`] does exactly
//! that.
//!
//! # Example
//!
//! ```rust
//! use u2p::batch::Batch;
//! use u2p::config::ExportOptions;
//! use u2p::export::{ExportKind, Exporter};
//!
//! let mut batch = Batch::new();
//! batch.add(b"quarterly numbers".to_vec(), "report.txt", "text/plain")?;
//!
//! let exporter = Exporter::new(ExportOptions::default());
//! let archive = exporter.export(ExportKind::Archive, &batch.list())?;
//! assert_eq!(archive.filename, "u2p.zip");
//! assert_eq!(archive.item_count, 1);
//! # Ok::<(), u2p::Error>(())
//! ```
use crate::batch::FileRecord;
use crate::common::{DecodeWarning, Result};
use crate::config::ExportOptions;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Artifact kinds a batch can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Slide deck (`.pptx`)
    Deck,
    /// Paginated document (`.pdf`)
    Document,
    /// Archive of the original files (`.zip`)
    Archive,
}

impl ExportKind {
    /// All kinds, in the order hosts usually offer them.
    pub const ALL: [ExportKind; 3] = [ExportKind::Deck, ExportKind::Document, ExportKind::Archive];

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Deck => "pptx",
            Self::Document => "pdf",
            Self::Archive => "zip",
        }
    }

    /// Media type of the produced bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Deck => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            },
            Self::Document => "application/pdf",
            Self::Archive => "application/zip",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Deck => "deck",
            Self::Document => "document",
            Self::Archive => "archive",
        })
    }
}

/// What an assembler hands back to the facade.
#[derive(Debug)]
pub(crate) struct Assembled {
    pub bytes: Vec<u8>,
    pub item_count: usize,
    pub warnings: Vec<DecodeWarning>,
}

/// A finished export. Immutable; hosts own it from here on.
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    /// Which artifact this is
    pub kind: ExportKind,
    /// Encoded artifact
    #[serde(skip)]
    pub bytes: Bytes,
    /// Suggested download name
    pub filename: String,
    /// Declared images that were listed as plain files instead
    pub warnings: Vec<DecodeWarning>,
    /// Slides, pages or archive entries produced
    pub item_count: usize,
}

impl ExportResult {
    /// Media type of [`ExportResult::bytes`].
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

/// Results of [`Exporter::export_all`], one per kind.
///
/// A failure in one kind never affects the others.
#[derive(Debug)]
pub struct ExportBundle {
    pub deck: Result<ExportResult>,
    #[cfg(feature = "pdf")]
    pub document: Result<ExportResult>,
    pub archive: Result<ExportResult>,
}

impl ExportBundle {
    /// Iterate over the per-kind results.
    pub fn iter(&self) -> impl Iterator<Item = &Result<ExportResult>> {
        #[cfg(feature = "pdf")]
        let all = [&self.deck, &self.document, &self.archive];
        #[cfg(not(feature = "pdf"))]
        let all = [&self.deck, &self.archive];
        all.into_iter()
    }
}

/// Runs exports with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Produce one artifact from a batch snapshot.
    ///
    /// Either the whole artifact is returned or an error; partial bytes are
    /// never exposed.
    pub fn export(&self, kind: ExportKind, records: &[FileRecord]) -> Result<ExportResult> {
        let assembled = match kind {
            ExportKind::Deck => crate::deck::assemble(records, &self.options),
            #[cfg(feature = "pdf")]
            ExportKind::Document => crate::document::assemble(records, &self.options),
            #[cfg(not(feature = "pdf"))]
            ExportKind::Document => Err(crate::Error::encoding(
                kind,
                "document export requires the `pdf` feature",
            )),
            ExportKind::Archive => crate::archive::assemble(records, &self.options),
        };

        let assembled = assembled.inspect_err(|e| {
            tracing::error!(kind = %kind, error = %e, "export failed");
        })?;

        for warning in &assembled.warnings {
            tracing::warn!(kind = %kind, %warning, "decode fallback");
        }

        Ok(ExportResult {
            kind,
            bytes: Bytes::from(assembled.bytes),
            filename: self.filename(kind),
            warnings: assembled.warnings,
            item_count: assembled.item_count,
        })
    }

    /// Produce every artifact concurrently from the same snapshot.
    pub fn export_all(&self, records: &[FileRecord]) -> ExportBundle {
        #[cfg(feature = "pdf")]
        {
            let (deck, (document, archive)) = rayon::join(
                || self.export(ExportKind::Deck, records),
                || {
                    rayon::join(
                        || self.export(ExportKind::Document, records),
                        || self.export(ExportKind::Archive, records),
                    )
                },
            );
            ExportBundle {
                deck,
                document,
                archive,
            }
        }
        #[cfg(not(feature = "pdf"))]
        {
            let (deck, archive) = rayon::join(
                || self.export(ExportKind::Deck, records),
                || self.export(ExportKind::Archive, records),
            );
            ExportBundle { deck, archive }
        }
    }

    /// Suggested file name for `kind`.
    ///
    /// Only the deck and the document carry the presentation title; the
    /// archive is always `u2p_<label>.zip`.
    pub fn filename(&self, kind: ExportKind) -> String {
        let use_title = !matches!(kind, ExportKind::Archive);
        format!("{}.{}", self.options.file_stem(use_title), kind.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::test_support::{corrupt_png_bytes, png_bytes};

    fn sample() -> Vec<FileRecord> {
        let mut batch = Batch::new();
        batch.add(png_bytes(20, 10), "a.png", "image/png").unwrap();
        batch
            .add(b"%PDF-1.4 fake".to_vec(), "doc.pdf", "application/pdf")
            .unwrap();
        batch.add(corrupt_png_bytes(), "bad.png", "image/png").unwrap();
        batch.list()
    }

    #[test]
    fn test_kind_metadata() {
        assert_eq!(ExportKind::Deck.extension(), "pptx");
        assert_eq!(ExportKind::Archive.mime_type(), "application/zip");
        assert_eq!(ExportKind::Document.to_string(), "document");
    }

    #[test]
    fn test_filenames() {
        let exporter = Exporter::new(
            ExportOptions::new()
                .with_batch_label("20250301T120000Z")
                .with_presentation_title("Site Visit"),
        );
        assert_eq!(
            exporter.filename(ExportKind::Deck),
            "Site_Visit_20250301T120000Z.pptx"
        );
        assert_eq!(
            exporter.filename(ExportKind::Archive),
            "u2p_20250301T120000Z.zip"
        );
        assert_eq!(Exporter::default().filename(ExportKind::Deck), "u2p.pptx");
    }

    #[test]
    fn test_export_collects_warnings() {
        let records = sample();
        let deck = Exporter::default().export(ExportKind::Deck, &records).unwrap();
        assert_eq!(deck.kind, ExportKind::Deck);
        assert_eq!(deck.item_count, 2);
        assert_eq!(deck.warnings.len(), 1);
        assert_eq!(deck.warnings[0].display_name, "bad.png");

        let archive = Exporter::default()
            .export(ExportKind::Archive, &records)
            .unwrap();
        assert_eq!(archive.item_count, 3);
        assert!(archive.warnings.is_empty());
    }

    #[test]
    fn test_export_all_matches_single_exports() {
        let records = sample();
        let exporter = Exporter::new(
            ExportOptions::new().with_timestamp(chrono::Utc::now()),
        );
        let bundle = exporter.export_all(&records);
        assert!(bundle.iter().all(|r| r.is_ok()));

        let deck = exporter.export(ExportKind::Deck, &records).unwrap();
        assert_eq!(bundle.deck.as_ref().unwrap().bytes, deck.bytes);
        let archive = exporter.export(ExportKind::Archive, &records).unwrap();
        assert_eq!(bundle.archive.as_ref().unwrap().bytes, archive.bytes);
    }
}
