/// Configuration types for export.
///
/// This module defines the options shared by the deck, document and archive
/// builders.
use crate::common::unit::inches_to_emu;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration options for exporting a batch.
///
/// # Examples
///
/// ```rust
/// use u2p::config::{ExportOptions, SlideSize};
///
/// // Create with defaults
/// let options = ExportOptions::default();
///
/// // Or customize
/// let options = ExportOptions::new()
///     .with_slide_size(SlideSize::Widescreen16x9)
///     .with_titles(true)
///     .with_batch_label("20250301T120000Z");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Slide canvas size
    pub slide_size: SlideSize,
    /// Whether image slides get a caption above the picture
    pub show_titles: bool,
    /// Presentation title; adds a leading title slide when set
    pub presentation_title: Option<String>,
    /// Batch label shown in slide footers and used in file names
    pub batch_label: Option<String>,
    /// Generation time written to document properties; `None` means "now"
    pub timestamp: Option<DateTime<Utc>>,
    /// Whether archive entries are nested under a folder named after the batch label
    pub archive_folder: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            slide_size: SlideSize::LetterPortrait,
            show_titles: false,
            presentation_title: None,
            batch_label: None,
            timestamp: None,
            archive_folder: false,
        }
    }
}

impl ExportOptions {
    /// Create a new `ExportOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slide canvas size.
    #[inline]
    pub fn with_slide_size(mut self, size: SlideSize) -> Self {
        self.slide_size = size;
        self
    }

    /// Set whether image slides carry a caption.
    #[inline]
    pub fn with_titles(mut self, show: bool) -> Self {
        self.show_titles = show;
        self
    }

    /// Set the presentation title.
    ///
    /// The title goes into document properties, adds a title slide in front
    /// of the deck, and prefixes the deck file name.
    #[inline]
    pub fn with_presentation_title(mut self, title: impl Into<String>) -> Self {
        self.presentation_title = Some(title.into()).filter(|t: &String| !t.trim().is_empty());
        self
    }

    /// Set the batch label used in footers and file names.
    #[inline]
    pub fn with_batch_label(mut self, label: impl Into<String>) -> Self {
        self.batch_label = Some(label.into()).filter(|l: &String| !l.trim().is_empty());
        self
    }

    /// Pin the generation time.
    ///
    /// With a fixed timestamp, repeated exports of the same batch are
    /// byte-identical.
    #[inline]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set whether archive entries go under a batch folder.
    #[inline]
    pub fn with_archive_folder(mut self, nested: bool) -> Self {
        self.archive_folder = nested;
        self
    }

    /// Generation time for this export.
    pub(crate) fn generated_at(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or_else(Utc::now)
    }

    /// Base name for exported files without extension.
    ///
    /// `Title_label` when a presentation title is set, `u2p_label` otherwise,
    /// and plain `u2p` when there is no label either.
    pub(crate) fn file_stem(&self, use_title: bool) -> String {
        let label = self.batch_label.as_deref();
        let title = if use_title {
            self.presentation_title.as_deref().map(clean_title).filter(|t| !t.is_empty())
        } else {
            None
        };
        match (title, label) {
            (Some(title), Some(label)) => format!("{}_{}", title, label),
            (Some(title), None) => title,
            (None, Some(label)) => format!("u2p_{}", label),
            (None, None) => "u2p".to_string(),
        }
    }
}

/// Reduce a title to something safe for a file name: alphanumerics, spaces,
/// dashes and underscores, spaces turned into underscores, at most 30 chars.
fn clean_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    kept.trim_end().replace(' ', "_").chars().take(30).collect()
}

/// Slide canvas sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideSize {
    /// 8.5" x 11" portrait, suited to scanned pages and phone photos
    LetterPortrait,
    /// 10" x 7.5"
    Standard4x3,
    /// 13.333" x 7.5"
    Widescreen16x9,
    /// Explicit size in EMUs
    Custom { width_emu: i64, height_emu: i64 },
}

impl SlideSize {
    /// Width and height in EMUs.
    pub fn dimensions_emu(&self) -> (i64, i64) {
        match *self {
            Self::LetterPortrait => (inches_to_emu(8.5), inches_to_emu(11.0)),
            Self::Standard4x3 => (9_144_000, 6_858_000),
            Self::Widescreen16x9 => (12_192_000, 6_858_000),
            Self::Custom {
                width_emu,
                height_emu,
            } => (width_emu, height_emu),
        }
    }
}

impl Default for SlideSize {
    fn default() -> Self {
        Self::LetterPortrait
    }
}
