//! Per-user session context.
//!
//! A [`Session`] bundles one batch, its batch id and the export options.
//! Hosts keep one per user session and drop it when the session ends; there
//! is no global state.
use super::Batch;
use crate::common::Result;
use crate::config::ExportOptions;
use crate::export::{ExportBundle, ExportKind, ExportResult, Exporter};
use chrono::{DateTime, Utc};

/// Batch id format: UTC timestamp, e.g. `20250301T120000Z`.
const BATCH_ID_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// One batch plus everything needed to export it.
#[derive(Debug, Clone)]
pub struct Session {
    batch: Batch,
    batch_id: String,
    options: ExportOptions,
}

impl Session {
    /// Start a session with an empty batch and default options.
    pub fn new() -> Self {
        Self::with_options(ExportOptions::default())
    }

    /// Start a session with an empty batch and the given options.
    pub fn with_options(options: ExportOptions) -> Self {
        Self {
            batch: Batch::new(),
            batch_id: batch_id_at(Utc::now()),
            options,
        }
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn batch_mut(&mut self) -> &mut Batch {
        &mut self.batch
    }

    /// Timestamp slug identifying the current batch.
    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ExportOptions {
        &mut self.options
    }

    /// Drop every record and issue a new batch id.
    pub fn start_new_batch(&mut self) -> &str {
        self.batch.clear();
        self.batch_id = batch_id_at(Utc::now());
        tracing::debug!(batch_id = %self.batch_id, "new batch started");
        &self.batch_id
    }

    /// Export the current batch.
    ///
    /// The export works on a snapshot, so the batch may be edited again as
    /// soon as this returns.
    pub fn export(&self, kind: ExportKind) -> Result<ExportResult> {
        self.exporter().export(kind, &self.batch.list())
    }

    /// Export the current batch to every kind concurrently.
    pub fn export_all(&self) -> ExportBundle {
        self.exporter().export_all(&self.batch.list())
    }

    /// Exporter using the session options, labelled with the batch id unless
    /// a label was configured explicitly.
    fn exporter(&self) -> Exporter {
        let mut options = self.options.clone();
        if options.batch_label.is_none() {
            options.batch_label = Some(self.batch_id.clone());
        }
        Exporter::new(options)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn batch_id_at(at: DateTime<Utc>) -> String {
    at.format(BATCH_ID_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_batch_id_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 5).unwrap();
        assert_eq!(batch_id_at(at), "20250301T120005Z");

        let session = Session::new();
        assert_eq!(session.batch_id().len(), 16);
        assert!(session.batch_id().ends_with('Z'));
    }

    #[test]
    fn test_start_new_batch_clears_records() {
        let mut session = Session::new();
        session
            .batch_mut()
            .add(b"x".to_vec(), "a.txt", "text/plain")
            .unwrap();
        assert_eq!(session.batch().len(), 1);

        session.start_new_batch();
        assert!(session.batch().is_empty());
    }

    #[test]
    fn test_exports_are_labelled_with_batch_id() {
        let mut session = Session::new();
        session
            .batch_mut()
            .add(b"x".to_vec(), "a.txt", "text/plain")
            .unwrap();

        let archive = session.export(ExportKind::Archive).unwrap();
        assert_eq!(archive.filename, format!("u2p_{}.zip", session.batch_id()));

        session.options_mut().batch_label = Some("custom".to_string());
        let archive = session.export(ExportKind::Archive).unwrap();
        assert_eq!(archive.filename, "u2p_custom.zip");
    }

    #[test]
    fn test_export_all_on_empty_session() {
        let session = Session::new();
        let bundle = session.export_all();
        assert_eq!(bundle.deck.as_ref().unwrap().item_count, 1);
        assert_eq!(bundle.archive.as_ref().unwrap().item_count, 0);
    }
}
