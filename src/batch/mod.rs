//! In-memory file record store.
//!
//! A [`Batch`] is the ordered collection of uploads for one session.
//! Insertion order is display order is slide order. Nothing here touches
//! persistent storage; dropping the batch releases every payload.
//!
//! # Example
//!
//! ```rust
//! use u2p::batch::Batch;
//!
//! let mut batch = Batch::new();
//! let id = batch.add(b"hello".to_vec(), "hello.txt", "text/plain")?;
//! assert_eq!(batch.len(), 1);
//! assert_eq!(batch.total_size_bytes(), 5);
//! assert_eq!(batch.get(id).map(|r| r.display_name()), Some("hello.txt"));
//! # Ok::<(), u2p::Error>(())
//! ```

pub mod metadata;
pub mod mime;
pub mod record;
pub mod session;

pub use crate::common::RecordId;
pub use metadata::{Metadata, MetadataValue};
pub use record::{FileRecord, Upload};
pub use session::Session;

use crate::classify::{Classification, classify};
use crate::common::{InvalidInputError, Result};
use bytes::Bytes;

/// Ordered, mutable collection of file records.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    records: Vec<FileRecord>,
}

impl Batch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one upload at the end of the batch.
    ///
    /// Fails with [`InvalidInputError`] when the content or the name is empty.
    pub fn add(
        &mut self,
        content: impl Into<Bytes>,
        display_name: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Result<RecordId> {
        self.add_upload(Upload::new(content, display_name, media_type))
    }

    /// Append an [`Upload`] at the end of the batch.
    pub fn add_upload(&mut self, upload: Upload) -> Result<RecordId> {
        upload.validate(0)?;
        Ok(self.push(upload))
    }

    /// Append a list of uploads, all or nothing.
    ///
    /// Every upload is validated first. If any is invalid the batch is left
    /// untouched and all problems are returned; otherwise the uploads are
    /// appended in order and their identities returned.
    pub fn add_many<I>(&mut self, uploads: I) -> std::result::Result<Vec<RecordId>, Vec<InvalidInputError>>
    where
        I: IntoIterator<Item = Upload>,
    {
        let uploads: Vec<Upload> = uploads.into_iter().collect();
        let problems: Vec<InvalidInputError> = uploads
            .iter()
            .enumerate()
            .filter_map(|(position, upload)| upload.validate(position).err())
            .collect();
        if !problems.is_empty() {
            tracing::debug!(rejected = problems.len(), "upload list rejected");
            return Err(problems);
        }

        self.records.reserve(uploads.len());
        Ok(uploads.into_iter().map(|upload| self.push(upload)).collect())
    }

    fn push(&mut self, upload: Upload) -> RecordId {
        let id = self.fresh_id();
        let record = FileRecord::from_upload(id, upload);
        tracing::debug!(
            id = %id,
            name = record.display_name(),
            media_type = record.media_type(),
            size = record.size_bytes(),
            "record added to batch"
        );
        self.records.push(record);
        id
    }

    fn fresh_id(&self) -> RecordId {
        loop {
            let id = RecordId::generate();
            if self.position(id).is_none() {
                return id;
            }
        }
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    fn require(&self, id: RecordId) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| InvalidInputError::UnknownRecord(id).into())
    }

    /// Snapshot of the records in batch order.
    ///
    /// Payloads are reference counted, so the snapshot is cheap and stays
    /// valid even if the batch is cleared while an export runs.
    pub fn list(&self) -> Vec<FileRecord> {
        self.records.clone()
    }

    /// Borrow the records in batch order.
    #[inline]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Look up one record.
    pub fn get(&self, id: RecordId) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Remove one record; the rest keep their relative order.
    pub fn remove(&mut self, id: RecordId) -> Result<FileRecord> {
        let index = self.require(id)?;
        Ok(self.records.remove(index))
    }

    /// Move a record to `index`, shifting the others. Indices past the end
    /// move the record to the end.
    pub fn move_to(&mut self, id: RecordId, index: usize) -> Result<()> {
        let from = self.require(id)?;
        let record = self.records.remove(from);
        let to = index.min(self.records.len());
        self.records.insert(to, record);
        Ok(())
    }

    /// Set or clear the slide caption of a record.
    pub fn set_title(&mut self, id: RecordId, title: Option<String>) -> Result<()> {
        let index = self.require(id)?;
        self.records[index].set_title(title);
        Ok(())
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Sum of all record sizes, for memory warnings in the host.
    pub fn total_size_bytes(&self) -> u64 {
        self.records.iter().map(FileRecord::size_bytes).sum()
    }

    /// Number of records that classify as images.
    pub fn image_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(classify(r), Classification::Image(_)))
            .count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
