//! The file record and the upload tuple it is built from.
use super::metadata::Metadata;
use super::mime::guess_media_type;
use crate::common::{InvalidInputError, RecordId};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;

/// One file as supplied by the host: bytes, name and declared type.
#[derive(Debug, Clone)]
pub struct Upload {
    pub content: Bytes,
    pub display_name: String,
    pub media_type: String,
}

impl Upload {
    pub fn new(
        content: impl Into<Bytes>,
        display_name: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            display_name: display_name.into(),
            media_type: media_type.into(),
        }
    }

    /// Check the upload before it is allowed into a batch.
    ///
    /// `position` is the upload's index within the request, reported back
    /// when the name is missing.
    pub(crate) fn validate(&self, position: usize) -> Result<(), InvalidInputError> {
        if self.display_name.is_empty() {
            return Err(InvalidInputError::EmptyDisplayName { position });
        }
        if self.content.is_empty() {
            return Err(InvalidInputError::EmptyContent {
                display_name: self.display_name.clone(),
            });
        }
        Ok(())
    }
}

/// An uploaded file held in memory for the lifetime of a batch.
///
/// Content and metadata never change after creation. Only the optional
/// slide caption can be edited through the owning batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    id: RecordId,
    display_name: String,
    media_type: String,
    #[serde(skip)]
    content: Bytes,
    title: Option<String>,
    metadata: Metadata,
}

impl FileRecord {
    /// Build a record from a validated upload.
    pub(crate) fn from_upload(id: RecordId, upload: Upload) -> Self {
        let media_type = if upload.media_type.trim().is_empty() {
            guess_media_type(&upload.display_name).to_string()
        } else {
            upload.media_type.trim().to_ascii_lowercase()
        };
        let metadata = Metadata::extract(&upload.content, &media_type, Utc::now());

        Self {
            id,
            display_name: upload.display_name,
            media_type,
            content: upload.content,
            title: None,
            metadata,
        }
    }

    #[inline]
    pub fn id(&self) -> RecordId {
        self.id
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[inline]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[inline]
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    #[inline]
    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Custom caption, if one was set.
    #[inline]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Caption to show on a slide: the custom title or the file name.
    pub fn caption(&self) -> &str {
        self.title().unwrap_or(&self.display_name)
    }

    pub(crate) fn set_title(&mut self, title: Option<String>) {
        self.title = title.filter(|t| !t.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_name() {
        let upload = Upload::new(vec![1u8], "", "text/plain");
        assert_eq!(
            upload.validate(3),
            Err(InvalidInputError::EmptyDisplayName { position: 3 })
        );
    }

    #[test]
    fn test_validate_keeps_whitespace_names() {
        let upload = Upload::new(vec![1u8], "  ", "text/plain");
        assert_eq!(upload.validate(0), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_content() {
        let upload = Upload::new(Vec::<u8>::new(), "a.txt", "text/plain");
        assert_eq!(
            upload.validate(0),
            Err(InvalidInputError::EmptyContent {
                display_name: "a.txt".to_string()
            })
        );
    }

    #[test]
    fn test_missing_media_type_is_guessed() {
        let record = FileRecord::from_upload(
            RecordId::generate(),
            Upload::new(b"%PDF-1.4".to_vec(), "notes.PDF", ""),
        );
        assert_eq!(record.media_type(), "application/pdf");
        assert_eq!(record.size_bytes(), 8);
    }

    #[test]
    fn test_caption_falls_back_to_name() {
        let mut record = FileRecord::from_upload(
            RecordId::generate(),
            Upload::new(b"hello".to_vec(), "hello.txt", "text/plain"),
        );
        assert_eq!(record.caption(), "hello.txt");
        record.set_title(Some("Greeting".to_string()));
        assert_eq!(record.caption(), "Greeting");
        record.set_title(Some("   ".to_string()));
        assert_eq!(record.title(), None);
    }
}
