//! Questionnaire attachments.

use crate::constants::{ATTACHMENT_EXTENSIONS, MAX_ATTACHMENT_BYTES};
use serde::Serialize;
use thiserror::Error;

/// Why an attachment operation was refused. The list is never changed when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("file {name} is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("no attachment at position {0}")]
    NoSuchAttachment(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
}

/// Files attached to a questionnaire, in upload order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttachmentList(Vec<Attachment>);

impl AttachmentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a file if its extension is allowed and it fits under the size limit.
    ///
    /// The extension is matched case-insensitively against [`ATTACHMENT_EXTENSIONS`]. A file of
    /// exactly [`MAX_ATTACHMENT_BYTES`] is accepted.
    ///
    /// # Returns
    ///
    /// The attachment as stored at the end of the list.
    ///
    /// # Errors
    ///
    /// - [`AttachmentError::UnsupportedType`] if the name has no allowed extension.
    /// - [`AttachmentError::TooLarge`] if `size` exceeds the limit.
    pub fn add(&mut self, name: impl Into<String>, size: u64) -> Result<&Attachment, AttachmentError> {
        let name = name.into();
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ATTACHMENT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AttachmentError::UnsupportedType(name));
        }
        if size > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                name,
                size,
                limit: MAX_ATTACHMENT_BYTES,
            });
        }
        self.0.push(Attachment { name, size });
        Ok(&self.0[self.0.len() - 1])
    }

    /// Remove the attachment at `index`; later attachments move up one place.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::NoSuchAttachment`] if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<Attachment, AttachmentError> {
        if index >= self.0.len() {
            return Err(AttachmentError::NoSuchAttachment(index));
        }
        Ok(self.0.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
