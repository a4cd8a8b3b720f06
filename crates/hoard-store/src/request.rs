use bytes::Bytes;
use hoard_types::{CheckFlags, ContentEncoding, DigestId};

use crate::content::Content;

/// Input to [`Store::add`](crate::Store::add).
///
/// With content, the store digests it and records (or dedups) it; any
/// `claimed` identifiers must agree with the computed ones. Without content,
/// `claimed` names an existing object whose metadata is updated.
#[derive(Clone, Debug, Default)]
pub struct AddRequest {
    pub content: Content,
    /// Identifiers the caller expects the content to have.
    pub claimed: Vec<DigestId>,
    pub media_type: Option<String>,
    pub charset: Option<String>,
    pub encoding: Option<ContentEncoding>,
    /// Checker outcomes to record. Unchecked entries leave stored state alone.
    pub flags: CheckFlags,
}

impl AddRequest {
    /// Add in-memory bytes.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Self {
            content: Content::Eager(data.into()),
            ..Default::default()
        }
    }

    /// Add arbitrary content (eager or deferred).
    pub fn content(content: Content) -> Self {
        Self {
            content,
            ..Default::default()
        }
    }

    /// Update metadata of the object known as `id`.
    pub fn metadata(id: DigestId) -> Self {
        Self {
            claimed: vec![id],
            ..Default::default()
        }
    }

    pub fn with_claimed(mut self, id: DigestId) -> Self {
        self.claimed.push(id);
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_encoding(mut self, encoding: ContentEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_flags(mut self, flags: CheckFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether the request carries any attribute or flag changes.
    pub fn has_props(&self) -> bool {
        self.media_type.is_some()
            || self.charset.is_some()
            || self.encoding.is_some()
            || self.flags != CheckFlags::default()
    }
}
