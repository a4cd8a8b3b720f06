use std::fmt;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{StoreError, StoreResult};

/// A single-owner, single-read byte stream.
pub type ContentStream = Box<dyn Read + Send>;

/// Produces a fresh [`ContentStream`] on every call.
pub type Opener = Arc<dyn Fn() -> io::Result<ContentStream> + Send + Sync>;

/// The byte content of a store object.
///
/// Either nothing (a metadata-only view), bytes already in memory, or an
/// opener that produces a stream on demand. Whatever the variant,
/// [`Content::stream`] hands out an independent stream per call.
#[derive(Clone, Default)]
pub enum Content {
    #[default]
    Absent,
    Eager(Bytes),
    Deferred(Opener),
}

impl Content {
    /// In-memory content.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Eager(data.into())
    }

    /// Content opened lazily by `open`.
    pub fn deferred<F>(open: F) -> Self
    where
        F: Fn() -> io::Result<ContentStream> + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(open))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Length, when it is known without reading.
    pub fn known_len(&self) -> Option<u64> {
        match self {
            Self::Eager(bytes) => Some(bytes.len() as u64),
            _ => None,
        }
    }

    /// Resolve to a fresh stream.
    ///
    /// Fails with [`StoreError::NotAStream`] when there is no content or the
    /// opener cannot produce a stream.
    pub fn stream(&self) -> StoreResult<ContentStream> {
        match self {
            Self::Absent => Err(StoreError::NotAStream("object has no content".into())),
            Self::Eager(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Self::Deferred(open) => {
                open().map_err(|e| StoreError::NotAStream(format!("opener failed: {e}")))
            }
        }
    }

    /// Read the whole content into memory.
    pub fn read_all(&self) -> StoreResult<Bytes> {
        if let Self::Eager(bytes) = self {
            return Ok(bytes.clone());
        }
        let mut stream = self.stream()?;
        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .map_err(StoreError::StreamRead)?;
        Ok(Bytes::from(buf))
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Content::Absent"),
            Self::Eager(bytes) => write!(f, "Content::Eager({} bytes)", bytes.len()),
            Self::Deferred(_) => f.write_str("Content::Deferred"),
        }
    }
}

impl From<Bytes> for Content {
    fn from(bytes: Bytes) -> Self {
        Self::Eager(bytes)
    }
}

impl From<Vec<u8>> for Content {
    fn from(data: Vec<u8>) -> Self {
        Self::Eager(Bytes::from(data))
    }
}

impl From<&'static [u8]> for Content {
    fn from(data: &'static [u8]) -> Self {
        Self::Eager(Bytes::from_static(data))
    }
}
