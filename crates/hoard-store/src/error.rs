use std::io;

use hoard_crypto::DigestError;
use hoard_types::{DigestAlgorithm, DigestId, TypeError};

/// Why a digest map was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigestSetViolation {
    #[error("digest set is empty")]
    Empty,

    #[error("algorithm {0} is not in the digest catalog")]
    Unsupported(DigestAlgorithm),

    #[error("entry keyed {key} holds an identifier for {actual}")]
    KeyMismatch {
        key: DigestAlgorithm,
        actual: DigestAlgorithm,
    },
}

/// Which store-object invariant a construction broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectViolation {
    #[error("declared size {declared} does not match content length {actual}")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("timestamp {field} is earlier than created")]
    TimeOrder { field: &'static str },
}

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A digest algorithm outside the catalog was requested or claimed.
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The content stream failed while being read.
    #[error("stream read failed: {0}")]
    StreamRead(io::Error),

    /// The digest map of an object is unusable.
    #[error("invalid digest set: {0}")]
    InvalidDigestSet(DigestSetViolation),

    /// A store object failed validation.
    #[error("invalid store object: {0}")]
    InvalidStoreObject(ObjectViolation),

    /// A caller-supplied digest disagrees with the recomputed one.
    #[error("digest mismatch for {algorithm}: claimed {claimed}, computed {computed}")]
    DigestMismatch {
        algorithm: DigestAlgorithm,
        claimed: DigestId,
        computed: DigestId,
    },

    /// The backend could not persist a change. Nothing was made visible.
    #[error("backend write failed: {0}")]
    BackendWrite(String),

    /// No object is known under this identifier.
    #[error("object not found: {0}")]
    NotFound(DigestId),

    /// No backend is registered under this key.
    #[error("unknown backend: {0:?}")]
    UnknownBackend(String),

    /// The store has been closed.
    #[error("store is closed")]
    StoreClosed,

    /// Content could not be resolved to a readable stream.
    #[error("content is not a stream: {0}")]
    NotAStream(String),

    /// An add was cancelled before it became visible.
    #[error("operation cancelled")]
    Cancelled,

    /// The store configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A digest identifier could not be built or parsed.
    #[error("invalid digest identifier: {0}")]
    InvalidIdentifier(TypeError),
}

impl StoreError {
    /// Whether this error is a caller contract violation (never worth retrying).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedAlgorithm(_)
                | Self::InvalidDigestSet(_)
                | Self::InvalidStoreObject(_)
                | Self::DigestMismatch { .. }
                | Self::InvalidIdentifier(_)
        )
    }
}

impl From<DigestError> for StoreError {
    fn from(err: DigestError) -> Self {
        match err {
            DigestError::UnsupportedAlgorithm(tag) => Self::UnsupportedAlgorithm(tag),
            DigestError::StreamRead(e) => Self::StreamRead(e),
            DigestError::Cancelled => Self::Cancelled,
            DigestError::InvalidIdentifier(e) => Self::InvalidIdentifier(e),
        }
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnsupportedAlgorithm(tag) => Self::UnsupportedAlgorithm(tag),
            other => Self::InvalidIdentifier(other),
        }
    }
}

impl From<DigestSetViolation> for StoreError {
    fn from(v: DigestSetViolation) -> Self {
        Self::InvalidDigestSet(v)
    }
}

impl From<ObjectViolation> for StoreError {
    fn from(v: ObjectViolation) -> Self {
        Self::InvalidStoreObject(v)
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
