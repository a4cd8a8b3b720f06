use std::io;

use hoard_types::TypeError;

/// Errors from digest computation.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// The algorithm is not in the digest catalog of this build.
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The input stream failed mid-read. No partial digest is produced.
    #[error("stream read failed: {0}")]
    StreamRead(#[from] io::Error),

    /// The computation was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("digest computation cancelled")]
    Cancelled,

    /// A finished digest could not be turned into an identifier.
    #[error("invalid digest identifier: {0}")]
    InvalidIdentifier(TypeError),
}

impl From<TypeError> for DigestError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnsupportedAlgorithm(tag) => Self::UnsupportedAlgorithm(tag),
            other => Self::InvalidIdentifier(other),
        }
    }
}

/// Result alias for digest operations.
pub type DigestResult<T> = Result<T, DigestError>;
