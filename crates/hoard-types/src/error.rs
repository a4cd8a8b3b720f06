use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid digest length for {algorithm}: expected {expected} hex chars, got {actual}")]
    InvalidLength {
        algorithm: String,
        expected: usize,
        actual: usize,
    },

    #[error("malformed digest identifier {0:?}: expected \"<algorithm>:<hex>\"")]
    MalformedIdentifier(String),
}
