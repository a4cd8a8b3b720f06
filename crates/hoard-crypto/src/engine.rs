use std::io::{ErrorKind, Read};

use hoard_types::{DigestAlgorithm, DigestId, DigestSet};
use tracing::debug;

use crate::cancel::CancelToken;
use crate::context::MultiHasher;
use crate::error::{DigestError, DigestResult};

/// Single-pass digest engine.
///
/// Reads its input once, in chunks of `chunk_size` bytes, and feeds every
/// chunk to every requested context before reading the next one. Contexts
/// are created per call and never shared. On any read error or cancellation
/// the whole computation fails and nothing is returned.
#[derive(Clone, Debug)]
pub struct DigestEngine {
    chunk_size: usize,
    cancel: Option<CancelToken>,
}

impl DigestEngine {
    /// Default read chunk size (64 KiB).
    pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

    pub fn new() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            cancel: None,
        }
    }

    /// Use `chunk_size` bytes per read (at least 1).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Abort with [`DigestError::Cancelled`] once `token` fires.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Digest `reader` with a single algorithm.
    pub fn digest_one<R: Read>(&self, reader: R, alg: DigestAlgorithm) -> DigestResult<DigestId> {
        let mut set = self.digest_many(reader, &[alg])?;
        set.remove(&alg)
            .ok_or_else(|| DigestError::UnsupportedAlgorithm(alg.to_string()))
    }

    /// Digest `reader` with every algorithm in `algs`, in one pass.
    ///
    /// An empty `algs` still drains the reader and returns an empty set.
    pub fn digest_many<R: Read>(&self, reader: R, algs: &[DigestAlgorithm]) -> DigestResult<DigestSet> {
        let hasher = MultiHasher::new(algs)?;
        self.run(reader, hasher)
    }

    /// Digest `reader` with algorithms named by tag (e.g. `"sha-256"`).
    ///
    /// Every tag is validated before the first byte is read.
    pub fn digest_tags<R: Read>(&self, reader: R, tags: &[&str]) -> DigestResult<DigestSet> {
        let algs = tags
            .iter()
            .map(|tag| tag.parse::<DigestAlgorithm>())
            .collect::<Result<Vec<_>, _>>()?;
        self.digest_many(reader, &algs)
    }

    /// Digest `reader` with every algorithm in the catalog.
    pub fn digest_all<R: Read>(&self, reader: R) -> DigestResult<DigestSet> {
        let hasher = MultiHasher::all_supported()?;
        self.run(reader, hasher)
    }

    fn run<R: Read>(&self, mut reader: R, mut hasher: MultiHasher) -> DigestResult<DigestSet> {
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            if self.is_cancelled() {
                return Err(DigestError::Cancelled);
            }
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DigestError::StreamRead(e)),
            };
            hasher.update(&buf[..n]);
        }
        debug!(
            bytes = hasher.bytes_hashed(),
            algorithms = hasher.algorithms().len(),
            "digest pass complete"
        );
        hasher.finish()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

impl Default for DigestEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Digest `reader` with one algorithm using the default engine.
pub fn digest_one<R: Read>(reader: R, alg: DigestAlgorithm) -> DigestResult<DigestId> {
    DigestEngine::new().digest_one(reader, alg)
}

/// Digest `reader` with several algorithms in one pass using the default engine.
pub fn digest_many<R: Read>(reader: R, algs: &[DigestAlgorithm]) -> DigestResult<DigestSet> {
    DigestEngine::new().digest_many(reader, algs)
}

/// Digest an in-memory buffer with one algorithm.
pub fn digest_bytes_one(data: &[u8], alg: DigestAlgorithm) -> DigestResult<DigestId> {
    digest_one(data, alg)
}

/// Digest an in-memory buffer with several algorithms.
pub fn digest_bytes_many(data: &[u8], algs: &[DigestAlgorithm]) -> DigestResult<DigestSet> {
    digest_many(data, algs)
}
