//! Per-call hashing state.
//!
//! A [`MultiHasher`] owns one fresh context per requested algorithm. It is
//! consumed by [`MultiHasher::finish`], so a context can never be reused
//! across inputs.

use std::collections::BTreeMap;

use hoard_types::{is_supported, DigestAlgorithm, DigestId, DigestSet};

use crate::error::{DigestError, DigestResult};

/// A single running digest.
enum Context {
    #[cfg(feature = "md5")]
    Md5(md5::Md5),
    #[cfg(feature = "sha1")]
    Sha1(sha1::Sha1),
    #[cfg(feature = "sha2")]
    Sha256(sha2::Sha256),
    #[cfg(feature = "sha2")]
    Sha384(sha2::Sha384),
    #[cfg(feature = "sha2")]
    Sha512(sha2::Sha512),
}

impl Context {
    /// A fresh context, or `None` if the family is compiled out.
    fn new(alg: DigestAlgorithm) -> Option<Self> {
        match alg {
            #[cfg(feature = "md5")]
            DigestAlgorithm::Md5 => Some(Self::Md5(md5::Digest::new())),
            #[cfg(feature = "sha1")]
            DigestAlgorithm::Sha1 => Some(Self::Sha1(sha1::Digest::new())),
            #[cfg(feature = "sha2")]
            DigestAlgorithm::Sha256 => Some(Self::Sha256(sha2::Digest::new())),
            #[cfg(feature = "sha2")]
            DigestAlgorithm::Sha384 => Some(Self::Sha384(sha2::Digest::new())),
            #[cfg(feature = "sha2")]
            DigestAlgorithm::Sha512 => Some(Self::Sha512(sha2::Digest::new())),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            #[cfg(feature = "md5")]
            Self::Md5(h) => md5::Digest::update(h, data),
            #[cfg(feature = "sha1")]
            Self::Sha1(h) => sha1::Digest::update(h, data),
            #[cfg(feature = "sha2")]
            Self::Sha256(h) => sha2::Digest::update(h, data),
            #[cfg(feature = "sha2")]
            Self::Sha384(h) => sha2::Digest::update(h, data),
            #[cfg(feature = "sha2")]
            Self::Sha512(h) => sha2::Digest::update(h, data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            #[cfg(feature = "md5")]
            Self::Md5(h) => md5::Digest::finalize(h).to_vec(),
            #[cfg(feature = "sha1")]
            Self::Sha1(h) => sha1::Digest::finalize(h).to_vec(),
            #[cfg(feature = "sha2")]
            Self::Sha256(h) => sha2::Digest::finalize(h).to_vec(),
            #[cfg(feature = "sha2")]
            Self::Sha384(h) => sha2::Digest::finalize(h).to_vec(),
            #[cfg(feature = "sha2")]
            Self::Sha512(h) => sha2::Digest::finalize(h).to_vec(),
        }
    }
}

/// A set of digest contexts fed in lockstep.
pub struct MultiHasher {
    contexts: BTreeMap<DigestAlgorithm, Context>,
    bytes_hashed: u64,
}

impl MultiHasher {
    /// Fresh contexts for every algorithm in `algs`. Duplicates collapse.
    ///
    /// Fails with [`DigestError::UnsupportedAlgorithm`] if any algorithm is
    /// outside the catalog; nothing is allocated in that case.
    pub fn new(algs: &[DigestAlgorithm]) -> DigestResult<Self> {
        if let Some(bad) = algs.iter().find(|alg| !is_supported(**alg)) {
            return Err(DigestError::UnsupportedAlgorithm(bad.to_string()));
        }
        let mut contexts = BTreeMap::new();
        for &alg in algs {
            if contexts.contains_key(&alg) {
                continue;
            }
            let ctx =
                Context::new(alg).ok_or_else(|| DigestError::UnsupportedAlgorithm(alg.to_string()))?;
            contexts.insert(alg, ctx);
        }
        Ok(Self {
            contexts,
            bytes_hashed: 0,
        })
    }

    /// Contexts for every algorithm in the catalog.
    pub fn all_supported() -> DigestResult<Self> {
        Self::new(hoard_types::supported_algorithms())
    }

    /// Feed one chunk to every context.
    pub fn update(&mut self, chunk: &[u8]) {
        for ctx in self.contexts.values_mut() {
            ctx.update(chunk);
        }
        self.bytes_hashed += chunk.len() as u64;
    }

    /// Total bytes fed so far.
    pub fn bytes_hashed(&self) -> u64 {
        self.bytes_hashed
    }

    /// Algorithms being computed, in catalog order.
    pub fn algorithms(&self) -> Vec<DigestAlgorithm> {
        self.contexts.keys().copied().collect()
    }

    /// Finalize every context into its identifier.
    pub fn finish(self) -> DigestResult<DigestSet> {
        self.contexts
            .into_iter()
            .map(|(alg, ctx)| -> DigestResult<(DigestAlgorithm, DigestId)> {
                Ok((alg, DigestId::from_digest(alg, &ctx.finalize())?))
            })
            .collect()
    }
}

impl std::fmt::Debug for MultiHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiHasher")
            .field("algorithms", &self.algorithms())
            .field("bytes_hashed", &self.bytes_hashed)
            .finish()
    }
}
