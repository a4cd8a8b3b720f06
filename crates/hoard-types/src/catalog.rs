//! The digest catalog: algorithms this process can compute, in a fixed order.
//!
//! The catalog is the intersection of the allowlist ([`DigestAlgorithm::ALL`])
//! and the hashing families compiled into this build. It is computed once and
//! never changes afterwards. Its order (ascending byte length, ties broken by
//! tag) is the order to use whenever digests are enumerated for display or
//! serialization.

use std::sync::OnceLock;

use crate::algorithm::DigestAlgorithm;

static CATALOG: OnceLock<Vec<DigestAlgorithm>> = OnceLock::new();

/// Algorithms supported by this process, in catalog order.
///
/// May be empty if every hashing family was compiled out; no store can
/// operate in that configuration.
pub fn supported_algorithms() -> &'static [DigestAlgorithm] {
    CATALOG.get_or_init(|| {
        let mut algs: Vec<DigestAlgorithm> = DigestAlgorithm::ALL
            .iter()
            .copied()
            .filter(DigestAlgorithm::is_compiled)
            .collect();
        algs.sort_by(|a, b| {
            a.byte_len()
                .cmp(&b.byte_len())
                .then_with(|| a.as_str().cmp(b.as_str()))
        });
        algs
    })
}

/// Whether `alg` is in the catalog.
pub fn is_supported(alg: DigestAlgorithm) -> bool {
    supported_algorithms().contains(&alg)
}

/// The strongest algorithm in the catalog, if any.
pub fn strongest() -> Option<DigestAlgorithm> {
    supported_algorithms().last().copied()
}
