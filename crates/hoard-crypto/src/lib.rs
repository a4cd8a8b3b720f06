//! Digest engine for the Hoard object store.
//!
//! Computes one or many digests of a byte stream in a single pass and
//! produces canonical [`DigestId`](hoard_types::DigestId)s. Two operations
//! with fixed return types cover the single- and multi-algorithm cases:
//! [`digest_one`] and [`digest_many`].
//!
//! All hashing wraps the RustCrypto implementations; each family sits behind
//! a cargo feature (`md5`, `sha1`, `sha2`, all on by default) and the digest
//! catalog reflects what was compiled in.

#[cfg(not(any(feature = "md5", feature = "sha1", feature = "sha2")))]
compile_error!("hoard-crypto needs at least one of the `md5`, `sha1`, `sha2` features");

pub mod cancel;
pub mod context;
pub mod engine;
pub mod error;
pub mod reader;

pub use cancel::CancelToken;
pub use context::MultiHasher;
pub use engine::{digest_bytes_many, digest_bytes_one, digest_many, digest_one, DigestEngine};
pub use error::{DigestError, DigestResult};
pub use reader::{classify_read_error, HashingReader};
