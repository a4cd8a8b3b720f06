//! Content-addressable object storage for Hoard.
//!
//! Every object is identified by the digests of its bytes: one identifier
//! per algorithm in the digest catalog (md5, sha-1, sha-256, ...), all
//! computed in a single pass at ingest. Any of them retrieves the object.
//!
//! # Objects
//!
//! - [`StoreObject`] -- content, digest set, attributes, timestamps, and
//!   checker flags, validated at construction
//! - [`Content`] -- absent, eager bytes, or a deferred stream opener
//! - [`AddRequest`] -- what a caller hands to [`Store::add`]
//!
//! # Storage Backends
//!
//! All backends implement the [`Store`] trait and are opened through a
//! [`BackendRegistry`] keyed by [`StoreConfig::backend`]:
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Identical content is stored once; later adds only bump timestamps.
//! 2. Claimed digests are always recomputed and compared, never trusted.
//! 3. A failed or cancelled add leaves no visible trace.
//! 4. `remove` hides an object but keeps its metadata; `forget` erases it.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod config;
pub mod content;
pub mod error;
pub mod memory;
pub mod object;
pub mod registry;
pub mod request;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StoreConfig;
pub use content::{Content, ContentStream, Opener};
pub use error::{DigestSetViolation, ObjectViolation, StoreError, StoreResult};
pub use hoard_crypto::CancelToken;
pub use memory::InMemoryStore;
pub use object::{validate_digests, ObjectMetadata, StoreObject};
pub use registry::{open, BackendFactory, BackendRegistry, DEFAULT_BACKEND};
pub use request::AddRequest;
pub use traits::{Store, StoreStats};
