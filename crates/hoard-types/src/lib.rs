//! Foundation types for the Hoard content-addressable object store.
//!
//! Every other Hoard crate depends on `hoard-types`.
//!
//! # Key Types
//!
//! - [`DigestAlgorithm`] -- Closed set of supported hash functions
//! - [`supported_algorithms`] -- The process-wide digest catalog, in canonical order
//! - [`DigestId`] -- Content identifier of the form `<algorithm>:<hex>`
//! - [`ContentAttrs`] -- Size, media type, charset, and transfer encoding
//! - [`StoreTimes`] -- Creation, insertion, update, and removal timestamps
//! - [`CheckFlags`] -- Recorded outcomes of the type/charset/encoding/syntax checkers

pub mod algorithm;
pub mod attrs;
pub mod catalog;
pub mod digest;
pub mod error;
pub mod flags;
pub mod times;

pub use algorithm::DigestAlgorithm;
pub use attrs::{ContentAttrs, ContentEncoding, DEFAULT_MEDIA_TYPE};
pub use catalog::{is_supported, strongest, supported_algorithms};
pub use digest::{DigestId, DigestSet};
pub use error::TypeError;
pub use flags::{CheckFlags, CheckState};
pub use times::StoreTimes;
