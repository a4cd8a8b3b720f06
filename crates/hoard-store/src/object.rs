use hoard_types::{
    is_supported, CheckFlags, ContentAttrs, ContentEncoding, DigestAlgorithm, DigestId, DigestSet,
    StoreTimes,
};
use serde::{Deserialize, Serialize};

use crate::content::{Content, ContentStream};
use crate::error::{DigestSetViolation, ObjectViolation, StoreResult};

/// Algorithm backends prefer as the record key.
pub const PREFERRED_PRIMARY: DigestAlgorithm = DigestAlgorithm::Sha256;

/// Check that `digests` is usable as the identity of an object.
///
/// The set must be non-empty, every algorithm must be in the catalog, and
/// every entry must be keyed by its own identifier's algorithm.
pub fn validate_digests(digests: &DigestSet) -> Result<(), DigestSetViolation> {
    if digests.is_empty() {
        return Err(DigestSetViolation::Empty);
    }
    for (key, id) in digests {
        if !is_supported(*key) {
            return Err(DigestSetViolation::Unsupported(*key));
        }
        if id.algorithm() != *key {
            return Err(DigestSetViolation::KeyMismatch {
                key: *key,
                actual: id.algorithm(),
            });
        }
    }
    Ok(())
}

/// The unit of storage: content, identity, attributes, and lifecycle state.
///
/// A `StoreObject` is an immutable value. Stores hand out clones; cloning is
/// cheap because eager content is reference-counted.
#[derive(Clone, Debug)]
pub struct StoreObject {
    content: Content,
    digests: DigestSet,
    primary: DigestId,
    attrs: ContentAttrs,
    times: StoreTimes,
    flags: CheckFlags,
}

impl StoreObject {
    /// Validate and assemble a store object. All-or-nothing.
    ///
    /// Fails with `InvalidDigestSet` for an unusable digest map and with
    /// `InvalidStoreObject` when eager content disagrees with `attrs.size` or
    /// a timestamp precedes `times.created`.
    pub fn new(
        content: Content,
        digests: DigestSet,
        attrs: ContentAttrs,
        times: StoreTimes,
        flags: CheckFlags,
    ) -> StoreResult<Self> {
        validate_digests(&digests)?;
        let primary = primary_of(&digests)
            .cloned()
            .ok_or(DigestSetViolation::Empty)?;
        if let Some(actual) = content.known_len() {
            if actual != attrs.size {
                return Err(ObjectViolation::SizeMismatch {
                    declared: attrs.size,
                    actual,
                }
                .into());
            }
        }
        if let Some(field) = times.first_out_of_order() {
            return Err(ObjectViolation::TimeOrder { field }.into());
        }
        Ok(Self {
            content,
            digests,
            primary,
            attrs,
            times,
            flags,
        })
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn digests(&self) -> &DigestSet {
        &self.digests
    }

    pub fn digest(&self, alg: DigestAlgorithm) -> Option<&DigestId> {
        self.digests.get(&alg)
    }

    /// The identifier backends key this object by: sha-256 when present,
    /// otherwise the strongest digest held.
    pub fn primary_digest(&self) -> &DigestId {
        &self.primary
    }

    /// Whether `id` is one of this object's identifiers.
    pub fn has_digest(&self, id: &DigestId) -> bool {
        self.digests.get(&id.algorithm()) == Some(id)
    }

    pub fn attrs(&self) -> &ContentAttrs {
        &self.attrs
    }

    pub fn size(&self) -> u64 {
        self.attrs.size
    }

    pub fn media_type(&self) -> &str {
        &self.attrs.media_type
    }

    pub fn charset(&self) -> Option<&str> {
        self.attrs.charset.as_deref()
    }

    pub fn encoding(&self) -> Option<&ContentEncoding> {
        self.attrs.encoding.as_ref()
    }

    pub fn times(&self) -> &StoreTimes {
        &self.times
    }

    pub fn flags(&self) -> &CheckFlags {
        &self.flags
    }

    pub fn is_removed(&self) -> bool {
        self.times.is_removed()
    }

    /// A fresh stream over the content. See [`Content::stream`].
    pub fn stream(&self) -> StoreResult<ContentStream> {
        self.content.stream()
    }

    /// The same object with its content dropped.
    pub fn without_content(&self) -> Self {
        Self {
            content: Content::Absent,
            ..self.clone()
        }
    }

    /// Serializable snapshot of everything but the content.
    pub fn metadata(&self) -> ObjectMetadata {
        ObjectMetadata {
            digests: self.digests.clone(),
            attrs: self.attrs.clone(),
            times: self.times,
            flags: self.flags,
        }
    }
}

/// The primary identifier of a digest set, per [`StoreObject::primary_digest`].
pub fn primary_of(digests: &DigestSet) -> Option<&DigestId> {
    digests
        .get(&PREFERRED_PRIMARY)
        .or_else(|| digests.values().next_back())
}

/// Store object metadata without content, in a stable serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Identifiers in catalog order.
    pub digests: DigestSet,
    pub attrs: ContentAttrs,
    pub times: StoreTimes,
    pub flags: CheckFlags,
}

impl ObjectMetadata {
    /// Rebuild a store object from this metadata and `content`.
    pub fn into_object(self, content: Content) -> StoreResult<StoreObject> {
        StoreObject::new(content, self.digests, self.attrs, self.times, self.flags)
    }
}
