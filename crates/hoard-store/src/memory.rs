use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use chrono::Utc;
use hoard_crypto::{classify_read_error, CancelToken, DigestEngine, HashingReader};
use hoard_types::{
    is_supported, strongest, CheckFlags, ContentAttrs, DigestAlgorithm, DigestId, DigestSet,
    StoreTimes,
};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::content::Content;
use crate::error::{StoreError, StoreResult};
use crate::object::{primary_of, StoreObject, PREFERRED_PRIMARY};
use crate::request::AddRequest;
use crate::traits::{Store, StoreStats};

/// Registry key of the in-memory backend.
pub const MEMORY_BACKEND: &str = "memory";

/// Config parameter overriding the record-key algorithm.
pub const PRIMARY_DIGEST_PARAM: &str = "primary_digest";

/// One stored byte copy plus its bookkeeping.
#[derive(Clone, Debug)]
struct Record {
    bytes: Bytes,
    digests: DigestSet,
    attrs: ContentAttrs,
    times: StoreTimes,
    flags: CheckFlags,
    insertions: u64,
}

impl Record {
    fn to_object(&self) -> StoreResult<StoreObject> {
        StoreObject::new(
            Content::Eager(self.bytes.clone()),
            self.digests.clone(),
            self.attrs.clone(),
            self.times,
            self.flags,
        )
    }

    fn apply_props(&mut self, request: &AddRequest) {
        if let Some(media_type) = &request.media_type {
            self.attrs.media_type = media_type.clone();
        }
        if let Some(charset) = &request.charset {
            self.attrs.charset = Some(charset.clone());
        }
        if let Some(encoding) = &request.encoding {
            self.attrs.encoding = Some(encoding.clone());
        }
        self.flags = self.flags.merge(&request.flags);
    }
}

#[derive(Default)]
struct State {
    /// Records keyed by their primary identifier.
    records: HashMap<DigestId, Record>,
    /// Every known identifier mapped to its record's primary identifier.
    aliases: HashMap<DigestId, DigestId>,
}

impl State {
    fn resolve(&self, id: &DigestId) -> Option<&DigestId> {
        self.aliases.get(id)
    }
}

/// In-memory, HashMap-based store.
///
/// Intended for tests and embedding. Records live behind one `RwLock`.
/// Digests are computed before the write lock is taken, so the critical
/// section of `add` is a map lookup and insert.
pub struct InMemoryStore {
    state: RwLock<State>,
    closed: AtomicBool,
    primary: DigestAlgorithm,
    max_object_size: Option<u64>,
    engine: DigestEngine,
}

impl InMemoryStore {
    /// Create a new empty store keyed by sha-256 (or the strongest catalog
    /// algorithm if sha-256 is unavailable).
    pub fn new() -> Self {
        let primary = if is_supported(PREFERRED_PRIMARY) {
            PREFERRED_PRIMARY
        } else {
            strongest().unwrap_or(PREFERRED_PRIMARY)
        };
        Self {
            state: RwLock::new(State::default()),
            closed: AtomicBool::new(false),
            primary,
            max_object_size: None,
            engine: DigestEngine::new(),
        }
    }

    /// Build from configuration. Recognizes `max_object_size` and the
    /// `primary_digest` parameter.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        let mut store = Self::new();
        store.max_object_size = config.max_object_size;
        if let Some(tag) = config.param(PRIMARY_DIGEST_PARAM) {
            let alg: DigestAlgorithm = tag.parse()?;
            if !is_supported(alg) {
                return Err(StoreError::UnsupportedAlgorithm(alg.to_string()));
            }
            store.primary = alg;
        }
        Ok(store)
    }

    /// Algorithm whose identifier keys each record.
    pub fn primary_algorithm(&self) -> DigestAlgorithm {
        self.primary
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::StoreClosed);
        }
        Ok(())
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::BackendWrite("lock poisoned".into()))
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::BackendWrite("lock poisoned".into()))
    }

    /// Materialize and digest the request content with every catalog
    /// algorithm, in one pass. Runs without holding any lock.
    fn ingest(&self, content: &Content, cancel: &CancelToken) -> StoreResult<(Bytes, DigestSet)> {
        if let Content::Eager(bytes) = content {
            self.check_size(bytes.len() as u64)?;
            let digests = self
                .engine
                .clone()
                .with_cancel(cancel.clone())
                .digest_all(&bytes[..])?;
            return Ok((bytes.clone(), digests));
        }

        let stream = content.stream()?;
        let mut reader = HashingReader::all_supported(stream)?.with_cancel(cancel.clone());
        let mut buf = Vec::new();
        match self.max_object_size {
            Some(limit) => {
                (&mut reader)
                    .take(limit.saturating_add(1))
                    .read_to_end(&mut buf)
                    .map_err(classify_read_error)?;
            }
            None => {
                reader.read_to_end(&mut buf).map_err(classify_read_error)?;
            }
        }
        self.check_size(buf.len() as u64)?;
        let digests = reader.finish()?;
        Ok((Bytes::from(buf), digests))
    }

    fn check_size(&self, size: u64) -> StoreResult<()> {
        match self.max_object_size {
            Some(limit) if size > limit => Err(StoreError::BackendWrite(format!(
                "object of {size} bytes exceeds limit of {limit}"
            ))),
            _ => Ok(()),
        }
    }

    fn update_metadata(&self, request: &AddRequest) -> StoreResult<StoreObject> {
        let Some(first) = request.claimed.first() else {
            return Err(StoreError::NotAStream(
                "add needs content or a claimed digest".into(),
            ));
        };
        let mut state = self.write_state()?;
        self.ensure_open()?;
        let key = state
            .resolve(first)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(first.clone()))?;
        let record = state
            .records
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(first.clone()))?;
        check_claims(&request.claimed, &record.digests)?;

        let mut updated = record.clone();
        updated.apply_props(request);
        updated.times = updated.times.props_touched(Utc::now());
        let object = updated.to_object()?;
        *record = updated;
        debug!(primary = %key, "metadata updated");
        Ok(object)
    }
}

/// Every claimed identifier must equal the computed one for its algorithm.
fn check_claims(claimed: &[DigestId], computed: &DigestSet) -> StoreResult<()> {
    for claim in claimed {
        let alg = claim.algorithm();
        let actual = computed
            .get(&alg)
            .ok_or_else(|| StoreError::UnsupportedAlgorithm(alg.to_string()))?;
        if actual != claim {
            warn!(claimed = %claim, computed = %actual, "rejected digest claim");
            return Err(StoreError::DigestMismatch {
                algorithm: alg,
                claimed: claim.clone(),
                computed: actual.clone(),
            });
        }
    }
    Ok(())
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for InMemoryStore {
    fn backend(&self) -> &str {
        MEMORY_BACKEND
    }

    fn add_cancellable(&self, request: AddRequest, cancel: &CancelToken) -> StoreResult<StoreObject> {
        self.ensure_open()?;
        if request.content.is_absent() {
            return self.update_metadata(&request);
        }

        let (bytes, digests) = self.ingest(&request.content, cancel)?;
        check_claims(&request.claimed, &digests)?;
        let key = digests
            .get(&self.primary)
            .or_else(|| primary_of(&digests))
            .cloned()
            .ok_or_else(|| StoreError::UnsupportedAlgorithm(self.primary.to_string()))?;

        let now = Utc::now();
        let mut state = self.write_state()?;
        // Checked again under the lock so a racing close or cancel wins.
        self.ensure_open()?;
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        if let Some(record) = state.records.get_mut(&key) {
            let mut updated = record.clone();
            updated.times = updated.times.reinserted(now);
            if request.has_props() {
                updated.apply_props(&request);
                updated.times = updated.times.props_touched(now);
            }
            updated.insertions += 1;
            let object = updated.to_object()?;
            *record = updated;
            debug!(primary = %key, insertions = record.insertions, "deduplicated insert");
            return Ok(object);
        }

        let mut attrs = ContentAttrs::new(bytes.len() as u64);
        if let Some(media_type) = &request.media_type {
            attrs.media_type = media_type.clone();
        }
        attrs.charset = request.charset.clone();
        attrs.encoding = request.encoding.clone();
        let record = Record {
            bytes,
            digests,
            attrs,
            times: StoreTimes::inserted_at(now),
            flags: request.flags,
            insertions: 1,
        };
        let object = record.to_object()?;
        for id in record.digests.values() {
            state.aliases.insert(id.clone(), key.clone());
        }
        debug!(primary = %key, size = record.attrs.size, "stored new object");
        state.records.insert(key, record);
        Ok(object)
    }

    fn get(&self, id: &DigestId) -> StoreResult<Option<StoreObject>> {
        match self.get_including_removed(id)? {
            Some(object) if object.is_removed() => Ok(None),
            other => Ok(other),
        }
    }

    fn get_including_removed(&self, id: &DigestId) -> StoreResult<Option<StoreObject>> {
        self.ensure_open()?;
        let state = self.read_state()?;
        let Some(key) = state.resolve(id) else {
            return Ok(None);
        };
        state.records.get(key).map(Record::to_object).transpose()
    }

    fn remove(&self, id: &DigestId) -> StoreResult<()> {
        self.ensure_open()?;
        let mut state = self.write_state()?;
        let Some(key) = state.resolve(id).cloned() else {
            debug!(id = %id, "remove of unknown object ignored");
            return Ok(());
        };
        if let Some(record) = state.records.get_mut(&key) {
            if !record.times.is_removed() {
                record.times = record.times.marked_removed(Utc::now());
                debug!(primary = %key, "object removed");
            }
        }
        Ok(())
    }

    fn forget(&self, id: &DigestId) -> StoreResult<()> {
        self.ensure_open()?;
        let mut state = self.write_state()?;
        let key = state
            .resolve(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if let Some(record) = state.records.remove(&key) {
            for alias in record.digests.values() {
                state.aliases.remove(alias);
            }
        }
        debug!(primary = %key, "object forgotten");
        Ok(())
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        self.ensure_open()?;
        let state = self.read_state()?;
        let mut stats = StoreStats::default();
        for record in state.records.values() {
            stats.stored_copies += 1;
            stats.stored_bytes += record.attrs.size;
            stats.insertions += record.insertions;
            if record.times.is_removed() {
                stats.removed_objects += 1;
            } else {
                stats.live_objects += 1;
                stats.live_bytes += record.attrs.size;
            }
        }
        Ok(stats)
    }

    fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let mut state = self.write_state()?;
        let dropped = state.records.len();
        state.records.clear();
        state.aliases.clear();
        info!(backend = MEMORY_BACKEND, dropped, "store closed");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.read_state().map(|s| s.records.len()).unwrap_or(0);
        f.debug_struct("InMemoryStore")
            .field("object_count", &count)
            .field("primary", &self.primary)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use hoard_crypto::{digest_bytes_many, digest_bytes_one};
    use hoard_types::{supported_algorithms, CheckState, ContentEncoding};
    use proptest::prelude::*;
    use std::io::{self, Cursor};
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn sha256(data: &[u8]) -> DigestId {
        digest_bytes_one(data, DigestAlgorithm::Sha256).unwrap()
    }

    fn md5(data: &[u8]) -> DigestId {
        digest_bytes_one(data, DigestAlgorithm::Md5).unwrap()
    }

    fn read_all(object: &StoreObject) -> Vec<u8> {
        let mut out = Vec::new();
        object.stream().unwrap().read_to_end(&mut out).unwrap();
        out
    }

    // -----------------------------------------------------------------------
    // Add / get round trip
    // -----------------------------------------------------------------------

    #[test]
    fn add_then_get_by_every_digest() {
        let store = InMemoryStore::new();
        let added = store.add(AddRequest::bytes(&b"hello world"[..])).unwrap();
        assert_eq!(added.size(), 11);

        let expected = digest_bytes_many(b"hello world", supported_algorithms()).unwrap();
        assert_eq!(added.digests(), &expected);

        for id in expected.values() {
            let got = store.get(id).unwrap().expect("should exist");
            assert_eq!(got.digests(), &expected);
            assert_eq!(got.size(), 11);
            assert_eq!(read_all(&got), b"hello world");
        }
    }

    #[test]
    fn add_deferred_content() {
        let store = InMemoryStore::new();
        let content = Content::deferred(|| {
            Ok(Box::new(Cursor::new(b"streamed".to_vec())) as crate::ContentStream)
        });
        let added = store.add(AddRequest::content(content)).unwrap();
        assert_eq!(added.size(), 8);
        let got = store.get(&sha256(b"streamed")).unwrap().unwrap();
        assert_eq!(read_all(&got), b"streamed");
    }

    #[test]
    fn add_records_attributes_and_flags() {
        let store = InMemoryStore::new();
        let flags = CheckFlags {
            charset: CheckState::Valid,
            ..Default::default()
        };
        let added = store
            .add(
                AddRequest::bytes(&b"{}"[..])
                    .with_media_type("application/json")
                    .with_charset("utf-8")
                    .with_encoding(ContentEncoding::Base64)
                    .with_flags(flags),
            )
            .unwrap();
        assert_eq!(added.media_type(), "application/json");
        assert_eq!(added.charset(), Some("utf-8"));
        assert_eq!(added.encoding(), Some(&ContentEncoding::Base64));
        assert_eq!(added.flags().charset, CheckState::Valid);
        assert_eq!(added.flags().syntax, CheckState::Unchecked);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.get(&sha256(b"missing")).unwrap().is_none());
        assert!(!store.contains(&md5(b"missing")).unwrap());
    }

    // -----------------------------------------------------------------------
    // Digest claims
    // -----------------------------------------------------------------------

    #[test]
    fn matching_claims_are_accepted() {
        let store = InMemoryStore::new();
        let request = AddRequest::bytes(&b"abc"[..])
            .with_claimed(md5(b"abc"))
            .with_claimed(sha256(b"abc"));
        assert!(store.add(request).is_ok());
    }

    #[test]
    fn mismatched_claim_is_rejected_and_nothing_stored() {
        let store = InMemoryStore::new();
        let request = AddRequest::bytes(&b"abc"[..]).with_claimed(md5(b"abd"));
        let err = store.add(request).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DigestMismatch {
                algorithm: DigestAlgorithm::Md5,
                ..
            }
        ));
        assert_eq!(store.stats().unwrap(), StoreStats::default());
        assert!(store.get(&sha256(b"abc")).unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Dedup
    // -----------------------------------------------------------------------

    #[test]
    fn identical_content_is_stored_once() {
        let store = InMemoryStore::new();
        let first = store.add(AddRequest::bytes(&b"same"[..])).unwrap();
        let second = store.add(AddRequest::bytes(&b"same"[..])).unwrap();
        assert_eq!(first.digests(), second.digests());
        assert_eq!(second.times().created, first.times().created);
        assert!(second.times().last_inserted >= first.times().last_inserted);

        let stats = store.stats().unwrap();
        assert_eq!(stats.stored_copies, 1);
        assert_eq!(stats.live_objects, 1);
        assert_eq!(stats.insertions, 2);
        assert_eq!(stats.stored_bytes, 4);
    }

    #[test]
    fn concurrent_identical_adds_converge() {
        let store = Arc::new(InMemoryStore::new());
        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.add(AddRequest::bytes(vec![42u8; 4096])).unwrap()
                })
            })
            .collect();
        let results: Vec<StoreObject> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        assert_eq!(results[0].digests(), results[1].digests());

        let stats = store.stats().unwrap();
        assert_eq!(stats.stored_copies, 1);
        assert_eq!(stats.live_objects, 1);
        assert_eq!(stats.insertions, 2);
    }

    #[test]
    fn concurrent_distinct_adds_all_land() {
        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.add(AddRequest::bytes(vec![i; 100])).unwrap();
                    store.get(&sha256(&[i; 100])).unwrap().is_some()
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().expect("thread should not panic"));
        }
        assert_eq!(store.stats().unwrap().live_objects, 8);
    }

    // -----------------------------------------------------------------------
    // Metadata-only adds
    // -----------------------------------------------------------------------

    #[test]
    fn metadata_add_updates_props() {
        let store = InMemoryStore::new();
        let added = store.add(AddRequest::bytes(&b"text"[..])).unwrap();
        let updated = store
            .add(AddRequest::metadata(md5(b"text")).with_media_type("text/plain"))
            .unwrap();
        assert_eq!(updated.media_type(), "text/plain");
        assert!(updated.times().props_modified >= added.times().props_modified);
        assert_eq!(updated.times().last_inserted, added.times().last_inserted);
        assert_eq!(store.stats().unwrap().insertions, 1);
    }

    #[test]
    fn metadata_add_for_unknown_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.add(AddRequest::metadata(md5(b"nothing"))).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn metadata_add_with_conflicting_claims_fails() {
        let store = InMemoryStore::new();
        store.add(AddRequest::bytes(&b"one"[..])).unwrap();
        store.add(AddRequest::bytes(&b"two"[..])).unwrap();
        let request = AddRequest::metadata(md5(b"one"))
            .with_claimed(sha256(b"two"))
            .with_media_type("text/plain");
        let err = store.add(request).unwrap_err();
        assert!(matches!(err, StoreError::DigestMismatch { .. }));
        let one = store.get(&md5(b"one")).unwrap().unwrap();
        assert_eq!(one.media_type(), "application/octet-stream");
    }

    #[test]
    fn empty_request_is_rejected() {
        let store = InMemoryStore::new();
        let err = store.add(AddRequest::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotAStream(_)));
    }

    // -----------------------------------------------------------------------
    // Remove / forget
    // -----------------------------------------------------------------------

    #[test]
    fn remove_hides_but_retains() {
        let store = InMemoryStore::new();
        store.add(AddRequest::bytes(&b"doomed"[..])).unwrap();
        let id = md5(b"doomed");

        store.remove(&id).unwrap();
        assert!(store.get(&id).unwrap().is_none());
        assert!(store.get(&sha256(b"doomed")).unwrap().is_none());

        let retained = store.get_including_removed(&id).unwrap().unwrap();
        assert!(retained.is_removed());
        assert!(retained.has_digest(&id));

        let stats = store.stats().unwrap();
        assert_eq!(stats.live_objects, 0);
        assert_eq!(stats.removed_objects, 1);
        assert_eq!(stats.live_bytes, 0);
    }

    #[test]
    fn remove_twice_is_same_as_once() {
        let store = InMemoryStore::new();
        store.add(AddRequest::bytes(&b"twice"[..])).unwrap();
        let id = sha256(b"twice");
        store.remove(&id).unwrap();
        let after_once = store.get_including_removed(&id).unwrap().unwrap();
        let stats_once = store.stats().unwrap();

        store.remove(&id).unwrap();
        let after_twice = store.get_including_removed(&id).unwrap().unwrap();
        assert_eq!(after_once.times(), after_twice.times());
        assert_eq!(stats_once, store.stats().unwrap());
    }

    #[test]
    fn remove_unknown_is_noop() {
        let store = InMemoryStore::new();
        store.remove(&sha256(b"never")).unwrap();
        assert_eq!(store.stats().unwrap(), StoreStats::default());
    }

    #[test]
    fn re_add_restores_removed_object() {
        let store = InMemoryStore::new();
        store.add(AddRequest::bytes(&b"phoenix"[..])).unwrap();
        let id = sha256(b"phoenix");
        store.remove(&id).unwrap();

        let restored = store.add(AddRequest::bytes(&b"phoenix"[..])).unwrap();
        assert!(!restored.is_removed());
        assert!(store.get(&id).unwrap().is_some());
        assert_eq!(store.stats().unwrap().stored_copies, 1);
    }

    #[test]
    fn forget_erases_everything() {
        let store = InMemoryStore::new();
        store.add(AddRequest::bytes(&b"gone"[..])).unwrap();
        let id = md5(b"gone");
        store.forget(&id).unwrap();

        assert!(store.get(&id).unwrap().is_none());
        assert!(store.get_including_removed(&sha256(b"gone")).unwrap().is_none());
        assert_eq!(store.stats().unwrap(), StoreStats::default());
        assert!(matches!(store.forget(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn forget_removed_object() {
        let store = InMemoryStore::new();
        store.add(AddRequest::bytes(&b"both"[..])).unwrap();
        let id = sha256(b"both");
        store.remove(&id).unwrap();
        store.forget(&id).unwrap();
        assert_eq!(store.stats().unwrap().removed_objects, 0);
    }

    #[test]
    fn forget_unknown_is_not_found() {
        let store = InMemoryStore::new();
        let id = sha256(b"never-added");
        let err = store.forget(&id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
    }

    // -----------------------------------------------------------------------
    // Failure atomicity
    // -----------------------------------------------------------------------

    #[test]
    fn cancelled_add_leaves_no_trace() {
        let store = InMemoryStore::new();
        let token = CancelToken::new();
        token.cancel();
        let err = store
            .add_cancellable(AddRequest::bytes(&b"abandoned"[..]), &token)
            .unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
        assert_eq!(store.stats().unwrap(), StoreStats::default());
    }

    #[test]
    fn cancelled_deferred_add_leaves_no_trace() {
        let store = InMemoryStore::new();
        let token = CancelToken::new();
        token.cancel();
        let content =
            Content::deferred(|| Ok(Box::new(Cursor::new(vec![1u8; 1024])) as crate::ContentStream));
        let err = store
            .add_cancellable(AddRequest::content(content), &token)
            .unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
        assert_eq!(store.stats().unwrap(), StoreStats::default());
    }

    #[test]
    fn stream_error_leaves_no_trace() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
            }
        }
        let store = InMemoryStore::new();
        let content = Content::deferred(|| Ok(Box::new(Broken) as crate::ContentStream));
        let err = store.add(AddRequest::content(content)).unwrap_err();
        assert!(matches!(err, StoreError::StreamRead(_)));
        assert_eq!(store.stats().unwrap(), StoreStats::default());
    }

    #[test]
    fn oversized_add_is_backend_write_error() {
        let config = StoreConfig::default().with_max_object_size(4);
        let store = InMemoryStore::from_config(&config).unwrap();
        assert!(store.add(AddRequest::bytes(&b"four"[..])).is_ok());
        let err = store.add(AddRequest::bytes(&b"fives"[..])).unwrap_err();
        assert!(matches!(err, StoreError::BackendWrite(_)));

        let content =
            Content::deferred(|| Ok(Box::new(Cursor::new(b"sixsix".to_vec())) as crate::ContentStream));
        let err = store.add(AddRequest::content(content)).unwrap_err();
        assert!(matches!(err, StoreError::BackendWrite(_)));
        assert_eq!(store.stats().unwrap().stored_copies, 1);
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    #[test]
    fn primary_digest_param() {
        let config = StoreConfig::default().with_param(PRIMARY_DIGEST_PARAM, "sha-512");
        let store = InMemoryStore::from_config(&config).unwrap();
        assert_eq!(store.primary_algorithm(), DigestAlgorithm::Sha512);
        store.add(AddRequest::bytes(&b"keyed"[..])).unwrap();
        assert!(store.get(&md5(b"keyed")).unwrap().is_some());

        let bad = StoreConfig::default().with_param(PRIMARY_DIGEST_PARAM, "crc32");
        assert!(matches!(
            InMemoryStore::from_config(&bad),
            Err(StoreError::UnsupportedAlgorithm(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Close
    // -----------------------------------------------------------------------

    #[test]
    fn closed_store_rejects_operations() {
        let store = InMemoryStore::new();
        store.add(AddRequest::bytes(&b"x"[..])).unwrap();
        store.close().unwrap();
        assert!(store.is_closed());

        let id = sha256(b"x");
        assert!(matches!(
            store.add(AddRequest::bytes(&b"y"[..])),
            Err(StoreError::StoreClosed)
        ));
        assert!(matches!(store.get(&id), Err(StoreError::StoreClosed)));
        assert!(matches!(store.remove(&id), Err(StoreError::StoreClosed)));
        assert!(matches!(store.forget(&id), Err(StoreError::StoreClosed)));
        assert!(matches!(store.stats(), Err(StoreError::StoreClosed)));

        // Idempotent.
        store.close().unwrap();
    }

    // -----------------------------------------------------------------------
    // Batch operations
    // -----------------------------------------------------------------------

    #[test]
    fn add_batch_and_get_batch() {
        let store = InMemoryStore::new();
        let added = store
            .add_batch(vec![
                AddRequest::bytes(&b"batch-1"[..]),
                AddRequest::bytes(&b"batch-2"[..]),
            ])
            .unwrap();
        assert_eq!(added.len(), 2);

        let ids = vec![sha256(b"batch-1"), sha256(b"missing"), md5(b"batch-2")];
        let results = store.get_batch(&ids).unwrap();
        assert!(results[0].is_some());
        assert!(results[1].is_none());
        assert!(results[2].is_some());
    }

    #[test]
    fn debug_format() {
        let store = InMemoryStore::new();
        store.add(AddRequest::bytes(&b"x"[..])).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryStore"));
        assert!(debug.contains("object_count: 1"));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn any_content_round_trips_and_dedups(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let store = InMemoryStore::new();
            let first = store.add(AddRequest::bytes(data.clone())).unwrap();
            let second = store.add(AddRequest::bytes(data.clone())).unwrap();
            prop_assert_eq!(first.digests(), second.digests());

            let got = store.get(&md5(&data)).unwrap().unwrap();
            prop_assert_eq!(read_all(&got), data.clone());
            prop_assert_eq!(got.size(), data.len() as u64);

            let stats = store.stats().unwrap();
            prop_assert_eq!(stats.stored_copies, 1);
            prop_assert_eq!(stats.insertions, 2);
        }
    }
}
