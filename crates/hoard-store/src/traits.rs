use hoard_crypto::CancelToken;
use hoard_types::DigestId;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::object::StoreObject;
use crate::request::AddRequest;

/// Point-in-time counters for a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Objects retrievable through `get`.
    pub live_objects: u64,
    /// Soft-removed objects whose metadata is retained.
    pub removed_objects: u64,
    /// Distinct byte copies held, live or removed.
    pub stored_copies: u64,
    /// Total size of live objects.
    pub live_bytes: u64,
    /// Total size of all held copies.
    pub stored_bytes: u64,
    /// Content insertions accepted, including deduplicated ones.
    pub insertions: u64,
}

/// Content-addressable object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are identified by their digests. Adding identical content twice
///   keeps one copy and records the second insertion.
/// - Adds are linearizable per identity; a failed or cancelled add leaves
///   nothing visible.
/// - `get` and `stats` never block on an unrelated writer for longer than a
///   bounded critical section.
/// - After `close`, every operation other than `close` fails with
///   `StoreClosed`.
pub trait Store: Send + Sync {
    /// Registry key of the backend serving this store.
    fn backend(&self) -> &str;

    /// Ingest content, or update metadata of known content.
    ///
    /// Returns the canonical stored representation.
    fn add(&self, request: AddRequest) -> StoreResult<StoreObject> {
        self.add_cancellable(request, &CancelToken::new())
    }

    /// Like [`add`](Store::add), aborting with `Cancelled` once `cancel`
    /// fires. A cancelled add has no visible effect.
    fn add_cancellable(&self, request: AddRequest, cancel: &CancelToken) -> StoreResult<StoreObject>;

    /// Look up a live object by any of its identifiers.
    ///
    /// Returns `Ok(None)` for unknown and soft-removed objects.
    fn get(&self, id: &DigestId) -> StoreResult<Option<StoreObject>>;

    /// Look up an object by any of its identifiers, including soft-removed
    /// ones.
    fn get_including_removed(&self, id: &DigestId) -> StoreResult<Option<StoreObject>>;

    /// Whether a live object is known under `id`.
    fn contains(&self, id: &DigestId) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Soft-delete. Unknown or already-removed objects are a no-op.
    fn remove(&self, id: &DigestId) -> StoreResult<()>;

    /// Hard-delete content, metadata, and every identifier of the object.
    ///
    /// Fails with `NotFound` if nothing is known under `id`.
    fn forget(&self, id: &DigestId) -> StoreResult<()>;

    /// Snapshot of the store's counters.
    fn stats(&self) -> StoreResult<StoreStats>;

    /// Release backend resources. Idempotent.
    fn close(&self) -> StoreResult<()>;

    fn is_closed(&self) -> bool;

    /// Look up several identifiers.
    ///
    /// Default implementation calls `get()` for each ID. Backends may
    /// override for better performance.
    fn get_batch(&self, ids: &[DigestId]) -> StoreResult<Vec<Option<StoreObject>>> {
        ids.iter().map(|id| self.get(id)).collect()
    }

    /// Add several requests in order, stopping at the first failure.
    ///
    /// Requests before the failing one stay added.
    fn add_batch(&self, requests: Vec<AddRequest>) -> StoreResult<Vec<StoreObject>> {
        requests.into_iter().map(|r| self.add(r)).collect()
    }
}
