use std::collections::HashMap;
use std::fmt;

use tracing::info;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::memory::{InMemoryStore, MEMORY_BACKEND};
use crate::traits::Store;

/// Backend used when a configuration names none.
pub const DEFAULT_BACKEND: &str = MEMORY_BACKEND;

/// Builds a store from configuration.
pub type BackendFactory = fn(&StoreConfig) -> StoreResult<Box<dyn Store>>;

fn open_memory(config: &StoreConfig) -> StoreResult<Box<dyn Store>> {
    Ok(Box::new(InMemoryStore::from_config(config)?))
}

/// Maps backend keys to factories.
///
/// Built once at startup and then only read, so lookups take no lock.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in backend.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MEMORY_BACKEND, open_memory);
        registry
    }

    /// Register `factory` under `key`, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<String>, factory: BackendFactory) -> &mut Self {
        self.factories.insert(key.into(), factory);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Open the backend selected by `config.backend`.
    pub fn open(&self, config: &StoreConfig) -> StoreResult<Box<dyn Store>> {
        let factory = self
            .factories
            .get(&config.backend)
            .ok_or_else(|| StoreError::UnknownBackend(config.backend.clone()))?;
        let store = factory(config)?;
        info!(backend = %config.backend, "store opened");
        Ok(store)
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.keys())
            .finish()
    }
}

/// Open a store through the built-in backends.
pub fn open(config: &StoreConfig) -> StoreResult<Box<dyn Store>> {
    BackendRegistry::with_defaults().open(config)
}
