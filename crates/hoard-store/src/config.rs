use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::registry::DEFAULT_BACKEND;

/// Options recognized when a store is opened.
///
/// Only `backend` is interpreted by the registry. `location` and `params`
/// are passed through to the backend factory untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Registry key selecting the backend.
    pub backend: String,
    /// Backend-specific location (directory, connection string, ...).
    pub location: Option<PathBuf>,
    /// Largest content accepted by `add`, in bytes.
    pub max_object_size: Option<u64>,
    /// Backend-specific parameters.
    pub params: BTreeMap<String, String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            location: None,
            max_object_size: None,
            params: BTreeMap::new(),
        }
    }
}

impl StoreConfig {
    /// Configuration selecting `backend` with no other options.
    pub fn for_backend(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_max_object_size(mut self, limit: u64) -> Self {
        self.max_object_size = Some(limit);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::Config(e.to_string()))
    }
}
