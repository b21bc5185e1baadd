//! Serialized UI state contributed by delegates.
//!
//! A [`StateBundle`] is the opaque key-value bag produced by
//! [`DelegateManager::save_state`](crate::DelegateManager::save_state) and
//! read back by `restore_state`. Every delegate shares one bundle, so each is
//! responsible for prefixing its keys, e.g. `"comments.expanded"`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AdapterError, Result};

/// A JSON-backed key-value bag of delegate state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateBundle {
    entries: Map<String, Value>,
}

impl StateBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::State`] if `value` cannot be serialized.
    pub fn put<S: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &S) -> Result<()> {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(key, value);
                Ok(())
            }
            Err(source) => Err(AdapterError::State { key, source }),
        }
    }

    /// Read the entry under `key` as `D`.
    ///
    /// Returns `None` if the key is missing or holds a value of another shape.
    pub fn get<D: DeserializeOwned>(&self, key: &str) -> Option<D> {
        let value = self.entries.get(key)?;
        match D::deserialize(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!(target: "board_adapter::state", key, error = %e, "state entry has unexpected shape");
                None
            }
        }
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove and return the raw entry under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bundle has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Encode the bundle as a JSON object string.
    pub fn to_json(&self) -> String {
        Value::Object(self.entries.clone()).to_string()
    }

    /// Decode a bundle previously produced by [`to_json`](Self::to_json).
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::StateFormat`] if `json` is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(AdapterError::StateFormat)
    }
}
