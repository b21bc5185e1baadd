//! Application preferences.
//!
//! [`Preferences`] is a flat key-value store for user settings such as feed
//! column counts or autoplay flags. Values are stored as JSON values so that
//! any serde type can be kept, and the store can be persisted to a JSON file.
//!
//! Changes are always made through [`Preferences::edit`], which collects every
//! change made in the closure and applies them together once it returns:
//!
//! ```
//! use board_core::Preferences;
//!
//! let prefs = Preferences::new();
//! prefs.edit(|editor| {
//!     editor.put("feed.columns", 4);
//!     editor.remove("feed.legacy_layout");
//! });
//!
//! assert_eq!(prefs.get_or("feed.columns", 3), 4);
//! ```
//!
//! Every changed key is reported once through the [`changed`](Preferences::changed)
//! signal after the batch has been applied.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::logging::targets;
use crate::signal::Signal;

/// One pending change recorded by a [`PreferencesEditor`].
#[derive(Debug, Clone, PartialEq)]
enum Change {
    Put(String, Value),
    Remove(String),
    Clear,
}

/// Collects changes for [`Preferences::edit`].
///
/// Nothing is visible to readers until the editing closure returns.
#[derive(Debug, Default)]
pub struct PreferencesEditor {
    changes: Vec<Change>,
}

impl PreferencesEditor {
    /// Store a plain value under `key`.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.changes.push(Change::Put(key.into(), value.into()));
        self
    }

    /// Store any serializable value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PreferenceValue`] if `value` cannot be represented
    /// as JSON.
    pub fn put_serialized<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<&mut Self> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|source| CoreError::PreferenceValue {
            key: key.clone(),
            source,
        })?;
        self.changes.push(Change::Put(key, value));
        Ok(self)
    }

    /// Remove `key`.
    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        self.changes.push(Change::Remove(key.into()));
        self
    }

    /// Remove every key. Changes recorded after this call still apply.
    pub fn clear(&mut self) -> &mut Self {
        self.changes.push(Change::Clear);
        self
    }

    /// Whether any change has been recorded.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// A flat, persisted key-value store for user settings.
pub struct Preferences {
    data: RwLock<BTreeMap<String, Value>>,
    changed: Signal<String>,
    auto_save: RwLock<Option<PathBuf>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("len", &self.len())
            .field("auto_save", &*self.auto_save.read())
            .finish()
    }
}

impl Preferences {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::from_map(BTreeMap::new())
    }

    fn from_map(data: BTreeMap<String, Value>) -> Self {
        Self {
            data: RwLock::new(data),
            changed: Signal::new(),
            auto_save: RwLock::new(None),
        }
    }

    /// Signal emitted once per changed key after an edit is applied.
    ///
    /// A `clear` is reported as the empty key.
    pub fn changed(&self) -> &Signal<String> {
        &self.changed
    }

    /// Read `key` as `T`. Returns `None` if it is missing or has another type.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.data.read().get(key).cloned()?;
        serde_json::from_value(value).ok()
    }

    /// Read `key` as `T`, falling back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Record changes in `f` and apply them as one batch.
    pub fn edit<F>(&self, f: F)
    where
        F: FnOnce(&mut PreferencesEditor),
    {
        let mut editor = PreferencesEditor::default();
        f(&mut editor);
        self.apply(editor);
    }

    /// Like [`edit`](Self::edit), for closures that can fail.
    ///
    /// Nothing is applied if `f` returns an error.
    ///
    /// # Errors
    ///
    /// Returns the closure's error unchanged.
    pub fn try_edit<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut PreferencesEditor) -> Result<()>,
    {
        let mut editor = PreferencesEditor::default();
        f(&mut editor)?;
        self.apply(editor);
        Ok(())
    }

    fn apply(&self, editor: PreferencesEditor) {
        if editor.is_empty() {
            return;
        }

        let mut changed_keys: Vec<String> = Vec::new();
        {
            let mut data = self.data.write();
            for change in editor.changes {
                match change {
                    Change::Put(key, value) => {
                        if data.get(&key) != Some(&value) {
                            data.insert(key.clone(), value);
                            push_unique(&mut changed_keys, key);
                        }
                    }
                    Change::Remove(key) => {
                        if data.remove(&key).is_some() {
                            push_unique(&mut changed_keys, key);
                        }
                    }
                    Change::Clear => {
                        if !data.is_empty() {
                            data.clear();
                            push_unique(&mut changed_keys, String::new());
                        }
                    }
                }
            }
        }

        tracing::debug!(target: targets::PREFS, changed = changed_keys.len(), "applied preference edit");

        if changed_keys.is_empty() {
            return;
        }

        for key in changed_keys {
            self.changed.emit(key);
        }
        self.try_auto_save();
    }

    /// Persist the store to `path` after every applied edit.
    pub fn set_auto_save(&self, path: impl AsRef<Path>) {
        *self.auto_save.write() = Some(path.as_ref().to_path_buf());
    }

    /// Stop persisting after edits.
    pub fn disable_auto_save(&self) {
        *self.auto_save.write() = None;
    }

    /// Load a store from a JSON object file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PreferencesIo`] if the file cannot be read and
    /// [`CoreError::PreferencesFormat`] if it is not a JSON object.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::PreferencesIo {
            path: path.to_path_buf(),
            source,
        })?;
        let data: BTreeMap<String, Value> =
            serde_json::from_str(&content).map_err(|source| CoreError::PreferencesFormat {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_map(data))
    }

    /// Write the store to `path` as pretty-printed JSON.
    ///
    /// The file is replaced atomically through a temporary file in the same
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PreferencesIo`] if writing or renaming fails.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        use std::io::Write;

        let path = path.as_ref();
        let io_err = |source: std::io::Error| CoreError::PreferencesIo {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_vec_pretty(&*self.data.read()).map_err(|source| {
            CoreError::PreferencesFormat {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        temp.write_all(&json).map_err(io_err)?;
        temp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn try_auto_save(&self) {
        let path = self.auto_save.read().clone();
        if let Some(path) = path
            && let Err(e) = self.save_json(&path)
        {
            tracing::error!(target: targets::PREFS, error = %e, "failed to auto-save preferences");
        }
    }
}

fn push_unique(keys: &mut Vec<String>, key: String) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}
