//! Error types for the core utilities.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Reading or writing a preferences file failed.
    #[error("preferences file {path}: {source}")]
    PreferencesIo {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A preferences file did not contain a valid JSON object.
    #[error("preferences file {path} is malformed: {source}")]
    PreferencesFormat {
        /// The file involved.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// A value could not be converted to a preference entry.
    #[error("preference {key:?} could not be serialized: {source}")]
    PreferenceValue {
        /// The preference key.
        key: String,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
    /// A leased resource could not be acquired.
    #[error("failed to acquire {resource}: {reason}")]
    Acquire {
        /// Name of the resource.
        resource: String,
        /// Why acquisition failed.
        reason: String,
    },
    /// Reading from a stream failed.
    #[error("stream read failed: {0}")]
    Stream(#[from] io::Error),
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
