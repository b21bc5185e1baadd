//! Error types for adapter dispatch.

use thiserror::Error;

/// Errors raised while routing list positions to delegates.
///
/// `NoDelegate`, `Placeholder` and `UnknownViewType` are integration bugs:
/// the host callbacks on the adapters panic with their message. The `try_`
/// variants of those callbacks return them instead.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// No registered delegate accepts the item.
    #[error(
        "no adapter delegate matches item at position {position} \
         (of {len} items, {delegates} delegates registered)"
    )]
    NoDelegate {
        /// The position that could not be resolved.
        position: usize,
        /// Number of items in the list.
        len: usize,
        /// Number of registered delegates.
        delegates: usize,
    },
    /// The position is an unfetched placeholder of a paged list.
    #[error("placeholder not supported: position {position} has not been loaded yet")]
    Placeholder {
        /// The placeholder position.
        position: usize,
    },
    /// A view type that does not name a registered delegate.
    #[error("unknown view type {view_type}, only {delegates} delegates registered")]
    UnknownViewType {
        /// The requested view type.
        view_type: usize,
        /// Number of registered delegates.
        delegates: usize,
    },
    /// A position beyond the end of the list.
    #[error("position {position} out of bounds for {len} items")]
    OutOfBounds {
        /// The requested position.
        position: usize,
        /// Number of items in the list.
        len: usize,
    },
    /// A state bundle entry could not be serialized.
    #[error("state entry {key:?} could not be serialized: {source}")]
    State {
        /// The entry's key.
        key: String,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
    /// A serialized state bundle could not be parsed.
    #[error("malformed state bundle: {0}")]
    StateFormat(#[source] serde_json::Error),
}

/// A specialized Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Abort with the message of a fatal dispatch error.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn fatal(err: AdapterError) -> ! {
    tracing::error!(target: "board_adapter", error = %err, "fatal adapter configuration error");
    panic!("{err}")
}
