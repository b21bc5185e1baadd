//! Core utilities for the board client.
//!
//! This crate provides the small, UI-agnostic building blocks that the list
//! adapters and the application's screens share:
//!
//! - **Signals**: Type-safe change notification ([`Signal`])
//! - **Thread affinity**: UI-thread checks for single-threaded components
//! - **Logging**: `tracing` targets, perf spans and logging macros
//! - **Preferences**: A flat key-value store with batched editing
//! - **Scoped resources**: Acquire/release helpers and chunked stream reading
//!
//! # Signal Example
//!
//! ```
//! use board_core::Signal;
//!
//! let count_changed = Signal::<usize>::new();
//! let id = count_changed.connect(|count| println!("now {count} items"));
//!
//! count_changed.emit(3);
//! count_changed.disconnect(id);
//! ```
//!
//! # Preferences Example
//!
//! ```
//! use board_core::Preferences;
//!
//! let prefs = Preferences::new();
//! prefs.edit(|editor| {
//!     editor.put("feed.autoplay", true);
//!     editor.put("feed.columns", 3);
//! });
//!
//! assert_eq!(prefs.get::<u32>("feed.columns"), Some(3));
//! ```

mod error;
pub mod logging;
pub mod prefs;
pub mod scoped;
pub mod signal;
pub mod thread_check;

pub use error::{CoreError, Result};
pub use logging::PerfSpan;
pub use prefs::{Preferences, PreferencesEditor};
pub use scoped::{Lease, read_stream, with_lease};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
