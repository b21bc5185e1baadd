//! Logging facilities for the board client.
//!
//! All crates in the workspace log through `tracing`. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("board_adapter=debug")
//!     .init();
//! ```
//!
//! Use the constants in [`targets`] to build filter directives for a single
//! subsystem, and [`PerfSpan`] to time a scoped operation.

/// Target names for log filtering.
pub mod targets {
    /// Core utilities target.
    pub const CORE: &str = "board_core";
    /// Signal emission target.
    pub const SIGNAL: &str = "board_core::signal";
    /// Preferences store target.
    pub const PREFS: &str = "board_core::prefs";
    /// Scoped resource target.
    pub const SCOPED: &str = "board_core::scoped";
    /// Delegate manager target.
    pub const MANAGER: &str = "board_adapter::manager";
    /// List adapter target.
    pub const ADAPTER: &str = "board_adapter::adapter";
    /// Paged adapter target.
    pub const PAGING: &str = "board_adapter::paging";
    /// List diffing target.
    pub const DIFF: &str = "board_adapter::diff";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to measure how long a delegate takes to build a view:
///
/// ```
/// use board_core::PerfSpan;
///
/// let _span = PerfSpan::new("create_view");
/// // ... work measured by the span ...
/// ```
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span for `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: "board::perf", "perf", operation);
        Self {
            span: span.entered(),
        }
    }

    /// Enter a performance span tagged with the owning component's name.
    pub fn with_owner(operation: &'static str, owner: &str) -> Self {
        let span = tracing::info_span!(target: "board::perf", "perf", operation, owner);
        Self {
            span: span.entered(),
        }
    }
}

/// Trace-level log under the core target.
#[macro_export]
macro_rules! board_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "board_core", $($arg)*)
    };
}

/// Debug-level log under the core target.
#[macro_export]
macro_rules! board_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "board_core", $($arg)*)
    };
}

/// Warn-level log under the core target.
#[macro_export]
macro_rules! board_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "board_core", $($arg)*)
    };
}
