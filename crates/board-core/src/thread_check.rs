//! UI-thread affinity checks.
//!
//! List adapters are driven synchronously by the host widget's layout pass
//! and are never shared across threads while in use. [`ThreadAffinity`]
//! records the thread a component was created on so that later calls can be
//! checked against it:
//!
//! ```
//! use board_core::ThreadAffinity;
//!
//! struct Adapter {
//!     affinity: ThreadAffinity,
//! }
//!
//! impl Adapter {
//!     fn on_layout(&self) {
//!         self.affinity.debug_assert_same_thread("Adapter::on_layout");
//!     }
//! }
//!
//! let adapter = Adapter { affinity: ThreadAffinity::current() };
//! adapter.on_layout();
//! ```

use std::thread::ThreadId;

/// The thread a component is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    pub fn current() -> Self {
        Self {
            owner: std::thread::current().id(),
        }
    }

    /// The owning thread's id.
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Whether the calling thread is the owning thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.owner
    }

    /// Panics if called from another thread than the owner.
    ///
    /// # Panics
    ///
    /// Panics with a message naming `operation` when the affinity is violated.
    #[track_caller]
    pub fn assert_same_thread(&self, operation: &str) {
        if !self.is_same_thread() {
            panic_wrong_thread(operation, self.owner);
        }
    }

    /// Like [`assert_same_thread`](Self::assert_same_thread), but only in
    /// debug builds.
    #[track_caller]
    #[inline]
    pub fn debug_assert_same_thread(&self, operation: &str) {
        #[cfg(debug_assertions)]
        self.assert_same_thread(operation);
        #[cfg(not(debug_assertions))]
        let _ = operation;
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn panic_wrong_thread(operation: &str, owner: ThreadId) -> ! {
    let current = std::thread::current();
    panic!(
        "{operation} must run on the UI thread {owner:?}, but was called from {:?} ({})",
        current.id(),
        current.name().unwrap_or("<unnamed>")
    );
}
