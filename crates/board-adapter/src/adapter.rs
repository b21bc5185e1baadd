//! The sequence-backed list adapter.

use std::sync::Arc;

use board_core::logging::targets;
use board_core::{Signal, ThreadAffinity};
use parking_lot::RwLock;

use crate::delegate::AdapterDelegate;
use crate::diff::{EqDiffCallback, ItemCallback, ListDiff, diff_lists};
use crate::error::Result;
use crate::items::Items;
use crate::manager::DelegateManager;
use crate::state::StateBundle;
use crate::view::{Container, ViewHolder};

/// Bridges a host list widget to a [`DelegateManager`] over a list that is
/// replaced wholesale on every update.
///
/// The current list is an immutable snapshot. [`submit_list`] diffs the new
/// list against it, swaps it in and reports the edit script through
/// [`items_changed`]. A dispatch that already holds a snapshot keeps working
/// on it.
///
/// Delegates and the diff callback must be `Send`, so the adapter can be
/// handed to the UI thread as a whole. It stays bound to the thread that
/// created it: debug builds panic when a host callback arrives from another
/// thread.
///
/// [`submit_list`]: DelegateAdapter::submit_list
/// [`items_changed`]: DelegateAdapter::items_changed
pub struct DelegateAdapter<T, C: Container> {
    name: String,
    manager: DelegateManager<T, C>,
    items: RwLock<Arc<[T]>>,
    diff_callback: Box<dyn ItemCallback<T> + Send>,
    items_changed: Signal<ListDiff>,
    affinity: ThreadAffinity,
}

impl<T, C: Container> std::fmt::Debug for DelegateAdapter<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegateAdapter")
            .field("name", &self.name)
            .field("item_count", &self.item_count())
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

impl<T: PartialEq + 'static, C: Container> DelegateAdapter<T, C> {
    /// Create an empty adapter that diffs with `PartialEq`.
    pub fn new(name: impl Into<String>, manager: DelegateManager<T, C>) -> Self {
        Self::with_diff_callback(name, manager, EqDiffCallback)
    }
}

impl<T, C: Container> DelegateAdapter<T, C> {
    /// Create an empty adapter with a custom diff callback.
    pub fn with_diff_callback<CB>(
        name: impl Into<String>,
        manager: DelegateManager<T, C>,
        diff_callback: CB,
    ) -> Self
    where
        CB: ItemCallback<T> + Send + 'static,
    {
        let name = name.into();
        tracing::debug!(
            target: targets::ADAPTER,
            adapter = %name,
            delegates = manager.delegate_count(),
            "adapter created"
        );
        Self {
            name,
            manager,
            items: RwLock::new(Arc::from(Vec::new())),
            diff_callback: Box::new(diff_callback),
            items_changed: Signal::new(),
            affinity: ThreadAffinity::current(),
        }
    }

    /// The adapter's name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The delegate registry.
    pub fn manager(&self) -> &DelegateManager<T, C> {
        &self.manager
    }

    /// The current list snapshot.
    pub fn items(&self) -> Arc<[T]> {
        self.items.read().clone()
    }

    /// Number of items in the current list.
    pub fn item_count(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the current list is empty.
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// A copy of the item at `index`.
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.items.read().get(index).cloned()
    }

    /// Signal emitted with the edit script after every visible list change.
    pub fn items_changed(&self) -> &Signal<ListDiff> {
        &self.items_changed
    }

    /// Replace the list.
    ///
    /// Returns the edit script from the old to the new list. The signal is
    /// not emitted when nothing changed.
    pub fn submit_list(&self, items: Vec<T>) -> ListDiff {
        self.affinity.debug_assert_same_thread("DelegateAdapter::submit_list");

        let new: Arc<[T]> = Arc::from(items);
        let old = std::mem::replace(&mut *self.items.write(), new.clone());
        let diff = diff_lists(&old[..], &new[..], self.diff_callback.as_ref());

        tracing::debug!(
            target: targets::ADAPTER,
            adapter = %self.name,
            old = old.len(),
            new = new.len(),
            ops = diff.ops().len(),
            "list submitted"
        );
        if !diff.is_empty() {
            self.items_changed.emit(diff.clone());
        }
        diff
    }

    /// Resolve the view type of `position`.
    ///
    /// # Panics
    ///
    /// Panics if no delegate accepts the item.
    #[track_caller]
    pub fn item_view_type(&self, position: usize) -> usize {
        self.affinity.debug_assert_same_thread("DelegateAdapter::item_view_type");
        let items = self.items();
        self.manager.item_view_type(Items::new(&items), position)
    }

    /// Resolve the view type of `position` without panicking.
    ///
    /// # Errors
    ///
    /// See [`DelegateManager::try_item_view_type`].
    pub fn try_item_view_type(&self, position: usize) -> Result<usize> {
        let items = self.items();
        self.manager.try_item_view_type(Items::new(&items), position)
    }

    /// Create a holder for `view_type` inside `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `view_type` does not name a delegate.
    #[track_caller]
    pub fn create_view_holder(&self, parent: &C, view_type: usize) -> ViewHolder<C::View> {
        self.affinity.debug_assert_same_thread("DelegateAdapter::create_view_holder");
        self.manager.create_view_holder(parent, view_type)
    }

    /// Bind the item at `position` into `holder`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of range for the current list, even when
    /// the delegate never reads the item.
    #[track_caller]
    pub fn bind_view_holder(&self, holder: &mut ViewHolder<C::View>, position: usize) {
        self.affinity.debug_assert_same_thread("DelegateAdapter::bind_view_holder");
        let items = self.items();
        self.manager.bind_view_holder(holder, Items::new(&items), position);
    }

    /// Tell the holder's view it was retired by the widget.
    ///
    /// Returns `false` if the holder was already recycled since its last
    /// bind.
    pub fn on_view_recycled(&self, holder: &mut ViewHolder<C::View>) -> bool {
        self.affinity.debug_assert_same_thread("DelegateAdapter::on_view_recycled");
        let notified = holder.recycle();
        if !notified {
            tracing::trace!(target: targets::ADAPTER, adapter = %self.name, "holder already recycled");
        }
        notified
    }

    /// Collect the delegates' UI state.
    pub fn save_instance_state(&self) -> StateBundle {
        let mut state = StateBundle::new();
        self.manager.save_state(&mut state);
        state
    }

    /// Hand saved UI state back to the delegates.
    pub fn restore_instance_state(&mut self, state: &StateBundle) {
        self.manager.restore_state(state);
    }
}

/// Build a [`DelegateAdapter`] over `delegates`, in priority order.
pub fn delegate_adapter_of<T, C>(
    name: impl Into<String>,
    delegates: Vec<Box<dyn AdapterDelegate<T, C> + Send>>,
) -> DelegateAdapter<T, C>
where
    T: PartialEq + 'static,
    C: Container,
{
    DelegateAdapter::new(name, DelegateManager::new(delegates))
}
