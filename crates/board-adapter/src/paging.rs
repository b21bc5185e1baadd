//! The paged list adapter.
//!
//! A paged list is fetched page by page by an external producer. Positions
//! the producer has announced but not delivered yet are
//! [`Slot::Placeholder`]s. They count towards the item count, so the host
//! widget can size its scroll range, but they must never reach a delegate:
//! resolving or binding one panics with "placeholder not supported".

use std::sync::Arc;

use board_core::logging::targets;
use board_core::{Signal, ThreadAffinity};
use parking_lot::RwLock;

use crate::diff::{DiffOp, ListDiff};
use crate::error::{AdapterError, Result};
use crate::items::{Items, Slot};
use crate::manager::DelegateManager;
use crate::state::StateBundle;
use crate::view::{Container, ViewHolder};

/// Bridges a host list widget to a [`DelegateManager`] over a paged list.
///
/// Like [`DelegateAdapter`](crate::DelegateAdapter), the adapter can be
/// moved to the UI thread but is bound to the thread that created it; debug
/// builds panic on host callbacks from any other thread.
pub struct DelegatePagingAdapter<T, C: Container> {
    name: String,
    manager: DelegateManager<T, C>,
    slots: RwLock<Arc<Vec<Slot<T>>>>,
    items_changed: Signal<ListDiff>,
    affinity: ThreadAffinity,
}

impl<T, C: Container> std::fmt::Debug for DelegatePagingAdapter<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.read();
        f.debug_struct("DelegatePagingAdapter")
            .field("name", &self.name)
            .field("item_count", &slots.len())
            .field("placeholders", &slots.iter().filter(|s| s.is_placeholder()).count())
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

impl<T: Clone, C: Container> DelegatePagingAdapter<T, C> {
    /// Create an empty adapter.
    pub fn new(name: impl Into<String>, manager: DelegateManager<T, C>) -> Self {
        let name = name.into();
        tracing::debug!(
            target: targets::PAGING,
            adapter = %name,
            delegates = manager.delegate_count(),
            "paging adapter created"
        );
        Self {
            name,
            manager,
            slots: RwLock::new(Arc::new(Vec::new())),
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

    /// The current slot snapshot.
    pub fn snapshot(&self) -> Arc<Vec<Slot<T>>> {
        self.slots.read().clone()
    }

    /// Number of positions, placeholders included.
    pub fn item_count(&self) -> usize {
        self.slots.read().len()
    }

    /// Whether there are no positions at all.
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Number of loaded positions.
    pub fn loaded_count(&self) -> usize {
        self.slots.read().iter().filter(|s| !s.is_placeholder()).count()
    }

    /// Number of placeholder positions.
    pub fn placeholder_count(&self) -> usize {
        self.item_count() - self.loaded_count()
    }

    /// Whether `index` is a placeholder.
    pub fn is_placeholder(&self, index: usize) -> bool {
        self.slots.read().get(index).is_some_and(Slot::is_placeholder)
    }

    /// A copy of the item at `index`, or `None` for placeholders and
    /// out-of-range positions.
    pub fn peek(&self, index: usize) -> Option<T> {
        self.slots.read().get(index).and_then(Slot::as_loaded).cloned()
    }

    /// Signal emitted after every change of the slots.
    pub fn items_changed(&self) -> &Signal<ListDiff> {
        &self.items_changed
    }

    /// Deliver the next page.
    ///
    /// The page first fills the trailing placeholders, in order; whatever is
    /// left is appended.
    pub fn append_page(&self, page: Vec<T>) -> ListDiff {
        self.mutate("append_page", |slots| {
            let old_len = slots.len();
            let start = trailing_run_start(slots);
            let filled = page.len().min(old_len - start);

            let mut page = page.into_iter().map(Slot::Loaded);
            for slot in &mut slots[start..start + filled] {
                if let Some(loaded) = page.next() {
                    *slot = loaded;
                }
            }
            slots.extend(page);

            vec![
                DiffOp::Inserted {
                    position: old_len,
                    count: slots.len() - old_len,
                },
                DiffOp::Changed {
                    position: start,
                    count: filled,
                },
            ]
        })
    }

    /// Announce exactly `count` unfetched positions after the last loaded
    /// one, growing or shrinking the trailing placeholder run.
    pub fn set_placeholders(&self, count: usize) -> ListDiff {
        self.mutate("set_placeholders", |slots| {
            let old_len = slots.len();
            let start = trailing_run_start(slots);
            let run = old_len - start;
            if count >= run {
                slots.resize(start + count, Slot::Placeholder);
                vec![DiffOp::Inserted {
                    position: old_len,
                    count: count - run,
                }]
            } else {
                slots.truncate(start + count);
                vec![DiffOp::Removed {
                    position: start + count,
                    count: run - count,
                }]
            }
        })
    }

    /// Load `page` into the positions starting at `offset`, replacing
    /// placeholders or stale items.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::OutOfBounds`] if the page does not fit inside
    /// the current positions. The slots are left unchanged.
    pub fn fill(&self, offset: usize, page: Vec<T>) -> Result<ListDiff> {
        let len = self.item_count();
        let end = offset.saturating_add(page.len());
        if end > len {
            return Err(AdapterError::OutOfBounds {
                position: end - 1,
                len,
            });
        }

        Ok(self.mutate("fill", |slots| {
            let count = page.len();
            for (slot, item) in slots[offset..end].iter_mut().zip(page) {
                *slot = Slot::Loaded(item);
            }
            vec![DiffOp::Changed {
                position: offset,
                count,
            }]
        }))
    }

    /// Drop all positions.
    pub fn clear(&self) -> ListDiff {
        self.mutate("clear", |slots| {
            let count = slots.len();
            slots.clear();
            vec![DiffOp::Removed { position: 0, count }]
        })
    }

    /// Resolve the view type of `position`.
    ///
    /// # Panics
    ///
    /// Panics if the position is a placeholder or no delegate accepts it.
    #[track_caller]
    pub fn item_view_type(&self, position: usize) -> usize {
        self.affinity.debug_assert_same_thread("DelegatePagingAdapter::item_view_type");
        let slots = self.snapshot();
        self.manager.item_view_type(Items::paged(&slots), position)
    }

    /// Resolve the view type of `position` without panicking.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Placeholder`] for unfetched positions, otherwise see
    /// [`DelegateManager::try_item_view_type`].
    pub fn try_item_view_type(&self, position: usize) -> Result<usize> {
        let slots = self.snapshot();
        self.manager.try_item_view_type(Items::paged(&slots), position)
    }

    /// Create a holder for `view_type` inside `parent`.
    #[track_caller]
    pub fn create_view_holder(&self, parent: &C, view_type: usize) -> ViewHolder<C::View> {
        self.affinity.debug_assert_same_thread("DelegatePagingAdapter::create_view_holder");
        self.manager.create_view_holder(parent, view_type)
    }

    /// Bind the item at `position` into `holder`.
    ///
    /// # Panics
    ///
    /// Panics if the position is a placeholder or past the end.
    #[track_caller]
    pub fn bind_view_holder(&self, holder: &mut ViewHolder<C::View>, position: usize) {
        self.affinity.debug_assert_same_thread("DelegatePagingAdapter::bind_view_holder");
        let slots = self.snapshot();
        self.manager.bind_view_holder(holder, Items::paged(&slots), position);
    }

    /// Tell the holder's view it was retired by the widget.
    pub fn on_view_recycled(&self, holder: &mut ViewHolder<C::View>) -> bool {
        self.affinity.debug_assert_same_thread("DelegatePagingAdapter::on_view_recycled");
        holder.recycle()
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

    /// Apply `edit` to a private copy of the slots and publish it.
    ///
    /// `edit` returns the ops it performed, back to front.
    fn mutate<F>(&self, operation: &'static str, edit: F) -> ListDiff
    where
        F: FnOnce(&mut Vec<Slot<T>>) -> Vec<DiffOp>,
    {
        self.affinity.debug_assert_same_thread(operation);

        let diff = {
            let mut guard = self.slots.write();
            let old_len = guard.len();
            // Copies the slots if a reader still holds the snapshot.
            let slots = Arc::make_mut(&mut guard);
            let ops = edit(slots);
            ListDiff::from_ops(ops, old_len, slots.len())
        };

        tracing::debug!(
            target: targets::PAGING,
            adapter = %self.name,
            operation,
            len = diff.new_len(),
            ops = diff.ops().len(),
            "slots updated"
        );
        if !diff.is_empty() {
            self.items_changed.emit(diff.clone());
        }
        diff
    }
}

/// Index where the trailing run of placeholders begins.
fn trailing_run_start<T>(slots: &[Slot<T>]) -> usize {
    slots
        .iter()
        .rposition(|slot| !slot.is_placeholder())
        .map_or(0, |last_loaded| last_loaded + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::ItemAdapterDelegate;
    use crate::view::{ItemView, LayoutId};

    struct Grid;

    #[derive(Debug, Default)]
    struct Thumb {
        id: u32,
    }

    impl ItemView for Thumb {}

    impl Container for Grid {
        type View = Thumb;

        fn inflate(&self, _layout: LayoutId) -> Thumb {
            Thumb::default()
        }
    }

    struct ThumbDelegate;

    impl ItemAdapterDelegate<u32, Grid> for ThumbDelegate {
        fn is_for_item(&self, _item: &u32) -> bool {
            true
        }

        fn create_view(&self, parent: &Grid) -> Thumb {
            parent.inflate(LayoutId::new("thumb"))
        }

        fn bind_item(&self, view: &mut Thumb, item: &u32) {
            view.id = *item;
        }
    }

    fn adapter() -> DelegatePagingAdapter<u32, Grid> {
        DelegatePagingAdapter::new(
            "thread",
            DelegateManager::<u32, Grid>::builder()
                .add_item(ThumbDelegate)
                .build(),
        )
    }

    fn apply(adapter: &DelegatePagingAdapter<u32, Grid>, before: &[Slot<u32>], diff: &ListDiff) {
        let mut patched = before.to_vec();
        diff.apply(&mut patched, &adapter.snapshot());
        assert_eq!(&patched, &*adapter.snapshot(), "ops {:?}", diff.ops());
    }

    #[test]
    fn test_append_fills_placeholders_then_extends() {
        let adapter = adapter();
        adapter.append_page(vec![1, 2]);
        adapter.set_placeholders(2);
        assert_eq!(adapter.item_count(), 4);
        assert_eq!(adapter.placeholder_count(), 2);

        let before = adapter.snapshot();
        let diff = adapter.append_page(vec![3, 4, 5]);
        assert_eq!(
            diff.ops(),
            &[
                DiffOp::Inserted {
                    position: 4,
                    count: 1
                },
                DiffOp::Changed {
                    position: 2,
                    count: 2
                },
            ]
        );
        apply(&adapter, &before, &diff);
        assert_eq!(adapter.loaded_count(), 5);
        assert_eq!(adapter.peek(4), Some(5));
    }

    #[test]
    fn test_set_placeholders_shrinks() {
        let adapter = adapter();
        adapter.append_page(vec![1]);
        adapter.set_placeholders(5);

        let before = adapter.snapshot();
        let diff = adapter.set_placeholders(1);
        assert_eq!(
            diff.ops(),
            &[DiffOp::Removed {
                position: 2,
                count: 4
            }]
        );
        apply(&adapter, &before, &diff);
    }

    #[test]
    fn test_fill_in_place() {
        let adapter = adapter();
        adapter.set_placeholders(4);

        let before = adapter.snapshot();
        let diff = adapter.fill(1, vec![10, 11]).unwrap();
        apply(&adapter, &before, &diff);
        assert!(adapter.is_placeholder(0));
        assert_eq!(adapter.peek(2), Some(11));
        assert!(adapter.is_placeholder(3));

        assert!(matches!(
            adapter.fill(3, vec![1, 2]),
            Err(AdapterError::OutOfBounds { position: 4, len: 4 })
        ));
    }

    #[test]
    fn test_loaded_positions_bind() {
        let adapter = adapter();
        adapter.append_page(vec![7, 8]);
        adapter.set_placeholders(1);

        let mut holder = adapter.create_view_holder(&Grid, adapter.item_view_type(1));
        adapter.bind_view_holder(&mut holder, 1);
        assert_eq!(holder.view().id, 8);
        assert!(matches!(
            adapter.try_item_view_type(2),
            Err(AdapterError::Placeholder { position: 2 })
        ));
    }

    #[test]
    #[should_panic(expected = "placeholder not supported")]
    fn test_bind_placeholder_panics() {
        let adapter = adapter();
        adapter.append_page(vec![7, 8]);
        adapter.set_placeholders(1);

        let mut holder = adapter.create_view_holder(&Grid, 0);
        adapter.bind_view_holder(&mut holder, 2);
    }

    #[test]
    #[should_panic(expected = "placeholder not supported")]
    fn test_resolve_placeholder_panics() {
        let adapter = adapter();
        adapter.set_placeholders(1);
        adapter.item_view_type(0);
    }

    #[test]
    fn test_snapshot_is_not_mutated() {
        let adapter = adapter();
        adapter.set_placeholders(2);
        let snapshot = adapter.snapshot();

        adapter.fill(0, vec![1, 2]).unwrap();
        assert!(snapshot.iter().all(Slot::is_placeholder));
        assert_eq!(adapter.placeholder_count(), 0);
    }

    #[test]
    fn test_clear_and_signal() {
        let adapter = adapter();
        let changes = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = changes.clone();
        adapter.items_changed().connect(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });

        adapter.append_page(vec![1]);
        adapter.set_placeholders(0);
        adapter.clear();
        adapter.clear();

        assert!(adapter.is_empty());
        assert_eq!(changes.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_bind_past_end_panics() {
        let adapter = adapter();
        adapter.append_page(vec![1]);
        let mut holder = adapter.create_view_holder(&Grid, 0);
        adapter.bind_view_holder(&mut holder, 1);
    }
}
