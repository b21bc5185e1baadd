//! Resolution of list positions to delegates.
//!
//! [`DelegateManager`] holds the ordered delegate registry of one adapter.
//! A position's view type is the index of the first delegate whose predicate
//! accepts it; holders are stamped with that index at creation and every
//! later bind is routed by the stamp.

use board_core::PerfSpan;
use board_core::logging::targets;

use crate::delegate::{
    AdapterDelegate, ByValue, ByVariant, ItemAdapterDelegate, PerItem, VariantAdapterDelegate,
};
use crate::error::{AdapterError, Result, fatal};
use crate::items::{Items, Variant};
use crate::state::StateBundle;
use crate::view::{Container, ViewHolder};

type BoxedDelegate<T, C> = Box<dyn AdapterDelegate<T, C> + Send>;

/// Ordered registry of delegates, first match wins.
pub struct DelegateManager<T, C: Container> {
    delegates: Vec<BoxedDelegate<T, C>>,
}

impl<T, C: Container> std::fmt::Debug for DelegateManager<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.delegates.iter().map(|d| d.name()))
            .finish()
    }
}

impl<T, C: Container> DelegateManager<T, C> {
    /// Create a manager over `delegates`, in priority order.
    pub fn new(delegates: Vec<BoxedDelegate<T, C>>) -> Self {
        tracing::debug!(target: targets::MANAGER, delegates = delegates.len(), "delegate manager created");
        Self { delegates }
    }

    /// Start building a registry.
    pub fn builder() -> DelegateManagerBuilder<T, C> {
        DelegateManagerBuilder {
            delegates: Vec::new(),
        }
    }

    /// Number of registered delegates.
    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }

    /// Name of the delegate registered under `view_type`.
    pub fn delegate_name(&self, view_type: usize) -> Option<&str> {
        self.delegates.get(view_type).map(|d| d.name())
    }

    /// Resolve the view type of `items[index]`.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::OutOfBounds`] if `index` is past the end.
    /// - [`AdapterError::Placeholder`] if the position is not loaded.
    /// - [`AdapterError::NoDelegate`] if no delegate accepts the item.
    pub fn try_item_view_type(&self, items: Items<'_, T>, index: usize) -> Result<usize> {
        if index >= items.len() {
            return Err(AdapterError::OutOfBounds {
                position: index,
                len: items.len(),
            });
        }
        if items.is_placeholder(index) {
            return Err(AdapterError::Placeholder { position: index });
        }

        match self
            .delegates
            .iter()
            .position(|delegate| delegate.is_for_view_type(items, index))
        {
            Some(view_type) => {
                tracing::trace!(target: targets::MANAGER, index, view_type, "resolved view type");
                Ok(view_type)
            }
            None => Err(AdapterError::NoDelegate {
                position: index,
                len: items.len(),
                delegates: self.delegates.len(),
            }),
        }
    }

    /// Resolve the view type of `items[index]`.
    ///
    /// # Panics
    ///
    /// Panics if no delegate accepts the item or the position is a
    /// placeholder. Both are integration bugs.
    #[track_caller]
    pub fn item_view_type(&self, items: Items<'_, T>, index: usize) -> usize {
        self.try_item_view_type(items, index).unwrap_or_else(|e| fatal(e))
    }

    /// Create a holder through the delegate registered under `view_type`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::UnknownViewType`] if `view_type` does not name
    /// a delegate.
    pub fn try_create_view_holder(
        &self,
        parent: &C,
        view_type: usize,
    ) -> Result<ViewHolder<C::View>> {
        let delegate = self.delegate(view_type)?;
        let view = {
            let _span = PerfSpan::with_owner("create_view", delegate.name());
            delegate.create_view(parent)
        };
        tracing::trace!(target: targets::MANAGER, view_type, delegate = delegate.name(), "created view holder");
        Ok(ViewHolder::new(view, view_type))
    }

    /// Create a holder through the delegate registered under `view_type`.
    ///
    /// # Panics
    ///
    /// Panics if `view_type` does not name a delegate.
    #[track_caller]
    pub fn create_view_holder(&self, parent: &C, view_type: usize) -> ViewHolder<C::View> {
        self.try_create_view_holder(parent, view_type)
            .unwrap_or_else(|e| fatal(e))
    }

    /// Bind `items[index]` into `holder` through the delegate that created it.
    ///
    /// The delegate is taken from the holder's stamp; predicates are not
    /// consulted.
    ///
    /// # Panics
    ///
    /// Panics if `index` is past the end, the position is a placeholder or
    /// the stamp names no delegate.
    #[track_caller]
    pub fn bind_view_holder(&self, holder: &mut ViewHolder<C::View>, items: Items<'_, T>, index: usize) {
        if index >= items.len() {
            fatal(AdapterError::OutOfBounds {
                position: index,
                len: items.len(),
            });
        }
        if items.is_placeholder(index) {
            fatal(AdapterError::Placeholder { position: index });
        }
        let delegate = self.delegate(holder.view_type()).unwrap_or_else(|e| fatal(e));
        holder.mark_bound(index);
        delegate.bind_view(holder.view_mut(), items, index);
    }

    /// Let every delegate contribute its state.
    pub fn save_state(&self, out: &mut StateBundle) {
        for delegate in &self.delegates {
            delegate.save_state(out);
        }
        tracing::debug!(target: targets::MANAGER, entries = out.len(), "saved delegate state");
    }

    /// Hand `state` to every delegate.
    pub fn restore_state(&mut self, state: &StateBundle) {
        for delegate in &mut self.delegates {
            delegate.restore_state(state);
        }
        tracing::debug!(target: targets::MANAGER, entries = state.len(), "restored delegate state");
    }

    fn delegate(&self, view_type: usize) -> Result<&BoxedDelegate<T, C>> {
        self.delegates
            .get(view_type)
            .ok_or(AdapterError::UnknownViewType {
                view_type,
                delegates: self.delegates.len(),
            })
    }
}

/// Builder for a [`DelegateManager`]; the registration order is the match
/// priority.
pub struct DelegateManagerBuilder<T, C: Container> {
    delegates: Vec<BoxedDelegate<T, C>>,
}

impl<T: 'static, C: Container + 'static> DelegateManagerBuilder<T, C> {
    /// Register a full delegate.
    pub fn add<D>(mut self, delegate: D) -> Self
    where
        D: AdapterDelegate<T, C> + Send + 'static,
    {
        self.delegates.push(Box::new(delegate));
        self
    }

    /// Register a single-item delegate.
    pub fn add_item<D>(self, delegate: D) -> Self
    where
        D: ItemAdapterDelegate<T, C> + Send + 'static,
    {
        self.add(PerItem(delegate))
    }

    /// Register a delegate for the items of variant `E`.
    pub fn add_variant<E, D>(self, delegate: D) -> Self
    where
        T: Variant<E>,
        E: 'static,
        D: VariantAdapterDelegate<E, C> + Send + 'static,
    {
        self.add(PerItem(ByVariant::<D, E>::new(delegate)))
    }

    /// Register a delegate for the items equal to `value`.
    pub fn add_value<D>(self, value: T, delegate: D) -> Self
    where
        T: PartialEq + Send,
        D: VariantAdapterDelegate<T, C> + Send + 'static,
    {
        self.add(PerItem(ByValue::new(value, delegate)))
    }

    /// Register an already boxed delegate.
    pub fn add_boxed(mut self, delegate: BoxedDelegate<T, C>) -> Self {
        self.delegates.push(delegate);
        self
    }

    /// Finish the registry.
    pub fn build(self) -> DelegateManager<T, C> {
        DelegateManager::new(self.delegates)
    }
}
