//! Ready-made delegates for rows that need no hand-written delegate type.
//!
//! - [`static_layout`] and friends inflate one fixed layout and bind nothing,
//!   which suits spinners, dividers and headers.
//! - [`adapt_to`] reuses a delegate written for one item type on another.

use std::marker::PhantomData;

use crate::delegate::{AdapterDelegate, ItemAdapterDelegate};
use crate::items::{Items, Variant};
use crate::state::StateBundle;
use crate::view::{Container, LayoutId};

/// A delegate that inflates a fixed layout for every item accepted by its
/// predicate and binds nothing.
pub struct StaticLayoutDelegate<T, P> {
    layout: LayoutId,
    predicate: P,
    _item: PhantomData<fn(&T)>,
}

impl<T, P> StaticLayoutDelegate<T, P>
where
    P: Fn(&T) -> bool,
{
    /// The layout inflated for every accepted item.
    pub fn layout(&self) -> LayoutId {
        self.layout
    }
}

impl<T, P> std::fmt::Debug for StaticLayoutDelegate<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticLayoutDelegate")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl<T, C, P> ItemAdapterDelegate<T, C> for StaticLayoutDelegate<T, P>
where
    C: Container,
    P: Fn(&T) -> bool,
{
    fn is_for_item(&self, item: &T) -> bool {
        (self.predicate)(item)
    }

    fn create_view(&self, parent: &C) -> C::View {
        parent.inflate(self.layout)
    }

    fn bind_item(&self, _view: &mut C::View, _item: &T) {}
}

impl<T, C, P> AdapterDelegate<T, C> for StaticLayoutDelegate<T, P>
where
    C: Container,
    P: Fn(&T) -> bool,
{
    fn is_for_view_type(&self, items: Items<'_, T>, index: usize) -> bool {
        (self.predicate)(items.item(index))
    }

    fn create_view(&self, parent: &C) -> C::View {
        parent.inflate(self.layout)
    }

    fn bind_view(&self, _view: &mut C::View, _items: Items<'_, T>, _index: usize) {}

    fn name(&self) -> &str {
        self.layout.name()
    }
}

/// A static layout for the items accepted by `predicate`.
pub fn static_layout<T, P>(layout: LayoutId, predicate: P) -> StaticLayoutDelegate<T, P>
where
    P: Fn(&T) -> bool,
{
    StaticLayoutDelegate {
        layout,
        predicate,
        _item: PhantomData,
    }
}

/// A static layout for the items of variant `E`.
///
/// ```
/// use board_adapter::{LayoutId, Variant, static_layout_for_variant};
///
/// struct Divider;
/// enum Row { Divider(Divider), Text(String) }
///
/// impl Variant<Divider> for Row {
///     fn variant(&self) -> Option<&Divider> {
///         match self {
///             Row::Divider(d) => Some(d),
///             _ => None,
///         }
///     }
/// }
///
/// let divider = static_layout_for_variant::<Row, Divider>(LayoutId::new("divider"));
/// assert_eq!(divider.layout().name(), "divider");
/// ```
pub fn static_layout_for_variant<T, E>(
    layout: LayoutId,
) -> StaticLayoutDelegate<T, impl Fn(&T) -> bool>
where
    T: Variant<E>,
{
    static_layout(layout, |item: &T| item.variant().is_some())
}

/// A static layout for items equal to `sentinel`.
pub fn static_layout_for_value<T>(
    layout: LayoutId,
    sentinel: T,
) -> StaticLayoutDelegate<T, impl Fn(&T) -> bool>
where
    T: PartialEq,
{
    static_layout(layout, matches_value(sentinel))
}

/// A predicate accepting items equal to `sentinel`.
pub fn matches_value<T: PartialEq>(sentinel: T) -> impl Fn(&T) -> bool {
    move |item| *item == sentinel
}

/// A delegate for items of type `I`, reused for outer items `O` through a
/// conversion. See [`adapt_to`].
pub struct Adapted<D, I, F> {
    delegate: D,
    convert: F,
    _inner: PhantomData<fn() -> I>,
}

impl<D: std::fmt::Debug, I, F> std::fmt::Debug for Adapted<D, I, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapted")
            .field("delegate", &self.delegate)
            .finish_non_exhaustive()
    }
}

/// Reuse `delegate` for outer items of another type.
///
/// `convert` returns `None` for outer items that are not of the delegate's
/// kind. An outer item is accepted when it converts and the converted value
/// is accepted by `delegate`.
pub fn adapt_to<D, I, O, F>(delegate: D, convert: F) -> Adapted<D, I, F>
where
    F: Fn(&O) -> Option<I>,
{
    Adapted {
        delegate,
        convert,
        _inner: PhantomData,
    }
}

impl<D, I, O, C, F> ItemAdapterDelegate<O, C> for Adapted<D, I, F>
where
    C: Container,
    D: ItemAdapterDelegate<I, C>,
    F: Fn(&O) -> Option<I>,
{
    fn is_for_item(&self, item: &O) -> bool {
        (self.convert)(item).is_some_and(|inner| self.delegate.is_for_item(&inner))
    }

    fn create_view(&self, parent: &C) -> C::View {
        self.delegate.create_view(parent)
    }

    fn bind_item(&self, view: &mut C::View, item: &O) {
        match (self.convert)(item) {
            Some(inner) => self.delegate.bind_item(view, &inner),
            None => panic!(
                "{} bound to an item it cannot convert",
                std::any::type_name::<D>()
            ),
        }
    }

    fn save_state(&self, out: &mut StateBundle) {
        self.delegate.save_state(out);
    }

    fn restore_state(&mut self, state: &StateBundle) {
        self.delegate.restore_state(state);
    }
}
