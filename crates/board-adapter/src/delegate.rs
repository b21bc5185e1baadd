//! Adapter delegates: per-kind rendering strategies for list rows.
//!
//! A list shows heterogeneous rows (posts, comments, "loading" spinners,
//! error rows, ...). Instead of one adapter that knows every kind, each kind
//! gets a delegate that can
//!
//! - decide whether it renders a position ([`AdapterDelegate::is_for_view_type`]),
//! - create an unbound view for it ([`AdapterDelegate::create_view`]),
//! - write an item's data into such a view ([`AdapterDelegate::bind_view`]).
//!
//! # Flavours
//!
//! Most delegates only look at the item at the position. They implement
//! [`ItemAdapterDelegate`] and are registered through [`PerItem`]. Delegates
//! that render one variant of an item enum implement
//! [`VariantAdapterDelegate`] and are lifted with [`ByVariant`], which
//! derives the predicate from the item's [`Variant`] projection. A
//! [`ByValue`] wrapper matches by equality with one fixed value instead.
//!
//! ```ignore
//! struct PostDelegate;
//!
//! impl VariantAdapterDelegate<Post, FeedContainer> for PostDelegate {
//!     fn create_view(&self, parent: &FeedContainer) -> FeedView {
//!         parent.inflate(POST_LAYOUT)
//!     }
//!
//!     fn bind_variant(&self, view: &mut FeedView, post: &Post) {
//!         view.set_title(&post.title);
//!     }
//! }
//!
//! let manager = DelegateManager::<Row, FeedContainer>::builder()
//!     .add_variant::<Post, _>(PostDelegate)
//!     .build();
//! ```

use std::marker::PhantomData;

use crate::items::{Items, Variant};
use crate::state::StateBundle;
use crate::view::Container;

/// The full delegate contract.
///
/// `is_for_view_type` receives the whole item sequence so that a delegate
/// may look at neighbouring items; it must be pure and total.
pub trait AdapterDelegate<T, C: Container> {
    /// Whether this delegate renders `items[index]`.
    fn is_for_view_type(&self, items: Items<'_, T>, index: usize) -> bool;

    /// Create a new, unbound view inside `parent`.
    fn create_view(&self, parent: &C) -> C::View;

    /// Write `items[index]` into `view`. Called again for every rebind.
    fn bind_view(&self, view: &mut C::View, items: Items<'_, T>, index: usize);

    /// Contribute cross-rebind UI state to a save cycle.
    fn save_state(&self, _out: &mut StateBundle) {}

    /// Read back state written by [`save_state`](Self::save_state).
    fn restore_state(&mut self, _state: &StateBundle) {}

    /// Name used in logs and perf spans.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A delegate that only looks at the item at the bound position.
pub trait ItemAdapterDelegate<T, C: Container> {
    /// Whether this delegate renders `item`.
    fn is_for_item(&self, item: &T) -> bool;

    /// Create a new, unbound view inside `parent`.
    fn create_view(&self, parent: &C) -> C::View;

    /// Write `item` into `view`.
    fn bind_item(&self, view: &mut C::View, item: &T);

    /// Contribute cross-rebind UI state to a save cycle.
    fn save_state(&self, _out: &mut StateBundle) {}

    /// Read back state written by [`save_state`](Self::save_state).
    fn restore_state(&mut self, _state: &StateBundle) {}
}

/// Registers an [`ItemAdapterDelegate`] as a full [`AdapterDelegate`].
#[derive(Debug, Clone, Default)]
pub struct PerItem<D>(pub D);

impl<T, C, D> AdapterDelegate<T, C> for PerItem<D>
where
    C: Container,
    D: ItemAdapterDelegate<T, C>,
{
    fn is_for_view_type(&self, items: Items<'_, T>, index: usize) -> bool {
        self.0.is_for_item(items.item(index))
    }

    fn create_view(&self, parent: &C) -> C::View {
        self.0.create_view(parent)
    }

    fn bind_view(&self, view: &mut C::View, items: Items<'_, T>, index: usize) {
        self.0.bind_item(view, items.item(index));
    }

    fn save_state(&self, out: &mut StateBundle) {
        self.0.save_state(out);
    }

    fn restore_state(&mut self, state: &StateBundle) {
        self.0.restore_state(state);
    }

    fn name(&self) -> &str {
        std::any::type_name::<D>()
    }
}

/// A delegate for one variant `E` of an item enum.
pub trait VariantAdapterDelegate<E, C: Container> {
    /// Create a new, unbound view inside `parent`.
    fn create_view(&self, parent: &C) -> C::View;

    /// Write the variant's payload into `view`.
    fn bind_variant(&self, view: &mut C::View, value: &E);

    /// Contribute cross-rebind UI state to a save cycle.
    fn save_state(&self, _out: &mut StateBundle) {}

    /// Read back state written by [`save_state`](Self::save_state).
    fn restore_state(&mut self, _state: &StateBundle) {}
}

/// Lifts a [`VariantAdapterDelegate`] into an [`ItemAdapterDelegate`] whose
/// predicate is "the item is of variant `E`".
pub struct ByVariant<D, E> {
    delegate: D,
    _variant: PhantomData<fn(&E)>,
}

impl<D, E> ByVariant<D, E> {
    /// Wrap `delegate`.
    pub fn new(delegate: D) -> Self {
        Self {
            delegate,
            _variant: PhantomData,
        }
    }

    /// The wrapped delegate.
    pub fn inner(&self) -> &D {
        &self.delegate
    }
}

impl<D: std::fmt::Debug, E> std::fmt::Debug for ByVariant<D, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ByVariant").field(&self.delegate).finish()
    }
}

impl<T, E, C, D> ItemAdapterDelegate<T, C> for ByVariant<D, E>
where
    T: Variant<E>,
    C: Container,
    D: VariantAdapterDelegate<E, C>,
{
    fn is_for_item(&self, item: &T) -> bool {
        item.variant().is_some()
    }

    fn create_view(&self, parent: &C) -> C::View {
        self.delegate.create_view(parent)
    }

    fn bind_item(&self, view: &mut C::View, item: &T) {
        match item.variant() {
            Some(value) => self.delegate.bind_variant(view, value),
            None => panic!(
                "{} bound to an item of another variant",
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

/// Lifts a [`VariantAdapterDelegate`] over the item type itself into an
/// [`ItemAdapterDelegate`] whose predicate is "the item equals `value`".
pub struct ByValue<D, T> {
    delegate: D,
    value: T,
}

impl<D, T> ByValue<D, T> {
    /// Wrap `delegate`, matching items equal to `value`.
    pub fn new(value: T, delegate: D) -> Self {
        Self { delegate, value }
    }

    /// The value this delegate matches.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The wrapped delegate.
    pub fn inner(&self) -> &D {
        &self.delegate
    }
}

impl<D: std::fmt::Debug, T: std::fmt::Debug> std::fmt::Debug for ByValue<D, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByValue")
            .field("value", &self.value)
            .field("delegate", &self.delegate)
            .finish()
    }
}

impl<T, C, D> ItemAdapterDelegate<T, C> for ByValue<D, T>
where
    T: PartialEq,
    C: Container,
    D: VariantAdapterDelegate<T, C>,
{
    fn is_for_item(&self, item: &T) -> bool {
        *item == self.value
    }

    fn create_view(&self, parent: &C) -> C::View {
        self.delegate.create_view(parent)
    }

    fn bind_item(&self, view: &mut C::View, item: &T) {
        self.delegate.bind_variant(view, item);
    }

    fn save_state(&self, out: &mut StateBundle) {
        self.delegate.save_state(out);
    }

    fn restore_state(&mut self, state: &StateBundle) {
        self.delegate.restore_state(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ItemView, LayoutId};

    struct TextContainer;

    #[derive(Debug, Default, PartialEq)]
    struct TextView {
        layout: &'static str,
        text: String,
    }

    impl ItemView for TextView {}

    impl Container for TextContainer {
        type View = TextView;

        fn inflate(&self, layout: LayoutId) -> TextView {
            TextView {
                layout: layout.name(),
                text: String::new(),
            }
        }
    }

    enum Row {
        Title(String),
        Divider,
    }

    impl Variant<String> for Row {
        fn variant(&self) -> Option<&String> {
            match self {
                Row::Title(title) => Some(title),
                Row::Divider => None,
            }
        }
    }

    struct TitleDelegate;

    impl VariantAdapterDelegate<String, TextContainer> for TitleDelegate {
        fn create_view(&self, parent: &TextContainer) -> TextView {
            parent.inflate(LayoutId::new("title"))
        }

        fn bind_variant(&self, view: &mut TextView, value: &String) {
            view.text = value.clone();
        }
    }

    /// Matches a divider only when the previous row is a title.
    struct DividerAfterTitle;

    impl AdapterDelegate<Row, TextContainer> for DividerAfterTitle {
        fn is_for_view_type(&self, items: Items<'_, Row>, index: usize) -> bool {
            matches!(items.item(index), Row::Divider)
                && index > 0
                && matches!(items.item(index - 1), Row::Title(_))
        }

        fn create_view(&self, parent: &TextContainer) -> TextView {
            parent.inflate(LayoutId::new("divider"))
        }

        fn bind_view(&self, _view: &mut TextView, _items: Items<'_, Row>, _index: usize) {}
    }

    #[test]
    fn test_by_variant_predicate_and_bind() {
        let delegate: Box<dyn AdapterDelegate<Row, TextContainer>> =
            Box::new(PerItem(ByVariant::<_, String>::new(TitleDelegate)));
        let rows = vec![Row::Title("hello".into()), Row::Divider];
        let items = Items::from(&rows);

        assert!(delegate.is_for_view_type(items, 0));
        assert!(!delegate.is_for_view_type(items, 1));

        let mut view = delegate.create_view(&TextContainer);
        delegate.bind_view(&mut view, items, 0);
        assert_eq!(view.layout, "title");
        assert_eq!(view.text, "hello");
    }

    #[test]
    fn test_context_sensitive_delegate() {
        let rows = vec![Row::Divider, Row::Title("t".into()), Row::Divider];
        let items = Items::from(&rows);

        assert!(!DividerAfterTitle.is_for_view_type(items, 0));
        assert!(DividerAfterTitle.is_for_view_type(items, 2));
    }

    #[test]
    fn test_default_name_is_type_name() {
        let delegate = PerItem(ByVariant::<_, String>::new(TitleDelegate));
        let name = AdapterDelegate::<Row, TextContainer>::name(&delegate);
        assert!(name.contains("TitleDelegate"));
    }

    #[test]
    #[should_panic(expected = "bound to an item of another variant")]
    fn test_by_variant_bind_wrong_variant_panics() {
        let delegate = ByVariant::<_, String>::new(TitleDelegate);
        let mut view = TextView::default();
        ItemAdapterDelegate::<Row, TextContainer>::bind_item(&delegate, &mut view, &Row::Divider);
    }

    /// Renders a fixed row; only the item equal to its value selects it.
    struct EndOfFeed;

    impl VariantAdapterDelegate<u32, TextContainer> for EndOfFeed {
        fn create_view(&self, parent: &TextContainer) -> TextView {
            parent.inflate(LayoutId::new("end"))
        }

        fn bind_variant(&self, view: &mut TextView, value: &u32) {
            view.text = format!("end of feed #{value}");
        }
    }

    #[test]
    fn test_by_value_matches_equal_items_only() {
        let delegate = PerItem(ByValue::new(0u32, EndOfFeed));
        let values = vec![7u32, 0];
        let items = Items::from(&values);

        assert!(!delegate.is_for_view_type(items, 0));
        assert!(delegate.is_for_view_type(items, 1));
        assert_eq!(delegate.0.value(), &0);

        let mut view = delegate.create_view(&TextContainer);
        delegate.bind_view(&mut view, items, 1);
        assert_eq!(view.layout, "end");
        assert_eq!(view.text, "end of feed #0");
    }
}
