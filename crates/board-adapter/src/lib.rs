//! Delegate-based list adapters for the board client.
//!
//! A screen's list shows rows of many kinds: posts, comments, a "loading"
//! spinner, an error row. Each kind gets an adapter delegate, and an adapter
//! routes every position to the first delegate that accepts it.
//!
//! - **Delegates**: [`AdapterDelegate`], [`ItemAdapterDelegate`] and
//!   [`VariantAdapterDelegate`]
//! - **Dispatch**: [`DelegateManager`] resolves view types and forwards the
//!   view-holder lifecycle
//! - **Adapters**: [`DelegateAdapter`] over a replaceable list and
//!   [`DelegatePagingAdapter`] over a paged list with placeholders
//! - **Diffing**: [`diff_lists`] turns list updates into edit scripts
//! - **Ready-made delegates**: [`static_layout`], [`adapt_to`],
//!   [`ErrorAdapterDelegate`]
//!
//! # Example
//!
//! ```
//! use board_adapter::{
//!     Container, DelegateAdapter, DelegateManager, ItemView, LayoutId,
//!     VariantAdapterDelegate, Variant, static_layout_for_value,
//! };
//!
//! struct Feed;
//!
//! #[derive(Default)]
//! struct Cell {
//!     title: String,
//! }
//!
//! impl ItemView for Cell {}
//!
//! impl Container for Feed {
//!     type View = Cell;
//!
//!     fn inflate(&self, _layout: LayoutId) -> Cell {
//!         Cell::default()
//!     }
//! }
//!
//! #[derive(Clone, PartialEq)]
//! enum Row {
//!     Post(String),
//!     Loading,
//! }
//!
//! impl Variant<String> for Row {
//!     fn variant(&self) -> Option<&String> {
//!         match self {
//!             Row::Post(title) => Some(title),
//!             Row::Loading => None,
//!         }
//!     }
//! }
//!
//! struct PostDelegate;
//!
//! impl VariantAdapterDelegate<String, Feed> for PostDelegate {
//!     fn create_view(&self, parent: &Feed) -> Cell {
//!         parent.inflate(LayoutId::new("post"))
//!     }
//!
//!     fn bind_variant(&self, view: &mut Cell, title: &String) {
//!         view.title = title.clone();
//!     }
//! }
//!
//! let manager = DelegateManager::<Row, Feed>::builder()
//!     .add_variant::<String, _>(PostDelegate)
//!     .add(static_layout_for_value(LayoutId::new("loading"), Row::Loading))
//!     .build();
//! let adapter = DelegateAdapter::new("feed", manager);
//! adapter.submit_list(vec![Row::Post("hello".into()), Row::Loading]);
//!
//! let view_type = adapter.item_view_type(0);
//! let mut holder = adapter.create_view_holder(&Feed, view_type);
//! adapter.bind_view_holder(&mut holder, 0);
//! assert_eq!(holder.view().title, "hello");
//! assert_eq!(adapter.item_view_type(1), 1);
//! ```
//!
//! # Failure model
//!
//! An item no delegate accepts and a placeholder reaching a delegate are
//! integration bugs. The host callbacks panic with a descriptive message;
//! every such callback has a `try_` twin returning [`AdapterError`].

mod adapter;
mod convenience;
mod delegate;
mod diff;
mod error;
mod error_delegate;
mod items;
mod manager;
mod paging;
mod state;
mod view;

pub use adapter::{DelegateAdapter, delegate_adapter_of};
pub use convenience::{
    Adapted, StaticLayoutDelegate, adapt_to, matches_value, static_layout,
    static_layout_for_value, static_layout_for_variant,
};
pub use delegate::{
    AdapterDelegate, ByValue, ByVariant, ItemAdapterDelegate, PerItem, VariantAdapterDelegate,
};
pub use diff::{DiffOp, EqDiffCallback, ItemCallback, KeyedDiffCallback, ListDiff, diff_lists};
pub use error::{AdapterError, Result};
pub use error_delegate::{ErrorAdapterDelegate, ErrorTextView, ErrorValue, FEED_ERROR_LAYOUT};
pub use items::{Items, Slot, Variant};
pub use manager::{DelegateManager, DelegateManagerBuilder};
pub use paging::DelegatePagingAdapter;
pub use state::StateBundle;
pub use view::{Container, ItemView, LayoutId, RecycleAware, ViewHolder};

static_assertions::assert_impl_all!(StateBundle: Send, Sync);
static_assertions::assert_impl_all!(ListDiff: Send, Sync);
static_assertions::assert_impl_all!(ErrorValue: Send, Sync);
