//! A delegate for inline error rows.
//!
//! Feeds show a failed page load as a row in the list itself. The item enum
//! carries an [`ErrorValue`] variant and registers [`ErrorAdapterDelegate`]
//! for it with `add_variant::<ErrorValue, _>`.

use crate::delegate::VariantAdapterDelegate;
use crate::view::{Container, LayoutId};

/// Layout inflated by [`ErrorAdapterDelegate::new`].
pub const FEED_ERROR_LAYOUT: LayoutId = LayoutId::new("feed_error");

/// The payload of an error row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorValue {
    error_text: String,
}

impl ErrorValue {
    /// An error row showing `text` verbatim.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            error_text: text.into(),
        }
    }

    /// An error row describing `err` and its chain of sources.
    ///
    /// ```
    /// use board_adapter::ErrorValue;
    ///
    /// let err = std::io::Error::other("connection reset");
    /// assert_eq!(ErrorValue::from_error(&err).error_text(), "connection reset");
    /// ```
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut text = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            // thiserror messages often embed their source already
            if !text.ends_with(&cause_text) {
                text.push_str(": ");
                text.push_str(&cause_text);
            }
            source = cause.source();
        }
        Self { error_text: text }
    }

    /// The text shown in the row.
    pub fn error_text(&self) -> &str {
        &self.error_text
    }
}

/// Views that can display an error message.
pub trait ErrorTextView {
    /// Show `text`.
    fn set_error_text(&mut self, text: &str);
}

/// Renders [`ErrorValue`] rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorAdapterDelegate {
    layout: LayoutId,
}

impl Default for ErrorAdapterDelegate {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorAdapterDelegate {
    /// Inflate [`FEED_ERROR_LAYOUT`].
    pub const fn new() -> Self {
        Self::with_layout(FEED_ERROR_LAYOUT)
    }

    /// Inflate `layout` instead of the default.
    pub const fn with_layout(layout: LayoutId) -> Self {
        Self { layout }
    }

    /// The inflated layout.
    pub fn layout(&self) -> LayoutId {
        self.layout
    }
}

impl<C> VariantAdapterDelegate<ErrorValue, C> for ErrorAdapterDelegate
where
    C: Container,
    C::View: ErrorTextView,
{
    fn create_view(&self, parent: &C) -> C::View {
        parent.inflate(self.layout)
    }

    fn bind_variant(&self, view: &mut C::View, value: &ErrorValue) {
        view.set_error_text(value.error_text());
    }
}
