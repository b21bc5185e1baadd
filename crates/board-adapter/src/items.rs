//! Read-only views over the items a delegate is asked about.

use crate::error::{AdapterError, fatal};

/// Projection of an item onto one of its variants.
///
/// This is how delegates check "is this item of kind `E`": item enums
/// implement `Variant<E>` for each payload type a delegate renders.
///
/// ```
/// use board_adapter::Variant;
///
/// struct Post { id: u64 }
///
/// enum Row {
///     Post(Post),
///     Loading,
/// }
///
/// impl Variant<Post> for Row {
///     fn variant(&self) -> Option<&Post> {
///         match self {
///             Row::Post(post) => Some(post),
///             _ => None,
///         }
///     }
/// }
///
/// assert!(Row::Post(Post { id: 1 }).variant().is_some());
/// assert!(Variant::<Post>::variant(&Row::Loading).is_none());
/// ```
pub trait Variant<E> {
    /// The payload if this item is of kind `E`.
    fn variant(&self) -> Option<&E>;
}

/// One position of a paged list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    /// Fetched data.
    Loaded(T),
    /// A position whose page has not been fetched yet.
    Placeholder,
}

impl<T> Slot<T> {
    /// The loaded item, if any.
    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Slot::Loaded(item) => Some(item),
            Slot::Placeholder => None,
        }
    }

    /// Whether this slot is still a placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder)
    }
}

enum Repr<'a, T> {
    Plain(&'a [T]),
    Paged(&'a [Slot<T>]),
}

/// The item sequence handed to delegates during dispatch.
///
/// Backed either by a plain slice or by the slots of a paged list. It is a
/// borrowed snapshot: a list update during dispatch does not change it.
pub struct Items<'a, T> {
    repr: Repr<'a, T>,
}

impl<T> Clone for Items<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Items<'_, T> {}

impl<T> Clone for Repr<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Repr<'_, T> {}

impl<T> std::fmt::Debug for Items<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Items")
            .field("len", &self.len())
            .field("paged", &matches!(self.repr, Repr::Paged(_)))
            .finish()
    }
}

impl<'a, T> Items<'a, T> {
    /// Items backed by a plain slice.
    pub fn new(items: &'a [T]) -> Self {
        Self {
            repr: Repr::Plain(items),
        }
    }

    /// Items backed by paged slots.
    pub fn paged(slots: &'a [Slot<T>]) -> Self {
        Self {
            repr: Repr::Paged(slots),
        }
    }

    /// Number of positions, placeholders included.
    pub fn len(&self) -> usize {
        match self.repr {
            Repr::Plain(items) => items.len(),
            Repr::Paged(slots) => slots.len(),
        }
    }

    /// Whether there are no positions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `index` is a placeholder. Out-of-range positions are not.
    pub fn is_placeholder(&self, index: usize) -> bool {
        match self.repr {
            Repr::Plain(_) => false,
            Repr::Paged(slots) => slots.get(index).is_some_and(Slot::is_placeholder),
        }
    }

    /// The item at `index`, or `None` for placeholders and out-of-range
    /// positions.
    pub fn get(&self, index: usize) -> Option<&'a T> {
        match self.repr {
            Repr::Plain(items) => items.get(index),
            Repr::Paged(slots) => slots.get(index).and_then(Slot::as_loaded),
        }
    }

    /// The item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or a placeholder.
    #[track_caller]
    pub fn item(&self, index: usize) -> &'a T {
        match self.get(index) {
            Some(item) => item,
            None if self.is_placeholder(index) => fatal(AdapterError::Placeholder { position: index }),
            None => fatal(AdapterError::OutOfBounds {
                position: index,
                len: self.len(),
            }),
        }
    }

    /// Iterate over loaded items with their positions, skipping placeholders.
    pub fn loaded(self) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        (0..self.len()).filter_map(move |index| self.get(index).map(|item| (index, item)))
    }
}

impl<'a, T> From<&'a [T]> for Items<'a, T> {
    fn from(items: &'a [T]) -> Self {
        Self::new(items)
    }
}

impl<'a, T> From<&'a Vec<T>> for Items<'a, T> {
    fn from(items: &'a Vec<T>) -> Self {
        Self::new(items)
    }
}
