//! The contract between delegates and the host list widget.
//!
//! Delegates never build widgets themselves. They ask the parent
//! [`Container`] to inflate a layout and get back the container's view type,
//! which they fill with item data on bind. The host widget keeps the created
//! views wrapped in [`ViewHolder`]s that remember which delegate made them.

/// Name of a fixed layout a [`Container`] knows how to inflate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId(&'static str);

impl LayoutId {
    /// Create a layout id from its resource name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The resource name.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for LayoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Views that hold resources (playing videos, image requests, ...) and want
/// to release them when the host widget retires their holder.
pub trait RecycleAware {
    /// Called once when the holder is recycled.
    fn on_view_recycled(&mut self);
}

/// A view produced by a [`Container`].
pub trait ItemView {
    /// Expose the recycle capability, if this view has one.
    fn recycle_aware(&mut self) -> Option<&mut dyn RecycleAware> {
        None
    }
}

/// The parent a delegate's views are created in.
pub trait Container {
    /// The view type every delegate of an adapter produces.
    type View: ItemView;

    /// Build a new, unbound view from `layout`.
    fn inflate(&self, layout: LayoutId) -> Self::View;
}

/// A created view together with the view type of the delegate that made it.
///
/// The stamp is written once at creation. Rebinding is routed by the stamp
/// without asking the delegates' predicates again.
#[derive(Debug)]
pub struct ViewHolder<V> {
    view: V,
    view_type: usize,
    position: Option<usize>,
    recycled: bool,
}

impl<V> ViewHolder<V> {
    pub(crate) fn new(view: V, view_type: usize) -> Self {
        Self {
            view,
            view_type,
            position: None,
            recycled: false,
        }
    }

    /// The view type (delegate index) this holder was created for.
    pub fn view_type(&self) -> usize {
        self.view_type
    }

    /// The position most recently bound, `None` before the first bind and
    /// after a recycle.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Whether the holder has been recycled and not bound since.
    pub fn is_recycled(&self) -> bool {
        self.recycled
    }

    /// The wrapped view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The wrapped view, mutably.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Unwrap the view.
    pub fn into_view(self) -> V {
        self.view
    }

    pub(crate) fn mark_bound(&mut self, position: usize) {
        self.position = Some(position);
        self.recycled = false;
    }
}

impl<V: ItemView> ViewHolder<V> {
    /// Notify the view that its holder was retired.
    ///
    /// Returns `false` if the holder had already been recycled without a
    /// bind in between; the view is not notified twice.
    pub(crate) fn recycle(&mut self) -> bool {
        if self.recycled {
            return false;
        }
        self.recycled = true;
        self.position = None;
        if let Some(aware) = self.view.recycle_aware() {
            aware.on_view_recycled();
        }
        true
    }
}
