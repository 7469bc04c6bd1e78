//! Scroll and visibility subscriptions with unsubscribe-on-drop handles.

use crate::{
    counter::Visibility,
    sections::{SectionExtent, SectionId},
};

/// Page events the trackers listen to. Dropping a returned subscription
/// unsubscribes it, and its handler is not called again.
pub trait Viewport: Clone + 'static {
    type Element: 'static;
    type Subscription: 'static;

    /// Calls `on_scroll` with the vertical scroll offset after every scroll
    /// event. `None` when there is nothing to listen on.
    fn watch_scroll<F>(&self, on_scroll: F) -> Option<Self::Subscription>
    where
        F: FnMut(f64) + 'static;

    /// Reports how much of `element` is visible whenever it crosses
    /// `threshold`.
    fn watch_visibility<F>(
        &self,
        element: &Self::Element,
        threshold: f64,
        on_change: F,
    ) -> Option<Self::Subscription>
    where
        F: FnMut(Visibility) + 'static;

    /// Live extent of a section, or `None` when it is not on the page.
    fn measure(&self, id: SectionId) -> Option<SectionExtent>;
}
