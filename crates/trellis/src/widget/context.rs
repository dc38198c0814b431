//! Per-handler dispatch context.
//!
//! Widgets never hold a reference to the [`Application`](crate::Application).
//! Instead every handler receives a [`DispatchContext`] describing the
//! application state it needs (focus, the global enable switch, held keys)
//! and a queue for structural requests. The application applies focus
//! requests right after the handler returns and reaps deletions once the
//! whole broadcast pass has finished, so no collection is mutated while it
//! is being iterated.

use std::collections::HashSet;

use trellis_core::WidgetId;

use super::events::{FocusReason, Key};

/// A structural change requested from inside a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Focus(WidgetId, FocusReason),
    Delete(WidgetId),
}

/// What a widget's handler can see of, and ask of, its application.
#[derive(Debug)]
pub struct DispatchContext<'a> {
    widget: WidgetId,
    focused: bool,
    enabled: bool,
    component: bool,
    held_keys: &'a HashSet<Key>,
    requests: &'a mut Vec<Request>,
}

impl<'a> DispatchContext<'a> {
    pub fn new(
        widget: WidgetId,
        focused: bool,
        enabled: bool,
        held_keys: &'a HashSet<Key>,
        requests: &'a mut Vec<Request>,
    ) -> Self {
        Self {
            widget,
            focused,
            enabled,
            component: false,
            held_keys,
            requests,
        }
    }

    /// A context for the components of the current widget.
    ///
    /// Components share the owner's request queue but never hold focus.
    pub fn component(&mut self) -> DispatchContext<'_> {
        DispatchContext {
            widget: self.widget,
            focused: false,
            enabled: self.enabled,
            component: true,
            held_keys: self.held_keys,
            requests: &mut *self.requests,
        }
    }

    /// The attached widget this handler runs for (the owner, for components).
    #[inline]
    pub fn widget_id(&self) -> WidgetId {
        self.widget
    }

    #[inline]
    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// The application's global enable switch.
    #[inline]
    pub fn is_application_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_component(&self) -> bool {
        self.component
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.held_keys.contains(&key)
    }

    /// Whether any of `keys` is currently held.
    pub fn any_key_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|key| self.held_keys.contains(key))
    }

    /// Ask for the attached widget to receive focus.
    ///
    /// Ignored for components, which are not focus targets.
    pub fn request_focus(&mut self, reason: FocusReason) {
        if !self.component {
            self.requests.push(Request::Focus(self.widget, reason));
        }
    }

    /// Ask for the attached widget to be deleted after the current pass.
    pub fn request_delete(&mut self) {
        self.requests.push(Request::Delete(self.widget));
    }

    /// Ask for another widget to be deleted after the current pass.
    pub fn delete(&mut self, id: WidgetId) {
        self.requests.push(Request::Delete(id));
    }
}
