//! The widget container and focus manager.
//!
//! An [`Application`] owns every attached widget in a slotmap arena and
//! keeps two orderings over it:
//!
//! - the broadcast order, every attached widget in attachment order, which
//!   receives each [`InputEvent`] and is drawn each frame;
//! - the focus order, only the focusable groups, which Tab walks.
//!
//! # Focus
//!
//! At most one widget holds focus, and it is always a member of the focus
//! order. The focused widget's base mirrors the flag so widgets can read it
//! while drawing; the application's record is authoritative. A widget is
//! told it gained focus with [`WidgetEvent::Focus`] only when focus actually
//! moves.
//!
//! # Deferred Structural Changes
//!
//! Handlers cannot reach the application directly. They queue
//! [`Request`]s on their [`DispatchContext`]: focus requests are applied as
//! soon as the requesting handler returns, deletions once the whole
//! broadcast pass is over.
//!
//! ```
//! use trellis::{Application, ApplicationConfig, Button, InputEvent, Key};
//! use trellis::render::RecordingRenderer;
//!
//! let mut renderer = RecordingRenderer::new();
//! for state in ["normal", "hover", "press", "disable"] {
//!     renderer.register_texture(format!("assets/widgets/yellow_button_{state}.png"), 120.0, 40.0);
//! }
//! let mut app = Application::new(ApplicationConfig::default(), renderer).unwrap();
//! let ok = app.add(Button::new("Ok", 100.0, 100.0).unwrap()).unwrap();
//! let cancel = app.add(Button::new("Cancel", 300.0, 100.0).unwrap()).unwrap();
//! assert_eq!(app.focus(), Some(cancel));
//!
//! app.dispatch(InputEvent::key_press(Key::Tab));
//! assert_eq!(app.focus(), Some(ok));
//! ```

use std::collections::HashSet;

use slotmap::SlotMap;
use trellis_core::logging::{span_names, targets};
use trellis_core::{PerfSpan, WidgetId};
use trellis_render::{FrameStats, Renderer};

use crate::config::ApplicationConfig;
use crate::error::{WidgetError, WidgetResult};
use crate::text::add_prefix_and_suffix;
use crate::widget::{
    DispatchContext, Drawable, FocusReason, InputEvent, Key, KeyboardModifiers, Request, Widget,
    WidgetEvent, downcast_mut, downcast_ref,
};

/// Owner of all attached widgets, their focus, and the renderer.
pub struct Application<R: Renderer> {
    config: ApplicationConfig,
    renderer: R,
    arena: SlotMap<WidgetId, Box<dyn Widget>>,
    /// Focusable groups, in Tab order.
    widgets: Vec<WidgetId>,
    /// Every attached widget, in attachment order.
    all_widgets: Vec<WidgetId>,
    focus: Option<WidgetId>,
    enable: bool,
    groups: Vec<Box<dyn Drawable>>,
    held_keys: HashSet<Key>,
    fps: f32,
    fps_samples: Vec<f32>,
    track_fps: bool,
    pending_deletes: Vec<WidgetId>,
    dispatching: bool,
}

impl<R: Renderer> Application<R> {
    /// Create an application drawing through `renderer`.
    ///
    /// The configuration is validated before anything else happens.
    pub fn new(config: ApplicationConfig, renderer: R) -> WidgetResult<Self> {
        config.validate()?;
        trellis_core::trellis_debug!(title = %config.title, "application created");
        Ok(Self {
            track_fps: config.track_fps,
            config,
            renderer,
            arena: SlotMap::with_key(),
            widgets: Vec::new(),
            all_widgets: Vec::new(),
            focus: None,
            enable: true,
            groups: Vec::new(),
            held_keys: HashSet::new(),
            fps: 0.0,
            fps_samples: Vec::new(),
            pending_deletes: Vec::new(),
            dispatching: false,
        })
    }

    // =========================================================================
    // Attaching and Removing Widgets
    // =========================================================================

    /// Attach a widget and return its id.
    ///
    /// The widget is created against the renderer and mounted. A focusable
    /// widget joins the end of the Tab order and takes focus.
    pub fn add<W: Widget>(&mut self, widget: W) -> WidgetResult<WidgetId> {
        let (id, focusable) = self.attach(Box::new(widget))?;
        if focusable {
            self.apply_focus(id, FocusReason::Program);
        }
        Ok(id)
    }

    /// Attach several widgets in order. The last focusable one takes focus.
    ///
    /// Widgets before a failing one stay attached.
    pub fn add_all(&mut self, widgets: Vec<Box<dyn Widget>>) -> WidgetResult<Vec<WidgetId>> {
        let mut ids = Vec::with_capacity(widgets.len());
        let mut last_focusable = None;
        for widget in widgets {
            let (id, focusable) = self.attach(widget)?;
            if focusable {
                last_focusable = Some(id);
            }
            ids.push(id);
        }
        if let Some(id) = last_focusable {
            self.apply_focus(id, FocusReason::Program);
        }
        Ok(ids)
    }

    fn attach(&mut self, mut widget: Box<dyn Widget>) -> WidgetResult<(WidgetId, bool)> {
        widget.create(&mut self.renderer)?;
        widget.mount();
        let focusable = widget.is_group();
        let name = widget.type_name();
        let id = self.arena.insert(widget);
        self.all_widgets.push(id);
        if focusable {
            self.widgets.push(id);
        }
        tracing::debug!(target: targets::WIDGET, ?id, widget = name, focusable, "widget attached");
        Ok((id, focusable))
    }

    /// Detach a widget and hand it back.
    ///
    /// If it held focus, focus moves to the previous focusable widget, or to
    /// none when it was the last one. Returns `None` for an unknown id.
    pub fn delete(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let mut widget = self.arena.remove(id)?;
        widget.on_delete();
        widget.widget_base_mut().detach();

        self.all_widgets.retain(|other| *other != id);
        let position = self.widgets.iter().position(|other| *other == id);
        if let Some(index) = position {
            self.widgets.remove(index);
        }

        if self.focus == Some(id) {
            self.focus = None;
            if !self.widgets.is_empty() {
                let len = self.widgets.len() as isize;
                let index = position.unwrap_or(0) as isize;
                let previous = self.widgets[(index - 1).rem_euclid(len) as usize];
                self.apply_focus(previous, FocusReason::Program);
            }
        }

        tracing::debug!(target: targets::WIDGET, ?id, widget = widget.type_name(), "widget deleted");
        Some(widget)
    }

    /// Delete every focusable widget and switch the application off.
    ///
    /// Widgets left attached see the switch on their next update and disable
    /// themselves.
    pub fn exit(&mut self) {
        for id in self.widgets.clone() {
            self.delete(id);
        }
        self.widgets.clear();
        self.enable = false;
        trellis_core::trellis_info!("application exited");
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Broadcast an input event to every attached widget in attachment
    /// order, then run Tab traversal for key presses.
    ///
    /// A failing handler is logged and skipped; the rest of the widgets still
    /// see the event.
    pub fn dispatch(&mut self, input: InputEvent) {
        let _span = PerfSpan::new(span_names::DISPATCH);
        match &input {
            InputEvent::KeyPress { key, .. } => {
                self.held_keys.insert(*key);
            }
            InputEvent::KeyRelease { key, .. } => {
                self.held_keys.remove(key);
            }
            InputEvent::Deactivate => self.held_keys.clear(),
            InputEvent::Update { delta } if *delta > 0.0 => self.fps = 1.0 / delta,
            _ => {}
        }

        self.dispatching = true;
        for id in self.all_widgets.clone() {
            let mut requests = Vec::new();
            let focused = self.focus == Some(id);
            let Some(widget) = self.arena.get_mut(id) else {
                continue;
            };
            let mut ctx = DispatchContext::new(id, focused, self.enable, &self.held_keys, &mut requests);
            if let Err(err) = widget.handle_input(&input, &mut ctx) {
                tracing::warn!(
                    target: targets::DISPATCH,
                    ?id,
                    widget = widget.type_name(),
                    error = %err,
                    "handler failed"
                );
            }
            self.apply_requests(requests);
        }
        self.dispatching = false;
        self.reap();

        if let InputEvent::KeyPress { key, modifiers } = input {
            self.on_key_press(key, modifiers);
        }
    }

    fn apply_requests(&mut self, requests: Vec<Request>) {
        for request in requests {
            match request {
                Request::Focus(id, reason) => {
                    if let Err(err) = self.set_focus(id, reason) {
                        tracing::warn!(target: targets::FOCUS, ?id, error = %err, "focus request rejected");
                    }
                }
                Request::Delete(id) => self.pending_deletes.push(id),
            }
        }
    }

    fn reap(&mut self) {
        if self.dispatching {
            return;
        }
        for id in std::mem::take(&mut self.pending_deletes) {
            if self.delete(id).is_some() {
                tracing::trace!(target: targets::DISPATCH, ?id, "reaped deferred deletion");
            }
        }
    }

    /// Tab moves focus to the next focusable widget and Shift-Tab to the
    /// previous one, wrapping at both ends. Other keys are ignored.
    ///
    /// When nothing in the focus order is focused, the first widget is
    /// chosen.
    pub fn on_key_press(&mut self, key: Key, modifiers: KeyboardModifiers) {
        if key != Key::Tab || self.widgets.is_empty() {
            return;
        }
        let direction: isize = if modifiers.shift { -1 } else { 1 };
        let current = self
            .focus
            .and_then(|focus| self.widgets.iter().position(|id| *id == focus));
        let (index, direction) = match current {
            Some(index) => (index as isize, direction),
            None => (0, 0),
        };
        let len = self.widgets.len() as isize;
        let next = self.widgets[(index + direction).rem_euclid(len) as usize];
        tracing::trace!(target: targets::FOCUS, from = ?self.focus, to = ?next, direction, "tab traversal");
        self.apply_focus(next, FocusReason::Keyboard);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// The focused widget.
    #[inline]
    pub fn focus(&self) -> Option<WidgetId> {
        self.focus
    }

    /// Give focus to a focusable widget.
    ///
    /// # Errors
    ///
    /// [`WidgetError::WidgetNotFound`] for an id that is not attached, and
    /// [`WidgetError::InvalidOperation`] for a widget without components.
    pub fn set_focus(&mut self, id: WidgetId, reason: FocusReason) -> WidgetResult<()> {
        let widget = self.arena.get(id).ok_or(WidgetError::WidgetNotFound(id))?;
        if !widget.is_group() {
            return Err(WidgetError::InvalidOperation(format!(
                "{} has no components and cannot hold focus",
                widget.type_name()
            )));
        }
        self.apply_focus(id, reason);
        Ok(())
    }

    /// Take focus away from `id`, handing it to the previous focusable
    /// widget.
    ///
    /// # Errors
    ///
    /// [`WidgetError::InvalidOperation`] when fewer than two widgets are
    /// focusable, since there is nothing to hand focus to, or when `id` is
    /// not focusable. [`WidgetError::WidgetNotFound`] for an id that is not
    /// attached.
    pub fn clear_focus(&mut self, id: WidgetId) -> WidgetResult<()> {
        if self.widgets.len() <= 1 {
            return Err(WidgetError::InvalidOperation(
                "cannot clear focus with fewer than two focusable widgets".to_string(),
            ));
        }
        if !self.arena.contains_key(id) {
            return Err(WidgetError::WidgetNotFound(id));
        }
        let index = self
            .widgets
            .iter()
            .position(|other| *other == id)
            .ok_or_else(|| WidgetError::InvalidOperation("widget is not focusable".to_string()))?;
        let len = self.widgets.len() as isize;
        let previous = self.widgets[(index as isize - 1).rem_euclid(len) as usize];
        self.apply_focus(previous, FocusReason::Program);
        Ok(())
    }

    fn apply_focus(&mut self, id: WidgetId, reason: FocusReason) {
        let changed = self.focus != Some(id);
        self.focus = Some(id);
        for other in &self.widgets {
            if let Some(widget) = self.arena.get_mut(*other) {
                widget.widget_base_mut().set_focus(*other == id);
            }
        }
        if !changed {
            return;
        }

        let mut requests = Vec::new();
        if let Some(widget) = self.arena.get_mut(id) {
            tracing::debug!(target: targets::FOCUS, ?id, widget = widget.type_name(), ?reason, "focus changed");
            let mut ctx = DispatchContext::new(id, true, self.enable, &self.held_keys, &mut requests);
            if let Err(err) = widget.event(&WidgetEvent::Focus(reason), &mut ctx) {
                tracing::warn!(target: targets::FOCUS, ?id, error = %err, "focus handler failed");
            }
        }
        // A focus handler may not move focus again; deletions are honored.
        for request in requests {
            if let Request::Delete(target) = request {
                self.pending_deletes.push(target);
            }
        }
        self.reap();
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Attach a drawable that is drawn after all widgets.
    pub fn add_group(&mut self, group: Box<dyn Drawable>) {
        self.groups.push(group);
    }

    /// Draw every widget, then the groups, and flush the frame.
    pub fn draw(&mut self) -> FrameStats {
        let _span = PerfSpan::new(span_names::DRAW);
        for id in &self.all_widgets {
            if let Some(widget) = self.arena.get_mut(*id) {
                widget.draw_tree(&mut self.renderer);
            }
        }
        for group in &mut self.groups {
            group.draw(&mut self.renderer);
        }
        if self.track_fps {
            self.fps_samples.push(self.fps);
        }
        self.renderer.flush_batch()
    }

    /// Outline every focusable widget.
    pub fn draw_bbox(&mut self, thickness: f32, padding: f32) {
        for id in &self.widgets {
            if let Some(widget) = self.arena.get_mut(*id) {
                widget.draw_bbox(&mut self.renderer, thickness, padding);
            }
        }
    }

    // =========================================================================
    // Frame Rate
    // =========================================================================

    /// Update rate measured from the last update tick.
    pub fn get_fps(&self) -> f32 {
        self.fps
    }

    /// Mean of the rates sampled at each draw, if any were sampled.
    pub fn get_average_fps(&self) -> Option<f32> {
        if self.fps_samples.is_empty() {
            return None;
        }
        Some(self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32)
    }

    /// The average rate with `prefix` and `suffix` around it, e.g. `"60 fps"`.
    pub fn format_average_fps(&self, prefix: &str, suffix: &str) -> Option<String> {
        self.get_average_fps()
            .map(|fps| add_prefix_and_suffix(&format!("{fps:.0}"), prefix, suffix))
    }

    pub fn fps_samples(&self) -> &[f32] {
        &self.fps_samples
    }

    pub fn set_track_fps(&mut self, track_fps: bool) {
        self.track_fps = track_fps;
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Focusable widgets in Tab order.
    pub fn focusable_widgets(&self) -> &[WidgetId] {
        &self.widgets
    }

    /// All attached widgets in attachment order.
    pub fn widgets(&self) -> &[WidgetId] {
        &self.all_widgets
    }

    pub fn get(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.arena.get(id).map(|widget| widget.as_ref())
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut dyn Widget> {
        match self.arena.get_mut(id) {
            Some(widget) => Some(widget.as_mut()),
            None => None,
        }
    }

    /// Typed access to an attached widget.
    pub fn widget<W: Widget>(&self, id: WidgetId) -> Option<&W> {
        self.get(id).and_then(downcast_ref::<W>)
    }

    /// Typed mutable access to an attached widget.
    pub fn widget_mut<W: Widget>(&mut self, id: WidgetId) -> Option<&mut W> {
        self.get_mut(id).and_then(downcast_mut::<W>)
    }

    /// The global enable switch, cleared by [`exit`](Self::exit).
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enable
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.held_keys.contains(&key)
    }

    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
