//! Shared widget state and the input state machine.
//!
//! [`WidgetBase`] carries the state every widget has: its [`Rect`], the
//! interaction flags, and the frame counter. [`dispatch_input`] turns a raw
//! [`InputEvent`] into state changes and, when the widget should react, a
//! [`WidgetEvent`] passed to [`Widget::event`].

use trellis_render::Point;

use super::context::DispatchContext;
use super::events::{FocusReason, InputEvent, WidgetEvent};
use super::rect::Rect;
use super::traits::Widget;
use crate::error::WidgetResult;

/// State common to every widget.
///
/// The flags are not mutually exclusive: a widget can be hovered and
/// focused at the same time. `disable` wins over everything else; a
/// disabled widget ignores all input except the per-frame update.
#[derive(Debug, Clone)]
pub struct WidgetBase {
    pub(crate) rect: Rect,
    pub(crate) hover: bool,
    pub(crate) press: bool,
    pub(crate) disable: bool,
    pub(crate) drag: bool,
    pub(crate) focus: bool,
    pub(crate) frames: u64,
    pub(crate) last_press: Point,
}

impl WidgetBase {
    /// Create state for a widget centered on `(x, y)`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y),
            hover: false,
            press: false,
            disable: false,
            drag: false,
            focus: false,
            frames: 0,
            last_press: Point::ZERO,
        }
    }

    /// Give the widget a stored size, used when it has no children.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.rect = self.rect.with_size(width, height);
        self
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[inline]
    pub fn rect_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hover
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.press
    }

    pub fn set_pressed(&mut self, press: bool) {
        self.press = press;
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.disable
    }

    pub fn set_disabled(&mut self, disable: bool) {
        self.disable = disable;
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag
    }

    /// Mirror of the application's focus; only the application writes it.
    #[inline]
    pub fn has_focus(&self) -> bool {
        self.focus
    }

    pub(crate) fn set_focus(&mut self, focus: bool) {
        self.focus = focus;
    }

    /// Number of update ticks received.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Position of the most recent press, inside the widget or not.
    #[inline]
    pub fn last_press(&self) -> Point {
        self.last_press
    }

    /// Put the base into its detached state.
    pub(crate) fn detach(&mut self) {
        self.disable = true;
        self.focus = false;
        self.hover = false;
        self.press = false;
        self.drag = false;
    }
}

/// Run the shared input state machine for `widget`.
///
/// Components of a widget with more than one child see the input first,
/// through a component context. Then the widget's own flags are updated and
/// the matching [`WidgetEvent`], if any, is delivered.
pub fn dispatch_input<W: Widget + ?Sized>(
    widget: &mut W,
    input: &InputEvent,
    ctx: &mut DispatchContext<'_>,
) -> WidgetResult<()> {
    if widget.children().len() > 1 {
        let mut component_ctx = ctx.component();
        for child in widget.children_mut() {
            child.handle_input(input, &mut component_ctx)?;
        }
    }

    if let InputEvent::Update { delta } = *input {
        let base = widget.widget_base_mut();
        base.frames += 1;
        if !ctx.is_application_enabled() {
            base.disable = true;
        }
        return widget.event(&WidgetEvent::Update { delta }, ctx);
    }

    if widget.widget_base().disable {
        return Ok(());
    }

    match input {
        InputEvent::KeyPress { key, modifiers } => {
            if ctx.has_focus() {
                widget.event(
                    &WidgetEvent::Key {
                        key: *key,
                        modifiers: *modifiers,
                    },
                    ctx,
                )?;
            }
        }
        InputEvent::KeyRelease { key, modifiers } => {
            if ctx.has_focus() {
                widget.widget_base_mut().press = false;
                widget.event(
                    &WidgetEvent::Lift {
                        key: *key,
                        modifiers: *modifiers,
                    },
                    ctx,
                )?;
            }
        }
        InputEvent::MouseMotion { position, delta } => {
            let inside = widget.check_collision(position);
            widget.widget_base_mut().hover = inside;
            if inside {
                widget.event(
                    &WidgetEvent::Hover {
                        position: *position,
                        delta: *delta,
                    },
                    ctx,
                )?;
            }
        }
        InputEvent::MousePress {
            position,
            button,
            modifiers,
        } => {
            widget.widget_base_mut().last_press = *position;
            if widget.check_collision(position) {
                widget.widget_base_mut().press = true;
                if widget.is_group() {
                    ctx.request_focus(FocusReason::Mouse);
                }
                widget.event(
                    &WidgetEvent::Press {
                        position: *position,
                        button: *button,
                        modifiers: *modifiers,
                    },
                    ctx,
                )?;
            }
        }
        InputEvent::MouseRelease {
            position,
            button,
            modifiers,
        } => {
            let base = widget.widget_base_mut();
            base.press = false;
            base.drag = false;
            widget.event(
                &WidgetEvent::Release {
                    position: *position,
                    button: *button,
                    modifiers: *modifiers,
                },
                ctx,
            )?;
        }
        InputEvent::MouseDrag {
            position,
            delta,
            button,
            modifiers,
        } => {
            let last_press = widget.widget_base().last_press;
            if widget.check_collision(position) || widget.check_collision(&last_press) {
                widget.widget_base_mut().drag = true;
                widget.event(
                    &WidgetEvent::Drag {
                        position: *position,
                        delta: *delta,
                        button: *button,
                        modifiers: *modifiers,
                    },
                    ctx,
                )?;
            }
        }
        InputEvent::MouseScroll { position, scroll } => {
            if widget.check_collision(position) {
                widget.event(
                    &WidgetEvent::Scroll {
                        position: *position,
                        scroll: *scroll,
                    },
                    ctx,
                )?;
            }
        }
        InputEvent::Text(text) => {
            if ctx.has_focus() {
                widget.event(&WidgetEvent::Text(text.clone()), ctx)?;
            }
        }
        InputEvent::TextMotion { motion, select } => {
            if ctx.has_focus() {
                widget.event(
                    &WidgetEvent::TextMotion {
                        motion: *motion,
                        select: *select,
                    },
                    ctx,
                )?;
            }
        }
        InputEvent::Deactivate => {
            let base = widget.widget_base_mut();
            base.hover = false;
            base.press = false;
        }
        InputEvent::Update { .. } => {}
    }
    Ok(())
}
