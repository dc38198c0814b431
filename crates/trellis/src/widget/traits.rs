//! Core widget trait definitions.
//!
//! # Key Types
//!
//! - [`Widget`] - Base trait for all widgets
//! - [`Drawable`] - Anything the application draws after its widgets
//!
//! # Geometry
//!
//! A widget's center is authoritative. Its size is the size of its first
//! child when it has children, and its stored [`Rect`](super::Rect) size
//! otherwise (see [`Widget::intrinsic_size`]). Edges are derived from both:
//!
//! ```text
//! left   = x - width / 2      right = x + width / 2
//! bottom = y - height / 2     top   = y + height / 2
//! ```
//!
//! Writing an edge moves the center and keeps the size.

use std::any::Any;

use trellis_render::collision::are_rects_intersecting;
use trellis_render::{Bounds, Color, Point, Renderer, Size};

use super::base::{WidgetBase, dispatch_input};
use super::context::DispatchContext;
use super::events::{InputEvent, WidgetEvent};
use crate::error::WidgetResult;

/// Outline color used by [`Widget::draw_bbox`].
pub const BBOX_COLOR: Color = Color::RED;

/// The base trait for all widgets.
///
/// Implementors provide access to their [`WidgetBase`] and, for composite
/// widgets, their components. Everything else has a default.
///
/// # Lifecycle
///
/// 1. `new(...)` builds an inert value and rejects bad configuration.
/// 2. [`Application::add`](crate::Application::add) calls [`create`](Self::create)
///    once and then [`mount`](Self::mount).
/// 3. From then on position writes call [`update_position`](Self::update_position).
/// 4. [`Application::delete`](crate::Application::delete) calls [`on_delete`](Self::on_delete)
///    and detaches the widget.
///
/// # Focus
///
/// A widget with at least one child is a focusable group. Leaf widgets are
/// never focus targets and are skipped by Tab traversal.
pub trait Widget: Any {
    // =========================================================================
    // Required Methods
    // =========================================================================

    /// Get a reference to the widget's base.
    fn widget_base(&self) -> &WidgetBase;

    /// Get a mutable reference to the widget's base.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    // =========================================================================
    // Hooks
    // =========================================================================

    /// Short name used in log output.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Components, in draw order. The first one decides the widget's size.
    fn children(&self) -> Vec<&dyn Widget> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Widget> {
        Vec::new()
    }

    /// Allocate rendering resources. Called once, when attached.
    fn create(&mut self, _renderer: &mut dyn Renderer) -> WidgetResult<()> {
        Ok(())
    }

    /// React to a move of the center. Only called once the widget is mounted.
    fn update_position(&mut self, _center: Point) {}

    /// Queue this widget's own primitives. Components are drawn first by
    /// [`draw_tree`](Self::draw_tree).
    fn draw(&mut self, _renderer: &mut dyn Renderer) {}

    /// Handle a semantic event.
    fn event(&mut self, _event: &WidgetEvent, _ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        Ok(())
    }

    /// Release resources before the widget is detached.
    fn on_delete(&mut self) {}

    /// Entry point for raw input. Override to see input before the shared
    /// state machine, then call [`dispatch_input`].
    fn handle_input(&mut self, input: &InputEvent, ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        dispatch_input(self, input, ctx)
    }

    // =========================================================================
    // Size
    // =========================================================================

    /// The widget's own size, used when it has no children.
    fn intrinsic_size(&self) -> Size {
        self.widget_base().rect().size()
    }

    /// Resolved size: the first child's size, or the intrinsic size.
    fn size(&self) -> Size {
        match self.children().first() {
            Some(child) => child.size(),
            None => self.intrinsic_size(),
        }
    }

    fn width(&self) -> f32 {
        self.size().width
    }

    fn height(&self) -> f32 {
        self.size().height
    }

    /// Whether the widget can receive focus.
    fn is_group(&self) -> bool {
        !self.children().is_empty()
    }

    // =========================================================================
    // Position
    // =========================================================================

    fn center(&self) -> Point {
        self.widget_base().rect().center()
    }

    fn x(&self) -> f32 {
        self.center().x
    }

    fn y(&self) -> f32 {
        self.center().y
    }

    /// Move the center; fires [`update_position`](Self::update_position) once mounted.
    fn set_center(&mut self, center: Point) {
        let center = Point::new(center.x, center.y);
        if self.widget_base_mut().rect_mut().set_center(center) {
            self.update_position(center);
        }
    }

    fn set_x(&mut self, x: f32) {
        let y = self.y();
        self.set_center(Point::new(x, y));
    }

    fn set_y(&mut self, y: f32) {
        let x = self.x();
        self.set_center(Point::new(x, y));
    }

    /// Mark the widget as created, running any position update deferred
    /// until now.
    fn mount(&mut self) {
        if let Some(center) = self.widget_base_mut().rect_mut().mount() {
            self.update_position(center);
        }
    }

    fn is_mounted(&self) -> bool {
        self.widget_base().rect().is_mounted()
    }

    // =========================================================================
    // Edges
    // =========================================================================

    fn bounds(&self) -> Bounds {
        self.widget_base().rect().bounds(self.size())
    }

    fn left(&self) -> f32 {
        self.bounds().left
    }

    fn right(&self) -> f32 {
        self.bounds().right
    }

    fn top(&self) -> f32 {
        self.bounds().top
    }

    fn bottom(&self) -> f32 {
        self.bounds().bottom
    }

    fn set_left(&mut self, left: f32) {
        let width = self.width();
        self.set_x(left + width / 2.0);
    }

    fn set_right(&mut self, right: f32) {
        let width = self.width();
        self.set_x(right - width / 2.0);
    }

    fn set_top(&mut self, top: f32) {
        let height = self.height();
        self.set_y(top - height / 2.0);
    }

    fn set_bottom(&mut self, bottom: f32) {
        let height = self.height();
        self.set_y(bottom + height / 2.0);
    }

    // =========================================================================
    // Hit Testing
    // =========================================================================

    /// Strict containment: a point on an edge does not collide.
    fn check_collision(&self, point: &Point) -> bool {
        self.bounds().contains(point)
    }

    /// Whether the two widgets' boxes overlap or touch.
    fn is_colliding(&self, other: &dyn Widget) -> bool {
        are_rects_intersecting(&self.bounds(), &other.bounds())
    }

    /// If the center is within `distance` of `point`, return `point`,
    /// moving the widget onto it when `move_to` is set.
    fn snap_to_point(&mut self, point: Point, distance: f32, move_to: bool) -> Option<Point> {
        if self.center().get_distance(&point) > distance {
            return None;
        }
        if move_to {
            self.set_center(point);
        }
        Some(point)
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Draw components, then the widget itself.
    fn draw_tree(&mut self, renderer: &mut dyn Renderer) {
        for child in self.children_mut() {
            child.draw_tree(renderer);
        }
        self.draw(renderer);
    }

    /// Outline the widget's box. The outline is built on the first call and
    /// only recentered afterwards.
    fn draw_bbox(&mut self, renderer: &mut dyn Renderer, thickness: f32, padding: f32) {
        let size = self.size();
        let outline = *self
            .widget_base_mut()
            .rect_mut()
            .bbox(size, thickness, padding, BBOX_COLOR);
        renderer.stroke_rect(&outline);
    }
}

/// A drawable the application owns alongside its widgets, such as a
/// background or an fps readout.
pub trait Drawable {
    fn draw(&mut self, renderer: &mut dyn Renderer);
}

/// Downcast a widget to its concrete type.
pub fn downcast_ref<W: Widget>(widget: &dyn Widget) -> Option<&W> {
    let any: &dyn Any = widget;
    any.downcast_ref::<W>()
}

/// Downcast a widget to its concrete type, mutably.
pub fn downcast_mut<W: Widget>(widget: &mut dyn Widget) -> Option<&mut W> {
    let any: &mut dyn Any = widget;
    any.downcast_mut::<W>()
}
