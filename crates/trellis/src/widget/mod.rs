//! Widget system for Trellis.
//!
//! This module provides the widget architecture:
//!
//! - [`Widget`] trait: the base trait for everything placed in an
//!   [`Application`](crate::Application)
//! - [`WidgetBase`]: the interaction flags and [`Rect`] every widget embeds
//! - [`dispatch_input`]: the shared state machine turning [`InputEvent`]s
//!   into [`WidgetEvent`]s
//! - [`widgets`]: the concrete widgets
//!
//! # Creating a Widget
//!
//! 1. Define a struct with a `WidgetBase` field
//! 2. Implement the `Widget` trait
//! 3. Return components from `children()` if the widget should be focusable
//!
//! ```
//! use trellis::widget::{DispatchContext, Widget, WidgetBase, WidgetEvent};
//! use trellis::WidgetResult;
//!
//! struct Marker {
//!     base: WidgetBase,
//!     presses: u32,
//! }
//!
//! impl Widget for Marker {
//!     fn widget_base(&self) -> &WidgetBase { &self.base }
//!     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
//!
//!     fn event(&mut self, event: &WidgetEvent, _ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
//!         if let WidgetEvent::Press { .. } = event {
//!             self.presses += 1;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let marker = Marker { base: WidgetBase::new(10.0, 10.0).with_size(4.0, 4.0), presses: 0 };
//! assert_eq!(marker.left(), 8.0);
//! assert!(!marker.is_group());
//! ```
//!
//! # Coordinates
//!
//! The origin is the bottom-left corner of the window and y grows upwards,
//! so `top > bottom` for any widget with a positive height.

mod base;
mod context;
mod events;
mod rect;
mod traits;
pub mod widgets;

mod tests;

pub use base::{WidgetBase, dispatch_input};
pub use context::{DispatchContext, Request};
pub use events::{
    FocusReason, InputEvent, Key, KeyboardModifiers, MouseButton, TextMotion, WidgetEvent,
};
pub use rect::Rect;
pub use traits::{BBOX_COLOR, Drawable, Widget, downcast_mut, downcast_ref};
pub use widgets::{
    Button, ButtonTextures, CallbackMode, Entry, EntryTextures, HorizontalAnchor, Image, Label,
    LabelBuilder, LabelColors, LabelOutline, Selection, SlideSide, Slider, Toggle, ToggleTextures,
    VerticalAnchor,
};
