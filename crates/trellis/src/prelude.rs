//! Prelude module for Trellis.
//!
//! ```
//! use trellis::prelude::*;
//! ```
//!
//! This provides access to:
//! - The container (`Application`, `ApplicationConfig`)
//! - Signals (`Signal`, `ConnectionId`)
//! - The widget foundation (`Widget`, `WidgetBase`, `DispatchContext`)
//! - The concrete widgets
//! - Geometry types (`Point`, `Size`, `Color`, `Bounds`)

// ============================================================================
// Application
// ============================================================================

pub use crate::{Application, ApplicationConfig, WidgetError, WidgetResult};

// ============================================================================
// Signals
// ============================================================================

pub use trellis_core::{ConnectionId, Signal, WidgetId};

// ============================================================================
// Widget Foundation
// ============================================================================

pub use crate::widget::{DispatchContext, Drawable, Request, Widget, WidgetBase};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::widgets::{
    Button, CallbackMode, Entry, HorizontalAnchor, Image, Label, LabelColors, SlideSide, Slider,
    Toggle, VerticalAnchor,
};

// ============================================================================
// Geometry and Graphics Types
// ============================================================================

pub use trellis_render::{Bounds, Color, Font, Point, Renderer, Size};

// ============================================================================
// Event Types
// ============================================================================

pub use crate::widget::{
    FocusReason, InputEvent, Key, KeyboardModifiers, MouseButton, TextMotion, WidgetEvent,
};
