//! Trellis - a batched, focus-aware 2D widget toolkit.
//!
//! This is the umbrella crate. It provides the [`Widget`] abstraction and
//! the concrete widgets, the [`Application`] container that broadcasts
//! input and manages focus, configuration, and text utilities, and it
//! re-exports the core and render crates.
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::render::RecordingRenderer;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = Application::new(ApplicationConfig::new("Demo"), RecordingRenderer::new())?;
//!     let title = app.add(Label::new("<b>Settings</b>", 480.0, 500.0)?)?;
//!
//!     app.dispatch(InputEvent::update(1.0 / 60.0));
//!     let stats = app.draw();
//!
//!     assert_eq!(app.focus(), None);
//!     assert_eq!(app.widget::<Label>(title).map(Label::plain_text).as_deref(), Some("Settings"));
//!     assert_eq!(stats.draw_calls, 1);
//!     Ok(())
//! }
//! ```

pub use trellis_core::*;

/// Geometry, collision, text, and drawing primitives.
pub mod render {
    pub use trellis_render::*;
}

mod application;
pub mod config;
mod error;
pub mod prelude;
pub mod text;
pub mod widget;

pub use application::Application;
pub use config::{ApplicationConfig, GcMode, WindowStyle};
pub use error::{ConfigError, WidgetError, WidgetResult};
pub use trellis_render::{Color, Font, Point, Size};
pub use widget::{
    Button, CallbackMode, Drawable, Entry, FocusReason, Image, InputEvent, Key, KeyboardModifiers,
    Label, MouseButton, Slider, TextMotion, Toggle, Widget, WidgetBase, WidgetEvent,
};
