//! Concrete widgets.
//!
//! | Widget | Children | Focusable |
//! |--------|----------|-----------|
//! | [`Image`] | none | no |
//! | [`Label`] | none | no |
//! | [`Button`] | image, label | yes |
//! | [`Slider`] | bar, knob, label | yes |
//! | [`Toggle`] | bar, knob, label | yes |
//! | [`Entry`] | frame | yes |

mod button;
mod entry;
mod image;
mod label;
mod slider;
mod toggle;

pub use button::{Button, ButtonTextures};
pub use entry::{Entry, EntryTextures, Selection};
pub use image::{HorizontalAnchor, Image, VerticalAnchor};
pub use label::{Label, LabelBuilder, LabelColors, LabelOutline};
pub use slider::{SlideSide, Slider};
pub use toggle::{Toggle, ToggleTextures};

use crate::error::{WidgetError, WidgetResult};

/// Pixels the slider knob travels per update tick.
pub const SLIDER_VELOCITY: f32 = 10.0;
/// Pixels the toggle knob travels per update tick.
pub const TOGGLE_VELOCITY: f32 = 2.0;
/// Alpha the toggle bar fades by per update tick.
pub const TOGGLE_FADE: u8 = 17;
/// Seconds between caret blinks.
pub const ENTRY_BLINK_INTERVAL: f32 = 0.5;
/// Knob scale while hovered.
pub const KNOB_HOVER_SCALE: f32 = 1.0;
/// Knob scale otherwise.
pub const KNOB_SCALE: f32 = 0.9;

/// Default texture locations, relative to the working directory.
pub mod assets {
    pub const KNOB: &str = "assets/widgets/knob.png";
    pub const SLIDER_HORIZONTAL: &str = "assets/widgets/slider_horizontal.png";
    pub const TOGGLE_TRUE: &str = "assets/widgets/toggle_true.png";
    pub const TOGGLE_FALSE: &str = "assets/widgets/toggle_false.png";
    pub const TOGGLE_TRUE_HOVER: &str = "assets/widgets/toggle_true_hover.png";
    pub const TOGGLE_FALSE_HOVER: &str = "assets/widgets/toggle_false_hover.png";
    pub const ENTRY_NORMAL: &str = "assets/widgets/entry_normal.png";
    pub const ENTRY_HOVER: &str = "assets/widgets/entry_hover.png";
    pub const ENTRY_FOCUS: &str = "assets/widgets/entry_focus.png";

    /// Path of a button texture for a color set and state, such as
    /// `button("yellow", "hover")`.
    pub fn button(color: &str, state: &str) -> String {
        format!("assets/widgets/{color}_button_{state}.png")
    }
}

/// A user callback run when a widget is activated.
pub type Command = Box<dyn FnMut()>;

/// How often a held activation repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CallbackMode {
    /// Once per press.
    #[default]
    Single = 1,
    /// Every update while focused and a bound key is held.
    Double = 2,
    /// Every update while pressed or a bound key is held.
    Multiple = 3,
}

impl CallbackMode {
    /// Parse a numeric mode for `widget`, rejecting unknown codes.
    pub fn from_code(widget: &'static str, code: u8) -> WidgetResult<Self> {
        match code {
            1 => Ok(Self::Single),
            2 => Ok(Self::Double),
            3 => Ok(Self::Multiple),
            other => Err(WidgetError::configuration(
                widget,
                format!("callback mode {other} is not supported; expected 1, 2, or 3"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_codes() {
        assert_eq!(CallbackMode::from_code("Button", 2).unwrap(), CallbackMode::Double);
        assert!(matches!(
            CallbackMode::from_code("Toggle", 0),
            Err(WidgetError::Configuration { widget: "Toggle", .. })
        ));
    }

    #[test]
    fn test_button_asset_path() {
        assert_eq!(
            assets::button("yellow", "press"),
            "assets/widgets/yellow_button_press.png"
        );
    }
}
