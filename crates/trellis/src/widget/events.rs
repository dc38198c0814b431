//! Input and widget event types.
//!
//! Two layers of events exist:
//!
//! - [`InputEvent`] is what the windowing collaborator delivers to
//!   [`Application::dispatch`](crate::Application::dispatch). Every attached
//!   widget sees every input event, in attachment order.
//! - [`WidgetEvent`] is what a widget's [`Widget::event`](super::Widget::event)
//!   receives after the shared state machine in [`super::base`] has filtered
//!   the input (hit testing, focus, disabled state).

use trellis_render::Point;

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    #[default]
    Left = 0,
    /// Secondary button (usually right).
    Right = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
}

/// Why a widget gained focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusReason {
    /// Tab or Shift+Tab traversal.
    Keyboard,
    /// A press inside the widget.
    Mouse,
    /// Set from code.
    #[default]
    Program,
}

/// Keyboard key codes.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Numbers (main keyboard)
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Insert,
    Enter, Tab,

    // Whitespace
    Space,

    // Modifiers
    ShiftLeft, ShiftRight,
    ControlLeft, ControlRight,
    AltLeft, AltRight,

    // Control
    Escape,

    // Unknown/unmapped key
    Unknown(u16),
}

impl Key {
    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::ShiftLeft
                | Key::ShiftRight
                | Key::ControlLeft
                | Key::ControlRight
                | Key::AltLeft
                | Key::AltRight
        )
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }
}

/// Caret movement and deletion commands produced by the text input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextMotion {
    Left,
    Right,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
    /// Delete the character before the caret.
    Backspace,
    /// Delete the character after the caret.
    Delete,
}

/// Raw input delivered by the windowing collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyPress {
        key: Key,
        modifiers: KeyboardModifiers,
    },
    KeyRelease {
        key: Key,
        modifiers: KeyboardModifiers,
    },
    MouseMotion {
        position: Point,
        delta: Point,
    },
    MousePress {
        position: Point,
        button: MouseButton,
        modifiers: KeyboardModifiers,
    },
    MouseRelease {
        position: Point,
        button: MouseButton,
        modifiers: KeyboardModifiers,
    },
    MouseDrag {
        position: Point,
        delta: Point,
        button: MouseButton,
        modifiers: KeyboardModifiers,
    },
    MouseScroll {
        position: Point,
        scroll: Point,
    },
    /// Committed text from the input method.
    Text(String),
    TextMotion {
        motion: TextMotion,
        /// Extend the selection instead of moving the caret alone.
        select: bool,
    },
    /// The window lost activation.
    Deactivate,
    /// Per-frame tick.
    Update {
        delta: f32,
    },
}

impl InputEvent {
    pub fn key_press(key: Key) -> Self {
        Self::KeyPress {
            key,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    pub fn key_release(key: Key) -> Self {
        Self::KeyRelease {
            key,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    pub fn motion(x: f32, y: f32) -> Self {
        Self::MouseMotion {
            position: Point::new(x, y),
            delta: Point::ZERO,
        }
    }

    /// Left-button press at `(x, y)`.
    pub fn press(x: f32, y: f32) -> Self {
        Self::MousePress {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    /// Left-button release at `(x, y)`.
    pub fn release(x: f32, y: f32) -> Self {
        Self::MouseRelease {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    /// Left-button drag to `(x, y)`.
    pub fn drag(x: f32, y: f32) -> Self {
        Self::MouseDrag {
            position: Point::new(x, y),
            delta: Point::ZERO,
            button: MouseButton::Left,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    pub fn update(delta: f32) -> Self {
        Self::Update { delta }
    }
}

/// Semantic events delivered to [`Widget::event`](super::Widget::event).
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// A key was pressed while the widget had focus.
    Key {
        key: Key,
        modifiers: KeyboardModifiers,
    },
    /// A key was released while the widget had focus.
    Lift {
        key: Key,
        modifiers: KeyboardModifiers,
    },
    /// The pointer moved inside the widget.
    Hover { position: Point, delta: Point },
    /// A button was pressed inside the widget.
    Press {
        position: Point,
        button: MouseButton,
        modifiers: KeyboardModifiers,
    },
    /// A button was released, anywhere.
    Release {
        position: Point,
        button: MouseButton,
        modifiers: KeyboardModifiers,
    },
    /// A drag that started inside the widget moved.
    Drag {
        position: Point,
        delta: Point,
        button: MouseButton,
        modifiers: KeyboardModifiers,
    },
    /// The wheel scrolled over the widget.
    Scroll { position: Point, scroll: Point },
    /// Text typed while the widget had focus.
    Text(String),
    /// A caret motion while the widget had focus.
    TextMotion { motion: TextMotion, select: bool },
    /// The widget gained focus.
    Focus(FocusReason),
    /// Per-frame tick.
    Update { delta: f32 },
}
