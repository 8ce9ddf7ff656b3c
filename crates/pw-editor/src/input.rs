//! Input abstraction layer.
//!
//! Normalizes host pointer events into a unified `InputEvent` enum consumed
//! by [`crate::engine::ConnectionEngine::handle_event`]. Coordinates are in
//! the shared space both tree columns are laid out in.

/// Which pointer button produced a press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    /// Left button, touch, or pen contact. Drives the connect gesture.
    #[default]
    Primary,
    /// Right button. Opens context menus, never touches the gesture.
    Secondary,
    Middle,
}

/// Keyboard modifiers held during a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn toggles_selection(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event from any pointing device.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Pointer pressed.
    PointerDown {
        x: f32,
        y: f32,
        button: MouseButton,
        modifiers: Modifiers,
        /// Host clock in milliseconds; drives the delayed highlight.
        time_ms: f64,
    },

    /// Pointer moved, with or without a button held.
    PointerMove { x: f32, y: f32 },

    /// Pointer released.
    PointerUp { x: f32, y: f32, button: MouseButton },

    /// Wheel scroll over one of the trees.
    Scroll { x: f32, y: f32, dy: f32 },
}

impl InputEvent {
    pub fn from_pointer_down(x: f32, y: f32, time_ms: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button: MouseButton::Primary,
            modifiers: Modifiers::NONE,
            time_ms,
        }
    }

    pub fn from_pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            x,
            y,
            button: MouseButton::Primary,
        }
    }

    /// Extract the pointer position.
    pub fn position(&self) -> (f32, f32) {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y, .. }
            | Self::Scroll { x, y, .. } => (*x, *y),
        }
    }
}
