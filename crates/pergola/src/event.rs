//! The abstract event model routed through the widget tree.
//!
//! The host's raw input is converted into one ordered batch of these events
//! per tick (see [`crate::input`]). Every event carries the control it
//! originated from (for synthesized input, the root window) plus the
//! keyboard modifier state at the time it fired.

use std::time::Duration;

use crate::{geom::Point, tree::WidgetId};

/// Keyboard modifier flags attached to every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mods {
    /// Alt/Option held.
    pub alt: bool,
    /// Control held.
    pub ctrl: bool,
    /// Shift held.
    pub shift: bool,
    /// Meta/Command held.
    pub meta: bool,
}

/// An abstract key identity, already translated from the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Key {
    /// Tab key, drives container focus cycling.
    Tab,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Space bar.
    Space,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// A printable key, identified by its unmodified character.
    Char(char),
    /// Function key Fn.
    F(u8),
    /// Any key the host has no closer name for.
    Other(u32),
}

/// Mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle button / wheel press.
    Middle,
    /// Additional buttons by index.
    Other(u8),
}

/// An opaque touch identity, stable for the duration of the touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TouchId(pub u64);

/// An opaque gamepad identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PadId(pub u32);

/// A gamepad button index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PadButton(pub u16);

/// The event payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// Regular per-tick pulse for animated widgets and media playback.
    Update {
        /// Time covered by this tick.
        dt: Duration,
    },
    /// Pointer motion. `pos` is absolute, `delta` the motion since the last
    /// tick.
    MouseMove {
        /// Absolute pointer position.
        pos: Point,
        /// Motion since the previous sample.
        delta: Point,
    },
    /// Mouse button press.
    MouseDown {
        /// Absolute pointer position.
        pos: Point,
        /// Button pressed.
        button: MouseButton,
    },
    /// Mouse button release.
    MouseUp {
        /// Absolute pointer position.
        pos: Point,
        /// Button released.
        button: MouseButton,
        /// How long the button was held.
        held: Duration,
    },
    /// Scroll wheel motion at the pointer position.
    Wheel {
        /// Absolute pointer position.
        pos: Point,
        /// Horizontal scroll amount.
        dx: f32,
        /// Vertical scroll amount.
        dy: f32,
    },
    /// Key press.
    KeyDown {
        /// Key pressed.
        key: Key,
    },
    /// Key release.
    KeyUp {
        /// Key released.
        key: Key,
    },
    /// Committed text input, already composed by the platform or IME.
    Chars {
        /// The committed runes.
        text: String,
    },
    /// Touch press.
    TouchDown {
        /// Touch identity.
        id: TouchId,
        /// Absolute touch position.
        pos: Point,
    },
    /// Touch release.
    TouchUp {
        /// Touch identity.
        id: TouchId,
        /// Absolute touch position.
        pos: Point,
        /// How long the touch was held.
        held: Duration,
    },
    /// A gamepad appeared.
    PadConnect {
        /// Gamepad identity.
        pad: PadId,
    },
    /// A gamepad went away.
    PadDisconnect {
        /// Gamepad identity.
        pad: PadId,
    },
    /// Gamepad button press.
    PadDown {
        /// Gamepad identity.
        pad: PadId,
        /// Button pressed.
        button: PadButton,
    },
    /// Gamepad button release.
    PadUp {
        /// Gamepad identity.
        pad: PadId,
        /// Button released.
        button: PadButton,
        /// How long the button was held.
        held: Duration,
    },
    /// Gamepad axis motion.
    PadAxis {
        /// Gamepad identity.
        pad: PadId,
        /// Axis index.
        axis: u8,
        /// New axis value in [-1, 1].
        value: f64,
    },
    /// Notification that focus is moving away from the receiver. `to` is the
    /// control gaining focus, if any.
    Away {
        /// The control that is gaining focus instead, if known.
        to: Option<WidgetId>,
    },
    /// Notification that the receiver has gained focus.
    Focus {
        /// The control that previously held focus, if any.
        from: Option<WidgetId>,
    },
}

/// One routed event: an origin control, modifier flags, and the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The control the event originated from.
    pub origin: WidgetId,
    /// Modifier state when the event fired.
    pub mods: Mods,
    /// The payload.
    pub kind: Kind,
}

impl Event {
    /// Construct an event with no modifiers.
    pub fn new(origin: WidgetId, kind: Kind) -> Self {
        Self {
            origin,
            mods: Mods::default(),
            kind,
        }
    }

    /// The absolute position of a positional event.
    pub fn at(&self) -> Option<Point> {
        match self.kind {
            Kind::MouseMove { pos, .. }
            | Kind::MouseDown { pos, .. }
            | Kind::MouseUp { pos, .. }
            | Kind::Wheel { pos, .. }
            | Kind::TouchDown { pos, .. }
            | Kind::TouchUp { pos, .. } => Some(pos),
            _ => None,
        }
    }

    /// True for events that can take focus: mouse, touch and gamepad
    /// presses.
    pub fn is_press(&self) -> bool {
        matches!(
            self.kind,
            Kind::MouseDown { .. } | Kind::TouchDown { .. } | Kind::PadDown { .. }
        )
    }
}
