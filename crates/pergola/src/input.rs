//! Raw input conversion.
//!
//! The host polls its platform once per tick and hands the dispatcher an
//! [`InputSample`]: the currently held keys and buttons, pointer and touch
//! positions, committed characters and gamepad state. [`InputState`] diffs
//! consecutive samples into the per-tick event batch, in a fixed order:
//! update first, then keyboard (downs, ups, chars), then mouse (move, downs,
//! ups, wheel), then touch, then gamepad.

use std::{collections::HashMap, time::Duration};

use crate::{
    event::{Event, Key, Kind, Mods, MouseButton, PadButton, PadId, TouchId},
    geom::Point,
    tree::WidgetId,
};

/// One gamepad's state within a sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadSample {
    /// Gamepad identity.
    pub id: PadId,
    /// Buttons currently held.
    pub buttons: Vec<PadButton>,
    /// Axis values in [-1, 1].
    pub axes: Vec<f64>,
}

/// The host's raw input snapshot for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSample {
    /// Absolute pointer position.
    pub mouse: Point,
    /// Mouse buttons currently held.
    pub buttons: Vec<MouseButton>,
    /// Keys currently held.
    pub keys: Vec<Key>,
    /// Characters committed this tick.
    pub chars: String,
    /// Wheel motion this tick.
    pub wheel: (f32, f32),
    /// Active touches and their positions.
    pub touches: Vec<(TouchId, Point)>,
    /// Connected gamepads.
    pub pads: Vec<PadSample>,
    /// Modifier state.
    pub mods: Mods,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Held {
    Key(Key),
    Mouse(MouseButton),
    Touch(TouchId),
    Pad(PadId, PadButton),
}

/// Diffs consecutive input samples into event batches.
#[derive(Default)]
pub struct InputState {
    prev: InputSample,
    held: HashMap<Held, Duration>,
}

impl InputState {
    /// Construct an input state with an empty previous sample.
    pub fn new() -> Self {
        Self::default()
    }

    fn held_for(&mut self, key: Held) -> Duration {
        self.held.remove(&key).unwrap_or_default()
    }

    /// Convert a sample into the ordered event batch for one tick.
    pub fn batch(&mut self, origin: WidgetId, sample: &InputSample, dt: Duration) -> Vec<Event> {
        let mods = sample.mods;
        let ev = |kind| Event { origin, mods, kind };
        let mut out = Vec::new();

        // Accumulate hold time for everything still down.
        for d in self.held.values_mut() {
            *d += dt;
        }

        out.push(ev(Kind::Update { dt }));

        // Keyboard: downs, ups, committed characters.
        for key in &sample.keys {
            if !self.prev.keys.contains(key) {
                self.held.insert(Held::Key(*key), Duration::ZERO);
                out.push(ev(Kind::KeyDown { key: *key }));
            }
        }
        for key in &self.prev.keys.clone() {
            if !sample.keys.contains(key) {
                let _ = self.held_for(Held::Key(*key));
                out.push(ev(Kind::KeyUp { key: *key }));
            }
        }
        if !sample.chars.is_empty() {
            out.push(ev(Kind::Chars {
                text: sample.chars.clone(),
            }));
        }

        // Mouse: move, downs, ups, wheel.
        let pos = sample.mouse;
        if pos != self.prev.mouse {
            out.push(ev(Kind::MouseMove {
                pos,
                delta: pos - self.prev.mouse,
            }));
        }
        for b in &sample.buttons {
            if !self.prev.buttons.contains(b) {
                self.held.insert(Held::Mouse(*b), Duration::ZERO);
                out.push(ev(Kind::MouseDown { pos, button: *b }));
            }
        }
        for b in &self.prev.buttons.clone() {
            if !sample.buttons.contains(b) {
                let held = self.held_for(Held::Mouse(*b));
                out.push(ev(Kind::MouseUp {
                    pos,
                    button: *b,
                    held,
                }));
            }
        }
        let (wx, wy) = sample.wheel;
        if wx != 0.0 || wy != 0.0 {
            out.push(ev(Kind::Wheel {
                pos,
                dx: wx,
                dy: wy,
            }));
        }

        // Touch: downs, ups.
        for (id, tpos) in &sample.touches {
            if !self.prev.touches.iter().any(|(p, _)| p == id) {
                self.held.insert(Held::Touch(*id), Duration::ZERO);
                out.push(ev(Kind::TouchDown {
                    id: *id,
                    pos: *tpos,
                }));
            }
        }
        for (id, tpos) in &self.prev.touches.clone() {
            if !sample.touches.iter().any(|(p, _)| p == id) {
                let held = self.held_for(Held::Touch(*id));
                out.push(ev(Kind::TouchUp {
                    id: *id,
                    pos: *tpos,
                    held,
                }));
            }
        }

        // Gamepads: disconnects, connects, downs, ups, axis motion.
        for pad in &self.prev.pads.clone() {
            if !sample.pads.iter().any(|p| p.id == pad.id) {
                out.push(ev(Kind::PadDisconnect { pad: pad.id }));
            }
        }
        for pad in &sample.pads {
            let prev = self.prev.pads.iter().find(|p| p.id == pad.id).cloned();
            if prev.is_none() {
                out.push(ev(Kind::PadConnect { pad: pad.id }));
            }
            let prev = prev.unwrap_or_default();
            for b in &pad.buttons {
                if !prev.buttons.contains(b) {
                    self.held.insert(Held::Pad(pad.id, *b), Duration::ZERO);
                    out.push(ev(Kind::PadDown {
                        pad: pad.id,
                        button: *b,
                    }));
                }
            }
            for b in &prev.buttons {
                if !pad.buttons.contains(b) {
                    let held = self.held_for(Held::Pad(pad.id, *b));
                    out.push(ev(Kind::PadUp {
                        pad: pad.id,
                        button: *b,
                        held,
                    }));
                }
            }
            for (axis, value) in pad.axes.iter().enumerate() {
                if prev.axes.get(axis).copied().unwrap_or(0.0) != *value {
                    out.push(ev(Kind::PadAxis {
                        pad: pad.id,
                        axis: axis as u8,
                        value: *value,
                    }));
                }
            }
        }

        self.prev = sample.clone();
        out
    }
}
