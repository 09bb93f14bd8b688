//! An input-driving harness around the engine.

use std::time::Duration;

use super::surface::TestSurface;
use crate::{
    engine::Pergola,
    event::{Key, MouseButton},
    geom::{Expanse, Point},
    input::InputSample,
    style::StyleSheet,
    tree::{Tree, WidgetId},
};

/// The harness tick period.
pub const TICK: Duration = Duration::from_millis(16);

/// Drives an engine with synthesized input samples and records its drawing
/// on a [`TestSurface`].
pub struct Harness {
    /// The engine under test.
    pub pergola: Pergola,
    /// The recording surface.
    pub surface: TestSurface,
    sample: InputSample,
}

impl Harness {
    /// Build a harness over a tree and root, with the default sheet and the
    /// given surface size, laid out and ready to inspect.
    pub fn new(tree: Tree, root: WidgetId, width: u32, height: u32) -> Self {
        let mut pergola = Pergola::new(tree, root, StyleSheet::default());
        pergola.set_root_size(Expanse::new(width, height));
        pergola.relayout_if_dirty();
        Self {
            pergola,
            surface: TestSurface::new(),
            sample: InputSample::default(),
        }
    }

    /// Run one tick with the current sample.
    pub fn tick(&mut self) {
        let sample = self.sample.clone();
        self.pergola.tick(&sample, TICK);
    }

    /// Move the pointer, dispatching the motion.
    pub fn mouse_to(&mut self, x: i32, y: i32) {
        self.sample.mouse = Point::new(x, y);
        self.tick();
    }

    /// Press the left button at the current pointer position.
    pub fn press(&mut self) {
        self.sample.buttons = vec![MouseButton::Left];
        self.tick();
    }

    /// Release the left button.
    pub fn release(&mut self) {
        self.sample.buttons = Vec::new();
        self.tick();
    }

    /// Click the left button at a position: move, press, release.
    pub fn click(&mut self, x: i32, y: i32) {
        self.mouse_to(x, y);
        self.press();
        self.release();
    }

    /// Drag with the left button from one position to another.
    pub fn drag(&mut self, from: (i32, i32), to: (i32, i32)) {
        self.mouse_to(from.0, from.1);
        self.press();
        self.mouse_to(to.0, to.1);
        self.release();
    }

    /// Press and release a key.
    pub fn key(&mut self, key: Key) {
        self.sample.keys = vec![key];
        self.tick();
        self.sample.keys = Vec::new();
        self.tick();
    }

    /// Cycle focus with Tab.
    pub fn tab(&mut self) {
        self.key(Key::Tab);
    }

    /// Draw a frame into a fresh recording.
    pub fn render(&mut self) {
        self.surface.clear();
        self.pergola.draw(&mut self.surface);
    }

    /// Debug dump of the tree.
    pub fn dump(&self) -> String {
        self.pergola.dump()
    }
}
