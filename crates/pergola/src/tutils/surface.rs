//! A surface that records draw calls instead of rasterizing.

use std::collections::HashSet;

use crate::{
    geom::{Expanse, Point, Rect},
    style::Color,
    surface::Surface,
};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A filled rectangle.
    Fill(Rect, Color),
    /// A sprite draw.
    Sprite(String, Rect),
    /// A text run.
    Text(Point, String),
}

/// A recording surface for tests. It knows a configurable set of sprite
/// names; anything else triggers the caller's missing-sprite fallback.
pub struct TestSurface {
    /// Recorded draw calls, in order.
    pub ops: Vec<DrawOp>,
    /// Sprite names this surface pretends to have loaded.
    pub sprites: HashSet<String>,
    cell: Expanse,
}

impl Default for TestSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSurface {
    /// A surface that knows the pane chrome sprites.
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            sprites: ["close", "minimize", "maximize"]
                .into_iter()
                .map(String::from)
                .collect(),
            cell: Expanse::new(8, 16),
        }
    }

    /// Register an extra known sprite name.
    pub fn add_sprite(&mut self, name: impl Into<String>) {
        self.sprites.insert(name.into());
    }

    /// Drop all recorded calls.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// All recorded text runs, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(_, t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded sprite names, in draw order.
    pub fn sprites_drawn(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Sprite(n, _) => Some(n.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for TestSurface {
    fn fill_rect(&mut self, r: Rect, color: Color) {
        self.ops.push(DrawOp::Fill(r, color));
    }

    fn sprite(&mut self, name: &str, dst: Rect) -> bool {
        if self.sprites.contains(name) {
            self.ops.push(DrawOp::Sprite(name.to_string(), dst));
            true
        } else {
            false
        }
    }

    fn text(&mut self, pos: Point, text: &str, _color: Color) {
        self.ops.push(DrawOp::Text(pos, text.to_string()));
    }

    fn measure_text(&self, text: &str) -> Expanse {
        let mut widest = 0;
        let mut lines = 0;
        for line in text.lines() {
            lines += 1;
            widest = widest.max(line.chars().count() as u32);
        }
        Expanse::new(widest * self.cell.w, lines.max(1) * self.cell.h)
    }
}
