//! The drawing surface consumed by draw traversal.
//!
//! pergola never rasterizes anything itself: the host supplies a [`Surface`]
//! and the core issues fills, frames, sprites and text runs against it.

use tracing::warn;

use crate::{
    geom::{Expanse, Point, Rect},
    style::{Color, StyleClass, StyleSheet},
};

/// A drawing surface provided by the host.
pub trait Surface {
    /// Fill a rectangle with a color.
    fn fill_rect(&mut self, r: Rect, color: Color);

    /// Draw a named sprite scaled into the destination rect. Returns false
    /// if the sprite name is unknown; the caller draws a visible fallback.
    fn sprite(&mut self, name: &str, dst: Rect) -> bool;

    /// Draw a text run at a position.
    fn text(&mut self, pos: Point, text: &str, color: Color);

    /// Measure a text run.
    fn measure_text(&self, text: &str) -> Expanse;

    /// Stroke a rectangular frame of the given line width. The default
    /// implementation draws four fills.
    fn frame(&mut self, r: Rect, line: u32, color: Color) {
        let line = line.min(r.w).min(r.h);
        if line == 0 {
            return;
        }
        let (x, y, w, h) = (r.tl.x, r.tl.y, r.w, r.h);
        self.fill_rect(Rect::new(x, y, w, line), color);
        self.fill_rect(Rect::new(x, y + (h - line) as i32, w, line), color);
        self.fill_rect(Rect::new(x, y, line, h), color);
        self.fill_rect(Rect::new(x + (w - line) as i32, y, line, h), color);
    }
}

/// Draw a sprite, or a loud error frame in its place when the surface does
/// not know the name. Missing art must stay visible, never abort.
pub fn sprite_or_fallback(surface: &mut dyn Surface, sheet: &StyleSheet, name: &str, dst: Rect) {
    if !surface.sprite(name, dst) {
        warn!(sprite = name, "unknown sprite, drawing fallback");
        let style = sheet.get(StyleClass::Error);
        surface.fill_rect(dst, style.bg);
        surface.frame(dst, style.line.max(1), style.border);
    }
}
