//! Static text label.

use crate::{
    context::Context,
    geom::Expanse,
    layout::Avail,
    style::StyleClass,
    surface::Surface,
    widget::Widget,
};

/// A single- or multi-line text label.
pub struct Label {
    text: String,
}

impl Label {
    /// Construct a label.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the label text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Widget for Label {
    fn style_class(&self) -> StyleClass {
        StyleClass::Label
    }

    fn layout(&mut self, ctx: &mut Context, _avail: Avail) -> Expanse {
        let style = ctx.style();
        let text = ctx.sheet().text_size(&self.text);
        Expanse::new(text.w + style.margin * 2, text.h + style.margin * 2).union(style.min_size)
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        let style = ctx.style();
        let r = ctx.abs_rect();
        surface.text(r.tl.shift(style.margin as i32, style.margin as i32), &self.text, style.fg);
    }
}
