//! Push button.

use crate::{
    context::Context,
    event::{Event, Key, Kind},
    geom::Expanse,
    layout::Avail,
    style::{StyleClass, Style},
    surface::Surface,
    widget::{Outcome, Widget},
};

/// The callback type fired by buttons and menu items.
pub type Callback = Box<dyn FnMut(&mut Context)>;

/// A push button with a label, an optional icon, and a click callback.
pub struct Button {
    text: String,
    icon: Option<String>,
    on_click: Option<Callback>,
    pressed: bool,
}

impl Button {
    /// Construct a button with a label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
            on_click: None,
            pressed: false,
        }
    }

    /// Build a button with a named icon sprite on its right.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Build a button with a click callback.
    pub fn on_click(mut self, cb: impl FnMut(&mut Context) + 'static) -> Self {
        self.on_click = Some(Box::new(cb));
        self
    }

    /// The button label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the button label.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    fn fire(&mut self, ctx: &mut Context) {
        if let Some(mut cb) = self.on_click.take() {
            cb(ctx);
            if self.on_click.is_none() {
                self.on_click = Some(cb);
            }
        }
    }
}

impl Widget for Button {
    fn style_class(&self) -> StyleClass {
        StyleClass::Button
    }

    fn layout(&mut self, ctx: &mut Context, _avail: Avail) -> Expanse {
        let style = ctx.style();
        let text = ctx.sheet().text_size(&self.text);
        let mut w = text.w;
        if self.icon.is_some() {
            w += text.h + style.margin;
        }
        let content = Expanse::new(w, text.h).union(style.min_size);
        Expanse::new(content.w + style.margin * 2, content.h + style.margin * 2)
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        let mut style = ctx.style();
        let mut r = ctx.abs_rect();
        if self.pressed {
            let active = ctx.class_style(StyleClass::Active);
            style = Style {
                bg: active.bg,
                ..style
            };
            r = r.shift((style.margin / 2) as i32, (style.margin / 2) as i32);
        }
        surface.fill_rect(r, style.bg);
        if style.line > 0 {
            surface.frame(r, style.line, style.border);
        }
        let m = style.margin as i32;
        surface.text(r.tl.shift(m, m), &self.text, style.fg);
        if let Some(icon) = self.icon.clone() {
            let side = r.h.saturating_sub(style.margin * 2);
            let dst = r.zone(r.w as i32 - m - side as i32, m, side, side);
            ctx.sprite(surface, &icon, dst);
        }
    }

    fn handle(&mut self, ctx: &mut Context, event: &Event) -> Outcome {
        match &event.kind {
            Kind::MouseDown { .. } | Kind::TouchDown { .. } => {
                self.pressed = true;
                self.fire(ctx);
                Outcome::Consume
            }
            Kind::MouseUp { .. } | Kind::TouchUp { .. } => {
                self.pressed = false;
                Outcome::Consume
            }
            Kind::KeyDown { key: Key::Space } => {
                self.pressed = true;
                self.fire(ctx);
                Outcome::Consume
            }
            Kind::KeyUp { key: Key::Space } => {
                self.pressed = false;
                Outcome::Consume
            }
            Kind::Away { .. } => {
                self.pressed = false;
                Outcome::Ignore
            }
            _ => Outcome::Ignore,
        }
    }
}
