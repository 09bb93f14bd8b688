//! The style provider consumed during layout and draw.
//!
//! A [`StyleSheet`] is built once by the host and is read-only afterwards;
//! the engine threads it through every layout and draw call. Widgets resolve
//! their effective [`Style`] by class, unless the node carries an explicit
//! override.

use crate::geom::Expanse;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Construct an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// The resolved style for one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Inner spacing applied on all four sides.
    pub margin: u32,
    /// Minimum size a widget grows to before clipping.
    pub min_size: Expanse,
    /// Foreground (text) color.
    pub fg: Color,
    /// Fill color.
    pub bg: Color,
    /// Border color.
    pub border: Color,
    /// Border line width. Zero draws no border.
    pub line: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            margin: 4,
            min_size: Expanse::new(0, 0),
            fg: Color::rgb(0xee, 0xee, 0xee),
            bg: Color::rgb(0x28, 0x2c, 0x34),
            border: Color::rgb(0x3a, 0x3f, 0x4b),
            line: 1,
        }
    }
}

/// The style class a widget resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StyleClass {
    /// Fallback class for anything without a more specific entry.
    Base,
    /// Push buttons.
    Button,
    /// Text labels.
    Label,
    /// Panes and their headers.
    Pane,
    /// Grid containers.
    Grid,
    /// Menu bars and open menus.
    Menu,
    /// The focus ring drawn around a tab-focused child.
    Focus,
    /// Pressed / active state accents.
    Active,
    /// Minimized / disabled chrome.
    Disable,
    /// The visible stand-in for missing resources.
    Error,
}

/// Immutable-after-init style provider.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    /// Advance and line height of one text cell, supplied by the host's font
    /// metrics. Layout uses these; rasterization happens on the surface.
    pub cell: Expanse,
    base: Style,
    button: Style,
    label: Style,
    pane: Style,
    grid: Style,
    menu: Style,
    focus: Style,
    active: Style,
    disable: Style,
    error: Style,
}

impl StyleSheet {
    /// Measure a text run with the sheet's font metrics. Newlines wrap to
    /// further lines.
    pub fn text_size(&self, text: &str) -> Expanse {
        let mut widest = 0;
        let mut lines = 0;
        for line in text.lines() {
            lines += 1;
            widest = widest.max(line.chars().count() as u32);
        }
        Expanse::new(widest * self.cell.w, lines.max(1) * self.cell.h)
    }

    /// Resolve the style for a class.
    pub fn get(&self, class: StyleClass) -> Style {
        match class {
            StyleClass::Button => self.button,
            StyleClass::Label => self.label,
            StyleClass::Pane => self.pane,
            StyleClass::Grid => self.grid,
            StyleClass::Menu => self.menu,
            StyleClass::Focus => self.focus,
            StyleClass::Active => self.active,
            StyleClass::Disable => self.disable,
            StyleClass::Error => self.error,
            _ => self.base,
        }
    }

    /// Replace the style for a class. Only meaningful before the sheet is
    /// handed to the engine.
    pub fn set(&mut self, class: StyleClass, style: Style) {
        match class {
            StyleClass::Button => self.button = style,
            StyleClass::Label => self.label = style,
            StyleClass::Pane => self.pane = style,
            StyleClass::Grid => self.grid = style,
            StyleClass::Menu => self.menu = style,
            StyleClass::Focus => self.focus = style,
            StyleClass::Active => self.active = style,
            StyleClass::Disable => self.disable = style,
            StyleClass::Error => self.error = style,
            _ => self.base = style,
        }
    }
}

impl Default for StyleSheet {
    /// The built-in dark sheet.
    fn default() -> Self {
        let base = Style::default();
        Self {
            cell: Expanse::new(8, 16),
            base,
            button: Style {
                min_size: Expanse::new(64, 24),
                bg: Color::rgb(0x3a, 0x3f, 0x4b),
                ..base
            },
            label: Style {
                margin: 2,
                line: 0,
                ..base
            },
            pane: Style {
                min_size: Expanse::new(160, 120),
                bg: Color::rgb(0x21, 0x25, 0x2b),
                ..base
            },
            grid: Style { margin: 2, ..base },
            menu: Style {
                margin: 2,
                bg: Color::rgb(0x30, 0x34, 0x3c),
                ..base
            },
            focus: Style {
                border: Color::rgb(0x61, 0xaf, 0xef),
                ..base
            },
            active: Style {
                bg: Color::rgb(0x4b, 0x52, 0x63),
                ..base
            },
            disable: Style {
                fg: Color::rgb(0x7f, 0x84, 0x8e),
                bg: Color::rgb(0x2c, 0x31, 0x39),
                ..base
            },
            error: Style {
                bg: Color::rgb(0xbe, 0x50, 0x46),
                border: Color::rgb(0xff, 0x00, 0xff),
                ..base
            },
        }
    }
}
