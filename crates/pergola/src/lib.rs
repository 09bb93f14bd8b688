//! pergola: retained-mode widget composition over a single surface.
//!
//! The core is a small "window manager": recursive size negotiation between
//! parents and children, z-ordered compositing of floating elements, a
//! focus-chain event routing protocol with explicit focus-loss
//! notification, and virtual sub-window (pane) management with a layered
//! dialog stack. Everything runs synchronously, one logical tick per frame.
//!
//! The main entry points are:
//! - [`Pergola`] - the engine owning the tick loop
//! - [`Tree`] - the widget arena
//! - [`Widget`] - the trait implemented by all widgets
//!
//! Rendering, raw input translation, fonts and resource loading live in the
//! host, behind the [`surface::Surface`], [`input::InputSample`] and
//! [`style::StyleSheet`] boundaries.

#![warn(missing_docs)]

pub mod ability;
pub mod clipboard;
mod context;
pub mod engine;
pub mod error;
pub mod event;
pub mod geom;
pub mod inbox;
pub mod input;
pub mod layout;
pub mod state;
pub mod style;
pub mod surface;
pub mod tree;
pub mod widget;
pub mod widgets;

#[cfg(any(test, feature = "testing"))]
pub mod tutils;

pub use ability::Ability;
pub use context::Context;
pub use engine::Pergola;
pub use error::{Error, Result};
pub use event::{Event, Kind, Mods};
pub use geom::{Expanse, Point, Rect};
pub use inbox::Inbox;
pub use input::InputSample;
pub use layout::{Align, Avail, UNLIMITED};
pub use state::WidgetName;
pub use style::{Style, StyleClass, StyleSheet};
pub use surface::Surface;
pub use tree::{LAYER_OFFSET, Tree, WidgetId};
pub use widget::{Outcome, Widget};
