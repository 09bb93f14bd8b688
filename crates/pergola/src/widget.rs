//! The `Widget` trait and event outcome type.

use std::any::Any;

use crate::{
    context::Context,
    event::Event,
    geom::Expanse,
    layout::Avail,
    state::WidgetName,
    style::StyleClass,
    surface::Surface,
};

/// The result of offering an event to a widget. There is no cancellation: an
/// event is either consumed, which stops dispatch, or ignored, which lets it
/// fall through to the next layer. It is never rolled back.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    /// The event was used; dispatch stops here.
    Consume,
    /// The event was not used and falls through.
    Ignore,
}

impl Outcome {
    /// True if the event was consumed.
    pub fn is_consumed(self) -> bool {
        self == Self::Consume
    }
}

/// Behavior attached to a node in the widget tree.
///
/// Shared state (position, size, visibility, enablement, z-layer, parent
/// link and the focus slot) lives in the tree node; a widget reaches it
/// through the [`Context`] passed to every call. A widget is reached through
/// exactly one of these calls at a time; the engine guarantees the tree is
/// consistent whenever a widget runs.
pub trait Widget: Any {
    /// The style class this widget resolves against.
    fn style_class(&self) -> StyleClass {
        StyleClass::Base
    }

    /// Lay the widget out within the available space and return its desired
    /// size.
    ///
    /// The widget must lay out and position its children here, but must not
    /// change its own position: that belongs to the parent. The returned
    /// size is recorded as the widget's natural size and clipped to `avail`
    /// by the engine, so a widget can never end up larger than the space it
    /// was offered. Passing zero bounds is a contract violation and aborts.
    fn layout(&mut self, ctx: &mut Context, avail: Avail) -> Expanse {
        let _ = avail;
        ctx.style().min_size
    }

    /// Draw the widget and its children at their current location.
    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        ctx.fill_frame(surface);
        ctx.draw_children(surface);
    }

    /// Offer an event to the widget. Containers route to their children from
    /// here via [`Context::route_children`].
    ///
    /// Only events the widget is meant to see arrive here; the parent (or
    /// the dispatcher above it) filters the rest.
    fn handle(&mut self, ctx: &mut Context, event: &Event) -> Outcome {
        let _ = (ctx, event);
        Outcome::Ignore
    }

    /// Name used in tracing and debug output.
    fn name(&self) -> WidgetName {
        WidgetName::of::<Self>()
    }
}

impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
