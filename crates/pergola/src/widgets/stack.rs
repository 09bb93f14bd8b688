//! Full-bleed container and layered pane desktop.

use tracing::trace;

use crate::{
    context::Context,
    event::Event,
    geom::Expanse,
    layout::Avail,
    surface::Surface,
    tree::{Tree, WidgetId},
    widget::{Outcome, Widget},
    widgets::pane::{HEADER, Pane},
};

/// Layer bump applied per existing child when a pane is appended, keeping
/// each newcomer strictly above all current siblings without renumbering
/// them.
pub const STACK_RAISE: i64 = 1000;

/// A container whose children all receive the full available size, layered
/// over each other. Unlike other containers a stack never repositions placed
/// children, so panes can move themselves; newly appended panes are placed
/// once, in a diagonal cascade. A window's dialog stack is a `Stack`.
#[derive(Default)]
pub struct Stack;

impl Stack {
    /// Construct an empty stack.
    pub fn new() -> Self {
        Self
    }

    /// Append a child above all current children.
    pub fn append(tree: &mut Tree, stack: WidgetId, child: WidgetId) {
        tree.append(stack, child);
        let n = tree.children(stack).len() as i64;
        tree.raise(child, STACK_RAISE * n);
        tree.mark_dirty();
    }

    /// Remove panes flagged closed. Preserved panes are detached and kept
    /// alive for reuse; anything else is destroyed. Runs after each
    /// dispatched event rather than during one, so a pane closing itself
    /// from inside its own handler never mutates a list mid-iteration.
    pub fn sweep(tree: &mut Tree, stack: WidgetId) {
        let closed: Vec<(WidgetId, bool)> = tree
            .children(stack)
            .iter()
            .filter_map(|c| {
                let p = tree.widget::<Pane>(*c)?;
                p.is_closed().then_some((*c, p.ability().preserved()))
            })
            .collect();
        for (id, preserved) in closed {
            trace!(pane = %tree.name(id), preserved, "sweep closed pane");
            if preserved {
                tree.detach(id);
            } else {
                tree.remove(id);
            }
        }
        tree.resort(stack);
    }
}

impl Widget for Stack {
    fn layout(&mut self, ctx: &mut Context, avail: Avail) -> Expanse {
        assert!(
            !avail.unlimited_w() && !avail.unlimited_h(),
            "stack: cannot lay out without space"
        );

        let mut index = 0usize;
        for child in ctx.children() {
            if ctx.is_hidden(child) {
                index += 1;
                continue;
            }
            ctx.layout_child(child, avail);

            // First-time placement: cascade new panes diagonally, never
            // moving anything placed before. Remaining space is floored at
            // one header height so a cramped stack still lands panes at a
            // visible offset.
            let pending = ctx
                .tree()
                .widget::<Pane>(child)
                .map(|p| p.pending_place())
                .unwrap_or(false);
            if pending {
                let size = ctx.size_of(child);
                let header = HEADER as i32;
                let remaining =
                    (avail.h.saturating_sub(size.h) as i32).max(header);
                let mut x = (avail.w.saturating_sub(size.w) as i32) / 2;
                let y = (index as i32 * header) % remaining + header * 2;
                x += (index as i32 * header) / remaining;
                ctx.place(child, x, y);
                if let Some(p) = ctx.tree().widget_mut::<Pane>(child) {
                    p.set_placed();
                }
            }
            index += 1;
        }
        Expanse::new(avail.w, avail.h)
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        ctx.draw_focus_ring(surface);
        ctx.draw_children(surface);
    }

    fn handle(&mut self, ctx: &mut Context, event: &Event) -> Outcome {
        let out = ctx.route_children(event);
        let id = ctx.id();
        Self::sweep(ctx.tree(), id);
        out
    }
}
