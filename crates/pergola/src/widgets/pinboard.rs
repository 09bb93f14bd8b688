//! Freeform container.

use crate::{
    context::Context,
    event::Event,
    geom::{Expanse, Point},
    layout::Avail,
    surface::Surface,
    tree::{Tree, WidgetId},
    widget::{Outcome, Widget},
};

/// A container whose children keep their caller-given offsets and natural
/// size; the board's own size is the bounding box of its children. Children
/// are never repositioned after being pinned, which makes the board the
/// building block for custom composite widgets.
#[derive(Default)]
pub struct Pinboard;

impl Pinboard {
    /// Construct an empty pinboard.
    pub fn new() -> Self {
        Self
    }

    /// Pin a child at an offset.
    pub fn put(tree: &mut Tree, board: WidgetId, child: WidgetId, x: i32, y: i32) {
        tree.append(board, child);
        tree.move_to(child, Point::new(x, y));
        tree.mark_dirty();
    }
}

impl Widget for Pinboard {
    fn layout(&mut self, ctx: &mut Context, _avail: Avail) -> Expanse {
        let style = ctx.style();
        let mut w = 0u32;
        let mut h = 0u32;
        for child in ctx.children() {
            if ctx.is_hidden(child) {
                continue;
            }
            ctx.layout_child(child, Avail::unlimited());
            let r = ctx.tree().rect(child);
            w = w.max((r.tl.x.max(0) as u32).saturating_add(r.w));
            h = h.max((r.tl.y.max(0) as u32).saturating_add(r.h));
        }
        Expanse::new(w + style.margin * 2, h + style.margin * 2)
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        // No chrome of its own.
        ctx.draw_focus_ring(surface);
        ctx.draw_children(surface);
    }

    fn handle(&mut self, ctx: &mut Context, event: &Event) -> Outcome {
        ctx.route_children(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        layout::layout_node,
        style::{StyleClass, StyleSheet},
        tutils::{Probe, probe_log},
    };

    #[test]
    fn size_is_the_bounding_box_and_children_stay_pinned() {
        let log = probe_log();
        let mut tree = Tree::new();
        let board = tree.insert(Pinboard::new());
        let a = tree.insert(Probe::new("a", &log).sized(20, 10));
        let b = tree.insert(Probe::new("b", &log).sized(15, 30));
        Pinboard::put(&mut tree, board, a, 5, 40);
        Pinboard::put(&mut tree, board, b, 50, 0);

        let sheet = StyleSheet::default();
        let m = sheet.get(StyleClass::Base).margin;
        layout_node(&mut tree, &sheet, board, Avail::new(500, 500));

        // Bounding box: a reaches (25, 50), b reaches (65, 30).
        assert_eq!(tree.size(board), Expanse::new(65 + 2 * m, 50 + 2 * m));
        assert_eq!(tree.rect(a).tl, Point::new(5, 40));
        assert_eq!(tree.rect(b).tl, Point::new(50, 0));

        // Children keep their natural size even in a cramped board.
        layout_node(&mut tree, &sheet, board, Avail::new(30, 30));
        assert_eq!(tree.size(a), Expanse::new(20, 10));
        assert_eq!(tree.rect(a).tl, Point::new(5, 40));
    }
}
