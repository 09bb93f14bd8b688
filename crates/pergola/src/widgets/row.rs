//! Stacked-horizontal container.

use crate::{
    context::Context,
    event::Event,
    geom::Expanse,
    layout::Avail,
    surface::Surface,
    widget::{Outcome, Widget},
};

/// A container that lays its children out left to right. Vertically the
/// children are limited to the available height; horizontally they are
/// unconstrained, and the row itself is clipped to the given bounds.
#[derive(Default)]
pub struct Row;

impl Row {
    /// Construct an empty row.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Row {
    fn layout(&mut self, ctx: &mut Context, avail: Avail) -> Expanse {
        let style = ctx.style();
        let m = style.margin;
        let inner = avail.shrink(m);

        let mut x = m as i32;
        let y = m as i32;
        let mut tallest = 0u32;
        let mut width = m * 2;
        for child in ctx.children() {
            if ctx.is_hidden(child) {
                continue;
            }
            // Height is bounded, width is not.
            ctx.layout_child(child, inner.with_w(crate::layout::UNLIMITED));
            ctx.place(child, x, y);
            let size = ctx.size_of(child);
            x += size.w as i32;
            width += size.w;
            tallest = tallest.max(size.h);
        }
        Expanse::new(width, tallest + m * 2)
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        ctx.fill_frame(surface);
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
        geom::Point,
        layout::layout_node,
        style::{StyleClass, StyleSheet},
        tree::Tree,
        tutils::{Probe, probe_log},
    };

    #[test]
    fn natural_size_is_sum_by_tallest() {
        let log = probe_log();
        let mut tree = Tree::new();
        let row = tree.insert(Row::new());
        let mut kids = Vec::new();
        for (i, (w, h)) in [(30u32, 10u32), (50, 20), (40, 5)].iter().enumerate() {
            let p = tree.insert(Probe::new(format!("p{i}"), &log).sized(*w, *h));
            tree.append(row, p);
            kids.push(p);
        }
        let sheet = StyleSheet::default();
        let m = sheet.get(StyleClass::Base).margin;
        layout_node(&mut tree, &sheet, row, Avail::new(300, 100));

        assert_eq!(tree.size(row), Expanse::new(120 + 2 * m, 20 + 2 * m));
        let mi = m as i32;
        assert_eq!(tree.rect(kids[0]).tl, Point::new(mi, mi));
        assert_eq!(tree.rect(kids[1]).tl, Point::new(mi + 30, mi));
        assert_eq!(tree.rect(kids[2]).tl, Point::new(mi + 80, mi));
    }
}
