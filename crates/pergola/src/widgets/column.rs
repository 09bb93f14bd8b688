//! Stacked-vertical container.

use crate::{
    context::Context,
    event::Event,
    geom::Expanse,
    layout::Avail,
    surface::Surface,
    widget::{Outcome, Widget},
};

/// A container that stacks its children top to bottom. Horizontally the
/// children are limited to the available width; vertically they are
/// unconstrained, and the column itself is clipped to the given bounds.
#[derive(Default)]
pub struct Column;

impl Column {
    /// Construct an empty column.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Column {
    fn layout(&mut self, ctx: &mut Context, avail: Avail) -> Expanse {
        let style = ctx.style();
        let m = style.margin;
        let inner = avail.shrink(m);

        let x = m as i32;
        let mut y = m as i32;
        let mut widest = 0u32;
        let mut height = m * 2;
        for child in ctx.children() {
            if ctx.is_hidden(child) {
                continue;
            }
            // Width is bounded, height is not.
            ctx.layout_child(child, inner.with_h(crate::layout::UNLIMITED));
            ctx.place(child, x, y);
            let size = ctx.size_of(child);
            y += size.h as i32;
            height += size.h;
            widest = widest.max(size.w);
        }
        Expanse::new(widest + m * 2, height)
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
        style::StyleSheet,
        tree::{Tree, WidgetId},
        tutils::{Probe, probe_log},
    };

    fn column_of(sizes: &[(u32, u32)]) -> (Tree, WidgetId, Vec<WidgetId>) {
        let log = probe_log();
        let mut tree = Tree::new();
        let col = tree.insert(Column::new());
        let kids = sizes
            .iter()
            .enumerate()
            .map(|(i, (w, h))| {
                let p = tree.insert(Probe::new(format!("p{i}"), &log).sized(*w, *h));
                tree.append(col, p);
                p
            })
            .collect();
        (tree, col, kids)
    }

    #[test]
    fn natural_size_is_widest_by_sum() {
        let (mut tree, col, kids) = column_of(&[(30, 10), (50, 20), (40, 5)]);
        let sheet = StyleSheet::default();
        let m = sheet.get(crate::style::StyleClass::Base).margin;
        layout_node(&mut tree, &sheet, col, Avail::new(200, 200));

        assert_eq!(tree.size(col), Expanse::new(50 + 2 * m, 35 + 2 * m));
        let mi = m as i32;
        assert_eq!(tree.rect(kids[0]).tl, Point::new(mi, mi));
        assert_eq!(tree.rect(kids[1]).tl, Point::new(mi, mi + 10));
        assert_eq!(tree.rect(kids[2]).tl, Point::new(mi, mi + 30));
    }

    #[test]
    fn clipping_shrinks_without_moving_children() {
        let (mut tree, col, kids) = column_of(&[(30, 10), (50, 20), (40, 5)]);
        let sheet = StyleSheet::default();
        layout_node(&mut tree, &sheet, col, Avail::new(40, 30));

        assert_eq!(tree.size(col), Expanse::new(40, 30));
        let m = sheet.get(crate::style::StyleClass::Base).margin as i32;
        assert_eq!(tree.rect(kids[0]).tl, Point::new(m, m));
        assert_eq!(tree.rect(kids[1]).tl, Point::new(m, m + 10));
        assert_eq!(tree.rect(kids[2]).tl, Point::new(m, m + 30));
    }

    #[test]
    fn unlimited_bounds_keep_natural_size() {
        let (mut tree, col, _) = column_of(&[(30, 10), (50, 20)]);
        let sheet = StyleSheet::default();
        let m = sheet.get(crate::style::StyleClass::Base).margin;
        layout_node(&mut tree, &sheet, col, Avail::unlimited());
        assert_eq!(tree.size(col), Expanse::new(50 + 2 * m, 30 + 2 * m));
    }

    #[test]
    fn hidden_children_take_no_space() {
        let (mut tree, col, kids) = column_of(&[(30, 10), (50, 20)]);
        tree.hide(kids[1]);
        let sheet = StyleSheet::default();
        let m = sheet.get(crate::style::StyleClass::Base).margin;
        layout_node(&mut tree, &sheet, col, Avail::new(200, 200));
        assert_eq!(tree.size(col), Expanse::new(30 + 2 * m, 10 + 2 * m));
    }
}
