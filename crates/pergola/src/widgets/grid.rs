//! Fixed-matrix grid container.

use crate::{
    context::Context,
    event::Event,
    geom::Expanse,
    layout::{Align, Avail, UNLIMITED},
    style::StyleClass,
    surface::Surface,
    tree::{Tree, WidgetId},
    widget::{Outcome, Widget},
};

/// One occupied grid position.
struct Cell {
    child: WidgetId,
    col: u32,
    row: u32,
    span: u32,
    align: Align,
}

/// A grid of equally spaced columns and rows of varying height. A cell may
/// span several columns, and is aligned to the start, middle or end of its
/// column band. Rows grow to their tallest cell, and a row is promoted to
/// the full available height when a cell's content overflows its band.
pub struct Grid {
    cols: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Construct a grid with a declared matrix. Placements outside the
    /// matrix abort.
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            cells: Vec::new(),
        }
    }

    /// The declared column count.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// The declared row count.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Place a child in a cell, replacing (and destroying) any previous
    /// occupant of the same position. Placements outside the declared
    /// matrix, zero spans, and spans running past the last column abort.
    pub fn put(
        tree: &mut Tree,
        grid: WidgetId,
        child: WidgetId,
        col: u32,
        row: u32,
        span: u32,
        align: Align,
    ) {
        {
            let g = tree.widget::<Self>(grid).expect("not a grid");
            assert!(
                col < g.cols && row < g.rows,
                "grid: cell ({col}, {row}) outside the declared {}x{} matrix",
                g.cols,
                g.rows
            );
            assert!(span >= 1, "grid: zero span");
            assert!(
                col + span <= g.cols,
                "grid: span {span} at column {col} runs past the last column"
            );
        }
        let old = tree
            .widget::<Self>(grid)
            .and_then(|g| g.cells.iter().find(|c| c.col == col && c.row == row))
            .map(|c| c.child);
        if let Some(old) = old {
            tree.remove(old);
            let g = tree.widget_mut::<Self>(grid).expect("not a grid");
            g.cells.retain(|c| c.child != old);
        }
        tree.append(grid, child);
        let g = tree.widget_mut::<Self>(grid).expect("not a grid");
        g.cells.push(Cell {
            child,
            col,
            row,
            span,
            align,
        });
        tree.mark_dirty();
    }
}

impl Widget for Grid {
    fn style_class(&self) -> StyleClass {
        StyleClass::Grid
    }

    fn layout(&mut self, ctx: &mut Context, avail: Avail) -> Expanse {
        let style = ctx.style();
        let m = style.margin;
        if self.cols == 0 || self.rows == 0 {
            return Expanse::new(style.min_size.w + m * 2, style.min_size.h + m * 2);
        }
        let inner = avail.shrink(m);

        // Column bands are equal shares of the width. Under an unconstrained
        // width the band is the widest natural cell, so the sentinel never
        // reaches the division below.
        let col_w = if inner.unlimited_w() {
            let mut w = 1;
            for cell in &self.cells {
                if ctx.is_hidden(cell.child) {
                    continue;
                }
                ctx.layout_child(cell.child, Avail::unlimited());
                w = w.max(ctx.size_of(cell.child).w.div_ceil(cell.span));
            }
            w
        } else {
            (inner.w / self.cols).max(1)
        };
        let row_h = if inner.unlimited_h() {
            UNLIMITED
        } else {
            (inner.h / self.rows).max(1)
        };

        let mut y = m as i32;
        let mut height = m * 2;
        for row in 0..self.rows {
            let mut tallest = 0u32;
            for cell in self.cells.iter().filter(|c| c.row == row) {
                let (child, col, span, align) = (cell.child, cell.col, cell.span, cell.align);
                if ctx.is_hidden(child) {
                    continue;
                }
                let band_w = col_w * span;
                ctx.layout_child(child, Avail::new(band_w, row_h));
                // Promote the row when the cell's content doesn't fit its
                // band height.
                if ctx.overflow_of(child).h > 0 && !inner.unlimited_h() {
                    ctx.layout_child(child, Avail::new(band_w, inner.h));
                }
                let size = ctx.size_of(child);
                let x = m as i32 + (col * col_w) as i32;
                ctx.place(child, align.position(x, size.w, band_w), y);
                tallest = tallest.max(size.h);
            }
            y += tallest as i32;
            height += tallest;
        }
        Expanse::new(col_w * self.cols + m * 2, height)
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
        layout::layout_node,
        style::StyleSheet,
        tutils::{Probe, probe_log},
    };

    fn intersects(a: crate::geom::Rect, b: crate::geom::Rect) -> bool {
        a.tl.x < b.tl.x + b.w as i32
            && b.tl.x < a.tl.x + a.w as i32
            && a.tl.y < b.tl.y + b.h as i32
            && b.tl.y < a.tl.y + a.h as i32
    }

    #[test]
    fn span_and_neighbor_occupy_disjoint_bands() {
        let log = probe_log();
        let mut tree = Tree::new();
        let grid = tree.insert(Grid::new(3, 1));
        let wide = tree.insert(Probe::new("wide", &log).sized(500, 10));
        let slim = tree.insert(Probe::new("slim", &log).sized(500, 10));
        Grid::put(&mut tree, grid, wide, 0, 0, 2, Align::Start);
        Grid::put(&mut tree, grid, slim, 2, 0, 1, Align::Start);

        let sheet = StyleSheet::default();
        layout_node(&mut tree, &sheet, grid, Avail::new(124, 60));

        let a = tree.abs_rect(wide);
        let b = tree.abs_rect(slim);
        assert!(a.w > 0 && b.w > 0);
        assert!(!intersects(a, b), "bands overlap: {a:?} vs {b:?}");
        // The span covers two column bands, the neighbor starts at the
        // third.
        assert!(a.tl.x + (a.w as i32) <= b.tl.x);
    }

    #[test]
    fn row_height_is_tallest_cell() {
        let log = probe_log();
        let mut tree = Tree::new();
        let grid = tree.insert(Grid::new(2, 2));
        let short = tree.insert(Probe::new("short", &log).sized(10, 8));
        let tall = tree.insert(Probe::new("tall", &log).sized(10, 20));
        let below = tree.insert(Probe::new("below", &log).sized(10, 8));
        Grid::put(&mut tree, grid, short, 0, 0, 1, Align::Start);
        Grid::put(&mut tree, grid, tall, 1, 0, 1, Align::Start);
        Grid::put(&mut tree, grid, below, 0, 1, 1, Align::Start);

        let sheet = StyleSheet::default();
        layout_node(&mut tree, &sheet, grid, Avail::new(100, 100));

        let m = sheet.get(StyleClass::Grid).margin as i32;
        assert_eq!(tree.rect(below).tl.y, m + 20);
    }

    #[test]
    fn overflowing_cell_promotes_its_row() {
        let log = probe_log();
        let mut tree = Tree::new();
        let grid = tree.insert(Grid::new(1, 2));
        let big = tree.insert(Probe::new("big", &log).sized(10, 80));
        let below = tree.insert(Probe::new("below", &log).sized(10, 8));
        Grid::put(&mut tree, grid, big, 0, 0, 1, Align::Start);
        Grid::put(&mut tree, grid, below, 0, 1, 1, Align::Start);

        let sheet = StyleSheet::default();
        layout_node(&mut tree, &sheet, grid, Avail::new(100, 100));

        // Band height would be ~48; the cell is re-laid against the full
        // height instead of being cut to the band.
        assert_eq!(tree.size(big).h, 80);
        let m = sheet.get(StyleClass::Grid).margin as i32;
        assert_eq!(tree.rect(below).tl.y, m + 80);
    }

    #[test]
    fn cell_alignment_positions_within_band() {
        let log = probe_log();
        let mut tree = Tree::new();
        let grid = tree.insert(Grid::new(1, 3));
        let sheet = StyleSheet::default();
        let m = sheet.get(StyleClass::Grid).margin as i32;
        let ids: Vec<_> = [Align::Start, Align::Middle, Align::End]
            .into_iter()
            .enumerate()
            .map(|(row, align)| {
                let p = tree.insert(Probe::new(format!("r{row}"), &log).sized(20, 10));
                Grid::put(&mut tree, grid, p, 0, row as u32, 1, align);
                p
            })
            .collect();

        layout_node(&mut tree, &sheet, grid, Avail::new(104, 100));
        let band = 100;
        assert_eq!(tree.rect(ids[0]).tl.x, m);
        assert_eq!(tree.rect(ids[1]).tl.x, m + (band - 20) / 2);
        assert_eq!(tree.rect(ids[2]).tl.x, m + band - 20);
    }

    #[test]
    #[should_panic(expected = "outside the declared")]
    fn placement_outside_matrix_aborts() {
        let log = probe_log();
        let mut tree = Tree::new();
        let grid = tree.insert(Grid::new(2, 2));
        let p = tree.insert(Probe::new("p", &log));
        Grid::put(&mut tree, grid, p, 2, 0, 1, Align::Start);
    }

    #[test]
    #[should_panic(expected = "runs past the last column")]
    fn span_past_last_column_aborts() {
        let log = probe_log();
        let mut tree = Tree::new();
        let grid = tree.insert(Grid::new(2, 2));
        let p = tree.insert(Probe::new("p", &log));
        Grid::put(&mut tree, grid, p, 1, 0, 2, Align::Start);
    }

    #[test]
    fn put_replaces_previous_occupant() {
        let log = probe_log();
        let mut tree = Tree::new();
        let grid = tree.insert(Grid::new(1, 1));
        let first = tree.insert(Probe::new("first", &log));
        let second = tree.insert(Probe::new("second", &log));
        Grid::put(&mut tree, grid, first, 0, 0, 1, Align::Start);
        Grid::put(&mut tree, grid, second, 0, 0, 1, Align::Start);
        assert!(!tree.contains(first));
        assert_eq!(tree.children(grid), &[second]);
    }
}
