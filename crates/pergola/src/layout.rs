//! The layout negotiation protocol.
//!
//! Layout is a single top-down pass: a parent offers each child an
//! [`Avail`], the child lays itself (and its own children) out within it,
//! and the parent then reads the child's resulting size back and positions
//! it. Children are monotone: the engine clips every result to the offered
//! bound, retaining the unclipped natural size so containers can detect
//! overflow. The pass always terminates because each recursion step descends
//! strictly into the child set.

use crate::{
    context::Context,
    geom::Expanse,
    style::StyleSheet,
    tree::{Tree, WidgetId},
};

/// Sentinel meaning "no constraint on this axis, use the natural size".
/// Margin subtraction keeps the sentinel intact, so an unconstrained axis
/// propagates through nested containers instead of collapsing.
pub const UNLIMITED: u32 = u32::MAX;

/// The space offered to a widget during layout. Zero on either axis is a
/// caller contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Avail {
    /// Available width, possibly [`UNLIMITED`].
    pub w: u32,
    /// Available height, possibly [`UNLIMITED`].
    pub h: u32,
}

impl Avail {
    /// Construct an availability. Zero bounds abort.
    pub fn new(w: u32, h: u32) -> Self {
        assert!(w > 0 && h > 0, "layout: zero-sized bounds");
        Self { w, h }
    }

    /// No constraint on either axis.
    pub fn unlimited() -> Self {
        Self {
            w: UNLIMITED,
            h: UNLIMITED,
        }
    }

    /// True if the width axis is unconstrained.
    pub fn unlimited_w(&self) -> bool {
        self.w == UNLIMITED
    }

    /// True if the height axis is unconstrained.
    pub fn unlimited_h(&self) -> bool {
        self.h == UNLIMITED
    }

    /// Shrink both axes by a margin on each side. Unconstrained axes stay
    /// unconstrained, and a constrained axis never shrinks below one unit.
    pub fn shrink(&self, margin: u32) -> Self {
        Self {
            w: shrink_axis(self.w, margin),
            h: shrink_axis(self.h, margin),
        }
    }

    /// Replace the width constraint.
    pub fn with_w(&self, w: u32) -> Self {
        Self { w, ..*self }
    }

    /// Replace the height constraint.
    pub fn with_h(&self, h: u32) -> Self {
        Self { h, ..*self }
    }

    /// Reduce the height constraint by an amount already spent, keeping at
    /// least one unit. Unconstrained stays unconstrained.
    pub fn spend_h(&self, spent: u32) -> Self {
        let h = if self.h == UNLIMITED {
            UNLIMITED
        } else {
            self.h.saturating_sub(spent).max(1)
        };
        Self { h, ..*self }
    }
}

fn shrink_axis(v: u32, margin: u32) -> u32 {
    if v == UNLIMITED {
        UNLIMITED
    } else {
        v.saturating_sub(margin * 2).max(1)
    }
}

impl From<Expanse> for Avail {
    fn from(e: Expanse) -> Self {
        Self::new(e.w, e.h)
    }
}

/// Alignment of a widget within a band of space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Align to the start of the band.
    #[default]
    Start,
    /// Center in the band.
    Middle,
    /// Align to the end of the band.
    End,
}

impl Align {
    /// Position a widget of `size` within `space` starting at `value`.
    pub fn position(&self, value: i32, size: u32, space: u32) -> i32 {
        match self {
            Self::Start => value,
            Self::Middle => value + (space.saturating_sub(size) / 2) as i32,
            Self::End => value + space as i32 - size as i32,
        }
    }
}

/// Clip a desired size to an availability, per axis. Unconstrained axes pass
/// the size through.
pub(crate) fn clip(natural: Expanse, avail: Avail) -> Expanse {
    Expanse {
        w: if avail.unlimited_w() {
            natural.w
        } else {
            natural.w.min(avail.w)
        },
        h: if avail.unlimited_h() {
            natural.h
        } else {
            natural.h.min(avail.h)
        },
    }
}

/// Drive the layout of a single node: hand the widget the available space,
/// record its natural size, and clip the effective size to the bound.
pub(crate) fn layout_node(tree: &mut Tree, sheet: &StyleSheet, id: WidgetId, avail: Avail) {
    assert!(
        avail.w > 0 && avail.h > 0,
        "layout: zero-sized bounds for {}",
        tree.name(id)
    );
    let Some(mut widget) = tree.take_widget(id) else {
        return;
    };
    let natural = widget.layout(&mut Context::new(tree, sheet, id), avail);
    tree.put_widget(id, widget);
    tree.record_size(id, natural, clip(natural, avail));
    tree.resort(id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_propagates_through_margins() {
        let a = Avail::unlimited().shrink(4).shrink(16);
        assert!(a.unlimited_w() && a.unlimited_h());
    }

    #[test]
    fn shrink_never_collapses() {
        let a = Avail::new(5, 5).shrink(400);
        assert_eq!(a, Avail::new(1, 1));
    }

    #[test]
    #[should_panic(expected = "zero-sized bounds")]
    fn zero_bounds_abort() {
        let _ = Avail::new(0, 10);
    }

    #[test]
    fn align_positions() {
        assert_eq!(Align::Start.position(10, 4, 20), 10);
        assert_eq!(Align::Middle.position(10, 4, 20), 18);
        assert_eq!(Align::End.position(10, 4, 20), 26);
    }

    #[test]
    fn clip_respects_unlimited() {
        let natural = Expanse::new(500, 300);
        assert_eq!(
            clip(natural, Avail::new(100, UNLIMITED)),
            Expanse::new(100, 300)
        );
    }
}
