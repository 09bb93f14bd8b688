//! The widget tree arena.
//!
//! Nodes own their widgets and their child sets; parent links are arena
//! keys, so detaching can never dangle. Everything a widget shares with the
//! dispatcher (position, size, layer, visibility, enablement, the focus
//! slot) lives here rather than in the widget itself.

use slotmap::{SlotMap, new_key_type};
use tracing::trace;

use crate::{
    geom::{Expanse, Point, Rect},
    state::WidgetName,
    style::{Style, StyleClass},
    widget::Widget,
};

new_key_type! {
    /// Arena key identifying one widget in the tree.
    pub struct WidgetId;
}

/// Multiplier separating a container's own layer band from its children's.
/// A container's effective layer is `own * LAYER_OFFSET + max(child
/// effective layers)`, which keeps deep subtrees from colliding with
/// shallow siblings.
pub const LAYER_OFFSET: i64 = 100_000;

pub(crate) struct Node {
    pub(crate) widget: Option<Box<dyn Widget>>,
    pub(crate) name: WidgetName,
    pub(crate) class: StyleClass,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    /// Children sorted by (effective layer, y, x): the draw and hit-test
    /// order. Always a permutation of `children`.
    pub(crate) ordered: Vec<WidgetId>,
    /// The focused child, if any.
    pub(crate) focus: Option<WidgetId>,
    /// Position relative to the parent, and the laid-out (clipped) size.
    pub(crate) rect: Rect,
    /// The size the widget asked for before clipping.
    pub(crate) natural: Expanse,
    pub(crate) layer: i64,
    pub(crate) hidden: bool,
    pub(crate) enabled: bool,
    pub(crate) style: Option<Style>,
    /// Stack hosting this node's dialogs, if the widget hosts any.
    pub(crate) dialogs: Option<WidgetId>,
    /// Whether this node accepts overlay registrations.
    pub(crate) overlay_host: bool,
    /// Registered overlays, topmost last.
    pub(crate) overlays: Vec<WidgetId>,
}

/// The widget tree.
pub struct Tree {
    nodes: SlotMap<WidgetId, Node>,
    dirty: bool,
    /// Panes asked to close while dispatch was still running through them.
    /// Serviced by the engine once the event completes.
    pending_close: Vec<(WidgetId, bool)>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Construct an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            dirty: false,
            pending_close: Vec::new(),
        }
    }

    /// Insert a widget as a new, unparented node.
    pub fn insert<W: Widget + 'static>(&mut self, widget: W) -> WidgetId {
        let name = widget.name();
        let class = widget.style_class();
        let id = self.nodes.insert(Node {
            widget: Some(Box::new(widget)),
            name,
            class,
            parent: None,
            children: Vec::new(),
            ordered: Vec::new(),
            focus: None,
            rect: Rect::default(),
            natural: Expanse::default(),
            layer: 0,
            hidden: false,
            enabled: true,
            style: None,
            dialogs: None,
            overlay_host: false,
            overlays: Vec::new(),
        });
        self.dirty = true;
        id
    }

    /// Is the id still in the tree?
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Append a child to a parent, detaching it from any previous parent
    /// first. Self-append and appends that would create a cycle abort.
    pub fn append(&mut self, parent: WidgetId, child: WidgetId) {
        assert!(parent != child, "append cycle detected");
        assert!(
            !self.ancestors(parent).contains(&child),
            "append cycle detected: {} is an ancestor of {}",
            self.name(child),
            self.name(parent)
        );
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        self.resort(parent);
        self.dirty = true;
        trace!(parent = %self.name(parent), child = %self.name(child), "append");
    }

    /// Detach a node from its parent, clearing the parent's focus slot if it
    /// pointed at the node. The node and its subtree stay alive.
    pub fn detach(&mut self, id: WidgetId) {
        let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) else {
            return;
        };
        let p = &mut self.nodes[parent];
        p.children.retain(|c| *c != id);
        p.ordered.retain(|c| *c != id);
        if p.focus == Some(id) {
            p.focus = None;
        }
        self.nodes[id].parent = None;
        self.dirty = true;
    }

    /// Remove a node and destroy its entire subtree, children first.
    pub fn remove(&mut self, id: WidgetId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        self.drop_subtree(id);
        self.dirty = true;
    }

    fn drop_subtree(&mut self, id: WidgetId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.drop_subtree(child);
        }
        trace!(widget = %self.name(id), "destroy");
        self.nodes.remove(id);
    }

    /// Remove every child of a node.
    pub fn clear_children(&mut self, id: WidgetId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// The node's parent, if attached.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// The node's children in insertion (tab) order.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The node's children in draw/hit-test order: ascending (effective
    /// layer, y, x), topmost last.
    pub fn ordered(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(id).map(|n| n.ordered.as_slice()).unwrap_or(&[])
    }

    /// The chain from a node up to its root, starting with the node itself.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            if !self.contains(c) {
                break;
            }
            out.push(c);
            cur = self.parent(c);
        }
        out
    }

    /// The focused child of a container, if any.
    pub fn focus(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.focus)
    }

    pub(crate) fn set_focus_slot(&mut self, id: WidgetId, focus: Option<WidgetId>) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.focus = focus;
        }
    }

    /// Position and laid-out size, relative to the parent.
    pub fn rect(&self, id: WidgetId) -> Rect {
        self.nodes.get(id).map(|n| n.rect).unwrap_or_default()
    }

    /// The laid-out (clipped) size.
    pub fn size(&self, id: WidgetId) -> Expanse {
        self.rect(id).size()
    }

    /// The size the widget last asked for, before clipping.
    pub fn natural(&self, id: WidgetId) -> Expanse {
        self.nodes.get(id).map(|n| n.natural).unwrap_or_default()
    }

    /// How much of the natural size was clipped away on each axis.
    pub fn overflow(&self, id: WidgetId) -> Expanse {
        let natural = self.natural(id);
        let size = self.size(id);
        Expanse {
            w: natural.w.saturating_sub(size.w),
            h: natural.h.saturating_sub(size.h),
        }
    }

    /// Move a node to a position relative to its parent.
    pub fn move_to(&mut self, id: WidgetId, to: Point) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.rect.tl = to;
        }
    }

    /// Move a node by a delta.
    pub fn move_by(&mut self, id: WidgetId, dx: i32, dy: i32) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.rect.tl = n.rect.tl.shift(dx, dy);
        }
    }

    pub(crate) fn record_size(&mut self, id: WidgetId, natural: Expanse, clipped: Expanse) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.natural = natural;
            n.rect.w = clipped.w;
            n.rect.h = clipped.h;
        }
    }

    /// Force a node's laid-out size, used for user-driven resizes.
    pub fn set_size(&mut self, id: WidgetId, size: Expanse) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.rect.w = size.w;
            n.rect.h = size.h;
        }
    }

    /// The node's own z-layer.
    pub fn layer(&self, id: WidgetId) -> i64 {
        self.nodes.get(id).map(|n| n.layer).unwrap_or(0)
    }

    /// Change the node's z-layer by a delta.
    pub fn raise(&mut self, id: WidgetId, delta: i64) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.layer += delta;
        }
        if let Some(p) = self.parent(id) {
            self.resort(p);
        }
    }

    /// The effective z-layer used for draw order and hit-test precedence.
    /// For a node with children this is `own * LAYER_OFFSET + max(child
    /// effective layers)`.
    pub fn effective_layer(&self, id: WidgetId) -> i64 {
        let Some(n) = self.nodes.get(id) else {
            return 0;
        };
        if n.children.is_empty() {
            n.layer
        } else {
            let highest = n
                .children
                .iter()
                .map(|c| self.effective_layer(*c))
                .max()
                .unwrap_or(0);
            n.layer * LAYER_OFFSET + highest
        }
    }

    /// Raise a node above all its siblings by swapping layer bumps with the
    /// current topmost sibling. Existing siblings are never renumbered.
    pub fn bring_to_top(&mut self, id: WidgetId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let ordered = self.ordered(parent);
        if ordered.len() > 1 {
            let last = *ordered.last().expect("non-empty ordered view");
            if last != id {
                self.raise(last, -LAYER_OFFSET);
                self.raise(id, LAYER_OFFSET);
            }
        }
    }

    /// Is the node hidden? Hidden nodes neither draw, hit-test, nor receive
    /// forwarded events.
    pub fn is_hidden(&self, id: WidgetId) -> bool {
        self.nodes.get(id).map(|n| n.hidden).unwrap_or(true)
    }

    /// Hide a node and its subtree from drawing and dispatch. If the parent
    /// focused this node, the focus reference is cleared.
    pub fn hide(&mut self, id: WidgetId) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.hidden = true;
        }
        if let Some(p) = self.parent(id)
            && self.focus(p) == Some(id)
        {
            self.set_focus_slot(p, None);
        }
        self.dirty = true;
    }

    /// Show a previously hidden node.
    pub fn show(&mut self, id: WidgetId) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.hidden = false;
        }
        self.dirty = true;
    }

    /// Is the node enabled?
    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.nodes.get(id).map(|n| n.enabled).unwrap_or(false)
    }

    /// Enable or disable a node.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.enabled = enabled;
        }
    }

    /// The node's style override, if set.
    pub fn style_override(&self, id: WidgetId) -> Option<Style> {
        self.nodes.get(id).and_then(|n| n.style)
    }

    /// Set or clear a per-node style override.
    pub fn set_style(&mut self, id: WidgetId, style: Option<Style>) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.style = style;
        }
    }

    /// The style class the node resolves against.
    pub fn class(&self, id: WidgetId) -> StyleClass {
        self.nodes.get(id).map(|n| n.class).unwrap_or(StyleClass::Base)
    }

    /// The node's name.
    pub fn name(&self, id: WidgetId) -> WidgetName {
        self.nodes
            .get(id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| WidgetName::convert("gone"))
    }

    /// Absolute position of the node's top-left corner, accumulated up the
    /// parent chain.
    pub fn abs_origin(&self, id: WidgetId) -> Point {
        let mut p = self.rect(id).tl;
        let mut cur = self.parent(id);
        while let Some(a) = cur {
            p = p + self.rect(a).tl;
            cur = self.parent(a);
        }
        p
    }

    /// Absolute bounds of the node.
    pub fn abs_rect(&self, id: WidgetId) -> Rect {
        Rect::at(self.abs_origin(id), self.size(id))
    }

    /// The topmost visible child of `parent` containing the absolute point,
    /// if any. Scans the draw order from the top down.
    pub fn topmost_at(&self, parent: WidgetId, pos: Point) -> Option<WidgetId> {
        for child in self.ordered(parent).iter().rev() {
            if self.is_hidden(*child) {
                continue;
            }
            if self.abs_rect(*child).contains(pos) {
                return Some(*child);
            }
        }
        None
    }

    /// Recompute the draw/hit-test order of a node's children: a stable sort
    /// of the owned set by ascending (effective layer, y, x).
    pub fn resort(&mut self, id: WidgetId) {
        let Some(n) = self.nodes.get(id) else {
            return;
        };
        let mut keyed: Vec<((i64, i32, i32), WidgetId)> = n
            .children
            .iter()
            .map(|c| {
                let r = self.rect(*c);
                ((self.effective_layer(*c), r.tl.y, r.tl.x), *c)
            })
            .collect();
        keyed.sort_by_key(|(k, _)| *k);
        self.nodes[id].ordered = keyed.into_iter().map(|(_, c)| c).collect();
    }

    /// Take the widget out of a node for a call. Returns `None` if the node
    /// is gone or the widget is already out (re-entrant delivery).
    pub(crate) fn take_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(id).and_then(|n| n.widget.take())
    }

    /// Restore a widget taken with [`Self::take_widget`]. If the node was
    /// removed while the widget was out, the widget is dropped.
    pub(crate) fn put_widget(&mut self, id: WidgetId, widget: Box<dyn Widget>) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.widget = Some(widget);
        }
    }

    /// Borrow a node's widget as a concrete type.
    pub fn widget<W: Widget>(&self, id: WidgetId) -> Option<&W> {
        let w = self.nodes.get(id)?.widget.as_ref()?;
        (w.as_ref() as &dyn std::any::Any).downcast_ref::<W>()
    }

    /// Mutably borrow a node's widget as a concrete type.
    pub fn widget_mut<W: Widget>(&mut self, id: WidgetId) -> Option<&mut W> {
        let w = self.nodes.get_mut(id)?.widget.as_mut()?;
        (w.as_mut() as &mut dyn std::any::Any).downcast_mut::<W>()
    }

    /// Is the node's widget of a concrete type?
    pub fn is<W: Widget>(&self, id: WidgetId) -> bool {
        self.widget::<W>(id).is_some()
    }

    /// Declare that a node hosts dialogs on the given stack.
    pub fn set_dialog_slot(&mut self, id: WidgetId, stack: WidgetId) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.dialogs = Some(stack);
        }
    }

    /// The stack a node hosts dialogs on, if any.
    pub fn dialog_slot(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.dialogs)
    }

    /// Declare that a node accepts overlay registrations.
    pub fn enable_overlay_host(&mut self, id: WidgetId) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.overlay_host = true;
        }
    }

    /// Does the node accept overlay registrations?
    pub fn is_overlay_host(&self, id: WidgetId) -> bool {
        self.nodes.get(id).map(|n| n.overlay_host).unwrap_or(false)
    }

    /// The node's registered overlays, pruning entries whose nodes are gone.
    pub fn overlays(&mut self, id: WidgetId) -> Vec<WidgetId> {
        let live: Vec<WidgetId> = self
            .nodes
            .get(id)
            .map(|n| n.overlays.clone())
            .unwrap_or_default()
            .into_iter()
            .filter(|o| self.contains(*o))
            .collect();
        if let Some(n) = self.nodes.get_mut(id) {
            n.overlays = live.clone();
        }
        live
    }

    pub(crate) fn add_overlay(&mut self, host: WidgetId, overlay: WidgetId) {
        if let Some(n) = self.nodes.get_mut(host) {
            if !n.overlays.contains(&overlay) {
                n.overlays.push(overlay);
            }
        }
    }

    pub(crate) fn remove_overlay(&mut self, host: WidgetId, overlay: WidgetId) {
        if let Some(n) = self.nodes.get_mut(host) {
            n.overlays.retain(|o| *o != overlay);
        }
    }

    /// Ask for a pane to be closed once the current event finishes
    /// dispatching. Safe to call from anywhere, including a handler deep
    /// inside the pane being closed. With `run_callback` the pane's closing
    /// callback runs (and a permanent pane may veto); without it the pane is
    /// torn down directly.
    pub fn request_close(&mut self, pane: WidgetId, run_callback: bool) {
        self.pending_close.push((pane, run_callback));
    }

    pub(crate) fn drain_pending_close(&mut self) -> Vec<(WidgetId, bool)> {
        std::mem::take(&mut self.pending_close)
    }

    /// Mark the tree as needing a layout pass.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear and return the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Render an indented debug dump of a subtree.
    pub fn dump(&self, id: WidgetId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: WidgetId, depth: usize, out: &mut String) {
        use std::fmt::Write;
        let r = self.rect(id);
        let _ = writeln!(
            out,
            "{}{} {:?}+{}x{} layer={}{}",
            "  ".repeat(depth),
            self.name(id),
            (r.tl.x, r.tl.y),
            r.w,
            r.h,
            self.layer(id),
            if self.is_hidden(id) { " hidden" } else { "" },
        );
        for child in self.ordered(id) {
            self.dump_into(*child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf;
    impl Widget for Leaf {}

    struct Holder;
    impl Widget for Holder {}

    fn leaf_at(t: &mut Tree, parent: WidgetId, x: i32, y: i32, layer: i64) -> WidgetId {
        let id = t.insert(Leaf);
        t.append(parent, id);
        t.move_to(id, Point::new(x, y));
        t.raise(id, layer);
        id
    }

    #[test]
    fn ordered_is_sorted_permutation() {
        let mut t = Tree::new();
        let root = t.insert(Holder);
        let a = leaf_at(&mut t, root, 5, 5, 2);
        let b = leaf_at(&mut t, root, 0, 0, 1);
        let c = leaf_at(&mut t, root, 3, 0, 1);
        t.resort(root);
        assert_eq!(t.ordered(root), &[b, c, a]);
        // Children keep insertion order.
        assert_eq!(t.children(root), &[a, b, c]);
    }

    #[test]
    fn resort_is_idempotent() {
        let mut t = Tree::new();
        let root = t.insert(Holder);
        for (i, (x, y)) in [(4, 1), (2, 9), (7, 0)].iter().enumerate() {
            leaf_at(&mut t, root, *x, *y, i as i64 % 2);
        }
        t.resort(root);
        let once = t.ordered(root).to_vec();
        t.resort(root);
        assert_eq!(t.ordered(root), once.as_slice());
    }

    #[test]
    #[should_panic(expected = "append cycle")]
    fn self_append_rejected() {
        let mut t = Tree::new();
        let root = t.insert(Holder);
        t.append(root, root);
    }

    #[test]
    #[should_panic(expected = "append cycle")]
    fn ancestor_append_rejected() {
        let mut t = Tree::new();
        let root = t.insert(Holder);
        let kid = t.insert(Holder);
        t.append(root, kid);
        t.append(kid, root);
    }

    #[test]
    fn remove_destroys_subtree_and_focus_ref() {
        let mut t = Tree::new();
        let root = t.insert(Holder);
        let mid = t.insert(Holder);
        let leaf = t.insert(Leaf);
        t.append(root, mid);
        t.append(mid, leaf);
        t.set_focus_slot(root, Some(mid));
        t.remove(mid);
        assert!(!t.contains(mid));
        assert!(!t.contains(leaf));
        assert_eq!(t.focus(root), None);
        assert!(t.children(root).is_empty());
    }

    #[test]
    fn hide_clears_parent_focus() {
        let mut t = Tree::new();
        let root = t.insert(Holder);
        let kid = t.insert(Leaf);
        t.append(root, kid);
        t.set_focus_slot(root, Some(kid));
        t.hide(kid);
        assert_eq!(t.focus(root), None);
        assert!(t.is_hidden(kid));
    }

    #[test]
    fn effective_layer_formula() {
        let mut t = Tree::new();
        let root = t.insert(Holder);
        let inner = t.insert(Holder);
        t.append(root, inner);
        t.raise(root, 2);
        let kid = leaf_at(&mut t, inner, 0, 0, 7);
        assert_eq!(t.effective_layer(kid), 7);
        assert_eq!(t.effective_layer(inner), 7);
        assert_eq!(t.effective_layer(root), 2 * LAYER_OFFSET + 7);
    }

    #[test]
    fn bring_to_top_swaps_with_topmost() {
        let mut t = Tree::new();
        let root = t.insert(Holder);
        let a = leaf_at(&mut t, root, 0, 0, 1);
        let b = leaf_at(&mut t, root, 0, 0, 2);
        t.resort(root);
        assert_eq!(*t.ordered(root).last().unwrap(), b);
        t.bring_to_top(a);
        assert_eq!(*t.ordered(root).last().unwrap(), a);
        // Raising the already-topmost widget changes nothing.
        let before = (t.layer(a), t.layer(b));
        t.bring_to_top(a);
        assert_eq!((t.layer(a), t.layer(b)), before);
    }

    #[test]
    fn topmost_at_skips_hidden() {
        let mut t = Tree::new();
        let root = t.insert(Holder);
        t.record_size(root, Expanse::new(100, 100), Expanse::new(100, 100));
        let lo = leaf_at(&mut t, root, 0, 0, 1);
        let hi = leaf_at(&mut t, root, 0, 0, 2);
        for id in [lo, hi] {
            t.record_size(id, Expanse::new(10, 10), Expanse::new(10, 10));
        }
        t.resort(root);
        assert_eq!(t.topmost_at(root, Point::new(5, 5)), Some(hi));
        t.hide(hi);
        assert_eq!(t.topmost_at(root, Point::new(5, 5)), Some(lo));
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn ordered_always_sorted_permutation(
                specs in proptest::collection::vec((0i64..5, -50i32..50, -50i32..50), 0..24)
            ) {
                let mut t = Tree::new();
                let root = t.insert(Holder);
                for (layer, x, y) in &specs {
                    leaf_at(&mut t, root, *x, *y, *layer);
                }
                t.resort(root);

                // Permutation of the owned set.
                let mut owned = t.children(root).to_vec();
                let mut ord = t.ordered(root).to_vec();
                prop_assert_eq!(ord.len(), owned.len());
                owned.sort();
                ord.sort();
                prop_assert_eq!(&owned, &ord);

                // Sorted ascending by (layer, y, x).
                let keys: Vec<_> = t
                    .ordered(root)
                    .iter()
                    .map(|c| (t.effective_layer(*c), t.rect(*c).tl.y, t.rect(*c).tl.x))
                    .collect();
                prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));

                // Idempotent.
                let once = t.ordered(root).to_vec();
                t.resort(root);
                prop_assert_eq!(t.ordered(root), once.as_slice());
            }
        }
    }
}
