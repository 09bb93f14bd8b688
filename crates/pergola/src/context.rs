//! The per-call facade handed to widgets.
//!
//! A [`Context`] wraps the tree, the style sheet and the identity of the
//! widget currently being called. It carries the container routing protocol
//! (hit-test focus, tab cycling, the Away handshake), dialog and overlay
//! host discovery up the parent chain, and the draw traversal helpers.

use tracing::trace;

use crate::{
    error::{Error, Result},
    event::{Event, Key, Kind},
    geom::{Expanse, Point, Rect},
    layout::{Avail, layout_node},
    style::{Style, StyleClass, StyleSheet},
    surface::{Surface, sprite_or_fallback},
    tree::{Tree, WidgetId},
    widget::Outcome,
};

/// Deliver an event to a node: the widget is taken out of its slot, handed
/// the event with a context over the rest of the tree, and restored. The
/// node's draw order is refreshed afterwards, since handlers routinely move
/// or re-layer children.
pub(crate) fn deliver(tree: &mut Tree, sheet: &StyleSheet, id: WidgetId, ev: &Event) -> Outcome {
    if !tree.contains(id) || tree.is_hidden(id) {
        return Outcome::Ignore;
    }
    let Some(mut widget) = tree.take_widget(id) else {
        // Already being delivered to higher up the call stack.
        return Outcome::Ignore;
    };
    let out = widget.handle(&mut Context::new(tree, sheet, id), ev);
    tree.put_widget(id, widget);
    tree.resort(id);
    out
}

/// Draw a node: chrome first, children after, so children composite over
/// their parent.
pub(crate) fn draw_node(tree: &mut Tree, sheet: &StyleSheet, id: WidgetId, surface: &mut dyn Surface) {
    if !tree.contains(id) || tree.is_hidden(id) {
        return;
    }
    let Some(mut widget) = tree.take_widget(id) else {
        return;
    };
    widget.draw(&mut Context::new(tree, sheet, id), surface);
    tree.put_widget(id, widget);
}

/// The state a widget call runs against.
pub struct Context<'a> {
    tree: &'a mut Tree,
    sheet: &'a StyleSheet,
    id: WidgetId,
}

impl<'a> Context<'a> {
    pub(crate) fn new(tree: &'a mut Tree, sheet: &'a StyleSheet, id: WidgetId) -> Self {
        Self { tree, sheet, id }
    }

    /// The id of the widget being called.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The tree, for structural operations.
    pub fn tree(&mut self) -> &mut Tree {
        self.tree
    }

    /// The style sheet in effect.
    pub fn sheet(&self) -> &StyleSheet {
        self.sheet
    }

    /// The widget's effective style: its node override, or the sheet entry
    /// for its class.
    pub fn style(&self) -> Style {
        self.tree
            .style_override(self.id)
            .unwrap_or_else(|| self.sheet.get(self.tree.class(self.id)))
    }

    /// Resolve a style by class.
    pub fn class_style(&self, class: StyleClass) -> Style {
        self.sheet.get(class)
    }

    /// Children in insertion (tab) order.
    pub fn children(&self) -> Vec<WidgetId> {
        self.tree.children(self.id).to_vec()
    }

    /// Children in draw order, topmost last.
    pub fn ordered(&self) -> Vec<WidgetId> {
        self.tree.ordered(self.id).to_vec()
    }

    /// Is a node hidden?
    pub fn is_hidden(&self, id: WidgetId) -> bool {
        self.tree.is_hidden(id)
    }

    /// The widget's own laid-out size.
    pub fn size(&self) -> Expanse {
        self.tree.size(self.id)
    }

    /// The widget's absolute bounds.
    pub fn abs_rect(&self) -> Rect {
        self.tree.abs_rect(self.id)
    }

    /// A child's laid-out size.
    pub fn size_of(&self, id: WidgetId) -> Expanse {
        self.tree.size(id)
    }

    /// How much of a child's natural size was clipped away.
    pub fn overflow_of(&self, id: WidgetId) -> Expanse {
        self.tree.overflow(id)
    }

    /// Lay a child out within the given availability.
    pub fn layout_child(&mut self, id: WidgetId, avail: Avail) {
        layout_node(self.tree, self.sheet, id, avail);
    }

    /// Position a child relative to this widget. Positioning a child is the
    /// parent's job; a widget never moves itself during layout.
    pub fn place(&mut self, id: WidgetId, x: i32, y: i32) {
        self.tree.move_to(id, Point::new(x, y));
    }

    /// Mark the tree as needing a layout pass.
    pub fn mark_dirty(&mut self) {
        self.tree.mark_dirty();
    }

    /// Hide this widget, clearing any focus reference to it.
    pub fn hide_self(&mut self) {
        self.tree.hide(self.id);
    }

    // ---- event routing -------------------------------------------------

    /// Deliver an event to an arbitrary node.
    pub fn deliver(&mut self, id: WidgetId, ev: &Event) -> Outcome {
        deliver(self.tree, self.sheet, id, ev)
    }

    /// The generic container routing step.
    ///
    /// Away broadcasts to every visible child and clears the local focus.
    /// Tab (on release) advances focus to the next visible sibling, wrapping,
    /// but only when a child is already focused. Press-like events re-aim
    /// focus at the topmost visible child under the pointer. Everything is
    /// then forwarded to the focused child; forwarding consumes the event
    /// for the layers below, whatever the child made of it.
    pub fn route_children(&mut self, ev: &Event) -> Outcome {
        let id = self.id;
        if let Kind::Away { .. } = ev.kind {
            let kids: Vec<WidgetId> = self.tree.ordered(id).to_vec();
            for child in kids.into_iter().rev() {
                if !self.tree.is_hidden(child) {
                    deliver(self.tree, self.sheet, child, ev);
                }
            }
            self.tree.set_focus_slot(id, None);
            self.tree.resort(id);
            return Outcome::Consume;
        }

        if let Kind::KeyUp { key: Key::Tab } = ev.kind
            && self.tree.focus(id).is_some()
        {
            self.focus_next(ev);
            return Outcome::Consume;
        }

        if ev.is_press()
            && let Some(pos) = ev.at()
            && let Some(hit) = self.tree.topmost_at(id, pos)
        {
            self.transfer_focus(Some(hit), ev);
        }

        if let Some(focus) = self.tree.focus(id)
            && !self.tree.is_hidden(focus)
        {
            deliver(self.tree, self.sheet, focus, ev);
            return Outcome::Consume;
        }
        Outcome::Ignore
    }

    /// Transfer this container's focus. Every other visible child receives
    /// an Away naming the incoming target before the focus record changes;
    /// the target itself never sees an Away, and receives a Focus event
    /// after the record is updated.
    pub fn transfer_focus(&mut self, target: Option<WidgetId>, cause: &Event) {
        let id = self.id;
        let current = self.tree.focus(id);
        if current == target {
            return;
        }
        match target {
            Some(t) => {
                trace!(container = %self.tree.name(id), to = %self.tree.name(t), "focus");
                let kids = self.tree.children(id).to_vec();
                for child in kids {
                    if child == t || self.tree.is_hidden(child) {
                        continue;
                    }
                    let away = Event {
                        origin: cause.origin,
                        mods: cause.mods,
                        kind: Kind::Away { to: Some(t) },
                    };
                    deliver(self.tree, self.sheet, child, &away);
                }
                self.tree.set_focus_slot(id, Some(t));
                let gained = Event {
                    origin: cause.origin,
                    mods: cause.mods,
                    kind: Kind::Focus { from: current },
                };
                deliver(self.tree, self.sheet, t, &gained);
            }
            None => self.tree.set_focus_slot(id, None),
        }
        self.tree.resort(id);
    }

    /// Advance focus to the next visible sibling, wrapping.
    pub fn focus_next(&mut self, cause: &Event) {
        let visible: Vec<WidgetId> = self
            .tree
            .children(self.id)
            .iter()
            .copied()
            .filter(|c| !self.tree.is_hidden(*c))
            .collect();
        if visible.is_empty() {
            return;
        }
        let next = match self
            .tree
            .focus(self.id)
            .and_then(|f| visible.iter().position(|v| *v == f))
        {
            Some(i) => visible[(i + 1) % visible.len()],
            None => visible[0],
        };
        self.transfer_focus(Some(next), cause);
    }

    // ---- overlays ------------------------------------------------------

    /// Offer an event to this widget's registered overlays.
    ///
    /// A press is consumed by the first overlay whose bounds contain it and
    /// ignored otherwise; every other event is forwarded to every overlay.
    pub fn route_overlays(&mut self, ev: &Event) -> Outcome {
        let overlays = self.tree.overlays(self.id);
        if overlays.is_empty() {
            return Outcome::Ignore;
        }
        if ev.is_press()
            && let Some(pos) = ev.at()
        {
            for o in overlays {
                if !self.tree.is_hidden(o) && self.tree.abs_rect(o).contains(pos) {
                    deliver(self.tree, self.sheet, o, ev);
                    return Outcome::Consume;
                }
            }
            return Outcome::Ignore;
        }
        let mut out = Outcome::Ignore;
        for o in overlays {
            if deliver(self.tree, self.sheet, o, ev).is_consumed() {
                out = Outcome::Consume;
            }
        }
        out
    }

    /// Register a control as an overlay on the nearest overlay host up the
    /// parent chain.
    pub fn start_overlay(&mut self, overlay: WidgetId) -> Result<()> {
        for a in self.tree.ancestors(self.id) {
            if self.tree.is_overlay_host(a) {
                self.tree.add_overlay(a, overlay);
                return Ok(());
            }
        }
        Err(Error::NoOverlayHost(self.tree.name(self.id).to_string()))
    }

    /// Deregister a previously registered overlay, symmetric with
    /// [`Self::start_overlay`].
    pub fn end_overlay(&mut self, overlay: WidgetId) -> Result<()> {
        for a in self.tree.ancestors(self.id) {
            if self.tree.is_overlay_host(a) {
                self.tree.remove_overlay(a, overlay);
                return Ok(());
            }
        }
        Err(Error::NoOverlayHost(self.tree.name(self.id).to_string()))
    }

    // ---- dialogs -------------------------------------------------------

    /// Show a control as a dialog on the nearest dialog host up the parent
    /// chain. Non-pane controls are wrapped in a fresh pane; panes are shown
    /// as they are.
    pub fn start_dialog(&mut self, dialog: WidgetId, title: &str, modal: bool) -> Result<()> {
        for a in self.tree.ancestors(self.id) {
            if let Some(stack) = self.tree.dialog_slot(a) {
                let host = self.tree.size(a);
                crate::widgets::pane::open_dialog(
                    self.tree, self.sheet, stack, host, dialog, title, modal,
                );
                return Ok(());
            }
        }
        Err(Error::NoDialogHost(self.tree.name(self.id).to_string()))
    }

    // ---- drawing -------------------------------------------------------

    /// Fill this widget's bounds with its style's background and border.
    pub fn fill_frame(&mut self, surface: &mut dyn Surface) {
        let r = self.abs_rect();
        let style = self.style();
        surface.fill_rect(r, style.bg);
        if style.line > 0 {
            surface.frame(r, style.line, style.border);
        }
    }

    /// Draw a frame in the focus style around the focused child, if any.
    pub fn draw_focus_ring(&mut self, surface: &mut dyn Surface) {
        if let Some(f) = self.tree.focus(self.id)
            && !self.tree.is_hidden(f)
        {
            let style = self.class_style(StyleClass::Focus);
            surface.frame(self.tree.abs_rect(f), style.line.max(1), style.border);
        }
    }

    /// Draw all visible children in draw order, bottom to top.
    pub fn draw_children(&mut self, surface: &mut dyn Surface) {
        for child in self.ordered() {
            draw_node(self.tree, self.sheet, child, surface);
        }
    }

    /// Draw a single child.
    pub fn draw_child(&mut self, surface: &mut dyn Surface, id: WidgetId) {
        draw_node(self.tree, self.sheet, id, surface);
    }

    /// Draw this widget's registered overlays, topmost last.
    pub fn draw_overlays(&mut self, surface: &mut dyn Surface) {
        for o in self.tree.overlays(self.id) {
            draw_node(self.tree, self.sheet, o, surface);
        }
    }

    /// Draw a named sprite, degrading to a visible error frame when the
    /// surface doesn't know the name.
    pub fn sprite(&mut self, surface: &mut dyn Surface, name: &str, dst: Rect) {
        sprite_or_fallback(surface, self.sheet, name, dst);
    }
}
