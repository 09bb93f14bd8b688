//! Movable, resizable virtual sub-window.

use tracing::trace;

use crate::{
    ability::Ability,
    context::Context,
    event::{Event, Kind},
    geom::{Expanse, Point, Rect},
    layout::{Avail, layout_node},
    style::{StyleClass, StyleSheet},
    surface::Surface,
    tree::{Tree, WidgetId},
    widget::{Outcome, Widget},
    widgets::stack::Stack,
};

/// Height of the pane header band, and the side of each header button.
pub const HEADER: u32 = 24;

/// The closure run when a pane is closing. Runs before the pane is torn
/// down; a permanent pane treats the callback as a veto.
pub type CloseCallback = Box<dyn FnMut(&mut Context, &mut Pane)>;

/// A virtual sub-window hosted inside one physical surface: a titled header
/// with close/minimize/maximize buttons, a drag band, a resize handle, an
/// optional menu bar, a single content child, and per-pane overlays.
pub struct Pane {
    title: String,
    content: Option<WidgetId>,
    menu_bar: Option<WidgetId>,
    ability: Ability,
    closed: bool,
    minimized: bool,
    dragging: bool,
    resizing: bool,
    /// Awaiting first placement by a hosting stack's cascade.
    pending_place: bool,
    /// Size the user last resized to, which overrides content sizing.
    user_size: Option<Expanse>,
    on_close: Option<CloseCallback>,
}

impl Pane {
    /// Construct a pane. Most callers want [`Self::spawn`].
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
            menu_bar: None,
            ability: Ability::default(),
            closed: false,
            minimized: false,
            dragging: false,
            resizing: false,
            pending_place: true,
            user_size: None,
            on_close: None,
        }
    }

    /// Insert a pane into the tree, hidden until shown by a dialog start or
    /// by the host.
    pub fn spawn(tree: &mut Tree, title: impl Into<String>) -> WidgetId {
        let id = tree.insert(Self::new(title));
        tree.enable_overlay_host(id);
        tree.hide(id);
        id
    }

    /// Replace the pane's content child. The previous content subtree is
    /// destroyed.
    pub fn set_child(tree: &mut Tree, pane: WidgetId, child: WidgetId) {
        let old = tree.widget::<Self>(pane).expect("not a pane").content;
        if let Some(old) = old {
            tree.remove(old);
        }
        tree.append(pane, child);
        tree.widget_mut::<Self>(pane).expect("not a pane").content = Some(child);
        tree.mark_dirty();
    }

    /// Give the pane a menu bar, dispatched ahead of overlays and content.
    pub fn set_menu_bar(tree: &mut Tree, pane: WidgetId, bar: WidgetId) {
        let old = tree.widget::<Self>(pane).expect("not a pane").menu_bar;
        if let Some(old) = old {
            tree.remove(old);
        }
        tree.append(pane, bar);
        tree.widget_mut::<Self>(pane).expect("not a pane").menu_bar = Some(bar);
        tree.mark_dirty();
    }

    /// The pane title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the pane title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The pane's content child, if any.
    pub fn content(&self) -> Option<WidgetId> {
        self.content
    }

    /// The pane's abilities.
    pub fn ability(&self) -> &Ability {
        &self.ability
    }

    /// The pane's abilities, mutably.
    pub fn ability_mut(&mut self) -> &mut Ability {
        &mut self.ability
    }

    /// Has the pane been closed? Closed panes are removed from their hosting
    /// stack by the end-of-event sweep.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Is the pane minimized to its header?
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Install the closing callback.
    pub fn set_on_close(&mut self, cb: impl FnMut(&mut Context, &mut Self) + 'static) {
        self.on_close = Some(Box::new(cb));
    }

    /// Is the pane still waiting for its first placement?
    pub(crate) fn pending_place(&self) -> bool {
        self.pending_place
    }

    pub(crate) fn set_placed(&mut self) {
        self.pending_place = false;
    }

    /// User-initiated close: run the callback, honor a permanent veto, then
    /// tear down.
    fn close(&mut self, ctx: &mut Context) {
        trace!(pane = %self.title, "close requested");
        if let Some(mut cb) = self.on_close.take() {
            cb(ctx, self);
            self.on_close = Some(cb);
            if self.ability.permanent() {
                return;
            }
        }
        self.finish_close(ctx);
    }

    /// Tear the pane down without consulting the callback: hide it, destroy
    /// the content subtree unless preserved, and flag it closed for the
    /// hosting stack's sweep.
    pub(crate) fn finish_close(&mut self, ctx: &mut Context) {
        ctx.hide_self();
        if !self.ability.preserved()
            && let Some(content) = self.content.take()
        {
            ctx.tree().remove(content);
        }
        self.closed = true;
        ctx.mark_dirty();
    }

    /// Header hit zones, in absolute coordinates.
    fn zones(&self, r: Rect) -> PaneZones {
        let h = HEADER;
        let w = r.w;
        PaneZones {
            close: r.zone(w as i32 - h as i32, 0, h, h),
            minimize: r.zone(w as i32 - 2 * h as i32, 0, h, h),
            maximize: r.zone(w as i32 - 3 * h as i32, 0, h, h),
            title: r.zone(0, 0, w.saturating_sub(3 * h), h),
            resize: r.zone(w as i32 - h as i32, r.h as i32 - h as i32, h, h),
        }
    }

    fn handle_press(&mut self, ctx: &mut Context, pos: Point) {
        let r = ctx.abs_rect();
        let zones = self.zones(r);
        if zones.close.contains(pos) {
            self.close(ctx);
        } else if zones.minimize.contains(pos) {
            self.minimized = true;
        } else if zones.maximize.contains(pos) {
            if self.minimized {
                self.minimized = false;
            } else {
                // Restore to the parent's origin and take a fresh layout.
                self.user_size = None;
                let id = ctx.id();
                ctx.tree().move_to(id, Point::zero());
                ctx.mark_dirty();
            }
        } else if zones.title.contains(pos) {
            if !self.ability.fixed() {
                self.dragging = true;
            }
            let id = ctx.id();
            ctx.tree().bring_to_top(id);
        } else if !self.minimized && zones.resize.contains(pos) {
            if !self.ability.rigid() {
                self.resizing = true;
            }
            let id = ctx.id();
            ctx.tree().bring_to_top(id);
        } else if r.contains(pos) && !self.minimized {
            let id = ctx.id();
            ctx.tree().bring_to_top(id);
        }
    }
}

struct PaneZones {
    close: Rect,
    minimize: Rect,
    maximize: Rect,
    title: Rect,
    resize: Rect,
}

impl Widget for Pane {
    fn style_class(&self) -> StyleClass {
        StyleClass::Pane
    }

    fn layout(&mut self, ctx: &mut Context, avail: Avail) -> Expanse {
        let style = ctx.style();
        let m = style.margin;

        // A user resize overrides content-driven sizing.
        let bound = match self.user_size {
            Some(us) => Avail::new(
                if avail.unlimited_w() { us.w.max(1) } else { us.w.clamp(1, avail.w) },
                if avail.unlimited_h() { us.h.max(1) } else { us.h.clamp(1, avail.h) },
            ),
            None => avail,
        };
        let inner = bound.shrink(m);

        let mut header_total = HEADER;
        let mut content_w = 0u32;
        if let Some(bar) = self.menu_bar
            && ctx.tree().contains(bar)
        {
            ctx.layout_child(bar, inner);
            ctx.place(bar, 0, HEADER as i32);
            let bs = ctx.size_of(bar);
            header_total += bs.h;
            content_w = bs.w;
        }

        let mut content_h = header_total;
        if let Some(content) = self.content
            && ctx.tree().contains(content)
        {
            ctx.layout_child(content, inner.spend_h(header_total));
            ctx.place(content, m as i32, (header_total + m) as i32);
            let cs = ctx.size_of(content);
            content_h += cs.h;
            content_w = content_w.max(cs.w);
        }

        if let Some(us) = self.user_size {
            return us;
        }
        let grown = Expanse::new(content_w, content_h).union(style.min_size);
        Expanse::new(grown.w + m * 2, grown.h + m * 2)
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        let style = if self.minimized {
            ctx.class_style(StyleClass::Disable)
        } else {
            ctx.style()
        };
        let r = ctx.abs_rect();

        // Body frame, or header band only when minimized or plain.
        if !self.minimized && !self.ability.plain() {
            surface.fill_rect(r, style.bg);
            if style.line > 0 {
                surface.frame(r, style.line, style.border);
            }
        } else {
            surface.fill_rect(Rect::at(r.tl, Expanse::new(r.w, HEADER)), style.bg);
        }

        if !self.title.is_empty() {
            let tw = ctx.sheet().text_size(&self.title).w;
            let x = r.tl.x + r.w as i32 / 2 - tw as i32 / 2 - (HEADER * 3 / 2) as i32;
            surface.text(Point::new(x, r.tl.y), &self.title, style.fg);
        }

        let zones = self.zones(r);
        ctx.sprite(surface, "close", zones.close);
        ctx.sprite(surface, "minimize", zones.minimize);
        ctx.sprite(surface, "maximize", zones.maximize);

        if !self.minimized
            && let Some(content) = self.content
        {
            ctx.draw_child(surface, content);
        }

        ctx.draw_overlays(surface);

        // The menu bar composites over everything else in the pane.
        if let Some(bar) = self.menu_bar {
            ctx.draw_child(surface, bar);
        }
    }

    fn handle(&mut self, ctx: &mut Context, event: &Event) -> Outcome {
        // Focus loss reaches every part of the pane.
        if matches!(event.kind, Kind::Away { .. }) {
            if let Some(bar) = self.menu_bar {
                ctx.deliver(bar, event);
            }
            ctx.route_overlays(event);
            if let Some(content) = self.content
                && !self.minimized
            {
                ctx.deliver(content, event);
            }
            self.dragging = false;
            self.resizing = false;
            return Outcome::Consume;
        }

        // The menu bar has priority, then the pane's overlays.
        if let Some(bar) = self.menu_bar
            && ctx.deliver(bar, event).is_consumed()
        {
            return Outcome::Consume;
        }
        if ctx.route_overlays(event).is_consumed() {
            return Outcome::Consume;
        }

        // Header manipulation.
        if let Kind::MouseDown { pos, .. } | Kind::TouchDown { pos, .. } = event.kind {
            self.handle_press(ctx, pos);
            if self.closed {
                return Outcome::Consume;
            }
        }

        if self.dragging {
            match event.kind {
                Kind::MouseUp { .. } => {
                    trace!(pane = %self.title, "drop");
                    self.dragging = false;
                }
                Kind::MouseMove { delta, .. } => {
                    let id = ctx.id();
                    ctx.tree().move_by(id, delta.x, delta.y);
                }
                _ => {}
            }
        } else if self.resizing {
            match event.kind {
                Kind::MouseUp { .. } => {
                    self.resizing = false;
                    ctx.mark_dirty();
                }
                Kind::MouseMove { delta, .. } => {
                    let cur = self.user_size.unwrap_or_else(|| ctx.size());
                    let grown = Expanse::new(
                        cur.w.saturating_add_signed(delta.x).max(HEADER * 3),
                        cur.h.saturating_add_signed(delta.y).max(HEADER),
                    );
                    self.user_size = Some(grown);
                    let id = ctx.id();
                    ctx.tree().set_size(id, grown);
                }
                _ => {}
            }
        }

        // Everything else reaches the content, unless minimized.
        if let Some(content) = self.content
            && !self.minimized
        {
            return ctx.deliver(content, event);
        }
        Outcome::Ignore
    }
}

/// Show a control as a dialog on a stack: panes are used as they are,
/// anything else is wrapped in a fresh pane. The pane is laid out against
/// the host size, centered, and appended above all current siblings.
pub(crate) fn open_dialog(
    tree: &mut Tree,
    sheet: &StyleSheet,
    stack: WidgetId,
    host: Expanse,
    dialog: WidgetId,
    title: &str,
    modal: bool,
) {
    let pane = if tree.is::<Pane>(dialog) {
        dialog
    } else {
        let id = Pane::spawn(tree, title);
        Pane::set_child(tree, id, dialog);
        id
    };
    {
        let p = tree.widget_mut::<Pane>(pane).expect("not a pane");
        p.title = title.to_string();
        p.ability.set_modal(modal);
        p.closed = false;
        p.pending_place = false;
    }
    tree.show(pane);
    if host.w > 0 && host.h > 0 {
        layout_node(tree, sheet, pane, Avail::new(host.w, host.h));
        let size = tree.size(pane);
        tree.move_to(
            pane,
            Point::new(
                host.w as i32 / 2 - size.w as i32 / 2,
                host.h as i32 / 2 - size.h as i32 / 2,
            ),
        );
    }
    Stack::append(tree, stack, pane);
    tree.mark_dirty();
}

/// Service a deferred close request once dispatch has unwound and the pane's
/// widget is back in its slot.
pub(crate) fn service_close(tree: &mut Tree, sheet: &StyleSheet, pane: WidgetId, run_callback: bool) {
    let Some(mut widget) = tree.take_widget(pane) else {
        return;
    };
    if let Some(p) = (widget.as_mut() as &mut dyn std::any::Any).downcast_mut::<Pane>() {
        let mut ctx = Context::new(tree, sheet, pane);
        if run_callback {
            p.close(&mut ctx);
        } else {
            p.finish_close(&mut ctx);
        }
    }
    tree.put_widget(pane, widget);
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        tutils::{Harness, Probe, ProbeLog, logged, probe_log},
        widgets::window::Window,
    };

    /// A 400x300 window showing one 168x128 pane centered at (116, 86),
    /// with a 60x40 probe as content.
    fn pane_window() -> (Harness, WidgetId, WidgetId, WidgetId, ProbeLog) {
        let log = probe_log();
        let mut tree = Tree::new();
        let win = Window::spawn(&mut tree, "main");
        let pane = Pane::spawn(&mut tree, "tool");
        let content = tree.insert(Probe::new("content", &log).sized(60, 40));
        Pane::set_child(&mut tree, pane, content);
        let mut h = Harness::new(tree, win, 400, 300);
        h.pergola.start_dialog(win, pane, "tool", false).unwrap();
        h.pergola.relayout_if_dirty();
        (h, win, pane, content, log)
    }

    #[test]
    fn dialog_start_centers_the_pane() {
        let (h, _win, pane, _content, _log) = pane_window();
        let r = h.pergola.tree.rect(pane);
        assert_eq!(r.tl, Point::new(116, 86));
        assert_eq!(r.size(), Expanse::new(168, 128));
    }

    #[test]
    fn title_band_drag_applies_pointer_deltas_until_release() {
        let (mut h, _win, pane, _content, _log) = pane_window();
        h.drag((150, 90), (180, 130));
        assert_eq!(h.pergola.tree.rect(pane).tl, Point::new(146, 126));
        // After release the pane stays put.
        h.mouse_to(10, 10);
        assert_eq!(h.pergola.tree.rect(pane).tl, Point::new(146, 126));
    }

    #[test]
    fn corner_handle_resize_persists_through_relayout() {
        let (mut h, _win, pane, _content, _log) = pane_window();
        h.drag((270, 200), (290, 210));
        assert_eq!(h.pergola.tree.size(pane), Expanse::new(188, 138));
        // The user size survives the next negotiated layout.
        h.pergola.tree.mark_dirty();
        h.pergola.relayout_if_dirty();
        assert_eq!(h.pergola.tree.size(pane), Expanse::new(188, 138));
        assert_eq!(h.pergola.tree.rect(pane).tl, Point::new(116, 86));
    }

    #[test]
    fn dragging_and_resizing_are_independent() {
        let (mut h, _win, pane, _content, _log) = pane_window();
        h.drag((150, 90), (160, 90));
        let after_drag = h.pergola.tree.rect(pane);
        h.drag((270 + 10, 200), (300, 220));
        let after_resize = h.pergola.tree.rect(pane);
        assert_eq!(after_resize.tl, after_drag.tl);
        assert!(after_resize.w > after_drag.w);
    }

    #[test]
    fn minimized_pane_dispatches_only_its_header() {
        let (mut h, _win, pane, _content, log) = pane_window();
        h.click(240, 90);
        assert!(h.pergola.tree.widget::<Pane>(pane).unwrap().is_minimized());

        log.borrow_mut().clear();
        h.click(150, 150);
        assert!(
            logged(&log, |k| matches!(k, Kind::MouseDown { .. })).is_empty(),
            "content saw a press while minimized"
        );

        // Maximize restores.
        h.click(220, 90);
        assert!(!h.pergola.tree.widget::<Pane>(pane).unwrap().is_minimized());
        log.borrow_mut().clear();
        h.click(150, 150);
        assert!(!logged(&log, |k| matches!(k, Kind::MouseDown { .. })).is_empty());
    }

    #[test]
    fn close_button_destroys_an_unpreserved_pane() {
        let (mut h, _win, pane, content, _log) = pane_window();
        h.click(270, 90);
        assert!(!h.pergola.tree.contains(pane));
        assert!(!h.pergola.tree.contains(content));
    }

    #[test]
    fn preserved_pane_survives_close_and_reshows_with_one_layout() {
        let (mut h, win, pane, content, _log) = pane_window();
        h.pergola
            .tree
            .widget_mut::<Pane>(pane)
            .unwrap()
            .ability_mut()
            .set_preserved(true);

        h.click(270, 90);
        let tree = &h.pergola.tree;
        assert!(tree.contains(pane));
        assert!(tree.is_hidden(pane));
        assert!(tree.widget::<Pane>(pane).unwrap().is_closed());
        assert!(tree.contains(content), "preserved subtree was destroyed");
        assert_eq!(tree.parent(pane), None, "closed pane still on the stack");

        // Re-show: the pane is laid out again, then layout settles.
        h.pergola.start_dialog(win, pane, "tool", false).unwrap();
        h.pergola.relayout_if_dirty();
        assert!(!h.pergola.tree.is_hidden(pane));
        assert!(!h.pergola.tree.widget::<Pane>(pane).unwrap().is_closed());
        let settled = h.pergola.tree.widget::<Probe>(content).unwrap().layouts();
        h.tick();
        assert_eq!(
            h.pergola.tree.widget::<Probe>(content).unwrap().layouts(),
            settled,
            "idle tick re-laid the tree"
        );
    }

    #[test]
    fn permanent_pane_vetoes_its_close() {
        let (mut h, _win, pane, _content, _log) = pane_window();
        let attempts = Rc::new(Cell::new(0));
        let seen = attempts.clone();
        {
            let p = h.pergola.tree.widget_mut::<Pane>(pane).unwrap();
            p.ability_mut().set_permanent(true);
            p.set_on_close(move |_ctx, _pane| seen.set(seen.get() + 1));
        }
        h.click(270, 90);
        assert_eq!(attempts.get(), 1);
        let tree = &h.pergola.tree;
        assert!(tree.contains(pane));
        assert!(!tree.is_hidden(pane));
        assert!(!tree.widget::<Pane>(pane).unwrap().is_closed());
    }

    #[test]
    fn press_anywhere_raises_the_pane_over_siblings() {
        let (mut h, win, pane, _content, log) = pane_window();
        let other = Pane::spawn(&mut h.pergola.tree, "other");
        let body = h
            .pergola
            .tree
            .insert(Probe::new("other body", &log).sized(60, 40));
        Pane::set_child(&mut h.pergola.tree, other, body);
        h.pergola.start_dialog(win, other, "other", false).unwrap();
        h.pergola.relayout_if_dirty();
        h.pergola.tree.move_to(other, Point::new(220, 10));
        let tree = &h.pergola.tree;
        assert!(tree.effective_layer(other) > tree.effective_layer(pane));

        // Clicking the first pane's body brings it back over the other.
        h.click(130, 150);
        let tree = &h.pergola.tree;
        assert!(tree.effective_layer(pane) > tree.effective_layer(other));
    }
}
