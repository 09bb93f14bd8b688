//! Menu bar, menus, and their drop-down item lists.
//!
//! A menu's item list opens as an overlay on the nearest overlay host, so it
//! composites above the normal tree and gets first refusal on events. The
//! list dismisses itself when an item fires or when focus moves away.

use tracing::warn;

use crate::{
    context::Context,
    event::{Event, Kind},
    geom::Expanse,
    layout::Avail,
    style::StyleClass,
    surface::Surface,
    tree::{Tree, WidgetId},
    widget::{Outcome, Widget},
    widgets::button::Callback,
};

/// Layer bump applied to an open item list.
const MENU_LAYER: i64 = 10;

/// A horizontal bar of menus, dispatched ahead of overlays and content.
#[derive(Default)]
pub struct MenuBar;

impl MenuBar {
    /// Insert a menu bar into the tree.
    pub fn spawn(tree: &mut Tree) -> WidgetId {
        tree.insert(Self)
    }

    /// Add a titled menu to the bar, returning the menu's id.
    pub fn add_menu(tree: &mut Tree, bar: WidgetId, title: impl Into<String>) -> WidgetId {
        let list = tree.insert(MenuList::default());
        tree.hide(list);
        let menu = tree.insert(Menu {
            title: title.into(),
            list,
        });
        tree.append(menu, list);
        tree.append(bar, menu);
        menu
    }
}

impl Widget for MenuBar {
    fn style_class(&self) -> StyleClass {
        StyleClass::Menu
    }

    fn layout(&mut self, ctx: &mut Context, avail: Avail) -> Expanse {
        let mut x = 0i32;
        let mut tallest = 0u32;
        for child in ctx.children() {
            if ctx.is_hidden(child) {
                continue;
            }
            ctx.layout_child(child, avail.with_w(crate::layout::UNLIMITED));
            ctx.place(child, x, 0);
            let size = ctx.size_of(child);
            x += size.w as i32;
            tallest = tallest.max(size.h);
        }
        // The bar spans the full width it is given.
        Expanse::new(
            if avail.unlimited_w() { x.max(0) as u32 } else { avail.w },
            tallest,
        )
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        ctx.fill_frame(surface);
        ctx.draw_children(surface);
    }

    fn handle(&mut self, ctx: &mut Context, event: &Event) -> Outcome {
        if matches!(event.kind, Kind::Away { .. }) {
            return ctx.route_children(event);
        }
        if event.is_press()
            && let Some(pos) = event.at()
        {
            let id = ctx.id();
            if let Some(hit) = ctx.tree().topmost_at(id, pos) {
                ctx.transfer_focus(Some(hit), event);
                return ctx.deliver(hit, event);
            }
            // Outside the bar: open lists still get the press, so they can
            // take an item or fold away, but the bar itself doesn't block
            // the layers below.
            let mut out = Outcome::Ignore;
            for menu in ctx.children() {
                if ctx.deliver(menu, event).is_consumed() {
                    out = Outcome::Consume;
                }
            }
            ctx.transfer_focus(None, event);
            return out;
        }
        let id = ctx.id();
        if let Some(focus) = ctx.tree().focus(id)
            && !ctx.is_hidden(focus)
        {
            ctx.deliver(focus, event);
            return Outcome::Consume;
        }
        Outcome::Ignore
    }
}

/// One titled menu in a bar. Clicking the title opens the item list.
pub struct Menu {
    title: String,
    list: WidgetId,
}

impl Menu {
    /// Add an item to the menu.
    pub fn add_item(
        tree: &mut Tree,
        menu: WidgetId,
        label: impl Into<String>,
        on_select: impl FnMut(&mut Context) + 'static,
    ) {
        let list = tree.widget::<Self>(menu).expect("not a menu").list;
        tree.widget_mut::<MenuList>(list)
            .expect("menu list")
            .items
            .push(MenuEntry {
                label: label.into(),
                on_select: Box::new(on_select),
            });
    }

    /// The menu's item list node.
    pub fn list(&self) -> WidgetId {
        self.list
    }

    fn open(&mut self, ctx: &mut Context) {
        let list = self.list;
        ctx.tree().show(list);
        ctx.tree().raise(list, MENU_LAYER);
        if let Err(e) = ctx.start_overlay(list) {
            warn!(error = %e, "menu list has no overlay host");
        }
        ctx.mark_dirty();
    }
}

impl Widget for Menu {
    fn style_class(&self) -> StyleClass {
        StyleClass::Menu
    }

    fn layout(&mut self, ctx: &mut Context, _avail: Avail) -> Expanse {
        let style = ctx.style();
        let text = ctx.sheet().text_size(&self.title);
        let size = Expanse::new(text.w + style.margin * 2, text.h + style.margin * 2);
        if !ctx.is_hidden(self.list) {
            ctx.layout_child(self.list, Avail::unlimited());
            ctx.place(self.list, 0, size.h as i32);
        }
        size
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        let style = ctx.style();
        let r = ctx.abs_rect();
        surface.fill_rect(r, style.bg);
        let m = style.margin as i32;
        surface.text(r.tl.shift(m, m), &self.title, style.fg);
        // The open list draws through the overlay host, not here.
    }

    fn handle(&mut self, ctx: &mut Context, event: &Event) -> Outcome {
        if matches!(event.kind, Kind::Away { .. }) {
            // Not for us: fold the list away.
            ctx.deliver(self.list, event);
            return Outcome::Ignore;
        }
        // An open list gets first refusal on everything.
        let was_open = !ctx.is_hidden(self.list);
        if was_open && ctx.deliver(self.list, event).is_consumed() {
            return Outcome::Consume;
        }
        if let Kind::MouseDown { pos, .. } | Kind::TouchDown { pos, .. } = event.kind
            && ctx.abs_rect().contains(pos)
        {
            // A press on the title toggles: the outside-press fold above
            // already closed an open list.
            if !was_open {
                self.open(ctx);
            }
            return Outcome::Consume;
        }
        Outcome::Ignore
    }
}

/// One entry in a menu list.
struct MenuEntry {
    label: String,
    on_select: Callback,
}

/// The drop-down list of a menu, registered as an overlay while open.
#[derive(Default)]
pub struct MenuList {
    items: Vec<MenuEntry>,
}

impl MenuList {
    fn row_height(&self, ctx: &Context) -> u32 {
        let style = ctx.style();
        ctx.sheet().cell.h + style.margin
    }

    fn dismiss(&mut self, ctx: &mut Context) {
        let id = ctx.id();
        if ctx.tree().is_hidden(id) {
            return;
        }
        ctx.hide_self();
        ctx.tree().raise(id, -MENU_LAYER);
        let _ = ctx.end_overlay(id);
    }
}

impl Widget for MenuList {
    fn style_class(&self) -> StyleClass {
        StyleClass::Menu
    }

    fn layout(&mut self, ctx: &mut Context, _avail: Avail) -> Expanse {
        let style = ctx.style();
        let row = self.row_height(ctx);
        let mut widest = 0u32;
        for item in &self.items {
            widest = widest.max(ctx.sheet().text_size(&item.label).w);
        }
        Expanse::new(
            widest + style.margin * 2,
            self.items.len() as u32 * row + style.margin * 2,
        )
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        let style = ctx.style();
        let r = ctx.abs_rect();
        surface.fill_rect(r, style.bg);
        if style.line > 0 {
            surface.frame(r, style.line, style.border);
        }
        let row = self.row_height(ctx);
        let m = style.margin as i32;
        for (i, item) in self.items.iter().enumerate() {
            surface.text(
                r.tl.shift(m, m + i as i32 * row as i32),
                &item.label,
                style.fg,
            );
        }
    }

    fn handle(&mut self, ctx: &mut Context, event: &Event) -> Outcome {
        if matches!(event.kind, Kind::Away { .. }) {
            self.dismiss(ctx);
            return Outcome::Consume;
        }
        if let Kind::MouseDown { pos, .. } | Kind::TouchDown { pos, .. } = event.kind {
            let r = ctx.abs_rect();
            if !r.contains(pos) {
                // Click-outside folds the list away and falls through.
                self.dismiss(ctx);
                return Outcome::Ignore;
            }
            let style = ctx.style();
            let row = self.row_height(ctx) as i32;
            let off = pos.y - r.tl.y - style.margin as i32;
            let index = if off >= 0 { off / row } else { -1 };
            if index >= 0 && (index as usize) < self.items.len() {
                let mut cb = std::mem::replace(
                    &mut self.items[index as usize].on_select,
                    Box::new(|_| {}),
                );
                cb(ctx);
                self.items[index as usize].on_select = cb;
            }
            self.dismiss(ctx);
            return Outcome::Consume;
        }
        Outcome::Ignore
    }
}
