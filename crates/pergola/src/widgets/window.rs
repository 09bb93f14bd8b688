//! The root window widget.

use crate::{
    ability::Ability,
    context::Context,
    event::{Event, Kind},
    geom::Expanse,
    layout::Avail,
    surface::Surface,
    tree::{Tree, WidgetId},
    widget::{Outcome, Widget},
    widgets::stack::Stack,
};

/// The root of a widget tree: one content child, an optional menu bar, an
/// overlay registry, and a dialog stack layered over everything.
///
/// Event precedence, top to bottom: dialog stack, menu bar, overlays,
/// content. Each layer may consume an event and stop the layers below from
/// seeing it.
pub struct Window {
    title: String,
    dialogs: WidgetId,
    menu_bar: Option<WidgetId>,
    content: Option<WidgetId>,
    ability: Ability,
}

impl Window {
    /// Insert a window and its dialog stack into the tree.
    pub fn spawn(tree: &mut Tree, title: impl Into<String>) -> WidgetId {
        let dialogs = tree.insert(Stack::new());
        let id = tree.insert(Self {
            title: title.into(),
            dialogs,
            menu_bar: None,
            content: None,
            ability: Ability::default(),
        });
        tree.append(id, dialogs);
        tree.set_dialog_slot(id, dialogs);
        tree.enable_overlay_host(id);
        id
    }

    /// Replace the window's content child. The previous content subtree is
    /// destroyed.
    pub fn set_content(tree: &mut Tree, window: WidgetId, child: WidgetId) {
        let old = tree.widget::<Self>(window).expect("not a window").content;
        if let Some(old) = old {
            tree.remove(old);
        }
        tree.append(window, child);
        tree.widget_mut::<Self>(window).expect("not a window").content = Some(child);
        tree.mark_dirty();
    }

    /// Give the window a menu bar.
    pub fn set_menu_bar(tree: &mut Tree, window: WidgetId, bar: WidgetId) {
        let old = tree.widget::<Self>(window).expect("not a window").menu_bar;
        if let Some(old) = old {
            tree.remove(old);
        }
        tree.append(window, bar);
        tree.widget_mut::<Self>(window).expect("not a window").menu_bar = Some(bar);
        tree.mark_dirty();
    }

    /// The window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the window title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The window's dialog stack.
    pub fn dialogs(&self) -> WidgetId {
        self.dialogs
    }

    /// The window's content child, if any.
    pub fn content(&self) -> Option<WidgetId> {
        self.content
    }

    /// The window's abilities.
    pub fn ability(&self) -> &Ability {
        &self.ability
    }

    /// The window's abilities, mutably.
    pub fn ability_mut(&mut self) -> &mut Ability {
        &mut self.ability
    }
}

impl Widget for Window {
    fn layout(&mut self, ctx: &mut Context, avail: Avail) -> Expanse {
        assert!(
            !avail.unlimited_w() && !avail.unlimited_h(),
            "window: cannot lay out without space"
        );
        let m = ctx.style().margin;

        ctx.layout_child(self.dialogs, avail);
        ctx.place(self.dialogs, 0, 0);

        let mut top = 0u32;
        if let Some(bar) = self.menu_bar
            && ctx.tree().contains(bar)
        {
            ctx.layout_child(bar, avail);
            ctx.place(bar, 0, 0);
            top = ctx.size_of(bar).h;
        }

        if let Some(content) = self.content
            && ctx.tree().contains(content)
        {
            ctx.layout_child(content, avail.shrink(m).spend_h(top));
            ctx.place(content, m as i32, (top + m) as i32);
        }

        Expanse::new(avail.w, avail.h)
    }

    fn draw(&mut self, ctx: &mut Context, surface: &mut dyn Surface) {
        ctx.fill_frame(surface);
        if let Some(content) = self.content {
            ctx.draw_child(surface, content);
        }
        // Overlays over the content but under the menu bar.
        ctx.draw_overlays(surface);
        if let Some(bar) = self.menu_bar {
            ctx.draw_child(surface, bar);
        }
        // The dialog desktop composites over the whole window.
        if !ctx.tree().children(self.dialogs).is_empty() {
            ctx.draw_child(surface, self.dialogs);
        }
    }

    fn handle(&mut self, ctx: &mut Context, event: &Event) -> Outcome {
        // Focus loss fans out to every layer.
        if matches!(event.kind, Kind::Away { .. }) {
            ctx.deliver(self.dialogs, event);
            if let Some(bar) = self.menu_bar {
                ctx.deliver(bar, event);
            }
            ctx.route_overlays(event);
            if let Some(content) = self.content {
                ctx.deliver(content, event);
            }
            return Outcome::Consume;
        }

        // Dialogs take everything first.
        if ctx.deliver(self.dialogs, event).is_consumed() {
            return Outcome::Consume;
        }
        if let Some(bar) = self.menu_bar
            && ctx.deliver(bar, event).is_consumed()
        {
            return Outcome::Consume;
        }
        if ctx.route_overlays(event).is_consumed() {
            return Outcome::Consume;
        }
        if let Some(content) = self.content {
            return ctx.deliver(content, event);
        }
        Outcome::Ignore
    }
}
