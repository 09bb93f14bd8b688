//! The engine: one logical tick per frame.
//!
//! `poll input → synthesize the event batch → dispatch each event to
//! completion, in order → service deferred closes → re-layout if dirty →
//! draw`. Nothing suspends mid-dispatch and nothing blocks; the only
//! asynchronous boundary is the text-commit inbox, polled non-blockingly
//! once per tick. The tree has exactly one logical writer, the tick running
//! on the owning thread, so no locking exists anywhere in the core.

use std::{sync::mpsc::Receiver, time::Duration};

use tracing::trace;

use crate::{
    context::{Context, deliver, draw_node},
    error::Result,
    event::{Event, Kind},
    geom::{Expanse, Point},
    inbox::Inbox,
    input::{InputSample, InputState},
    layout::{Avail, layout_node},
    style::StyleSheet,
    surface::Surface,
    tree::{Tree, WidgetId},
    widget::Outcome,
    widgets::{pane, stack::Stack},
};

/// The top-level engine owning the widget tree and the tick loop.
pub struct Pergola {
    /// The widget tree. Hosts mutate it freely between ticks.
    pub tree: Tree,
    sheet: StyleSheet,
    root: WidgetId,
    input: InputState,
    text_inbox: Option<Inbox<String>>,
    root_size: Option<Expanse>,
}

impl Pergola {
    /// Construct an engine over a tree and its root widget.
    pub fn new(tree: Tree, root: WidgetId, sheet: StyleSheet) -> Self {
        Self {
            tree,
            sheet,
            root,
            input: InputState::new(),
            text_inbox: None,
            root_size: None,
        }
    }

    /// The root widget.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// The style sheet in effect.
    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// Set the surface size. Triggers a fresh layout on the next tick or
    /// draw.
    pub fn set_root_size(&mut self, size: Expanse) {
        self.root_size = Some(size);
        self.tree.mark_dirty();
    }

    /// Attach the text-composition commit channel. Committed strings are
    /// observed within one tick and routed like keyboard input.
    pub fn set_text_inbox(&mut self, rx: Receiver<String>) {
        self.text_inbox = Some(Inbox::new(rx));
    }

    /// Run a closure with a [`Context`] rooted at a widget.
    pub fn with_ctx<T>(&mut self, id: WidgetId, f: impl FnOnce(&mut Context) -> T) -> T {
        f(&mut Context::new(&mut self.tree, &self.sheet, id))
    }

    /// Show a control as a dialog above `over`, on the nearest dialog host
    /// in its parent chain.
    pub fn start_dialog(
        &mut self,
        over: WidgetId,
        dialog: WidgetId,
        title: &str,
        modal: bool,
    ) -> Result<()> {
        self.with_ctx(over, |ctx| ctx.start_dialog(dialog, title, modal))
    }

    /// Dispatch one event through the tree, then run the end-of-event
    /// housekeeping: deferred pane closes and the closed-pane sweep of any
    /// stacks they lived on.
    pub fn dispatch(&mut self, ev: Event) -> Outcome {
        trace!(?ev.kind, "dispatch");
        let out = deliver(&mut self.tree, &self.sheet, self.root, &ev);
        for (id, run_callback) in self.tree.drain_pending_close() {
            pane::service_close(&mut self.tree, &self.sheet, id, run_callback);
            if let Some(parent) = self.tree.parent(id)
                && self.tree.is::<Stack>(parent)
            {
                Stack::sweep(&mut self.tree, parent);
            }
        }
        out
    }

    /// Run the dispatch half of a tick: convert the raw sample into the
    /// ordered batch and dispatch each event fully before the next. A
    /// disabled root skips the tick entirely.
    pub fn tick(&mut self, sample: &InputSample, dt: Duration) {
        if !self.tree.is_enabled(self.root) {
            return;
        }
        let mut batch = self.input.batch(self.root, sample, dt);
        if let Some(inbox) = &mut self.text_inbox
            && let Some(text) = inbox.poll()
        {
            let commit = Event::new(self.root, Kind::Chars { text });
            let after = batch
                .iter()
                .rposition(|e| {
                    matches!(
                        e.kind,
                        Kind::KeyDown { .. } | Kind::KeyUp { .. } | Kind::Chars { .. }
                    )
                })
                .map(|i| i + 1)
                .unwrap_or(1);
            batch.insert(after, commit);
        }
        for ev in batch {
            let _ = self.dispatch(ev);
        }
        self.relayout_if_dirty();
    }

    /// Re-negotiate layout from the root if anything structural changed.
    pub fn relayout_if_dirty(&mut self) {
        if !self.tree.take_dirty() {
            return;
        }
        let Some(size) = self.root_size else {
            return;
        };
        trace!("relayout");
        layout_node(&mut self.tree, &self.sheet, self.root, Avail::from(size));
        self.tree.move_to(self.root, Point::zero());
    }

    /// Draw the tree bottom to top. Layout is brought up to date first, so
    /// drawing never observes a stale arrangement.
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        self.relayout_if_dirty();
        draw_node(&mut self.tree, &self.sheet, self.root, surface);
    }

    /// One full frame: tick, then draw.
    pub fn frame(&mut self, sample: &InputSample, dt: Duration, surface: &mut dyn Surface) {
        self.tick(sample, dt);
        self.draw(surface);
    }

    /// Debug dump of the whole tree.
    pub fn dump(&self) -> String {
        self.tree.dump(self.root)
    }
}
