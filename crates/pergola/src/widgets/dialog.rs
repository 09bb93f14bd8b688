//! Result dialogs built on preserved panes.
//!
//! A dialog is a pane wrapping a column of {content, button row}. Its pane
//! is preserved, so a dismissed dialog survives and can be shown again. Each
//! button records a result, notifies the host callback, and closes the pane;
//! closing the pane any other way reports a cancel.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    engine::Pergola,
    tree::{Tree, WidgetId},
    widgets::{button::Button, column::Column, pane::Pane, row::Row},
};

/// The result a dialog resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogResult {
    /// Not resolved yet.
    #[default]
    None,
    /// Dismissed without choosing.
    Cancel,
    /// Confirmed.
    Ok,
    /// Answered yes.
    Yes,
    /// Answered no.
    No,
}

struct DialogShared {
    result: Cell<DialogResult>,
    on_result: RefCell<Option<Box<dyn FnMut(DialogResult)>>>,
}

impl DialogShared {
    fn send(&self, result: DialogResult) {
        self.result.set(result);
        let mut cb = self.on_result.borrow_mut().take();
        if let Some(f) = &mut cb {
            f(result);
        }
        let mut slot = self.on_result.borrow_mut();
        if slot.is_none() {
            *slot = cb;
        }
    }
}

/// A reusable OK/cancel-style dialog.
pub struct Dialog {
    pane: WidgetId,
    tray: WidgetId,
    shared: Rc<DialogShared>,
}

impl Dialog {
    /// Build a dialog around optional content. Add buttons before showing
    /// it.
    pub fn new(tree: &mut Tree, title: impl Into<String>, content: Option<WidgetId>) -> Self {
        let shared = Rc::new(DialogShared {
            result: Cell::new(DialogResult::None),
            on_result: RefCell::new(None),
        });

        let pane = Pane::spawn(tree, title);
        let body = tree.insert(Column::new());
        if let Some(content) = content {
            tree.append(body, content);
        }
        let tray = tree.insert(Row::new());
        tree.append(body, tray);
        Pane::set_child(tree, pane, body);

        let closing = shared.clone();
        let p = tree.widget_mut::<Pane>(pane).expect("dialog pane");
        p.ability_mut().set_preserved(true);
        p.set_on_close(move |_ctx, _pane| closing.send(DialogResult::Cancel));

        Self { pane, tray, shared }
    }

    /// The dialog's pane.
    pub fn pane(&self) -> WidgetId {
        self.pane
    }

    /// Add a button that records a result and closes the dialog.
    pub fn add_button(&self, tree: &mut Tree, label: impl Into<String>, result: DialogResult) {
        let shared = self.shared.clone();
        let pane = self.pane;
        let button = tree.insert(Button::new(label).on_click(move |ctx| {
            shared.send(result);
            // Close without the callback so the cancel report doesn't
            // overwrite the chosen result.
            ctx.tree().request_close(pane, false);
        }));
        tree.append(self.tray, button);
    }

    /// Add a button that records a result but leaves the dialog open.
    pub fn add_button_keep_open(
        &self,
        tree: &mut Tree,
        label: impl Into<String>,
        result: DialogResult,
    ) {
        let shared = self.shared.clone();
        let button = tree.insert(Button::new(label).on_click(move |_ctx| {
            shared.send(result);
        }));
        tree.append(self.tray, button);
    }

    /// Show the dialog above a control, reporting each resolution to the
    /// callback. A preserved dialog can be displayed again after closing.
    pub fn display(
        &self,
        p: &mut Pergola,
        over: WidgetId,
        on_result: impl FnMut(DialogResult) + 'static,
    ) -> crate::error::Result<()> {
        *self.shared.on_result.borrow_mut() = Some(Box::new(on_result));
        self.shared.result.set(DialogResult::None);
        let title = p
            .tree
            .widget::<Pane>(self.pane)
            .map(|w| w.title().to_string())
            .unwrap_or_default();
        p.start_dialog(over, self.pane, &title, true)
    }

    /// The last resolved result.
    pub fn result(&self) -> DialogResult {
        self.shared.result.get()
    }
}
