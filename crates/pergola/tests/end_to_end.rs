//! Full-engine scenarios: synthesized input routed through a real window.

use std::{cell::Cell, rc::Rc, sync::mpsc};

use pergola::{
    Kind, Tree,
    tutils::{Harness, Probe, logged, probe_log},
    widgets::{Button, Column, Dialog, DialogResult, Menu, MenuBar, Pane, Window},
};

fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let c = Rc::new(Cell::new(0));
    (c.clone(), c)
}

/// A 400x300 window whose content is a column with two buttons. A click in
/// the second button's band must reach it alone.
fn two_button_window() -> (Harness, Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let mut tree = Tree::new();
    let win = Window::spawn(&mut tree, "main");
    let col = tree.insert(Column::new());

    let (hits1, count1) = counter();
    let (hits2, count2) = counter();
    let b1 = tree.insert(Button::new("one").on_click(move |_| hits1.set(hits1.get() + 1)));
    let b2 = tree.insert(Button::new("two").on_click(move |_| hits2.set(hits2.get() + 1)));
    tree.append(col, b1);
    tree.append(col, b2);
    Window::set_content(&mut tree, win, col);

    (Harness::new(tree, win, 400, 300), count1, count2)
}

#[test]
fn click_fires_only_the_button_under_the_pointer() {
    let (mut h, count1, count2) = two_button_window();
    // Button two occupies (8, 40)..(80, 72) in absolute coordinates.
    h.click(20, 50);
    assert_eq!(count2.get(), 1, "button two did not fire");
    assert_eq!(count1.get(), 0, "button one fired as well");

    h.click(20, 20);
    assert_eq!(count1.get(), 1);
    assert_eq!(count2.get(), 1);
}

#[test]
fn clicks_outside_every_widget_fire_nothing() {
    let (mut h, count1, count2) = two_button_window();
    h.click(300, 250);
    assert_eq!((count1.get(), count2.get()), (0, 0));
}

#[test]
fn dialog_buttons_resolve_and_preserve_the_dialog() {
    let mut tree = Tree::new();
    let win = Window::spawn(&mut tree, "main");
    let dialog = Dialog::new(&mut tree, "confirm", None);
    dialog.add_button(&mut tree, "ok", DialogResult::Ok);
    let mut h = Harness::new(tree, win, 400, 300);

    let seen = Rc::new(Cell::new(DialogResult::None));
    let sink = seen.clone();
    dialog
        .display(&mut h.pergola, win, move |r| sink.set(r))
        .unwrap();
    h.pergola.relayout_if_dirty();

    // The ok button sits at (128, 122)..(200, 154) inside the centered pane.
    h.click(140, 130);
    assert_eq!(dialog.result(), DialogResult::Ok);
    assert_eq!(seen.get(), DialogResult::Ok);

    // Preserved: the pane survives, hidden and off the stack, reusable.
    let pane = dialog.pane();
    assert!(h.pergola.tree.contains(pane));
    assert!(h.pergola.tree.is_hidden(pane));
    assert_eq!(h.pergola.tree.parent(pane), None);

    let again = Rc::new(Cell::new(DialogResult::None));
    let sink = again.clone();
    dialog
        .display(&mut h.pergola, win, move |r| sink.set(r))
        .unwrap();
    h.pergola.relayout_if_dirty();
    assert_eq!(dialog.result(), DialogResult::None);
    h.click(140, 130);
    assert_eq!(again.get(), DialogResult::Ok);
}

#[test]
fn closing_a_dialog_by_its_pane_button_reports_cancel() {
    let mut tree = Tree::new();
    let win = Window::spawn(&mut tree, "main");
    let dialog = Dialog::new(&mut tree, "confirm", None);
    dialog.add_button(&mut tree, "ok", DialogResult::Ok);
    let mut h = Harness::new(tree, win, 400, 300);

    let seen = Rc::new(Cell::new(DialogResult::None));
    let sink = seen.clone();
    dialog
        .display(&mut h.pergola, win, move |r| sink.set(r))
        .unwrap();
    h.pergola.relayout_if_dirty();

    // The pane's close button: header starts at (116, 86), close zone is the
    // rightmost header square.
    h.click(270, 90);
    assert_eq!(seen.get(), DialogResult::Cancel);
    assert!(h.pergola.tree.is_hidden(dialog.pane()));
}

#[test]
fn menu_items_fire_and_the_list_folds_away() {
    let mut tree = Tree::new();
    let win = Window::spawn(&mut tree, "main");
    let bar = MenuBar::spawn(&mut tree);
    let menu = MenuBar::add_menu(&mut tree, bar, "File");
    let (hits, fired) = counter();
    Menu::add_item(&mut tree, menu, "New", |_| {});
    Menu::add_item(&mut tree, menu, "Quit", move |_| hits.set(hits.get() + 1));
    Window::set_menu_bar(&mut tree, win, bar);

    let (content_hits, content_fired) = counter();
    let col = tree.insert(Column::new());
    let button = tree
        .insert(Button::new("act").on_click(move |_| content_hits.set(content_hits.get() + 1)));
    tree.append(col, button);
    Window::set_content(&mut tree, win, col);

    let mut h = Harness::new(tree, win, 400, 300);
    let list = h.pergola.tree.widget::<Menu>(menu).unwrap().list();

    // Open the menu, then take the second item.
    h.click(10, 10);
    assert!(!h.pergola.tree.is_hidden(list));
    h.click(10, 45);
    assert_eq!(fired.get(), 1, "menu item did not fire");
    assert!(h.pergola.tree.is_hidden(list), "list stayed open");

    // With the menu closed, content clicks pass through the bar's band.
    // The content button occupies (8, 28)..(80, 60).
    h.click(20, 40);
    assert_eq!(content_fired.get(), 1);

    // Reopen, then click outside both: the list folds without firing.
    h.click(10, 10);
    assert!(!h.pergola.tree.is_hidden(list));
    h.click(300, 200);
    assert_eq!(fired.get(), 1);
    assert!(h.pergola.tree.is_hidden(list));
}

#[test]
fn committed_text_reaches_the_focused_widget_within_a_tick() {
    let log = probe_log();
    let mut tree = Tree::new();
    let win = Window::spawn(&mut tree, "main");
    let col = tree.insert(Column::new());
    let field = tree.insert(Probe::new("field", &log).sized(60, 20));
    tree.append(col, field);
    Window::set_content(&mut tree, win, col);
    let mut h = Harness::new(tree, win, 400, 300);

    let (tx, rx) = mpsc::channel();
    h.pergola.set_text_inbox(rx);

    // Focus the field, then let the composition channel commit.
    h.click(20, 20);
    tx.send("héllo".to_string()).unwrap();
    h.tick();
    let commits = logged(&log, |k| matches!(k, Kind::Chars { .. }));
    assert_eq!(commits, vec!["field"]);

    // A closed channel degrades to a no-op.
    drop(tx);
    h.tick();
    h.tick();
}

#[test]
fn away_precedes_every_focus_handoff_end_to_end() {
    let log = probe_log();
    let mut tree = Tree::new();
    let win = Window::spawn(&mut tree, "main");
    let col = tree.insert(Column::new());
    let a = tree.insert(Probe::new("a", &log).sized(60, 20));
    let b = tree.insert(Probe::new("b", &log).sized(60, 20));
    tree.append(col, a);
    tree.append(col, b);
    Window::set_content(&mut tree, win, col);
    let mut h = Harness::new(tree, win, 400, 300);

    h.click(20, 20);
    log.borrow_mut().clear();
    // a is focused; clicking b must notify a exactly once before b hears
    // anything.
    h.click(20, 40);
    let entries = log.borrow();
    let first_away = entries
        .iter()
        .position(|(n, k)| n == "a" && matches!(k, Kind::Away { .. }))
        .expect("no Away to the outgoing widget");
    let first_to_b = entries
        .iter()
        .position(|(n, _)| n == "b")
        .expect("nothing reached the incoming widget");
    assert!(first_away < first_to_b);
    let aways: Vec<_> = entries
        .iter()
        .filter(|(_, k)| matches!(k, Kind::Away { .. }))
        .collect();
    assert_eq!(aways.len(), 1);
    drop(entries);

    // Pane drags and window drawing do not disturb the focus protocol.
    h.render();
    assert!(!h.surface.ops.is_empty());
}

#[test]
fn draw_order_composites_dialogs_last() {
    let mut tree = Tree::new();
    let win = Window::spawn(&mut tree, "main");
    let col = tree.insert(Column::new());
    let label = tree.insert(pergola::widgets::Label::new("under"));
    tree.append(col, label);
    Window::set_content(&mut tree, win, col);
    let pane = Pane::spawn(&mut tree, "over");
    let mut h = Harness::new(tree, win, 400, 300);
    h.pergola.start_dialog(win, pane, "over", true).unwrap();
    h.render();

    let texts = h.surface.texts();
    let under = texts.iter().position(|t| *t == "under").unwrap();
    let over = texts.iter().position(|t| *t == "over").unwrap();
    assert!(under < over, "dialog pane drew beneath the content");
}
