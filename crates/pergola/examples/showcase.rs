//! Drives a small UI against the recording surface and prints what the
//! engine did: tree layout, dispatch, a dialog round-trip.
//!
//! Run with `RUST_LOG=pergola=trace` for the dispatch trace.

use std::{cell::Cell, rc::Rc};

use pergola::{
    Align, Tree,
    tutils::Harness,
    widgets::{Button, Column, Dialog, DialogResult, Grid, Label, Menu, MenuBar, Window},
};

fn main() {
    tracing_subscriber::fmt::init();

    let mut tree = Tree::new();
    let win = Window::spawn(&mut tree, "showcase");

    let bar = MenuBar::spawn(&mut tree);
    let file = MenuBar::add_menu(&mut tree, bar, "File");
    Menu::add_item(&mut tree, file, "New", |_| println!("menu: new"));
    Menu::add_item(&mut tree, file, "Quit", |_| println!("menu: quit"));
    Window::set_menu_bar(&mut tree, win, bar);

    let form = tree.insert(Grid::new(2, 2));
    let name_label = tree.insert(Label::new("name"));
    let name_value = tree.insert(Label::new("<empty>"));
    Grid::put(&mut tree, form, name_label, 0, 0, 1, Align::Start);
    Grid::put(&mut tree, form, name_value, 1, 0, 1, Align::Start);

    let clicks = Rc::new(Cell::new(0u32));
    let seen = clicks.clone();
    let press_me = tree.insert(
        Button::new("press me").on_click(move |_| seen.set(seen.get() + 1)),
    );
    Grid::put(&mut tree, form, press_me, 0, 1, 2, Align::Middle);

    let body = tree.insert(Column::new());
    tree.append(body, form);
    Window::set_content(&mut tree, win, body);

    let dialog = Dialog::new(&mut tree, "really quit?", None);
    dialog.add_button(&mut tree, "yes", DialogResult::Yes);
    dialog.add_button(&mut tree, "no", DialogResult::No);

    let mut h = Harness::new(tree, win, 640, 480);

    println!("--- initial tree ---");
    print!("{}", h.dump());

    // Click the button through real dispatch.
    let r = h.pergola.tree.abs_rect(press_me);
    h.click(r.tl.x + 5, r.tl.y + 5);
    println!("button clicks: {}", clicks.get());

    // Open the File menu and take an item.
    h.click(8, 8);
    let list = h.pergola.tree.widget::<Menu>(file).unwrap().list();
    let lr = h.pergola.tree.abs_rect(list);
    h.click(lr.tl.x + 4, lr.tl.y + 4);

    // Round-trip a dialog.
    dialog
        .display(&mut h.pergola, win, |result| {
            println!("dialog resolved: {result:?}");
        })
        .expect("window hosts dialogs");
    h.pergola.relayout_if_dirty();
    println!("--- with dialog ---");
    print!("{}", h.dump());

    let pane_rect = h.pergola.tree.abs_rect(dialog.pane());
    // The first tray button sits just under the pane header.
    h.click(pane_rect.tl.x + 20, pane_rect.tl.y + 40);

    h.render();
    println!("draw calls: {}", h.surface.ops.len());
}
