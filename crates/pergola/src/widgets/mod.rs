//! Built-in widgets: the containers of the layout protocol, panes and their
//! hosting stack, the root window, menus, and a minimum set of leaves.

pub mod button;
pub mod column;
pub mod dialog;
pub mod grid;
pub mod label;
pub mod menu;
pub mod pane;
pub mod pinboard;
pub mod row;
pub mod stack;
pub mod window;

pub use button::Button;
pub use column::Column;
pub use dialog::{Dialog, DialogResult};
pub use grid::Grid;
pub use label::Label;
pub use menu::{Menu, MenuBar, MenuList};
pub use pane::Pane;
pub use pinboard::Pinboard;
pub use row::Row;
pub use stack::Stack;
pub use window::Window;
