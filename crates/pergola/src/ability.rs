//! Window and pane abilities.

/// The abilities of a window or pane. The default is none of them: not
/// modal, not plain, not rigid, not fixed, not full, not permanent, not
/// preserved.
#[derive(Default)]
pub struct Ability {
    modal: bool,
    plain: bool,
    rigid: bool,
    fixed: bool,
    full: bool,
    permanent: bool,
    preserved: bool,
    on_changed: Option<Box<dyn FnMut(&Ability)>>,
}

impl std::fmt::Debug for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ability")
            .field("modal", &self.modal)
            .field("plain", &self.plain)
            .field("rigid", &self.rigid)
            .field("fixed", &self.fixed)
            .field("full", &self.full)
            .field("permanent", &self.permanent)
            .field("preserved", &self.preserved)
            .finish()
    }
}

impl Ability {
    /// Is the widget modal?
    pub fn modal(&self) -> bool {
        self.modal
    }

    /// Set whether the widget is modal.
    pub fn set_modal(&mut self, modal: bool) {
        self.modal = modal;
        self.changed();
    }

    /// Is the widget drawn without decorations?
    pub fn plain(&self) -> bool {
        self.plain
    }

    /// Set whether the widget is drawn without decorations.
    pub fn set_plain(&mut self, plain: bool) {
        self.plain = plain;
        self.changed();
    }

    /// Is the widget rigid, i.e. not user-resizable?
    pub fn rigid(&self) -> bool {
        self.rigid
    }

    /// Set whether the widget is rigid.
    pub fn set_rigid(&mut self, rigid: bool) {
        self.rigid = rigid;
        self.changed();
    }

    /// Is the widget fixed in place, i.e. not user-movable?
    pub fn fixed(&self) -> bool {
        self.fixed
    }

    /// Set whether the widget is fixed in place.
    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
        self.changed();
    }

    /// Does the widget want the full surface?
    pub fn full(&self) -> bool {
        self.full
    }

    /// Set whether the widget wants the full surface.
    pub fn set_full(&mut self, full: bool) {
        self.full = full;
        self.changed();
    }

    /// Is the widget permanent? A permanent widget cannot be closed by the
    /// user directly.
    pub fn permanent(&self) -> bool {
        self.permanent
    }

    /// Set whether the widget is permanent.
    pub fn set_permanent(&mut self, permanent: bool) {
        self.permanent = permanent;
        self.changed();
    }

    /// Is the widget preserved? A preserved widget is hidden rather than
    /// destroyed on close, so it can be reused.
    pub fn preserved(&self) -> bool {
        self.preserved
    }

    /// Set whether the widget is preserved on close.
    pub fn set_preserved(&mut self, preserved: bool) {
        self.preserved = preserved;
        self.changed();
    }

    /// Install a change-notification callback. For use by the widget that
    /// owns the abilities.
    pub fn on_changed(&mut self, cb: impl FnMut(&Self) + 'static) {
        self.on_changed = Some(Box::new(cb));
    }

    fn changed(&mut self) {
        if let Some(mut cb) = self.on_changed.take() {
            cb(self);
            self.on_changed = Some(cb);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    #[test]
    fn change_callback_fires() {
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        let mut a = Ability::default();
        a.on_changed(move |_| seen.set(seen.get() + 1));
        a.set_modal(true);
        a.set_preserved(true);
        assert!(a.modal() && a.preserved());
        assert_eq!(hits.get(), 2);
    }
}
