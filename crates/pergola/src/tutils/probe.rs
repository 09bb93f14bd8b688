//! A leaf widget that records every event it receives.

use std::{cell::RefCell, rc::Rc};

use crate::{
    context::Context,
    event::{Event, Kind},
    geom::Expanse,
    layout::Avail,
    state::WidgetName,
    widget::{Outcome, Widget},
};

/// The shared log probes append to: (probe name, event payload).
pub type ProbeLog = Rc<RefCell<Vec<(String, Kind)>>>;

/// Construct an empty probe log.
pub fn probe_log() -> ProbeLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Names in a log matching a payload predicate, in order.
pub fn logged(log: &ProbeLog, pred: impl Fn(&Kind) -> bool) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|(_, k)| pred(k))
        .map(|(n, _)| n.clone())
        .collect()
}

/// A fixed-size leaf that records events into a shared log.
pub struct Probe {
    name: String,
    size: Expanse,
    outcome: Outcome,
    log: ProbeLog,
    layouts: std::cell::Cell<u32>,
}

impl Probe {
    /// Construct a 10x10 probe that ignores everything it records.
    pub fn new(name: impl Into<String>, log: &ProbeLog) -> Self {
        Self {
            name: name.into(),
            size: Expanse::new(10, 10),
            outcome: Outcome::Ignore,
            log: log.clone(),
            layouts: std::cell::Cell::new(0),
        }
    }

    /// How many times this probe has been laid out.
    pub fn layouts(&self) -> u32 {
        self.layouts.get()
    }

    /// Build a probe with a natural size.
    pub fn sized(mut self, w: u32, h: u32) -> Self {
        self.size = Expanse::new(w, h);
        self
    }

    /// Build a probe that consumes everything it records.
    pub fn consuming(mut self) -> Self {
        self.outcome = Outcome::Consume;
        self
    }
}

impl Widget for Probe {
    fn layout(&mut self, _ctx: &mut Context, _avail: Avail) -> Expanse {
        self.layouts.set(self.layouts.get() + 1);
        self.size
    }

    fn handle(&mut self, _ctx: &mut Context, event: &Event) -> Outcome {
        self.log
            .borrow_mut()
            .push((self.name.clone(), event.kind.clone()));
        self.outcome
    }

    fn name(&self) -> WidgetName {
        WidgetName::convert(&self.name)
    }
}
