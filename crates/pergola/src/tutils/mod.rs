//! Test utilities: a recording surface and an input-driving harness.

mod harness;
mod probe;
mod surface;

pub use harness::{Harness, TICK};
pub use probe::{Probe, ProbeLog, logged, probe_log};
pub use surface::{DrawOp, TestSurface};
