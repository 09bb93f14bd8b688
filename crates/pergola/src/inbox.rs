//! Non-blocking per-tick channel polling.
//!
//! Asynchronous collaborators (text composition, media decoding) hand the
//! engine a channel; the engine checks it exactly once per tick, never
//! waits, and observes a pending value with at most one tick of latency. A
//! closed channel silently degrades to a permanent no-op.

use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::debug;

/// A pending inbox wrapping a channel receiver.
pub struct Inbox<T> {
    rx: Receiver<T>,
    dead: bool,
}

impl<T> Inbox<T> {
    /// Wrap a receiver.
    pub fn new(rx: Receiver<T>) -> Self {
        Self { rx, dead: false }
    }

    /// Take one pending value, if any, without blocking.
    pub fn poll(&mut self) -> Option<T> {
        if self.dead {
            return None;
        }
        match self.rx.try_recv() {
            Ok(v) => Some(v),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                debug!("inbox channel closed, degrading to no-op");
                self.dead = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn poll_is_non_blocking_and_tolerates_close() {
        let (tx, rx) = mpsc::channel();
        let mut inbox = Inbox::new(rx);
        assert_eq!(inbox.poll(), None);
        tx.send(7).unwrap();
        assert_eq!(inbox.poll(), Some(7));
        drop(tx);
        assert_eq!(inbox.poll(), None);
        assert_eq!(inbox.poll(), None);
    }
}
