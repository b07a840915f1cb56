//! One-shot completion signal returned by every effect

use std::cell::OnceCell;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

/// Resolves to `true` once an effect has played out, or `false` when it was
/// skipped (muted).
///
/// A completion whose resolver is dropped unresolved reads as `false`.
#[derive(Debug)]
pub struct Completion {
    receiver: Receiver<bool>,
    value: OnceCell<bool>,
}

/// The sending half of a [`Completion`]
#[derive(Debug)]
pub struct Resolver {
    sender: Sender<bool>,
}

impl Completion {
    /// Create an unresolved completion and the resolver that settles it
    #[must_use]
    pub fn pending() -> (Resolver, Self) {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        (
            Resolver { sender },
            Self {
                receiver,
                value: OnceCell::new(),
            },
        )
    }

    /// Create a completion that is already settled
    #[must_use]
    pub fn resolved(value: bool) -> Self {
        let completion = Self::pending().1;
        let _ = completion.value.set(value);
        completion
    }

    /// Non-blocking check. `None` while the timer has not fired.
    pub fn try_result(&self) -> Option<bool> {
        if let Some(value) = self.value.get() {
            return Some(*value);
        }
        let value = match self.receiver.try_recv() {
            Ok(value) => value,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => false,
        };
        Some(*self.value.get_or_init(|| value))
    }

    /// Block until settled
    pub fn wait(self) -> bool {
        if let Some(value) = self.value.get() {
            return *value;
        }
        self.receiver.recv().unwrap_or(false)
    }

    /// Block for at most `timeout`. `None` if it has not settled by then.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<bool> {
        if let Some(value) = self.value.get() {
            return Some(*value);
        }
        let value = match self.receiver.recv_timeout(timeout) {
            Ok(value) => value,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => false,
        };
        Some(*self.value.get_or_init(|| value))
    }
}

impl Resolver {
    /// Settle the completion. Does nothing if the completion was dropped.
    pub fn resolve(self, value: bool) {
        let _ = self.sender.send(value);
    }
}
