//! Background timer thread
//!
//! A single worker keeps a min-heap of deadlines and sleeps on its command
//! channel until the next one is due. Handles are cheap clones of the
//! channel's sender. Once every handle is gone the worker drains the timers
//! it still holds and exits, so pending effects always complete.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use super::{MAX_DELAY, Scheduler, Task};

/// A scheduled task waiting in the heap
struct Entry {
    due: Instant,
    seq: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the earliest deadline sits on top of the max-heap
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Handle to the timer thread
#[derive(Clone)]
pub struct TimerThread {
    sender: Sender<(Instant, Task)>,
}

impl TimerThread {
    /// Spawn the worker thread
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to create the thread
    pub fn spawn() -> std::io::Result<Self> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        thread::Builder::new()
            .name("sfx-timer".into())
            .spawn(move || run(&receiver))?;
        log::debug!("Timer thread started");
        Ok(Self { sender })
    }
}

impl Scheduler for TimerThread {
    fn schedule(&self, delay: Duration, task: Task) {
        let now = Instant::now();
        let due = now
            .checked_add(delay.min(MAX_DELAY))
            .or_else(|| now.checked_add(Duration::from_secs(24 * 60 * 60)))
            .unwrap_or(now);
        if self.sender.send((due, task)).is_err() {
            log::warn!("Timer thread is gone; dropping task");
        }
    }
}

impl std::fmt::Debug for TimerThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerThread")
            .field("queued", &self.sender.len())
            .finish()
    }
}

fn run(receiver: &Receiver<(Instant, Task)>) {
    let mut heap = BinaryHeap::new();
    let mut next_seq = 0u64;
    let mut connected = true;

    loop {
        while heap
            .peek()
            .is_some_and(|entry: &Entry| entry.due <= Instant::now())
        {
            if let Some(entry) = heap.pop() {
                (entry.task)();
            }
        }

        let next_due = heap.peek().map(|entry| entry.due);
        let received = match (next_due, connected) {
            (None, false) => break,
            (Some(due), false) => {
                thread::sleep(due.saturating_duration_since(Instant::now()));
                continue;
            }
            (Some(due), true) => receiver.recv_deadline(due),
            (None, true) => receiver
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok((due, task)) => {
                heap.push(Entry {
                    due,
                    seq: next_seq,
                    task,
                });
                next_seq += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => connected = false,
        }
    }

    log::debug!("Timer thread stopped");
}
