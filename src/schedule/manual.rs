//! Scheduler driven by virtual time

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{Scheduler, Task};

#[derive(Default)]
struct Timeline {
    now: Duration,
    next_seq: u64,
    pending: Vec<(Duration, u64, Task)>,
}

/// A [`Scheduler`] whose clock only moves when [`advance`](Self::advance)
/// is called. Tasks run on the caller's thread.
#[derive(Default)]
pub struct ManualScheduler {
    timeline: Mutex<Timeline>,
}

impl ManualScheduler {
    /// Create a scheduler at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn timeline(&self) -> MutexGuard<'_, Timeline> {
        self.timeline.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current virtual time
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timeline().now
    }

    /// Number of tasks not yet run
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timeline().pending.len()
    }

    /// Move the clock forward by `step`, running every task that falls due
    /// on the way in deadline order. Tasks scheduled by those tasks run too
    /// if they fall inside the step.
    pub fn advance(&self, step: Duration) {
        let target = self.now().saturating_add(step);

        loop {
            let task = {
                let mut timeline = self.timeline();
                let next = timeline
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, (due, _, _))| *due <= target)
                    .min_by_key(|(_, (due, seq, _))| (*due, *seq))
                    .map(|(index, _)| index);

                match next {
                    Some(index) => {
                        let (due, _, task) = timeline.pending.swap_remove(index);
                        timeline.now = due;
                        task
                    }
                    None => {
                        timeline.now = target;
                        break;
                    }
                }
            };
            task();
        }
    }

    /// Advance by fractional seconds
    pub fn advance_secs(&self, secs: f64) {
        self.advance(super::seconds(secs));
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut timeline = self.timeline();
        let due = timeline.now.saturating_add(delay);
        let seq = timeline.next_seq;
        timeline.next_seq += 1;
        timeline.pending.push((due, seq, task));
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let timeline = self.timeline();
        f.debug_struct("ManualScheduler")
            .field("now", &timeline.now)
            .field("pending", &timeline.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_runs_only_due_tasks() {
        let scheduler = ManualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for (delay, id) in [(300, 'c'), (100, 'a'), (200, 'b')] {
            let log = Arc::clone(&log);
            scheduler.schedule(
                Duration::from_millis(delay),
                Box::new(move || log.lock().unwrap().push(id)),
            );
        }

        scheduler.advance(Duration::from_millis(150));
        assert_eq!(*log.lock().unwrap(), vec!['a']);
        assert_eq!(scheduler.pending(), 2);

        scheduler.advance(Duration::from_millis(150));
        assert_eq!(*log.lock().unwrap(), vec!['a', 'b', 'c']);
        assert_eq!(scheduler.now(), Duration::from_millis(300));
    }

    #[test]
    fn test_same_deadline_keeps_schedule_order() {
        let scheduler = ManualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for id in 0..5 {
            let log = Arc::clone(&log);
            scheduler.schedule(
                Duration::from_millis(10),
                Box::new(move || log.lock().unwrap().push(id)),
            );
        }

        scheduler.advance(Duration::from_millis(10));
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_advance_secs_ignores_negative_steps() {
        let scheduler = ManualScheduler::new();
        scheduler.advance_secs(2.0);
        scheduler.advance_secs(-1.0);
        assert_eq!(scheduler.now(), Duration::from_secs(2));
    }

    #[test]
    fn test_saturates_at_end_of_time() {
        let scheduler = ManualScheduler::new();
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);

        scheduler.advance(Duration::from_secs(5));
        scheduler.schedule(Duration::MAX, Box::new(move || *flag.lock().unwrap() = true));
        scheduler.advance(Duration::from_secs(3600));
        assert!(!*ran.lock().unwrap());

        scheduler.advance(Duration::MAX);
        assert!(*ran.lock().unwrap());
        assert_eq!(scheduler.now(), Duration::MAX);
    }

    #[test]
    fn test_nested_tasks_see_their_own_time() {
        let scheduler = Arc::new(ManualScheduler::new());
        let seen = Arc::new(Mutex::new(None));

        let inner = Arc::clone(&scheduler);
        let sink = Arc::clone(&seen);
        scheduler.schedule(
            Duration::from_millis(100),
            Box::new(move || {
                let clock = Arc::clone(&inner);
                inner.schedule(
                    Duration::from_millis(50),
                    Box::new(move || *sink.lock().unwrap() = Some(clock.now())),
                );
            }),
        );

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(*seen.lock().unwrap(), Some(Duration::from_millis(150)));
    }
}
