//! Repeat an action until a deadline or cancellation

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::Scheduler;

type Tick = Box<dyn FnMut() + Send>;
type Finish = Box<dyn FnOnce() + Send>;

struct State {
    tick: Option<Tick>,
    finish: Option<Finish>,
    finished: bool,
}

type Shared = Arc<Mutex<State>>;

fn lock(state: &Shared) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs a tick every `interval` until the deadline passes or the handle is
/// cancelled, then runs the finish action exactly once.
///
/// No tick starts after finish has started. On a scheduler that runs one
/// task at a time ([`TimerThread`](super::TimerThread),
/// [`ManualScheduler`](super::ManualScheduler)) a tick also never overlaps
/// finish; a scheduler running tasks in parallel, or a `cancel` from another
/// thread, can let a tick already in progress overlap it. Dropping the handle
/// does not cancel; the deadline still applies.
#[derive(Clone)]
pub struct Repeat {
    state: Shared,
}

impl Repeat {
    /// Start repeating on `scheduler`.
    ///
    /// The first tick runs one `interval` after start. `finish` runs at
    /// `deadline` even if that falls between ticks.
    pub fn until<T, F>(
        scheduler: Arc<dyn Scheduler>,
        interval: Duration,
        deadline: Duration,
        tick: T,
        finish: F,
    ) -> Self
    where
        T: FnMut() + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let state: Shared = Arc::new(Mutex::new(State {
            tick: Some(Box::new(tick)),
            finish: Some(Box::new(finish)),
            finished: false,
        }));

        let on_deadline = Arc::clone(&state);
        scheduler.schedule(deadline, Box::new(move || complete(&on_deadline)));

        // A zero interval would spin the scheduler forever
        if !interval.is_zero() {
            schedule_tick(scheduler, interval, Arc::clone(&state));
        }

        Self { state }
    }

    /// Stop now and run the finish action, if it has not run yet
    pub fn cancel(&self) {
        complete(&self.state);
    }

    /// Check if the finish action has run
    #[must_use]
    pub fn is_finished(&self) -> bool {
        lock(&self.state).finished
    }
}

impl std::fmt::Debug for Repeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repeat")
            .field("finished", &self.is_finished())
            .finish()
    }
}

fn schedule_tick(scheduler: Arc<dyn Scheduler>, interval: Duration, state: Shared) {
    let next = Arc::clone(&scheduler);
    scheduler.schedule(
        interval,
        Box::new(move || {
            if run_tick(&state) {
                schedule_tick(next, interval, state);
            }
        }),
    );
}

/// Run one tick outside the lock. Returns whether to keep going.
fn run_tick(state: &Shared) -> bool {
    let Some(mut tick) = lock(state).tick.take() else {
        return false;
    };
    tick();

    let mut guard = lock(state);
    if guard.finished {
        return false;
    }
    guard.tick = Some(tick);
    true
}

fn complete(state: &Shared) {
    let finish = {
        let mut guard = lock(state);
        if guard.finished {
            return;
        }
        guard.finished = true;
        guard.tick = None;
        guard.finish.take()
    };
    if let Some(finish) = finish {
        finish();
    }
}
