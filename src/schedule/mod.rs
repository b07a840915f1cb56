//! Timer-based scheduling for sound effects
//!
//! Effects never wait on real audio completion. They schedule work on a
//! [`Scheduler`] and hand back a [`Completion`] that a timer resolves.
//!
//! - [`TimerThread`]: one background thread serving every timer
//! - [`ManualScheduler`]: virtual time, advanced by hand (tests and tools)
//! - [`Repeat`]: run a tick at an interval until a deadline, then finish once

mod completion;
mod manual;
mod repeat;
mod timer;

use std::time::Duration;

pub use completion::{Completion, Resolver};
pub use manual::ManualScheduler;
pub use repeat::Repeat;
pub use timer::TimerThread;

/// Work to run when a timer fires
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay
///
/// Tasks scheduled with the same deadline run in the order they were
/// scheduled. There is no cancellation; callers that need it check their own
/// state when the task runs.
pub trait Scheduler: Send + Sync {
    /// Run `task` once `delay` has elapsed
    fn schedule(&self, delay: Duration, task: Task);
}

/// Longest delay a timer honours; anything longer is clamped to it
pub const MAX_DELAY: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Convert seconds to a [`Duration`]. Negative and NaN values become zero,
/// values past [`MAX_DELAY`] (infinity included) become `MAX_DELAY`.
#[must_use]
pub fn seconds(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).map_or(MAX_DELAY, |delay| delay.min(MAX_DELAY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_conversion() {
        assert_eq!(seconds(1.5), Duration::from_millis(1500));
        assert_eq!(seconds(0.0), Duration::ZERO);
        assert_eq!(seconds(-2.0), Duration::ZERO);
        assert_eq!(seconds(f64::NAN), Duration::ZERO);
        assert_eq!(seconds(f64::INFINITY), MAX_DELAY);
        assert_eq!(seconds(1e19), MAX_DELAY);
        assert_eq!(seconds(1e300), MAX_DELAY);
    }
}
