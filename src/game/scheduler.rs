use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// A cancelable repeating timer
///
/// Arming an armed scheduler replaces its period; at most one timer is live
/// at a time.
pub trait Scheduler {
    /// Start firing every `period`, first firing one period from now
    fn arm(&mut self, period: Duration);
    /// Stop firing
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
}

/// [`Scheduler`] backed by a tokio interval
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    interval: Option<Interval>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self { interval: None }
    }

    /// Resolve at the next firing; never resolves while disarmed
    pub async fn fired(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    #[cfg(test)]
    pub(crate) fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }
}

impl Scheduler for IntervalScheduler {
    fn arm(&mut self, period: Duration) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }
}
