use crate::utils::time::add_minutes;
use crate::utils::time::Timestamp;

/// Immutable snapshot of how many watchers count toward a query's load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherLoad {
    pub active_count: usize,
}

impl WatcherLoad {
    pub fn new(active_count: usize) -> Self {
        Self { active_count }
    }

    /// Used when the load cannot be read: schedule as a single watcher.
    pub fn single() -> Self {
        Self { active_count: 1 }
    }
}

/// Computes when a tracked query becomes due again.
///
/// A single watcher gets the full base frequency; every additional active
/// watcher takes one minute off, down to a floor of one minute.
#[derive(Debug, Clone, Copy)]
pub struct IntervalScheduler {
    base_frequency_minutes: u64,
}

impl IntervalScheduler {
    pub fn new(base_frequency_minutes: u64) -> Self {
        Self {
            base_frequency_minutes: base_frequency_minutes.max(1),
        }
    }

    pub fn base_frequency_minutes(&self) -> u64 {
        self.base_frequency_minutes
    }

    pub fn interval_minutes(
        &self,
        load: WatcherLoad,
    ) -> u64 {
        let base = i64::try_from(self.base_frequency_minutes).unwrap_or(i64::MAX);
        let count = i64::try_from(load.active_count).unwrap_or(i64::MAX);

        let minutes = base.min(base.saturating_sub(count.saturating_sub(1)));
        minutes.max(1) as u64
    }

    /// Next poll time, relative to `now`.
    pub fn compute(
        &self,
        load: WatcherLoad,
        now: Timestamp,
    ) -> Timestamp {
        add_minutes(now, self.interval_minutes(load))
    }
}
