//! Scheduling clock helpers.
//!
//! Timestamps are milliseconds since the Unix epoch.

use std::time::{SystemTime, UNIX_EPOCH};

pub type Timestamp = u64;

pub const MILLIS_PER_MINUTE: u64 = 60_000;

/// return millisecond
pub fn now_ms() -> Timestamp {
    // A clock set before 1970 reads as the epoch rather than aborting a pass.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn minutes_to_ms(minutes: u64) -> u64 {
    minutes.saturating_mul(MILLIS_PER_MINUTE)
}

pub fn add_minutes(
    ts: Timestamp,
    minutes: u64,
) -> Timestamp {
    ts.saturating_add(minutes_to_ms(minutes))
}
