//! The fan-out pass engine.
//!
//! [`Tracker`] drives a pass; [`ResultFilter`] and [`IntervalScheduler`] are
//! pure; [`FanoutCollector`] lives for a single pass; [`BodyFormatter`] runs
//! once per delivered message.
mod fanout;
mod filter;
mod formatter;
mod scheduler;
mod tracker;

pub use fanout::*;
pub use filter::*;
pub use formatter::*;
pub use scheduler::*;
pub use tracker::*;
