//! Incremental search tracking.
//!
//! Users register search terms ("tracked queries"). A fan-out pass polls each
//! due query for results newer than its high-water mark, reschedules it by how
//! many subscribers are actively watching, deduplicates results per subscriber
//! across overlapping queries, and hands one chat message per result to the
//! delivery collaborator.
//!
//! The search source, persistence and delivery transport are traits bound
//! together through [`TypeConfig`]; [`MemTrackStore`] is an in-memory store
//! for embedding and tests.

mod config;
mod core;
mod delivery;
mod errors;
mod source;
mod storage;
mod type_config;

pub mod metrics;
pub mod model;
pub mod utils;

pub use config::*;
pub use core::*;
pub use delivery::*;
pub use errors::*;
pub use source::*;
pub use storage::*;
pub use type_config::*;


//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
