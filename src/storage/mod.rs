//! Persistence seam for tracked queries and their subscribers.
mod adaptors;
mod track_store;

pub use adaptors::*;
pub use track_store::*;
