mod mem_track_store;

pub use mem_track_store::*;
