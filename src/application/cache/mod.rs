/// Process-wide snapshot cache shared across requests
mod snapshot_cache;

pub use snapshot_cache::SnapshotCache;
