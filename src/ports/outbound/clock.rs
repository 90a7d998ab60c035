use chrono::{DateTime, Utc};

/// Source of the current instant, injected so freshness and cache expiry can
/// be driven deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
