use crate::snapshot::policies::DEFAULT_SECTION_TTL;
use std::time::Duration;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(900);
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_DEADLINE: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Tunables for one resolver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionSettings {
    /// Age after which a section is re-fetched
    pub section_ttl: Duration,
    /// Lifetime of a cached snapshot
    pub cache_ttl: Duration,
    /// Bound on every individual gateway call
    pub call_timeout: Duration,
    /// Bound on a whole resolution request
    pub request_deadline: Duration,
    /// Satellite lookups allowed in flight at once
    pub max_concurrency: usize,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            section_ttl: DEFAULT_SECTION_TTL,
            cache_ttl: DEFAULT_CACHE_TTL,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            request_deadline: DEFAULT_REQUEST_DEADLINE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}
