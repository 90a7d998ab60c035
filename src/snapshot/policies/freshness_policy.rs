use crate::snapshot::domain::{Section, SectionTimestamps};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::BTreeSet;
use std::time::Duration;

/// Default age after which a section is considered stale (5 minutes).
pub const DEFAULT_SECTION_TTL: Duration = Duration::from_secs(300);

/// Decides which sections of a snapshot must be re-fetched on this cycle.
///
/// A section is due when the caller requested it and its last successful
/// fetch is strictly older than the TTL. A section that was never fetched
/// counts as fetched at the Unix epoch, so it is always due when requested.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
    ttl: TimeDelta,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_TTL)
    }
}

impl FreshnessPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn should_fetch(
        &self,
        section: Section,
        requested: bool,
        last_fetched: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        if !requested {
            return false;
        }

        let last_fetched = last_fetched.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let due = now.signed_duration_since(last_fetched) > self.ttl;
        tracing::trace!(section = %section, %last_fetched, due, "freshness check");
        due
    }

    /// Applies [`Self::should_fetch`] to every requested section.
    pub fn due_sections(
        &self,
        requested: &BTreeSet<Section>,
        timestamps: &SectionTimestamps,
        now: DateTime<Utc>,
    ) -> BTreeSet<Section> {
        requested
            .iter()
            .copied()
            .filter(|section| {
                self.should_fetch(*section, true, timestamps.last_fetched(*section), now)
            })
            .collect()
    }

    /// Returns `previous` advanced to `now` for the sections that succeeded.
    ///
    /// Failed sections keep their old instant so they are retried next cycle.
    pub fn mark_fetched(
        previous: &SectionTimestamps,
        succeeded: &BTreeSet<Section>,
        now: DateTime<Utc>,
    ) -> SectionTimestamps {
        let mut timestamps = previous.clone();
        for section in succeeded {
            timestamps.record(*section, now);
        }
        timestamps
    }
}
