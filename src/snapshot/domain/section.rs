use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named subset of a snapshot with its own freshness timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Source,
    Pipeline,
    Ecs,
    Alb,
    Rds,
    S3,
    Logs,
    Cost,
    Tickets,
    Security,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::Source,
        Section::Pipeline,
        Section::Ecs,
        Section::Alb,
        Section::Rds,
        Section::S3,
        Section::Logs,
        Section::Cost,
        Section::Tickets,
        Section::Security,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Source => "source",
            Section::Pipeline => "pipeline",
            Section::Ecs => "ecs",
            Section::Alb => "alb",
            Section::Rds => "rds",
            Section::S3 => "s3",
            Section::Logs => "logs",
            Section::Cost => "cost",
            Section::Tickets => "tickets",
            Section::Security => "security",
        }
    }

    /// Sections resolved by walking the deployment chain.
    pub fn is_chain(&self) -> bool {
        matches!(self, Section::Pipeline | Section::Ecs | Section::Alb)
    }

    fn valid_keys() -> String {
        Self::ALL
            .iter()
            .map(|s| s.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|section| section.key() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid section '{}'. Valid values: {}",
                    s.trim(),
                    Self::valid_keys()
                )
            })
    }
}

/// Last successful fetch instant per section.
///
/// Sections absent from the map have never been fetched successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionTimestamps(BTreeMap<Section, DateTime<Utc>>);

impl SectionTimestamps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fetched(&self, section: Section) -> Option<DateTime<Utc>> {
        self.0.get(&section).copied()
    }

    pub fn record(&mut self, section: Section, at: DateTime<Utc>) {
        self.0.insert(section, at);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, DateTime<Utc>)> + '_ {
        self.0.iter().map(|(section, at)| (*section, *at))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_section_parse_is_case_insensitive() {
        assert_eq!("ECS".parse::<Section>(), Ok(Section::Ecs));
        assert_eq!(" logs ".parse::<Section>(), Ok(Section::Logs));
        assert_eq!("s3".parse::<Section>(), Ok(Section::S3));
    }

    #[test]
    fn test_section_parse_rejects_unknown() {
        let err = "network".parse::<Section>().unwrap_err();
        assert!(err.contains("network"));
        assert!(err.contains("pipeline"));
    }

    #[test]
    fn test_section_keys_round_trip_through_display() {
        for section in Section::ALL {
            assert_eq!(section.to_string().parse::<Section>(), Ok(section));
        }
    }

    #[test]
    fn test_chain_sections() {
        let chain: Vec<_> = Section::ALL.iter().filter(|s| s.is_chain()).collect();
        assert_eq!(chain, vec![&Section::Pipeline, &Section::Ecs, &Section::Alb]);
    }

    #[test]
    fn test_timestamps_record_and_lookup() {
        let mut timestamps = SectionTimestamps::new();
        assert!(timestamps.is_empty());
        assert_eq!(timestamps.last_fetched(Section::Rds), None);

        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        timestamps.record(Section::Rds, at);
        assert_eq!(timestamps.last_fetched(Section::Rds), Some(at));
        assert_eq!(timestamps.len(), 1);
    }

    #[test]
    fn test_timestamps_serialize_as_map() {
        let mut timestamps = SectionTimestamps::new();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        timestamps.record(Section::Alb, at);

        let json = serde_json::to_value(&timestamps).unwrap();
        assert_eq!(json["alb"], "2024-05-01T12:00:00Z");
    }
}
