use super::definition::EnvironmentName;
use super::health::AppStatus;
use super::satellites::{SatelliteData, SourceInfo};
use super::section::SectionTimestamps;
use super::topology::ResolvedTopology;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who and where a snapshot describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotIdentity {
    pub snapshot_id: String,
    pub app_name: String,
    pub environment: EnvironmentName,
    pub account_id: String,
    pub region: String,
}

/// Convenience fields computed from the topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedFields {
    pub display_url: String,
    pub status: AppStatus,
}

/// Immutable point-in-time record of one (application, environment) pair.
///
/// A refresh never mutates a snapshot; it builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSnapshot {
    #[serde(flatten)]
    identity: SnapshotIdentity,
    generated_at: DateTime<Utc>,
    source: SourceInfo,
    topology: ResolvedTopology,
    satellites: SatelliteData,
    #[serde(flatten)]
    derived: DerivedFields,
    section_timestamps: SectionTimestamps,
}

impl AppSnapshot {
    pub fn new(
        identity: SnapshotIdentity,
        generated_at: DateTime<Utc>,
        source: SourceInfo,
        topology: ResolvedTopology,
        satellites: SatelliteData,
        derived: DerivedFields,
        section_timestamps: SectionTimestamps,
    ) -> Self {
        Self {
            identity,
            generated_at,
            source,
            topology,
            satellites,
            derived,
            section_timestamps,
        }
    }

    pub fn snapshot_id(&self) -> &str {
        &self.identity.snapshot_id
    }

    pub fn app_name(&self) -> &str {
        &self.identity.app_name
    }

    pub fn environment(&self) -> EnvironmentName {
        self.identity.environment
    }

    pub fn account_id(&self) -> &str {
        &self.identity.account_id
    }

    pub fn region(&self) -> &str {
        &self.identity.region
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn topology(&self) -> &ResolvedTopology {
        &self.topology
    }

    pub fn satellites(&self) -> &SatelliteData {
        &self.satellites
    }

    pub fn display_url(&self) -> &str {
        &self.derived.display_url
    }

    pub fn status(&self) -> AppStatus {
        self.derived.status
    }

    pub fn section_timestamps(&self) -> &SectionTimestamps {
        &self.section_timestamps
    }
}
