pub mod app_snapshot;
pub mod definition;
pub mod health;
pub mod satellites;
pub mod section;
pub mod topology;

pub use app_snapshot::{AppSnapshot, DerivedFields, SnapshotIdentity};
pub use definition::{ApplicationDefinition, EnvironmentDefinition, EnvironmentName, SourceRepository};
pub use health::{AppStatus, Health};
pub use satellites::{
    CostSummary, FindingRef, SatelliteData, SecuritySummary, SourceInfo, TicketRef, TicketSummary,
};
pub use section::{Section, SectionTimestamps};
pub use topology::{
    known, BucketInfo, CertificateInfo, ComputeInfo, ContainerInfo, DatabaseInfo,
    LoadBalancerInfo, LogEntry, LogGroupRef, LogGroupSet, LogSeverity, PipelineInfo,
    ResolvedTopology, StorageInfo, UNKNOWN,
};
