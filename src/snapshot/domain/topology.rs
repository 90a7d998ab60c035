use super::health::Health;
use serde::Serialize;

/// Sentinel for any text field a lookup could not determine.
pub const UNKNOWN: &str = "unknown";

pub const DEFAULT_PROTOCOL: &str = "HTTP";
pub const DEFAULT_PORT: u16 = 80;

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// `value`, or [`UNKNOWN`] when it is blank.
pub fn known(value: &str) -> String {
    if value.trim().is_empty() {
        unknown()
    } else {
        value.to_string()
    }
}

/// Deploy pipeline and its most recent execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineInfo {
    pub name: String,
    pub arn: String,
    pub last_execution_id: String,
    pub last_execution_status: String,
    pub last_execution_time: String,
}

impl Default for PipelineInfo {
    fn default() -> Self {
        Self {
            name: unknown(),
            arn: unknown(),
            last_execution_id: unknown(),
            last_execution_status: unknown(),
            last_execution_time: unknown(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub name: String,
    pub image: String,
    pub status: String,
}

/// Compute cluster service the pipeline deploys to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputeInfo {
    pub cluster_name: String,
    pub service_name: String,
    pub status: String,
    pub running_count: u32,
    pub desired_count: u32,
    pub task_definition: String,
    /// Image tag of the first container, when one could be read.
    pub version: String,
    pub containers: Vec<ContainerInfo>,
    pub health: Health,
    /// Average CPU utilization (percent) over the last few minutes.
    pub cpu_utilization: Option<f64>,
    pub memory_utilization: Option<f64>,
}

impl Default for ComputeInfo {
    fn default() -> Self {
        Self {
            cluster_name: unknown(),
            service_name: unknown(),
            status: unknown(),
            running_count: 0,
            desired_count: 0,
            task_definition: unknown(),
            version: unknown(),
            containers: Vec::new(),
            health: Health::Unknown,
            cpu_utilization: None,
            memory_utilization: None,
        }
    }
}

impl ComputeInfo {
    pub fn has_service_name(&self) -> bool {
        self.service_name != UNKNOWN && !self.service_name.is_empty()
    }
}

/// Load balancer in front of the compute service, with the selected listener.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadBalancerInfo {
    pub arn: String,
    pub name: String,
    pub dns_name: String,
    pub state: String,
    pub protocol: String,
    pub port: u16,
    pub certificate_id: String,
    pub certificate: CertificateInfo,
    pub target_group_arn: String,
    pub health: Health,
    /// Connections over the last minute. `None` when metrics were unavailable.
    pub active_connections: Option<u64>,
}

impl Default for LoadBalancerInfo {
    fn default() -> Self {
        Self {
            arn: unknown(),
            name: unknown(),
            dns_name: unknown(),
            state: unknown(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            port: DEFAULT_PORT,
            certificate_id: unknown(),
            certificate: CertificateInfo::default(),
            target_group_arn: unknown(),
            health: Health::Unknown,
            active_connections: None,
        }
    }
}

/// TLS certificate on the selected listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    pub domain_name: String,
    /// RFC 3339 expiry, or `unknown`.
    pub expires_at: String,
    pub status: String,
}

impl Default for CertificateInfo {
    fn default() -> Self {
        Self {
            domain_name: unknown(),
            expires_at: unknown(),
            status: unknown(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseInfo {
    pub identifier: String,
    pub arn: String,
    pub endpoint: String,
    pub status: String,
    pub engine: String,
    pub engine_version: String,
}

impl Default for DatabaseInfo {
    fn default() -> Self {
        Self {
            identifier: unknown(),
            arn: unknown(),
            endpoint: unknown(),
            status: unknown(),
            engine: unknown(),
            engine_version: unknown(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketInfo {
    pub name: String,
    pub arn: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub buckets: Vec<BucketInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Info,
    Error,
}

impl LogSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }

    /// A message mentioning "error" in any case is an error entry.
    pub fn classify(message: &str) -> Self {
        if message.to_ascii_lowercase().contains("error") {
            Self::Error
        } else {
            Self::Info
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    pub severity: LogSeverity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogGroupRef {
    pub name: String,
    pub arn: String,
    /// Latest events of the last hour, newest first.
    pub recent: Vec<LogEntry>,
    /// Error events of the last hour. `None` when they could not be counted.
    pub error_count: Option<u32>,
}

impl LogGroupRef {
    pub fn new(name: impl Into<String>, arn: &str) -> Self {
        Self {
            name: name.into(),
            arn: known(arn),
            recent: Vec::new(),
            error_count: None,
        }
    }
}

/// Log groups tagged by the resource class that writes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogGroupSet {
    pub compute: Vec<LogGroupRef>,
    pub load_balancer: Vec<LogGroupRef>,
    pub database: Vec<LogGroupRef>,
}

/// Chain-resolved view of an application's infrastructure.
///
/// Every field carries an explicit sentinel when it could not be determined;
/// the snapshot's section timestamps are the only record of whether a
/// section was actually fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedTopology {
    pub pipeline: PipelineInfo,
    pub compute: ComputeInfo,
    pub load_balancer: LoadBalancerInfo,
    pub database: DatabaseInfo,
    pub storage: StorageInfo,
    pub log_groups: LogGroupSet,
}
