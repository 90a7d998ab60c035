//! Typed responses of the infrastructure gateway.
//!
//! Field names follow the gateway's camelCase JSON. Every field defaults so
//! that a partially populated response still deserializes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider name of the pipeline action that deploys to a compute cluster.
pub const DEPLOY_TO_COMPUTE_PROVIDER: &str = "CodeDeployToECS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineDefinition {
    pub name: String,
    pub arn: String,
    pub stages: Vec<PipelineStage>,
}

impl PipelineDefinition {
    /// First action, in stage order, whose provider matches `provider`.
    pub fn find_action(&self, provider: &str) -> Option<&PipelineAction> {
        self.stages
            .iter()
            .flat_map(|stage| stage.actions.iter())
            .find(|action| action.provider == provider)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineStage {
    pub name: String,
    pub actions: Vec<PipelineAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineAction {
    pub name: String,
    pub provider: String,
    pub configuration: BTreeMap<String, String>,
}

impl PipelineAction {
    pub fn config_value(&self, key: &str) -> Option<&str> {
        self.configuration
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineExecution {
    pub execution_id: String,
    pub status: String,
    pub last_update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentGroup {
    pub cluster_name: String,
    pub service_name: String,
    pub target_group_pairs: Vec<TargetGroupPair>,
}

impl DeploymentGroup {
    /// Target-group names of the first pairing. Further pairings (blue/green
    /// cutover) are not resolved.
    pub fn primary_target_group_names(&self) -> &[String] {
        self.target_group_pairs
            .first()
            .map(|pair| pair.target_group_names.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetGroupPair {
    pub target_group_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetGroupDescription {
    pub arn: String,
    pub load_balancer_arns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadBalancerDescription {
    pub arn: String,
    pub name: String,
    pub dns_name: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListenerDescription {
    pub port: u16,
    pub protocol: String,
    pub certificate_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetHealthDescription {
    pub target_id: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceDescription {
    pub status: String,
    pub running_count: u32,
    pub desired_count: u32,
    pub task_definition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDescription {
    pub task_arn: String,
    pub health_status: String,
    pub containers: Vec<TaskContainer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskContainer {
    pub name: String,
    pub image: String,
    pub last_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseDescription {
    pub identifier: String,
    pub arn: String,
    pub endpoint: String,
    pub status: String,
    pub engine: String,
    pub engine_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateDescription {
    pub arn: String,
    pub domain_name: String,
    pub status: String,
    pub not_after: Option<DateTime<Utc>>,
}

/// Averages over the gateway's metric window (the last five minutes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceMetrics {
    pub cpu_utilization: Option<f64>,
    pub memory_utilization: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadBalancerMetrics {
    /// Sum over the latest one-minute datapoint; `None` without datapoints.
    pub active_connection_count: Option<f64>,
}

/// Selects log events of the last hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEventFilter {
    /// The newest `n` events.
    Latest(usize),
    /// Every event matching a filter pattern.
    Matching(&'static str),
}

/// Filter pattern for error events.
pub const ERROR_PATTERN: &str = "ERROR";

/// Number of recent events kept per log group.
pub const RECENT_LOG_EVENTS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogEvent {
    pub timestamp: Option<DateTime<Utc>>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BucketDescription {
    pub name: String,
    pub arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogGroupDescription {
    pub name: String,
    pub arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostReport {
    pub currency: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketDescription {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityFinding {
    pub id: String,
    pub title: String,
    pub severity: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchHead {
    pub commit_id: String,
}
