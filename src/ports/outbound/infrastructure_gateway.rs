use super::gateway_models::{
    BranchHead, BucketDescription, CertificateDescription, CostReport, DatabaseDescription,
    DeploymentGroup, ListenerDescription, LoadBalancerDescription, LoadBalancerMetrics,
    LogEvent, LogEventFilter, LogGroupDescription, PipelineDefinition, PipelineExecution,
    SecurityFinding, ServiceDescription, ServiceMetrics, TargetGroupDescription,
    TargetHealthDescription, TaskDescription, TicketDescription,
};
use crate::shared::Result;
use async_trait::async_trait;

/// InfrastructureGateway port for read-only infrastructure queries
///
/// This port abstracts the pipeline, deploy-target, load-balancer, database,
/// storage, log, cost, ticketing and source-control providers behind one
/// interface. Callers treat every method as fallible; the resolvers wrap each
/// call so that a failure degrades only the section it feeds.
///
/// # Async Support
/// Implementations must be `Send + Sync` so that satellite lookups can run
/// concurrently with the deployment chain.
#[async_trait]
pub trait InfrastructureGateway: Send + Sync {
    /// Fetches a pipeline definition with its stages and actions
    async fn get_pipeline(&self, name: &str) -> Result<PipelineDefinition>;

    /// Fetches the most recent execution of a pipeline
    async fn latest_pipeline_execution(&self, pipeline_name: &str) -> Result<PipelineExecution>;

    /// Fetches a deployment group of a deploy application
    async fn get_deployment_group(&self, application: &str, group: &str)
        -> Result<DeploymentGroup>;

    /// Resolves target-group names to ARNs in one batch
    async fn resolve_target_group_arns(&self, names: &[String]) -> Result<Vec<String>>;

    async fn describe_target_group(&self, arn: &str) -> Result<TargetGroupDescription>;

    async fn describe_load_balancer(&self, arn: &str) -> Result<LoadBalancerDescription>;

    async fn describe_listeners(&self, load_balancer_arn: &str)
        -> Result<Vec<ListenerDescription>>;

    async fn describe_target_health(
        &self,
        target_group_arn: &str,
    ) -> Result<Vec<TargetHealthDescription>>;

    /// Domain, status and expiry of a TLS certificate
    async fn describe_certificate(&self, arn: &str) -> Result<CertificateDescription>;

    /// Active connection count of a load balancer
    async fn get_load_balancer_metrics(&self, arn: &str) -> Result<LoadBalancerMetrics>;

    /// Fetches live status and task counts of a compute service
    async fn describe_service(&self, cluster: &str, service: &str) -> Result<ServiceDescription>;

    /// Lists the running tasks of a compute service
    async fn list_service_tasks(&self, cluster: &str, service: &str)
        -> Result<Vec<TaskDescription>>;

    /// CPU and memory utilization of a compute service
    async fn get_service_metrics(&self, cluster: &str, service: &str) -> Result<ServiceMetrics>;

    async fn describe_database(&self, identifier: &str) -> Result<DatabaseDescription>;

    async fn list_buckets_prefixed(&self, prefix: &str) -> Result<Vec<BucketDescription>>;

    async fn list_log_groups(&self, prefix: &str) -> Result<Vec<LogGroupDescription>>;

    /// Events of a log group from the last hour, newest first
    async fn filter_log_events(
        &self,
        log_group: &str,
        filter: LogEventFilter,
    ) -> Result<Vec<LogEvent>>;

    /// Month-to-date cost for an application
    async fn get_monthly_cost(&self, app_name: &str) -> Result<CostReport>;

    /// Open issue-tracker tickets for an application
    async fn list_open_tickets(&self, app_name: &str) -> Result<Vec<TicketDescription>>;

    /// Active security findings for a resource
    async fn list_security_findings(&self, resource_id: &str) -> Result<Vec<SecurityFinding>>;

    /// Head commit of a repository branch
    async fn get_branch_head(&self, repository: &str, branch: &str) -> Result<BranchHead>;
}
