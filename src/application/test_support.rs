//! In-crate fakes shared by the application layer's unit tests.

use crate::application::resolvers::ResolutionTarget;
use crate::ports::outbound::gateway_models::*;
use crate::ports::outbound::{Clock, DefinitionRepository, InfrastructureGateway, ProgressReporter};
use crate::shared::Result;
use crate::snapshot::domain::{
    AppSnapshot, ApplicationDefinition, EnvironmentDefinition, EnvironmentName, SourceRepository,
};
use crate::snapshot::services::{ResolvedSections, SnapshotAssembler};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

pub fn billing_definition() -> ApplicationDefinition {
    ApplicationDefinition::new(
        "billing",
        SourceRepository::new("billing", "git@example.com:org/billing.git"),
        "us-east-1",
        vec![
            EnvironmentDefinition::new(EnvironmentName::Dev, "billing-dev-pipeline", "111"),
            EnvironmentDefinition::new(EnvironmentName::Prod, "billing-prod-pipeline", "222"),
        ],
    )
}

pub fn billing_target() -> ResolutionTarget {
    let definition = billing_definition();
    let env = definition
        .environment(EnvironmentName::Prod)
        .cloned()
        .unwrap();
    ResolutionTarget::new(&definition, &env)
}

pub fn sample_snapshot(app_name: &str, environment: EnvironmentName) -> AppSnapshot {
    let definition = ApplicationDefinition::new(
        app_name,
        SourceRepository::new(app_name, "url"),
        "us-east-1",
        vec![EnvironmentDefinition::new(environment, "pipeline", "000")],
    );
    let env = definition.environment(environment).cloned().unwrap();
    SnapshotAssembler::assemble(
        &definition,
        &env,
        None,
        ResolvedSections::default(),
        ManualClock::start(),
    )
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += TimeDelta::from_std(by).unwrap();
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Self::start()),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Gateway fake serving the "billing"/"prod" topology, with per-operation
/// failure injection and call recording.
pub struct FakeGateway {
    pub pipeline: PipelineDefinition,
    pub deployment_group: DeploymentGroup,
    pub target_group_arns: Vec<String>,
    pub listeners: Vec<ListenerDescription>,
    pub target_states: Vec<String>,
    pub tasks: Vec<TaskDescription>,
    pub buckets: Vec<BucketDescription>,
    pub log_groups: Vec<LogGroupDescription>,
    /// Newest first.
    pub log_events: Vec<LogEvent>,
    pub delay: Option<Duration>,
    failing: HashSet<&'static str>,
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl FakeGateway {
    pub fn billing() -> Self {
        let mut configuration = BTreeMap::new();
        configuration.insert("ApplicationName".to_string(), "billing".to_string());
        configuration.insert("DeploymentGroupName".to_string(), "billing-prod-dg".to_string());

        Self {
            pipeline: PipelineDefinition {
                name: "billing-prod-pipeline".to_string(),
                arn: "arn:aws:codepipeline:us-east-1:222:billing-prod-pipeline".to_string(),
                stages: vec![PipelineStage {
                    name: "Deploy".to_string(),
                    actions: vec![PipelineAction {
                        name: "Deploy".to_string(),
                        provider: DEPLOY_TO_COMPUTE_PROVIDER.to_string(),
                        configuration,
                    }],
                }],
            },
            deployment_group: DeploymentGroup {
                cluster_name: "billing-prod-cluster".to_string(),
                service_name: "billing-prod-service".to_string(),
                target_group_pairs: vec![TargetGroupPair {
                    target_group_names: vec!["billing-prod-tg".to_string()],
                }],
            },
            target_group_arns: vec!["arn:tg/billing-prod-tg".to_string()],
            listeners: vec![
                ListenerDescription {
                    port: 80,
                    protocol: "HTTP".to_string(),
                    certificate_ids: vec![],
                },
                ListenerDescription {
                    port: 443,
                    protocol: "HTTPS".to_string(),
                    certificate_ids: vec!["cert-abc".to_string()],
                },
            ],
            target_states: vec!["healthy".to_string(), "healthy".to_string()],
            tasks: vec![TaskDescription {
                task_arn: "arn:task/1".to_string(),
                health_status: "HEALTHY".to_string(),
                containers: vec![TaskContainer {
                    name: "app".to_string(),
                    image: "registry.example.com/billing:1.4.2".to_string(),
                    last_status: "RUNNING".to_string(),
                }],
            }],
            buckets: vec![BucketDescription {
                name: "billing-prod-assets".to_string(),
                arn: "arn:aws:s3:::billing-prod-assets".to_string(),
            }],
            log_groups: vec![
                LogGroupDescription {
                    name: "/aws/ecs/billing-prod".to_string(),
                    arn: "arn:logs:ecs".to_string(),
                },
                LogGroupDescription {
                    name: "/aws/alb/billing-prod".to_string(),
                    arn: "arn:logs:alb".to_string(),
                },
                LogGroupDescription {
                    name: "/aws/rds/billing-prod-db".to_string(),
                    arn: "arn:logs:rds".to_string(),
                },
            ],
            log_events: [
                "ERROR payment declined",
                "GET /health 200",
                "ERROR ledger timeout",
                "GET /invoices 200",
                "GET /health 200",
                "GET /health 200",
            ]
            .iter()
            .enumerate()
            .map(|(i, message)| LogEvent {
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 11, 59 - i as u32, 0).single(),
                message: message.to_string(),
            })
            .collect(),
            delay: None,
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_argument(&self, operation: &str) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(op, _)| *op == operation)
            .map(|(_, arg)| arg.clone())
    }

    async fn record(&self, operation: &'static str, argument: impl Into<String>) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((operation, argument.into()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(operation) {
            anyhow::bail!("{} failed", operation);
        }
        Ok(())
    }
}

fn at(hour: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).single()
}

#[async_trait]
impl InfrastructureGateway for FakeGateway {
    async fn get_pipeline(&self, name: &str) -> Result<PipelineDefinition> {
        self.record("get_pipeline", name).await?;
        Ok(self.pipeline.clone())
    }

    async fn latest_pipeline_execution(&self, pipeline_name: &str) -> Result<PipelineExecution> {
        self.record("latest_pipeline_execution", pipeline_name).await?;
        Ok(PipelineExecution {
            execution_id: "exec-1".to_string(),
            status: "Succeeded".to_string(),
            last_update_time: at(11),
        })
    }

    async fn get_deployment_group(&self, application: &str, group: &str) -> Result<DeploymentGroup> {
        self.record("get_deployment_group", format!("{}/{}", application, group))
            .await?;
        Ok(self.deployment_group.clone())
    }

    async fn resolve_target_group_arns(&self, names: &[String]) -> Result<Vec<String>> {
        self.record("resolve_target_group_arns", names.join(",")).await?;
        Ok(self.target_group_arns.clone())
    }

    async fn describe_target_group(&self, arn: &str) -> Result<TargetGroupDescription> {
        self.record("describe_target_group", arn).await?;
        Ok(TargetGroupDescription {
            arn: arn.to_string(),
            load_balancer_arns: vec!["arn:lb/billing-prod".to_string()],
        })
    }

    async fn describe_load_balancer(&self, arn: &str) -> Result<LoadBalancerDescription> {
        self.record("describe_load_balancer", arn).await?;
        Ok(LoadBalancerDescription {
            arn: arn.to_string(),
            name: "billing-prod".to_string(),
            dns_name: "billing-prod-123.elb.example.com".to_string(),
            state: "active".to_string(),
        })
    }

    async fn describe_listeners(&self, load_balancer_arn: &str) -> Result<Vec<ListenerDescription>> {
        self.record("describe_listeners", load_balancer_arn).await?;
        Ok(self.listeners.clone())
    }

    async fn describe_target_health(
        &self,
        target_group_arn: &str,
    ) -> Result<Vec<TargetHealthDescription>> {
        self.record("describe_target_health", target_group_arn).await?;
        Ok(self
            .target_states
            .iter()
            .enumerate()
            .map(|(i, state)| TargetHealthDescription {
                target_id: format!("10.0.0.{}", i),
                state: state.clone(),
            })
            .collect())
    }

    async fn describe_certificate(&self, arn: &str) -> Result<CertificateDescription> {
        self.record("describe_certificate", arn).await?;
        Ok(CertificateDescription {
            arn: arn.to_string(),
            domain_name: "billing.example.com".to_string(),
            status: "ISSUED".to_string(),
            not_after: Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).single(),
        })
    }

    async fn get_load_balancer_metrics(&self, arn: &str) -> Result<LoadBalancerMetrics> {
        self.record("get_load_balancer_metrics", arn).await?;
        Ok(LoadBalancerMetrics {
            active_connection_count: Some(17.0),
        })
    }

    async fn describe_service(&self, cluster: &str, service: &str) -> Result<ServiceDescription> {
        self.record("describe_service", format!("{}/{}", cluster, service))
            .await?;
        Ok(ServiceDescription {
            status: "ACTIVE".to_string(),
            running_count: 2,
            desired_count: 2,
            task_definition: "billing:42".to_string(),
        })
    }

    async fn list_service_tasks(&self, cluster: &str, service: &str) -> Result<Vec<TaskDescription>> {
        self.record("list_service_tasks", format!("{}/{}", cluster, service))
            .await?;
        Ok(self.tasks.clone())
    }

    async fn get_service_metrics(&self, cluster: &str, service: &str) -> Result<ServiceMetrics> {
        self.record("get_service_metrics", format!("{}/{}", cluster, service))
            .await?;
        Ok(ServiceMetrics {
            cpu_utilization: Some(41.5),
            memory_utilization: Some(63.0),
        })
    }

    async fn describe_database(&self, identifier: &str) -> Result<DatabaseDescription> {
        self.record("describe_database", identifier).await?;
        Ok(DatabaseDescription {
            identifier: identifier.to_string(),
            arn: format!("arn:rds:{}", identifier),
            endpoint: format!("{}.db.example.com", identifier),
            status: "available".to_string(),
            engine: "postgres".to_string(),
            engine_version: "15.4".to_string(),
        })
    }

    async fn list_buckets_prefixed(&self, prefix: &str) -> Result<Vec<BucketDescription>> {
        self.record("list_buckets_prefixed", prefix).await?;
        Ok(self.buckets.clone())
    }

    async fn list_log_groups(&self, prefix: &str) -> Result<Vec<LogGroupDescription>> {
        self.record("list_log_groups", prefix).await?;
        Ok(self
            .log_groups
            .iter()
            .filter(|group| group.name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn filter_log_events(
        &self,
        log_group: &str,
        filter: LogEventFilter,
    ) -> Result<Vec<LogEvent>> {
        self.record("filter_log_events", log_group).await?;
        let events = self.log_events.iter().cloned();
        Ok(match filter {
            LogEventFilter::Latest(limit) => events.take(limit).collect(),
            LogEventFilter::Matching(pattern) => {
                events.filter(|event| event.message.contains(pattern)).collect()
            }
        })
    }

    async fn get_monthly_cost(&self, app_name: &str) -> Result<CostReport> {
        self.record("get_monthly_cost", app_name).await?;
        Ok(CostReport {
            currency: None,
            amount: 1234.5,
        })
    }

    async fn list_open_tickets(&self, app_name: &str) -> Result<Vec<TicketDescription>> {
        self.record("list_open_tickets", app_name).await?;
        Ok((1..=2)
            .map(|i| TicketDescription {
                key: format!("OPS-{}", i),
                summary: format!("ticket {}", i),
                status: "Open".to_string(),
                created: at(i),
            })
            .collect())
    }

    async fn list_security_findings(&self, resource_id: &str) -> Result<Vec<SecurityFinding>> {
        self.record("list_security_findings", resource_id).await?;
        Ok((1..=4)
            .map(|i| SecurityFinding {
                id: format!("finding-{}", i),
                title: format!("finding {}", i),
                severity: if i % 2 == 0 { "CRITICAL" } else { "HIGH" }.to_string(),
                updated_at: at(i),
            })
            .collect())
    }

    async fn get_branch_head(&self, repository: &str, branch: &str) -> Result<BranchHead> {
        self.record("get_branch_head", format!("{}/{}", repository, branch))
            .await?;
        Ok(BranchHead {
            commit_id: "abc123".to_string(),
        })
    }
}

/// Definition store holding a fixed set of applications.
#[derive(Default)]
pub struct InMemoryDefinitions {
    applications: Vec<ApplicationDefinition>,
}

impl InMemoryDefinitions {
    pub fn with(applications: Vec<ApplicationDefinition>) -> Self {
        Self { applications }
    }
}

impl DefinitionRepository for InMemoryDefinitions {
    fn load_application(&self, app_name: &str) -> Result<Option<ApplicationDefinition>> {
        Ok(self
            .applications
            .iter()
            .find(|app| app.name() == app_name)
            .cloned())
    }
}

/// Progress reporter that keeps every message.
#[derive(Default)]
pub struct RecordingProgress {
    pub messages: Mutex<Vec<String>>,
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("{}/{} {}", current, total, message.unwrap_or("")));
    }

    fn report_error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn report_completion(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
