use async_trait::async_trait;
use infra_snapshot::ports::outbound::gateway_models::*;
use infra_snapshot::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// Mock InfrastructureGateway serving a small "billing" deployment.
///
/// Responses are public fields so each test can reshape the topology before
/// handing the gateway to a use case. Operations listed in `failing` return
/// an error; every call is counted by operation name.
pub struct MockInfrastructureGateway {
    pub listeners: Vec<ListenerDescription>,
    pub target_states: Vec<String>,
    pub task_health: Vec<String>,
    pub running_count: u32,
    pub desired_count: u32,
    pub log_groups: Vec<LogGroupDescription>,
    pub failing: HashSet<&'static str>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockInfrastructureGateway {
    pub fn new() -> Self {
        Self {
            listeners: vec![
                listener(80, "HTTP", None),
                listener(443, "HTTPS", Some("cert-abc")),
            ],
            target_states: vec!["healthy".to_string(), "healthy".to_string()],
            task_health: vec!["HEALTHY".to_string()],
            running_count: 2,
            desired_count: 2,
            log_groups: vec![
                log_group("/aws/ecs/billing-prod"),
                log_group("/aws/alb/billing-prod"),
                log_group("/aws/rds/billing-prod-db"),
            ],
            failing: HashSet::new(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_listeners(mut self, listeners: Vec<ListenerDescription>) -> Self {
        self.listeners = listeners;
        self
    }

    pub fn with_target_states(mut self, states: &[&str]) -> Self {
        self.target_states = states.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_task_health(mut self, health: &[&str]) -> Self {
        self.task_health = health.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_log_groups(mut self, names: &[&str]) -> Self {
        self.log_groups = names.iter().map(|name| log_group(name)).collect();
        self
    }

    pub fn with_failure(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        if self.failing.contains(operation) {
            anyhow::bail!("Mock gateway failure in {}", operation);
        }
        Ok(())
    }
}

impl Default for MockInfrastructureGateway {
    fn default() -> Self {
        Self::new()
    }
}

pub fn listener(port: u16, protocol: &str, certificate: Option<&str>) -> ListenerDescription {
    ListenerDescription {
        port,
        protocol: protocol.to_string(),
        certificate_ids: certificate.map(|c| vec![c.to_string()]).unwrap_or_default(),
    }
}

fn log_group(name: &str) -> LogGroupDescription {
    LogGroupDescription {
        name: name.to_string(),
        arn: format!("arn:aws:logs:us-east-1:222:log-group:{}", name),
    }
}

#[async_trait]
impl InfrastructureGateway for MockInfrastructureGateway {
    async fn get_pipeline(&self, name: &str) -> Result<PipelineDefinition> {
        self.record("get_pipeline")?;
        let mut configuration = BTreeMap::new();
        configuration.insert("ApplicationName".to_string(), "billing".to_string());
        configuration.insert(
            "DeploymentGroupName".to_string(),
            "billing-prod-dg".to_string(),
        );

        Ok(PipelineDefinition {
            name: name.to_string(),
            arn: format!("arn:aws:codepipeline:us-east-1:222:{}", name),
            stages: vec![
                PipelineStage {
                    name: "Source".to_string(),
                    actions: vec![PipelineAction {
                        name: "Checkout".to_string(),
                        provider: "CodeCommit".to_string(),
                        configuration: BTreeMap::new(),
                    }],
                },
                PipelineStage {
                    name: "Deploy".to_string(),
                    actions: vec![PipelineAction {
                        name: "Deploy".to_string(),
                        provider: DEPLOY_TO_COMPUTE_PROVIDER.to_string(),
                        configuration,
                    }],
                },
            ],
        })
    }

    async fn latest_pipeline_execution(&self, _pipeline_name: &str) -> Result<PipelineExecution> {
        self.record("latest_pipeline_execution")?;
        Ok(PipelineExecution {
            execution_id: "exec-42".to_string(),
            status: "Succeeded".to_string(),
            last_update_time: None,
        })
    }

    async fn get_deployment_group(&self, _application: &str, _group: &str) -> Result<DeploymentGroup> {
        self.record("get_deployment_group")?;
        Ok(DeploymentGroup {
            cluster_name: "billing-prod-cluster".to_string(),
            service_name: "billing-prod-api".to_string(),
            target_group_pairs: vec![TargetGroupPair {
                target_group_names: vec!["billing-prod-tg".to_string()],
            }],
        })
    }

    async fn resolve_target_group_arns(&self, names: &[String]) -> Result<Vec<String>> {
        self.record("resolve_target_group_arns")?;
        Ok(names.iter().map(|name| format!("arn:tg/{}", name)).collect())
    }

    async fn describe_target_group(&self, arn: &str) -> Result<TargetGroupDescription> {
        self.record("describe_target_group")?;
        Ok(TargetGroupDescription {
            arn: arn.to_string(),
            load_balancer_arns: vec!["arn:lb/billing-prod".to_string()],
        })
    }

    async fn describe_load_balancer(&self, arn: &str) -> Result<LoadBalancerDescription> {
        self.record("describe_load_balancer")?;
        Ok(LoadBalancerDescription {
            arn: arn.to_string(),
            name: "billing-prod".to_string(),
            dns_name: "billing.example.com".to_string(),
            state: "active".to_string(),
        })
    }

    async fn describe_listeners(&self, _load_balancer_arn: &str) -> Result<Vec<ListenerDescription>> {
        self.record("describe_listeners")?;
        Ok(self.listeners.clone())
    }

    async fn describe_target_health(
        &self,
        _target_group_arn: &str,
    ) -> Result<Vec<TargetHealthDescription>> {
        self.record("describe_target_health")?;
        Ok(self
            .target_states
            .iter()
            .enumerate()
            .map(|(i, state)| TargetHealthDescription {
                target_id: format!("i-{:04}", i),
                state: state.clone(),
            })
            .collect())
    }

    async fn describe_certificate(&self, arn: &str) -> Result<CertificateDescription> {
        self.record("describe_certificate")?;
        Ok(CertificateDescription {
            arn: arn.to_string(),
            domain_name: "billing.example.com".to_string(),
            status: "ISSUED".to_string(),
            not_after: None,
        })
    }

    async fn get_load_balancer_metrics(&self, _arn: &str) -> Result<LoadBalancerMetrics> {
        self.record("get_load_balancer_metrics")?;
        Ok(LoadBalancerMetrics {
            active_connection_count: None,
        })
    }

    async fn describe_service(&self, _cluster: &str, _service: &str) -> Result<ServiceDescription> {
        self.record("describe_service")?;
        Ok(ServiceDescription {
            status: "ACTIVE".to_string(),
            running_count: self.running_count,
            desired_count: self.desired_count,
            task_definition: "billing:7".to_string(),
        })
    }

    async fn list_service_tasks(&self, _cluster: &str, _service: &str) -> Result<Vec<TaskDescription>> {
        self.record("list_service_tasks")?;
        Ok(self
            .task_health
            .iter()
            .enumerate()
            .map(|(i, health)| TaskDescription {
                task_arn: format!("arn:task/{}", i),
                health_status: health.clone(),
                containers: vec![TaskContainer {
                    name: "api".to_string(),
                    image: "registry.example.com/billing:2.0.1".to_string(),
                    last_status: "RUNNING".to_string(),
                }],
            })
            .collect())
    }

    async fn get_service_metrics(&self, _cluster: &str, _service: &str) -> Result<ServiceMetrics> {
        self.record("get_service_metrics")?;
        Ok(ServiceMetrics {
            cpu_utilization: Some(12.0),
            memory_utilization: None,
        })
    }

    async fn describe_database(&self, identifier: &str) -> Result<DatabaseDescription> {
        self.record("describe_database")?;
        Ok(DatabaseDescription {
            identifier: identifier.to_string(),
            arn: format!("arn:aws:rds:us-east-1:222:db:{}", identifier),
            endpoint: format!("{}.rds.example.com", identifier),
            status: "available".to_string(),
            engine: "postgres".to_string(),
            engine_version: "16.2".to_string(),
        })
    }

    async fn list_buckets_prefixed(&self, prefix: &str) -> Result<Vec<BucketDescription>> {
        self.record("list_buckets_prefixed")?;
        Ok(vec![BucketDescription {
            name: format!("{}-uploads", prefix),
            arn: String::new(),
        }])
    }

    async fn list_log_groups(&self, prefix: &str) -> Result<Vec<LogGroupDescription>> {
        self.record("list_log_groups")?;
        Ok(self
            .log_groups
            .iter()
            .filter(|group| group.name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn filter_log_events(
        &self,
        _log_group: &str,
        filter: LogEventFilter,
    ) -> Result<Vec<LogEvent>> {
        self.record("filter_log_events")?;
        let event = LogEvent {
            timestamp: None,
            message: "Error: upstream reset".to_string(),
        };
        Ok(match filter {
            LogEventFilter::Latest(_) => vec![event],
            LogEventFilter::Matching(_) => Vec::new(),
        })
    }

    async fn get_monthly_cost(&self, _app_name: &str) -> Result<CostReport> {
        self.record("get_monthly_cost")?;
        Ok(CostReport {
            currency: Some("EUR".to_string()),
            amount: 87.25,
        })
    }

    async fn list_open_tickets(&self, _app_name: &str) -> Result<Vec<TicketDescription>> {
        self.record("list_open_tickets")?;
        Ok(vec![TicketDescription {
            key: "OPS-7".to_string(),
            summary: "Rotate database credentials".to_string(),
            status: "Open".to_string(),
            created: None,
        }])
    }

    async fn list_security_findings(&self, _resource_id: &str) -> Result<Vec<SecurityFinding>> {
        self.record("list_security_findings")?;
        Ok(vec![SecurityFinding {
            id: "finding-1".to_string(),
            title: "Public bucket policy".to_string(),
            severity: "CRITICAL".to_string(),
            updated_at: None,
        }])
    }

    async fn get_branch_head(&self, _repository: &str, _branch: &str) -> Result<BranchHead> {
        self.record("get_branch_head")?;
        Ok(BranchHead {
            commit_id: "9f8e7d6".to_string(),
        })
    }
}
