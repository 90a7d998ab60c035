use crate::ports::outbound::gateway_models::{
    BranchHead, BucketDescription, CertificateDescription, CostReport, DatabaseDescription,
    DeploymentGroup, ListenerDescription, LoadBalancerDescription, LoadBalancerMetrics,
    LogEvent, LogEventFilter, LogGroupDescription, PipelineDefinition, PipelineExecution,
    SecurityFinding, ServiceDescription, ServiceMetrics, TargetGroupDescription,
    TargetHealthDescription, TaskDescription, TicketDescription,
};
use crate::ports::outbound::InfrastructureGateway;
use crate::shared::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default per-request timeout of the HTTP client
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts per request, the first one included.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Outcome of a single HTTP attempt.
enum Attempt<T> {
    Done(T),
    Retry(anyhow::Error),
    Fail(anyhow::Error),
}

/// HttpInfrastructureGateway adapter for a JSON-over-HTTP infrastructure gateway
///
/// Implements the InfrastructureGateway port with one `GET` per query. Server
/// errors and transport failures are retried with a short linear backoff;
/// client errors (404 included) are returned immediately.
pub struct HttpInfrastructureGateway {
    client: reqwest::Client,
    base_url: String,
    max_attempts: u32,
}

impl HttpInfrastructureGateway {
    /// Creates a gateway client rooted at `base_url`
    ///
    /// # Errors
    /// Returns an error if the URL is not `http://` or `https://`, or if the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!(
                "Gateway URL must start with http:// or https:// (got \"{}\")",
                base_url
            );
        }

        let user_agent = format!("infra-snapshot/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Validates a name used as a path segment
    fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
        if component.trim().is_empty() {
            anyhow::bail!("{} is empty", component_type);
        }

        if component.contains('/') || component.contains('\\') {
            anyhow::bail!(
                "Security: {} contains path separators which are not allowed",
                component_type
            );
        }

        if component.contains("..") {
            anyhow::bail!(
                "Security: {} contains '..' which is not allowed",
                component_type
            );
        }

        if component.contains('#') || component.contains('?') {
            anyhow::bail!(
                "Security: {} contains URL-unsafe characters",
                component_type
            );
        }

        Ok(())
    }

    /// Validated and percent-encoded name segment
    fn name_segment(component: &str, component_type: &str) -> Result<String> {
        Self::validate_url_component(component, component_type)?;
        Ok(urlencoding::encode(component).into_owned())
    }

    /// Percent-encoded ARN segment. ARNs carry `/` and `:` legitimately.
    fn arn_segment(arn: &str) -> Result<String> {
        if arn.trim().is_empty() {
            anyhow::bail!("ARN is empty");
        }
        Ok(urlencoding::encode(arn).into_owned())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn url_with_query(&self, path: &str, params: &[(&str, &str)]) -> String {
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/{}?{}", self.base_url, path, query)
    }

    /// Fetches `url` and decodes the JSON body, retrying transient failures
    async fn fetch_with_retry<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(url).await {
                Attempt::Done(value) => return Ok(value),
                Attempt::Fail(error) => return Err(error),
                Attempt::Retry(error) if attempt >= self.max_attempts => return Err(error),
                Attempt::Retry(error) => {
                    tracing::debug!(url, attempt, error = %error, "retrying gateway request");
                    tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn fetch_once<T: DeserializeOwned>(&self, url: &str) -> Attempt<T> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(error) => return Attempt::Retry(error.into()),
        };

        let status = response.status();
        if status.is_client_error() {
            return Attempt::Fail(anyhow::anyhow!(
                "Gateway returned status code {} for {}",
                status,
                url
            ));
        }
        if !status.is_success() {
            return Attempt::Retry(anyhow::anyhow!(
                "Gateway returned status code {} for {}",
                status,
                url
            ));
        }

        match response.json::<T>().await {
            Ok(value) => Attempt::Done(value),
            Err(error) => Attempt::Fail(
                anyhow::Error::new(error).context(format!("Malformed gateway response from {}", url)),
            ),
        }
    }
}

#[async_trait]
impl InfrastructureGateway for HttpInfrastructureGateway {
    async fn get_pipeline(&self, name: &str) -> Result<PipelineDefinition> {
        let name = Self::name_segment(name, "Pipeline name")?;
        self.fetch_with_retry(&self.url(&format!("pipelines/{}", name)))
            .await
    }

    async fn latest_pipeline_execution(&self, pipeline_name: &str) -> Result<PipelineExecution> {
        let name = Self::name_segment(pipeline_name, "Pipeline name")?;
        self.fetch_with_retry(&self.url(&format!("pipelines/{}/executions/latest", name)))
            .await
    }

    async fn get_deployment_group(&self, application: &str, group: &str) -> Result<DeploymentGroup> {
        let application = Self::name_segment(application, "Deploy application")?;
        let group = Self::name_segment(group, "Deployment group")?;
        self.fetch_with_retry(&self.url(&format!("deployment-groups/{}/{}", application, group)))
            .await
    }

    async fn resolve_target_group_arns(&self, names: &[String]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        for name in names {
            Self::validate_url_component(name, "Target group name")?;
        }
        let names = names.join(",");
        let descriptions: Vec<TargetGroupDescription> = self
            .fetch_with_retry(&self.url_with_query("target-groups", &[("names", names.as_str())]))
            .await?;
        Ok(descriptions.into_iter().map(|tg| tg.arn).collect())
    }

    async fn describe_target_group(&self, arn: &str) -> Result<TargetGroupDescription> {
        let arn = Self::arn_segment(arn)?;
        self.fetch_with_retry(&self.url(&format!("target-groups/{}", arn)))
            .await
    }

    async fn describe_load_balancer(&self, arn: &str) -> Result<LoadBalancerDescription> {
        let arn = Self::arn_segment(arn)?;
        self.fetch_with_retry(&self.url(&format!("load-balancers/{}", arn)))
            .await
    }

    async fn describe_listeners(&self, load_balancer_arn: &str) -> Result<Vec<ListenerDescription>> {
        let arn = Self::arn_segment(load_balancer_arn)?;
        self.fetch_with_retry(&self.url(&format!("load-balancers/{}/listeners", arn)))
            .await
    }

    async fn describe_target_health(
        &self,
        target_group_arn: &str,
    ) -> Result<Vec<TargetHealthDescription>> {
        let arn = Self::arn_segment(target_group_arn)?;
        self.fetch_with_retry(&self.url(&format!("target-groups/{}/health", arn)))
            .await
    }

    async fn describe_certificate(&self, arn: &str) -> Result<CertificateDescription> {
        let arn = Self::arn_segment(arn)?;
        self.fetch_with_retry(&self.url(&format!("certificates/{}", arn)))
            .await
    }

    async fn get_load_balancer_metrics(&self, arn: &str) -> Result<LoadBalancerMetrics> {
        let arn = Self::arn_segment(arn)?;
        self.fetch_with_retry(&self.url(&format!("load-balancers/{}/metrics", arn)))
            .await
    }

    async fn describe_service(&self, cluster: &str, service: &str) -> Result<ServiceDescription> {
        let cluster = Self::name_segment(cluster, "Cluster name")?;
        let service = Self::name_segment(service, "Service name")?;
        self.fetch_with_retry(&self.url(&format!("clusters/{}/services/{}", cluster, service)))
            .await
    }

    async fn list_service_tasks(&self, cluster: &str, service: &str) -> Result<Vec<TaskDescription>> {
        let cluster = Self::name_segment(cluster, "Cluster name")?;
        let service = Self::name_segment(service, "Service name")?;
        self.fetch_with_retry(&self.url(&format!(
            "clusters/{}/services/{}/tasks",
            cluster, service
        )))
        .await
    }

    async fn get_service_metrics(&self, cluster: &str, service: &str) -> Result<ServiceMetrics> {
        let cluster = Self::name_segment(cluster, "Cluster name")?;
        let service = Self::name_segment(service, "Service name")?;
        self.fetch_with_retry(&self.url(&format!(
            "clusters/{}/services/{}/metrics",
            cluster, service
        )))
        .await
    }

    async fn describe_database(&self, identifier: &str) -> Result<DatabaseDescription> {
        let identifier = Self::name_segment(identifier, "Database identifier")?;
        self.fetch_with_retry(&self.url(&format!("databases/{}", identifier)))
            .await
    }

    async fn list_buckets_prefixed(&self, prefix: &str) -> Result<Vec<BucketDescription>> {
        self.fetch_with_retry(&self.url_with_query("buckets", &[("prefix", prefix)]))
            .await
    }

    async fn list_log_groups(&self, prefix: &str) -> Result<Vec<LogGroupDescription>> {
        self.fetch_with_retry(&self.url_with_query("log-groups", &[("prefix", prefix)]))
            .await
    }

    async fn filter_log_events(
        &self,
        log_group: &str,
        filter: LogEventFilter,
    ) -> Result<Vec<LogEvent>> {
        if log_group.trim().is_empty() {
            anyhow::bail!("Log group name is empty");
        }
        let url = match filter {
            LogEventFilter::Latest(limit) => self.url_with_query(
                "log-events",
                &[("log_group", log_group), ("limit", limit.to_string().as_str())],
            ),
            LogEventFilter::Matching(pattern) => self.url_with_query(
                "log-events",
                &[("log_group", log_group), ("pattern", pattern)],
            ),
        };
        self.fetch_with_retry(&url).await
    }

    async fn get_monthly_cost(&self, app_name: &str) -> Result<CostReport> {
        let app = Self::name_segment(app_name, "Application name")?;
        self.fetch_with_retry(&self.url(&format!("costs/{}", app)))
            .await
    }

    async fn list_open_tickets(&self, app_name: &str) -> Result<Vec<TicketDescription>> {
        let app = Self::name_segment(app_name, "Application name")?;
        self.fetch_with_retry(&self.url(&format!("tickets/{}", app)))
            .await
    }

    async fn list_security_findings(&self, resource_id: &str) -> Result<Vec<SecurityFinding>> {
        self.fetch_with_retry(&self.url_with_query(
            "security-findings",
            &[("resource_id", resource_id)],
        ))
        .await
    }

    async fn get_branch_head(&self, repository: &str, branch: &str) -> Result<BranchHead> {
        let repository = Self::name_segment(repository, "Repository name")?;
        let branch = Self::name_segment(branch, "Branch name")?;
        self.fetch_with_retry(&self.url(&format!(
            "repositories/{}/branches/{}",
            repository, branch
        )))
        .await
    }
}
