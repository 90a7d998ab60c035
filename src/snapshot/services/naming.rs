use crate::snapshot::domain::EnvironmentName;

/// Naming conventions used when a resource identifier cannot be derived
/// from the deployment chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNaming {
    stem: String,
}

impl ResourceNaming {
    pub fn new(app_name: &str, environment: EnvironmentName) -> Self {
        Self {
            stem: format!("{}-{}", app_name, environment),
        }
    }

    /// `{app}-{env}`
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// The hinted identifier when present, else `{app}-{env}-db`.
    pub fn database_identifier(&self, hint: Option<&str>) -> String {
        match hint {
            Some(hint) => hint.to_string(),
            None => format!("{}-db", self.stem),
        }
    }

    pub fn service_name(&self) -> String {
        format!("{}-service", self.stem)
    }

    pub fn bucket_prefix(&self) -> &str {
        &self.stem
    }

    pub fn bucket_url(bucket_name: &str) -> String {
        format!("s3://{}", bucket_name)
    }

    pub fn compute_log_prefix(&self) -> String {
        format!("/aws/ecs/{}", self.stem)
    }

    pub fn fargate_log_prefix(&self) -> String {
        format!("/aws/fargate/{}", self.stem)
    }

    pub fn load_balancer_log_prefix(&self) -> String {
        format!("/aws/alb/{}", self.stem)
    }

    pub fn database_log_prefix(database_identifier: &str) -> String {
        format!("/aws/rds/{}", database_identifier)
    }
}
