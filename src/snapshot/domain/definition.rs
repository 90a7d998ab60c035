use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Deployment stage an application can be resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentName {
    Dev,
    Qa,
    Prod,
}

impl EnvironmentName {
    pub const ALL: [EnvironmentName; 3] =
        [EnvironmentName::Dev, EnvironmentName::Qa, EnvironmentName::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentName::Dev => "dev",
            EnvironmentName::Qa => "qa",
            EnvironmentName::Prod => "prod",
        }
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(EnvironmentName::Dev),
            "qa" => Ok(EnvironmentName::Qa),
            "prod" => Ok(EnvironmentName::Prod),
            other => Err(format!(
                "Invalid environment '{}'. Valid values: dev, qa, prod",
                other
            )),
        }
    }
}

fn default_production_branch() -> String {
    "main".to_string()
}

/// Where the application's code lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRepository {
    project_name: String,
    git_origin_url: String,
    #[serde(default = "default_production_branch")]
    production_branch: String,
}

impl SourceRepository {
    pub fn new(project_name: impl Into<String>, git_origin_url: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            git_origin_url: git_origin_url.into(),
            production_branch: default_production_branch(),
        }
    }

    pub fn with_production_branch(mut self, branch: impl Into<String>) -> Self {
        self.production_branch = branch.into();
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn git_origin_url(&self) -> &str {
        &self.git_origin_url
    }

    pub fn production_branch(&self) -> &str {
        &self.production_branch
    }
}

/// One deployable stage of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDefinition {
    name: EnvironmentName,
    deploy_pipeline: String,
    account_id: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    database_names: Vec<String>,
    #[serde(default)]
    git_branch: Option<String>,
}

impl EnvironmentDefinition {
    pub fn new(
        name: EnvironmentName,
        deploy_pipeline: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            name,
            deploy_pipeline: deploy_pipeline.into(),
            account_id: account_id.into(),
            region: None,
            database_names: Vec::new(),
            git_branch: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_database_names(mut self, names: Vec<String>) -> Self {
        self.database_names = names;
        self
    }

    pub fn with_git_branch(mut self, branch: impl Into<String>) -> Self {
        self.git_branch = Some(branch.into());
        self
    }

    pub fn name(&self) -> EnvironmentName {
        self.name
    }

    pub fn deploy_pipeline(&self) -> &str {
        &self.deploy_pipeline
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn database_names(&self) -> &[String] {
        &self.database_names
    }

    /// First non-blank database name hint, if any.
    pub fn database_hint(&self) -> Option<&str> {
        self.database_names
            .iter()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
    }

    pub fn git_branch(&self) -> Option<&str> {
        self.git_branch.as_deref()
    }
}

/// Static identity of an application, loaded from the definition store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDefinition {
    name: String,
    #[serde(default)]
    description: Option<String>,
    source: SourceRepository,
    default_region: String,
    environments: Vec<EnvironmentDefinition>,
}

impl ApplicationDefinition {
    pub fn new(
        name: impl Into<String>,
        source: SourceRepository,
        default_region: impl Into<String>,
        environments: Vec<EnvironmentDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            source,
            default_region: default_region.into(),
            environments,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source(&self) -> &SourceRepository {
        &self.source
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    pub fn environments(&self) -> &[EnvironmentDefinition] {
        &self.environments
    }

    pub fn environment(&self, name: EnvironmentName) -> Option<&EnvironmentDefinition> {
        self.environments.iter().find(|env| env.name == name)
    }

    /// Comma-separated list of defined environment names, for messages.
    pub fn environment_names(&self) -> String {
        self.environments
            .iter()
            .map(|env| env.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Region for an environment: its override, else the application default.
    pub fn region_for<'a>(&'a self, env: &'a EnvironmentDefinition) -> &'a str {
        env.region().unwrap_or(&self.default_region)
    }

    /// Checks structural rules that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Application name cannot be empty");
        }

        if self.environments.is_empty() {
            anyhow::bail!("Application '{}' defines no environments", self.name);
        }

        let mut seen = HashSet::new();
        for env in &self.environments {
            if !seen.insert(env.name) {
                anyhow::bail!(
                    "Environment '{}' is defined more than once for '{}'",
                    env.name,
                    self.name
                );
            }
            if env.deploy_pipeline.trim().is_empty() {
                anyhow::bail!(
                    "Environment '{}' of '{}' has an empty deploy_pipeline",
                    env.name,
                    self.name
                );
            }
        }

        Ok(())
    }
}
