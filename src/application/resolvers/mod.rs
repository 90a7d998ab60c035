/// Section resolvers
///
/// The deployment-chain resolver walks pipeline → deployment group → service
/// and load balancer sequentially; the satellite resolver fans out over the
/// independent sections. Both go through [`SafeCaller`] for every gateway
/// call and never fail.
mod deployment_chain;
mod safe_call;
mod satellites;

pub use deployment_chain::{ChainScope, DeploymentChainResolver};
pub use safe_call::{FetchFailure, Fetched, SafeCaller};
pub use satellites::SatelliteResolver;

use crate::snapshot::domain::{ApplicationDefinition, EnvironmentDefinition, EnvironmentName};
use crate::snapshot::services::{ResourceNaming, SnapshotAssembler};

/// Everything the resolvers need to know about the environment being resolved.
#[derive(Debug, Clone)]
pub struct ResolutionTarget {
    pub app_name: String,
    pub environment: EnvironmentName,
    pub pipeline_name: String,
    pub database_hint: Option<String>,
    pub repository: String,
    pub branch: String,
    pub git_origin_url: String,
    /// Compute service name from the previous snapshot, when it was resolved
    pub known_service_name: Option<String>,
    pub naming: ResourceNaming,
}

impl ResolutionTarget {
    pub fn new(definition: &ApplicationDefinition, environment: &EnvironmentDefinition) -> Self {
        Self {
            app_name: definition.name().to_string(),
            environment: environment.name(),
            pipeline_name: environment.deploy_pipeline().to_string(),
            database_hint: environment.database_hint().map(str::to_string),
            repository: definition.source().project_name().to_string(),
            branch: SnapshotAssembler::deployed_branch(definition, environment).to_string(),
            git_origin_url: definition.source().git_origin_url().to_string(),
            known_service_name: None,
            naming: ResourceNaming::new(definition.name(), environment.name()),
        }
    }

    pub fn with_known_service_name(mut self, service_name: Option<String>) -> Self {
        self.known_service_name = service_name;
        self
    }

    /// Identifier of the database: the first hint, else `{app}-{env}-db`.
    pub fn database_identifier(&self) -> String {
        self.naming
            .database_identifier(self.database_hint.as_deref())
    }

    /// Service whose security findings are reported.
    pub fn security_resource_id(&self) -> String {
        self.known_service_name
            .clone()
            .unwrap_or_else(|| self.naming.service_name())
    }
}
