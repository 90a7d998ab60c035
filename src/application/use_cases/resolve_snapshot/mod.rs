use crate::application::cache::SnapshotCache;
use crate::application::dto::{ResolutionSettings, SnapshotRequest};
use crate::application::resolvers::{
    ChainScope, DeploymentChainResolver, ResolutionTarget, SafeCaller, SatelliteResolver,
};
use crate::ports::inbound::SnapshotResolutionPort;
use crate::ports::outbound::{Clock, DefinitionRepository, InfrastructureGateway, ProgressReporter};
use crate::shared::error::SnapshotError;
use crate::shared::Result;
use crate::snapshot::domain::{
    AppSnapshot, ApplicationDefinition, EnvironmentDefinition, EnvironmentName, Section,
};
use crate::snapshot::policies::FreshnessPolicy;
use crate::snapshot::services::SnapshotAssembler;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// ResolveSnapshotUseCase - Core use case for snapshot resolution
///
/// Orchestrates one request: load the definition, consult the cache, decide
/// which sections are due, resolve them (chain and satellites concurrently),
/// assemble a new snapshot, and commit it to the cache once. Requests for the
/// same application and environment take turns from the cache read to the
/// commit.
///
/// # Type Parameters
/// * `G` - InfrastructureGateway implementation
/// * `D` - DefinitionRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct ResolveSnapshotUseCase<G: ?Sized, D, PR> {
    gateway: Arc<G>,
    definitions: D,
    progress_reporter: PR,
    cache: Arc<SnapshotCache>,
    clock: Arc<dyn Clock>,
    settings: ResolutionSettings,
    freshness: FreshnessPolicy,
}

impl<G, D, PR> ResolveSnapshotUseCase<G, D, PR>
where
    G: InfrastructureGateway + ?Sized,
    D: DefinitionRepository,
    PR: ProgressReporter,
{
    /// Creates a new ResolveSnapshotUseCase with injected dependencies
    ///
    /// The cache is shared: every use case built with the same handle sees
    /// the same snapshots.
    pub fn new(
        gateway: Arc<G>,
        definitions: D,
        progress_reporter: PR,
        cache: Arc<SnapshotCache>,
        clock: Arc<dyn Clock>,
        settings: ResolutionSettings,
    ) -> Self {
        Self {
            gateway,
            definitions,
            progress_reporter,
            cache,
            clock,
            freshness: FreshnessPolicy::new(settings.section_ttl),
            settings,
        }
    }

    /// Executes the snapshot resolution use case
    ///
    /// # Errors
    /// Definition errors and an exceeded request deadline. Nothing is written
    /// to the cache in either case.
    pub async fn execute(&self, request: SnapshotRequest) -> Result<Arc<AppSnapshot>> {
        let (definition, environment) = self.load_definition(&request)?;

        let resolution = self.resolve(&definition, &environment, request.sections());
        match tokio::time::timeout(self.settings.request_deadline, resolution).await {
            Ok(snapshot) => Ok(snapshot),
            Err(_) => {
                tracing::warn!(
                    app = definition.name(),
                    env = %environment.name(),
                    "resolution abandoned at deadline"
                );
                Err(SnapshotError::DeadlineExceeded {
                    app_name: definition.name().to_string(),
                    environment: environment.name().to_string(),
                    deadline_secs: self.settings.request_deadline.as_secs(),
                }
                .into())
            }
        }
    }

    /// Loads the application definition and selects the requested environment
    fn load_definition(
        &self,
        request: &SnapshotRequest,
    ) -> Result<(ApplicationDefinition, EnvironmentDefinition)> {
        let definition = self
            .definitions
            .load_application(request.app_name())?
            .ok_or_else(|| SnapshotError::ApplicationNotFound {
                app_name: request.app_name().to_string(),
                suggestion: format!(
                    "Add app_{}.json or app_{}.yaml to the definitions directory",
                    request.app_name(),
                    request.app_name()
                ),
            })?;

        let environment = request
            .environment()
            .parse::<EnvironmentName>()
            .ok()
            .and_then(|name| definition.environment(name))
            .cloned()
            .ok_or_else(|| SnapshotError::EnvironmentNotFound {
                app_name: definition.name().to_string(),
                environment: request.environment().to_string(),
                available: definition.environment_names(),
            })?;

        Ok((definition, environment))
    }

    async fn resolve(
        &self,
        definition: &ApplicationDefinition,
        environment: &EnvironmentDefinition,
        requested: &BTreeSet<Section>,
    ) -> Arc<AppSnapshot> {
        let app_name = definition.name();
        let env_name = environment.name();
        let _refresh = self.cache.refresh_guard(app_name, env_name).await;
        let now = self.clock.now();

        let previous = self.cache.get(app_name, env_name);
        let timestamps = previous
            .as_ref()
            .map(|snapshot| snapshot.section_timestamps().clone())
            .unwrap_or_default();
        let due = self.freshness.due_sections(requested, &timestamps, now);

        if let Some(cached) = previous.as_ref().filter(|_| due.is_empty()) {
            tracing::debug!(app = app_name, env = %env_name, "all requested sections fresh, serving cache");
            self.progress_reporter
                .report_completion(&format!("✅ Using cached snapshot for {}/{}", app_name, env_name));
            return Arc::clone(cached);
        }

        self.progress_reporter.report(&format!(
            "🔍 Resolving {} section(s) for {}/{}: {}",
            due.len(),
            app_name,
            env_name,
            join_sections(&due)
        ));

        let known_service_name = previous
            .as_ref()
            .map(|snapshot| &snapshot.topology().compute)
            .filter(|compute| compute.has_service_name())
            .map(|compute| compute.service_name.clone());
        let target =
            ResolutionTarget::new(definition, environment).with_known_service_name(known_service_name);

        let caller = SafeCaller::new(self.settings.call_timeout);
        let chain = DeploymentChainResolver::new(&*self.gateway, caller);
        let satellites =
            SatelliteResolver::new(&*self.gateway, caller, self.settings.max_concurrency);

        self.progress_reporter
            .report_progress(0, due.len(), Some("querying gateway"));
        let (mut fresh, satellite_sections) = tokio::join!(
            chain.resolve(&target, ChainScope::from_due(&due)),
            satellites.resolve_all(&target, &due)
        );
        fresh.absorb(satellite_sections);
        self.progress_reporter
            .report_progress(due.len(), due.len(), Some("assembling snapshot"));

        let degraded: BTreeSet<Section> = due.difference(&fresh.succeeded).copied().collect();
        if !degraded.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} section(s) could not be fully resolved: {}",
                degraded.len(),
                join_sections(&degraded)
            ));
        }

        let snapshot = Arc::new(SnapshotAssembler::assemble(
            definition,
            environment,
            previous.as_deref(),
            fresh,
            now,
        ));
        self.cache.put(app_name, env_name, Arc::clone(&snapshot));

        tracing::info!(
            app = app_name,
            env = %env_name,
            resolved = due.len() - degraded.len(),
            degraded = degraded.len(),
            status = %snapshot.status(),
            "snapshot resolved"
        );
        self.progress_reporter.report_completion(&format!(
            "✅ Snapshot resolved: {} of {} section(s) fresh",
            due.len() - degraded.len(),
            due.len()
        ));

        snapshot
    }
}

#[async_trait]
impl<G, D, PR> SnapshotResolutionPort for ResolveSnapshotUseCase<G, D, PR>
where
    G: InfrastructureGateway + ?Sized,
    D: DefinitionRepository,
    PR: ProgressReporter,
{
    async fn resolve_snapshot(&self, request: SnapshotRequest) -> Result<Arc<AppSnapshot>> {
        self.execute(request).await
    }
}

fn join_sections(sections: &BTreeSet<Section>) -> String {
    sections
        .iter()
        .map(Section::key)
        .collect::<Vec<_>>()
        .join(", ")
}
