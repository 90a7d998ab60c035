use crate::snapshot::domain::{
    AppSnapshot, ApplicationDefinition, ComputeInfo, CostSummary, DatabaseInfo, DerivedFields,
    EnvironmentDefinition, LoadBalancerInfo, LogGroupSet, PipelineInfo, ResolvedTopology,
    SatelliteData, Section, SectionTimestamps, SecuritySummary, SnapshotIdentity, SourceInfo,
    StorageInfo, TicketSummary, UNKNOWN,
};
use crate::snapshot::policies::{FreshnessPolicy, HealthPolicy};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Display URL used when the load balancer's DNS name is not known.
pub const NOT_AVAILABLE: &str = "N/A";

/// Section values produced during one resolution cycle.
///
/// `None` means the section was not due this cycle and should be carried over
/// from the previous snapshot. `Some` holds the fetched value, or the sentinel
/// default when the fetch failed; `succeeded` tells the two apart.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSections {
    pub source: Option<SourceInfo>,
    pub pipeline: Option<PipelineInfo>,
    pub compute: Option<ComputeInfo>,
    pub load_balancer: Option<LoadBalancerInfo>,
    pub database: Option<DatabaseInfo>,
    pub storage: Option<StorageInfo>,
    pub log_groups: Option<LogGroupSet>,
    pub cost: Option<CostSummary>,
    pub tickets: Option<TicketSummary>,
    pub security: Option<SecuritySummary>,
    pub succeeded: BTreeSet<Section>,
}

impl ResolvedSections {
    pub fn mark(&mut self, section: Section, succeeded: bool) {
        if succeeded {
            self.succeeded.insert(section);
        }
    }

    /// Folds another partial result into this one. Values already present win.
    pub fn absorb(&mut self, other: ResolvedSections) {
        self.source = self.source.take().or(other.source);
        self.pipeline = self.pipeline.take().or(other.pipeline);
        self.compute = self.compute.take().or(other.compute);
        self.load_balancer = self.load_balancer.take().or(other.load_balancer);
        self.database = self.database.take().or(other.database);
        self.storage = self.storage.take().or(other.storage);
        self.log_groups = self.log_groups.take().or(other.log_groups);
        self.cost = self.cost.take().or(other.cost);
        self.tickets = self.tickets.take().or(other.tickets);
        self.security = self.security.take().or(other.security);
        self.succeeded.extend(other.succeeded);
    }
}

/// Builds immutable snapshots from definitional data, fresh sections and the
/// previous snapshot's retained sections.
pub struct SnapshotAssembler;

impl SnapshotAssembler {
    pub fn assemble(
        definition: &ApplicationDefinition,
        environment: &EnvironmentDefinition,
        previous: Option<&AppSnapshot>,
        fresh: ResolvedSections,
        now: DateTime<Utc>,
    ) -> AppSnapshot {
        let source = fresh
            .source
            .or_else(|| previous.map(|p| p.source().clone()))
            .unwrap_or_else(|| Self::unresolved_source(definition, environment));

        let topology = ResolvedTopology {
            pipeline: carry(fresh.pipeline, previous, |p| &p.topology().pipeline),
            compute: carry(fresh.compute, previous, |p| &p.topology().compute),
            load_balancer: carry(fresh.load_balancer, previous, |p| {
                &p.topology().load_balancer
            }),
            database: carry(fresh.database, previous, |p| &p.topology().database),
            storage: carry(fresh.storage, previous, |p| &p.topology().storage),
            log_groups: carry(fresh.log_groups, previous, |p| &p.topology().log_groups),
        };

        let satellites = SatelliteData {
            cost: carry(fresh.cost, previous, |p| &p.satellites().cost),
            tickets: carry(fresh.tickets, previous, |p| &p.satellites().tickets),
            security: carry(fresh.security, previous, |p| &p.satellites().security),
        };

        let derived = DerivedFields {
            display_url: Self::display_url(&topology.load_balancer),
            status: HealthPolicy::app_status(&topology.compute),
        };

        let previous_timestamps = previous
            .map(|p| p.section_timestamps().clone())
            .unwrap_or_else(SectionTimestamps::new);
        let section_timestamps =
            FreshnessPolicy::mark_fetched(&previous_timestamps, &fresh.succeeded, now);

        let identity = SnapshotIdentity {
            snapshot_id: format!("urn:uuid:{}", Uuid::new_v4()),
            app_name: definition.name().to_string(),
            environment: environment.name(),
            account_id: environment.account_id().to_string(),
            region: definition.region_for(environment).to_string(),
        };

        AppSnapshot::new(
            identity,
            now,
            source,
            topology,
            satellites,
            derived,
            section_timestamps,
        )
    }

    /// `{protocol}://{dns}:{port}` with the protocol lowercased, or `N/A`
    /// when the DNS name is unknown.
    pub fn display_url(load_balancer: &LoadBalancerInfo) -> String {
        let dns = load_balancer.dns_name.trim();
        if dns.is_empty() || dns == UNKNOWN {
            return NOT_AVAILABLE.to_string();
        }

        format!(
            "{}://{}:{}",
            load_balancer.protocol.to_ascii_lowercase(),
            dns,
            load_balancer.port
        )
    }

    /// Branch deployed to an environment: its override, else the production branch.
    pub fn deployed_branch<'a>(
        definition: &'a ApplicationDefinition,
        environment: &'a EnvironmentDefinition,
    ) -> &'a str {
        environment
            .git_branch()
            .unwrap_or_else(|| definition.source().production_branch())
    }

    fn unresolved_source(
        definition: &ApplicationDefinition,
        environment: &EnvironmentDefinition,
    ) -> SourceInfo {
        SourceInfo::unresolved(
            definition.source().project_name(),
            Self::deployed_branch(definition, environment),
            definition.source().git_origin_url(),
        )
    }
}

fn carry<T: Clone + Default>(
    fresh: Option<T>,
    previous: Option<&AppSnapshot>,
    field: impl Fn(&AppSnapshot) -> &T,
) -> T {
    fresh
        .or_else(|| previous.map(|p| field(p).clone()))
        .unwrap_or_default()
}
