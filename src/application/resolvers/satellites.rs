use super::{Fetched, ResolutionTarget, SafeCaller};
use crate::ports::outbound::gateway_models::{
    LogEvent, LogEventFilter, LogGroupDescription, SecurityFinding, TicketDescription,
    ERROR_PATTERN, RECENT_LOG_EVENTS,
};
use crate::ports::outbound::InfrastructureGateway;
use crate::snapshot::domain::satellites::{DEFAULT_CURRENCY, MAX_LATEST_FINDINGS, MAX_LATEST_TICKETS};
use crate::snapshot::domain::{
    known, BucketInfo, CostSummary, DatabaseInfo, FindingRef, LogEntry, LogGroupRef, LogGroupSet,
    LogSeverity, Section, SecuritySummary, SourceInfo, StorageInfo, TicketRef, TicketSummary,
    UNKNOWN,
};
use crate::snapshot::services::{ResolvedSections, ResourceNaming};
use chrono::SecondsFormat;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;

/// Resolves the sections that do not depend on the deployment chain.
///
/// Each section is independent; [`Self::resolve_all`] runs them as a bounded
/// concurrent stream.
pub struct SatelliteResolver<'a, G: ?Sized> {
    gateway: &'a G,
    caller: SafeCaller,
    max_concurrency: usize,
}

impl<'a, G> SatelliteResolver<'a, G>
where
    G: InfrastructureGateway + ?Sized,
{
    pub fn new(gateway: &'a G, caller: SafeCaller, max_concurrency: usize) -> Self {
        Self {
            gateway,
            caller,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Resolves every non-chain section in `due`, at most `max_concurrency`
    /// at a time.
    pub async fn resolve_all(
        &self,
        target: &ResolutionTarget,
        due: &BTreeSet<Section>,
    ) -> ResolvedSections {
        let sections: Vec<Section> = due.iter().copied().filter(|s| !s.is_chain()).collect();

        stream::iter(sections)
            .map(|section| self.resolve(target, section))
            .buffer_unordered(self.max_concurrency)
            .fold(ResolvedSections::default(), |mut merged, resolved| async move {
                merged.absorb(resolved);
                merged
            })
            .await
    }

    /// Resolves a single section. Chain sections yield an empty result.
    pub async fn resolve(&self, target: &ResolutionTarget, section: Section) -> ResolvedSections {
        let mut out = ResolvedSections::default();
        let succeeded = match section {
            Section::Rds => {
                let (database, ok) = self.database(target).await;
                out.database = Some(database);
                ok
            }
            Section::S3 => {
                let (storage, ok) = self.storage(target).await;
                out.storage = Some(storage);
                ok
            }
            Section::Logs => {
                let (logs, ok) = self.log_groups(target).await;
                out.log_groups = Some(logs);
                ok
            }
            Section::Cost => {
                let (cost, ok) = self.cost(target).await;
                out.cost = Some(cost);
                ok
            }
            Section::Tickets => {
                let (tickets, ok) = self.tickets(target).await;
                out.tickets = Some(tickets);
                ok
            }
            Section::Security => {
                let (security, ok) = self.security(target).await;
                out.security = Some(security);
                ok
            }
            Section::Source => {
                let (source, ok) = self.source(target).await;
                out.source = Some(source);
                ok
            }
            Section::Pipeline | Section::Ecs | Section::Alb => return out,
        };

        tracing::debug!(section = %section, succeeded, "satellite resolved");
        out.mark(section, succeeded);
        out
    }

    async fn database(&self, target: &ResolutionTarget) -> (DatabaseInfo, bool) {
        let identifier = target.database_identifier();
        let (description, ok) = self
            .caller
            .call(
                "describe_database",
                self.gateway.describe_database(&identifier),
                Default::default(),
            )
            .await
            .into_parts();

        let mut info = DatabaseInfo {
            identifier,
            ..DatabaseInfo::default()
        };
        if ok {
            info.arn = known(&description.arn);
            info.endpoint = known(&description.endpoint);
            info.status = known(&description.status);
            info.engine = known(&description.engine);
            info.engine_version = known(&description.engine_version);
        }
        (info, ok)
    }

    async fn storage(&self, target: &ResolutionTarget) -> (StorageInfo, bool) {
        let prefix = target.naming.bucket_prefix();
        let (buckets, ok) = self
            .caller
            .call(
                "list_buckets_prefixed",
                self.gateway.list_buckets_prefixed(prefix),
                Vec::new(),
            )
            .await
            .into_parts();

        let buckets = buckets
            .into_iter()
            .filter(|bucket| bucket.name.starts_with(prefix))
            .map(|bucket| BucketInfo {
                url: ResourceNaming::bucket_url(&bucket.name),
                arn: if bucket.arn.is_empty() {
                    format!("arn:aws:s3:::{}", bucket.name)
                } else {
                    bucket.arn
                },
                name: bucket.name,
            })
            .collect();
        (StorageInfo { buckets }, ok)
    }

    /// Log groups per resource class. Compute groups fall back to the Fargate
    /// prefix when the ECS prefix lookup fails or finds nothing.
    async fn log_groups(&self, target: &ResolutionTarget) -> (LogGroupSet, bool) {
        let naming = &target.naming;

        let ecs = self.list_log_groups(&naming.compute_log_prefix()).await;
        let (compute, compute_ok) = if ecs.succeeded() && !ecs.value().is_empty() {
            ecs.into_parts()
        } else {
            let fargate = self.list_log_groups(&naming.fargate_log_prefix()).await;
            let either_ok = ecs.succeeded() || fargate.succeeded();
            (fargate.into_value(), either_ok)
        };

        let (load_balancer, lb_ok) = self
            .list_log_groups(&naming.load_balancer_log_prefix())
            .await
            .into_parts();

        let database_prefix = ResourceNaming::database_log_prefix(&target.database_identifier());
        let (database, db_ok) = self.list_log_groups(&database_prefix).await.into_parts();

        let (compute, load_balancer, database) = futures::join!(
            self.with_recent_activity(compute),
            self.with_recent_activity(load_balancer),
            self.with_recent_activity(database),
        );
        let set = LogGroupSet {
            compute,
            load_balancer,
            database,
        };
        (set, compute_ok && lb_ok && db_ok)
    }

    /// Attaches the latest events and the error count of the last hour to
    /// each group. A failed lookup leaves that group's fields empty.
    async fn with_recent_activity(&self, groups: Vec<LogGroupDescription>) -> Vec<LogGroupRef> {
        stream::iter(groups)
            .map(|group| async move {
                let mut group_ref = LogGroupRef::new(group.name, &group.arn);
                let (recent, errors) = futures::join!(
                    self.filter_log_events(&group_ref.name, LogEventFilter::Latest(RECENT_LOG_EVENTS)),
                    self.filter_log_events(&group_ref.name, LogEventFilter::Matching(ERROR_PATTERN)),
                );
                group_ref.recent = recent
                    .into_value()
                    .into_iter()
                    .take(RECENT_LOG_EVENTS)
                    .map(log_entry)
                    .collect();
                group_ref.error_count = errors.ok().map(|events| count(&events));
                group_ref
            })
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    async fn filter_log_events(&self, log_group: &str, filter: LogEventFilter) -> Fetched<Vec<LogEvent>> {
        self.caller
            .call(
                "filter_log_events",
                self.gateway.filter_log_events(log_group, filter),
                Vec::new(),
            )
            .await
    }

    async fn list_log_groups(&self, prefix: &str) -> Fetched<Vec<LogGroupDescription>> {
        self.caller
            .call(
                "list_log_groups",
                self.gateway.list_log_groups(prefix),
                Vec::new(),
            )
            .await
    }

    async fn cost(&self, target: &ResolutionTarget) -> (CostSummary, bool) {
        match self
            .caller
            .call(
                "get_monthly_cost",
                self.gateway.get_monthly_cost(&target.app_name),
                Default::default(),
            )
            .await
            .ok()
        {
            Some(report) => (
                CostSummary {
                    currency: report
                        .currency
                        .filter(|c| !c.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                    current_monthly_total: report.amount,
                },
                true,
            ),
            None => (CostSummary::default(), false),
        }
    }

    async fn tickets(&self, target: &ResolutionTarget) -> (TicketSummary, bool) {
        let (mut tickets, ok) = self
            .caller
            .call(
                "list_open_tickets",
                self.gateway.list_open_tickets(&target.app_name),
                Vec::new(),
            )
            .await
            .into_parts();

        tickets.sort_by(|a, b| b.created.cmp(&a.created));
        let summary = TicketSummary {
            open: count(&tickets),
            latest: tickets
                .into_iter()
                .take(MAX_LATEST_TICKETS)
                .map(ticket_ref)
                .collect(),
        };
        (summary, ok)
    }

    async fn security(&self, target: &ResolutionTarget) -> (SecuritySummary, bool) {
        let resource_id = target.security_resource_id();
        let (mut findings, ok) = self
            .caller
            .call(
                "list_security_findings",
                self.gateway.list_security_findings(&resource_id),
                Vec::new(),
            )
            .await
            .into_parts();

        findings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let critical = findings
            .iter()
            .filter(|f| f.severity.eq_ignore_ascii_case("CRITICAL"))
            .count();
        let summary = SecuritySummary {
            open: count(&findings),
            critical: u32::try_from(critical).unwrap_or(u32::MAX),
            latest: findings
                .into_iter()
                .take(MAX_LATEST_FINDINGS)
                .map(finding_ref)
                .collect(),
        };
        (summary, ok)
    }

    async fn source(&self, target: &ResolutionTarget) -> (SourceInfo, bool) {
        let mut info =
            SourceInfo::unresolved(&target.repository, &target.branch, &target.git_origin_url);
        let fetched = self
            .caller
            .call(
                "get_branch_head",
                self.gateway
                    .get_branch_head(&target.repository, &target.branch),
                Default::default(),
            )
            .await;

        let ok = fetched.succeeded();
        info.commit_id = known(&fetched.into_value().commit_id);
        (info, ok)
    }
}

fn count<T>(items: &[T]) -> u32 {
    u32::try_from(items.len()).unwrap_or(u32::MAX)
}

fn log_entry(event: LogEvent) -> LogEntry {
    LogEntry {
        timestamp: event
            .timestamp
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| UNKNOWN.to_string()),
        severity: LogSeverity::classify(&event.message),
        message: event.message,
    }
}

fn ticket_ref(ticket: TicketDescription) -> TicketRef {
    TicketRef {
        key: ticket.key,
        summary: ticket.summary,
        status: known(&ticket.status),
    }
}

fn finding_ref(finding: SecurityFinding) -> FindingRef {
    FindingRef {
        id: finding.id,
        title: finding.title,
        severity: known(&finding.severity),
    }
}
