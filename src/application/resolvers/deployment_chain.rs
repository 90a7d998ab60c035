use super::{ResolutionTarget, SafeCaller};
use crate::ports::outbound::gateway_models::{
    DeploymentGroup, ListenerDescription, PipelineDefinition, TaskDescription,
    DEPLOY_TO_COMPUTE_PROVIDER,
};
use crate::ports::outbound::InfrastructureGateway;
use crate::snapshot::domain::{
    known, CertificateInfo, ComputeInfo, ContainerInfo, Health, LoadBalancerInfo, PipelineInfo,
    Section, UNKNOWN,
};
use crate::snapshot::policies::{HealthPolicy, ListenerPolicy, HTTPS_PORT};
use crate::snapshot::services::ResolvedSections;
use chrono::SecondsFormat;
use std::collections::BTreeSet;

/// Which chain-derived sections are due this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainScope {
    pub pipeline: bool,
    pub compute: bool,
    pub load_balancer: bool,
}

impl ChainScope {
    pub fn from_due(due: &BTreeSet<Section>) -> Self {
        Self {
            pipeline: due.contains(&Section::Pipeline),
            compute: due.contains(&Section::Ecs),
            load_balancer: due.contains(&Section::Alb),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.pipeline || self.compute || self.load_balancer)
    }
}

/// How far a chain step got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Resolved,
    /// Every lookup succeeded but the topology ends before this step.
    Absent,
    Failed,
}

impl StepOutcome {
    /// Absent steps count as fetched: asking again would find the same.
    fn succeeded(self) -> bool {
        self != Self::Failed
    }
}

enum GroupLookup {
    Found(DeploymentGroup),
    Absent,
    Failed,
}

/// Walks pipeline → deploy action → deployment group → service and load
/// balancer, each step feeding the next.
///
/// A failed or empty step leaves only the fields it would have populated at
/// their sentinels. The walk itself never fails.
pub struct DeploymentChainResolver<'a, G: ?Sized> {
    gateway: &'a G,
    caller: SafeCaller,
}

impl<'a, G> DeploymentChainResolver<'a, G>
where
    G: InfrastructureGateway + ?Sized,
{
    pub fn new(gateway: &'a G, caller: SafeCaller) -> Self {
        Self { gateway, caller }
    }

    /// Resolves the sections in `scope`. Sections outside it are left `None`.
    pub async fn resolve(&self, target: &ResolutionTarget, scope: ChainScope) -> ResolvedSections {
        let mut sections = ResolvedSections::default();
        if scope.is_empty() {
            return sections;
        }

        let (pipeline, pipeline_ok) = self
            .caller
            .call(
                "get_pipeline",
                self.gateway.get_pipeline(&target.pipeline_name),
                PipelineDefinition::default(),
            )
            .await
            .into_parts();

        if scope.pipeline {
            let info = self.pipeline_info(target, &pipeline, pipeline_ok).await;
            sections.pipeline = Some(info);
            sections.mark(Section::Pipeline, pipeline_ok);
        }

        if !(scope.compute || scope.load_balancer) {
            return sections;
        }

        let mut compute = (ComputeInfo::default(), StepOutcome::Failed);
        let mut load_balancer = (LoadBalancerInfo::default(), StepOutcome::Failed);

        let group = if pipeline_ok {
            self.deployment_group(target, &pipeline).await
        } else {
            GroupLookup::Failed
        };
        match group {
            GroupLookup::Found(group) => {
                if scope.load_balancer {
                    load_balancer = self.resolve_load_balancer(&group).await;
                }
                if scope.compute {
                    compute = self.resolve_compute(&group).await;
                }
            }
            GroupLookup::Absent => {
                compute.1 = StepOutcome::Absent;
                load_balancer.1 = StepOutcome::Absent;
            }
            GroupLookup::Failed => {}
        }

        if scope.compute {
            let (info, outcome) = compute;
            sections.compute = Some(info);
            sections.mark(Section::Ecs, outcome.succeeded());
        }
        if scope.load_balancer {
            let (info, outcome) = load_balancer;
            sections.load_balancer = Some(info);
            sections.mark(Section::Alb, outcome.succeeded());
        }

        sections
    }

    async fn pipeline_info(
        &self,
        target: &ResolutionTarget,
        pipeline: &PipelineDefinition,
        pipeline_ok: bool,
    ) -> PipelineInfo {
        let mut info = PipelineInfo {
            name: target.pipeline_name.clone(),
            ..PipelineInfo::default()
        };
        if !pipeline_ok {
            return info;
        }

        info.arn = known(&pipeline.arn);

        if let Some(execution) = self
            .caller
            .call(
                "latest_pipeline_execution",
                self.gateway.latest_pipeline_execution(&target.pipeline_name),
                Default::default(),
            )
            .await
            .ok()
        {
            info.last_execution_id = known(&execution.execution_id);
            info.last_execution_status = known(&execution.status);
            if let Some(at) = execution.last_update_time {
                info.last_execution_time = at.to_rfc3339_opts(SecondsFormat::Secs, true);
            }
        }

        info
    }

    /// Steps 1 and 2: locate the deploy action and fetch its deployment group.
    ///
    /// A pipeline without a deploy-to-compute action ends the chain without
    /// error.
    async fn deployment_group(
        &self,
        target: &ResolutionTarget,
        pipeline: &PipelineDefinition,
    ) -> GroupLookup {
        let Some(action) = pipeline.find_action(DEPLOY_TO_COMPUTE_PROVIDER) else {
            tracing::debug!(
                pipeline = %target.pipeline_name,
                "no {} action in pipeline, chain stops",
                DEPLOY_TO_COMPUTE_PROVIDER
            );
            return GroupLookup::Absent;
        };

        let application = action
            .config_value("ApplicationName")
            .unwrap_or(&target.app_name);
        let Some(group_name) = action.config_value("DeploymentGroupName") else {
            tracing::warn!(
                pipeline = %target.pipeline_name,
                action = %action.name,
                "deploy action has no DeploymentGroupName"
            );
            return GroupLookup::Absent;
        };

        tracing::debug!(application, group = group_name, "resolving deployment group");
        self.caller
            .call(
                "get_deployment_group",
                self.gateway.get_deployment_group(application, group_name),
                DeploymentGroup::default(),
            )
            .await
            .ok()
            .map_or(GroupLookup::Failed, GroupLookup::Found)
    }

    /// Steps 3 to 5: target groups → load balancer → listener and health.
    async fn resolve_load_balancer(&self, group: &DeploymentGroup) -> (LoadBalancerInfo, StepOutcome) {
        let mut info = LoadBalancerInfo::default();

        let names = group.primary_target_group_names();
        if names.is_empty() {
            tracing::debug!("deployment group has no target-group pairing");
            return (info, StepOutcome::Absent);
        }

        let Some(arns) = self
            .caller
            .call(
                "resolve_target_group_arns",
                self.gateway.resolve_target_group_arns(names),
                Vec::new(),
            )
            .await
            .ok()
        else {
            return (info, StepOutcome::Failed);
        };
        let Some(target_group_arn) = arns.into_iter().find(|arn| !arn.is_empty()) else {
            tracing::warn!(target_groups = ?names, "no target-group ARNs resolved, load balancer unknown");
            return (info, StepOutcome::Absent);
        };
        info.target_group_arn = target_group_arn.clone();

        info.health = self.target_group_health(&target_group_arn).await;

        let Some(target_group) = self
            .caller
            .call(
                "describe_target_group",
                self.gateway.describe_target_group(&target_group_arn),
                Default::default(),
            )
            .await
            .ok()
        else {
            return (info, StepOutcome::Failed);
        };
        let Some(load_balancer_arn) = target_group
            .load_balancer_arns
            .into_iter()
            .find(|arn| !arn.is_empty())
        else {
            tracing::warn!(target_group = %target_group_arn, "target group has no load balancer");
            return (info, StepOutcome::Absent);
        };
        info.arn = load_balancer_arn.clone();

        let (description, described) = self
            .caller
            .call(
                "describe_load_balancer",
                self.gateway.describe_load_balancer(&load_balancer_arn),
                Default::default(),
            )
            .await
            .into_parts();
        if described {
            info.name = known(&description.name);
            info.dns_name = known(&description.dns_name);
            info.state = known(&description.state);
        }

        let listeners = self
            .caller
            .call(
                "describe_listeners",
                self.gateway.describe_listeners(&load_balancer_arn),
                Vec::new(),
            )
            .await
            .into_value();
        apply_listener(&mut info, &listeners);

        if info.certificate_id != UNKNOWN {
            info.certificate = self.certificate(&info.certificate_id).await;
        }

        info.active_connections = self
            .caller
            .call(
                "get_load_balancer_metrics",
                self.gateway.get_load_balancer_metrics(&load_balancer_arn),
                Default::default(),
            )
            .await
            .ok()
            .map(|metrics| connection_count(metrics.active_connection_count));

        let outcome = if described {
            StepOutcome::Resolved
        } else {
            StepOutcome::Failed
        };
        (info, outcome)
    }

    async fn certificate(&self, certificate_arn: &str) -> CertificateInfo {
        self.caller
            .call(
                "describe_certificate",
                self.gateway.describe_certificate(certificate_arn),
                Default::default(),
            )
            .await
            .ok()
            .map(|certificate| CertificateInfo {
                domain_name: known(&certificate.domain_name),
                expires_at: certificate
                    .not_after
                    .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                status: known(&certificate.status),
            })
            .unwrap_or_default()
    }

    async fn target_group_health(&self, target_group_arn: &str) -> Health {
        self.caller
            .call(
                "describe_target_health",
                self.gateway.describe_target_health(target_group_arn),
                Vec::new(),
            )
            .await
            .ok()
            .map(|targets| {
                let states: Vec<&str> = targets.iter().map(|t| t.state.as_str()).collect();
                HealthPolicy::target_group_health(&states)
            })
            .unwrap_or(Health::Unknown)
    }

    /// Step 6: live service status, tasks and containers.
    async fn resolve_compute(&self, group: &DeploymentGroup) -> (ComputeInfo, StepOutcome) {
        let mut info = ComputeInfo {
            cluster_name: known(&group.cluster_name),
            service_name: known(&group.service_name),
            ..ComputeInfo::default()
        };

        if info.cluster_name == UNKNOWN || info.service_name == UNKNOWN {
            tracing::warn!("deployment group names no cluster/service, compute unknown");
            return (info, StepOutcome::Absent);
        }

        let Some(service) = self
            .caller
            .call(
                "describe_service",
                self.gateway
                    .describe_service(&group.cluster_name, &group.service_name),
                Default::default(),
            )
            .await
            .ok()
        else {
            return (info, StepOutcome::Failed);
        };

        info.status = known(&service.status);
        info.running_count = service.running_count;
        info.desired_count = service.desired_count;
        info.task_definition = known(&service.task_definition);

        let tasks = self
            .caller
            .call(
                "list_service_tasks",
                self.gateway
                    .list_service_tasks(&group.cluster_name, &group.service_name),
                Vec::new(),
            )
            .await
            .into_value();

        let task_health: Vec<&str> = tasks.iter().map(|t| t.health_status.as_str()).collect();
        info.health =
            HealthPolicy::service_health(service.running_count, service.desired_count, &task_health);
        info.containers = containers(&tasks);
        if let Some(tag) = info.containers.first().and_then(|c| image_tag(&c.image)) {
            info.version = tag.to_string();
        }

        if let Some(metrics) = self
            .caller
            .call(
                "get_service_metrics",
                self.gateway
                    .get_service_metrics(&group.cluster_name, &group.service_name),
                Default::default(),
            )
            .await
            .ok()
        {
            info.cpu_utilization = metrics.cpu_utilization;
            info.memory_utilization = metrics.memory_utilization;
        }

        tracing::debug!(
            service = %info.service_name,
            health = %info.health,
            running = info.running_count,
            desired = info.desired_count,
            "compute resolved"
        );
        (info, StepOutcome::Resolved)
    }
}

/// A window without datapoints had no connections.
fn connection_count(sum: Option<f64>) -> u64 {
    sum.unwrap_or(0.0).max(0.0).round() as u64
}

fn apply_listener(info: &mut LoadBalancerInfo, listeners: &[ListenerDescription]) {
    let Some(listener) = ListenerPolicy::select(listeners, |l| l.port) else {
        return;
    };

    info.port = listener.port;
    info.protocol = if listener.protocol.trim().is_empty() {
        let protocol = if listener.port == HTTPS_PORT { "HTTPS" } else { "HTTP" };
        protocol.to_string()
    } else {
        listener.protocol.to_ascii_uppercase()
    };
    if let Some(certificate) = listener.certificate_ids.iter().find(|c| !c.is_empty()) {
        info.certificate_id = certificate.clone();
    }
}

fn containers(tasks: &[TaskDescription]) -> Vec<ContainerInfo> {
    tasks
        .iter()
        .flat_map(|task| task.containers.iter())
        .map(|container| ContainerInfo {
            name: known(&container.name),
            image: known(&container.image),
            status: known(&container.last_status),
        })
        .collect()
}

/// Tag of a container image reference, ignoring a registry port.
fn image_tag(image: &str) -> Option<&str> {
    let last_segment = image.rsplit('/').next()?;
    let (_, tag) = last_segment.split_once(':')?;
    (!tag.is_empty()).then_some(tag)
}
