use crate::snapshot::domain::{AppStatus, ComputeInfo, Health, UNKNOWN};

/// Rules for turning raw target, task and service states into health values.
pub struct HealthPolicy;

impl HealthPolicy {
    /// `HEALTHY` only when at least one target is registered and all of them
    /// report `healthy`; `UNKNOWN` for an empty target list; else `DEGRADED`.
    pub fn target_group_health<S: AsRef<str>>(target_states: &[S]) -> Health {
        if target_states.is_empty() {
            return Health::Unknown;
        }

        if target_states
            .iter()
            .all(|state| state.as_ref().eq_ignore_ascii_case("healthy"))
        {
            Health::Healthy
        } else {
            Health::Degraded
        }
    }

    /// Count-based health, downgraded to `UNHEALTHY` when any task reports
    /// `UNHEALTHY`. Task health never upgrades the count-based result.
    pub fn service_health<S: AsRef<str>>(
        running_count: u32,
        desired_count: u32,
        task_health: &[S],
    ) -> Health {
        if task_health
            .iter()
            .any(|status| status.as_ref().eq_ignore_ascii_case("UNHEALTHY"))
        {
            return Health::Unhealthy;
        }

        if running_count == desired_count {
            Health::Healthy
        } else {
            Health::Degraded
        }
    }

    pub fn app_status(compute: &ComputeInfo) -> AppStatus {
        if compute.status == UNKNOWN || compute.status.is_empty() {
            return AppStatus::Unknown;
        }

        if compute.status.eq_ignore_ascii_case("ACTIVE")
            && compute.desired_count > 0
            && compute.running_count == compute.desired_count
        {
            AppStatus::Up
        } else {
            AppStatus::Down
        }
    }
}
