mod freshness_policy;
mod health_policy;
mod listener_policy;

pub use freshness_policy::{FreshnessPolicy, DEFAULT_SECTION_TTL};
pub use health_policy::HealthPolicy;
pub use listener_policy::{ListenerPolicy, HTTPS_PORT, HTTP_PORT};
