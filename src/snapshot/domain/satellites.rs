use super::topology::UNKNOWN;
use serde::Serialize;

pub const DEFAULT_CURRENCY: &str = "USD";

/// Most recent security findings kept in a snapshot.
pub const MAX_LATEST_FINDINGS: usize = 3;

/// Most recent tickets kept in a snapshot.
pub const MAX_LATEST_TICKETS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub currency: String,
    pub current_monthly_total: f64,
}

impl Default for CostSummary {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            current_monthly_total: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRef {
    pub key: String,
    pub summary: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketSummary {
    pub open: u32,
    pub latest: Vec<TicketRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingRef {
    pub id: String,
    pub title: String,
    pub severity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecuritySummary {
    pub open: u32,
    pub critical: u32,
    pub latest: Vec<FindingRef>,
}

/// Lookups that hang off the application rather than the deployment chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SatelliteData {
    pub cost: CostSummary,
    pub tickets: TicketSummary,
    pub security: SecuritySummary,
}

/// Source repository and the commit currently at the head of the deployed branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub repository: String,
    pub branch: String,
    pub git_origin_url: String,
    pub commit_id: String,
}

impl SourceInfo {
    /// Source reference with the commit not yet known.
    pub fn unresolved(
        repository: impl Into<String>,
        branch: impl Into<String>,
        git_origin_url: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
            git_origin_url: git_origin_url.into(),
            commit_id: UNKNOWN.to_string(),
        }
    }
}
