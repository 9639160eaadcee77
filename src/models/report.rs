use serde::{Deserialize, Serialize};

use super::event::ContributionEvent;
use super::repository::RepoSummary;
use super::user::UserProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    pub repositories: Vec<RepoSummary>,
    /// Sum over every repository, including those cut by a repo limit.
    pub total_stars: u64,
    pub recent_contributions: Vec<ContributionEvent>,
}
