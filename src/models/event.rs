use serde::{Deserialize, Serialize};

/// One entry of `GET /users/{username}/events/public`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    /// ISO-8601, passed through untouched.
    pub created_at: String,
}

impl From<GitHubEvent> for ContributionEvent {
    fn from(event: GitHubEvent) -> Self {
        Self {
            event_type: event.event_type,
            created_at: event.created_at,
        }
    }
}
