use serde::{Deserialize, Serialize};

pub const MISSING_DESCRIPTION: &str = "No description provided";

/// One entry of `GET /users/{username}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
}

impl From<Repository> for RepoSummary {
    fn from(repo: Repository) -> Self {
        Self {
            name: repo.name,
            stars: repo.stargazers_count.unwrap_or(0),
            forks: repo.forks_count.unwrap_or(0),
        }
    }
}

/// `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryDetails {
    pub full_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub subscribers_count: Option<u64>,
    #[serde(default)]
    pub watchers_count: Option<u64>,
    #[serde(default)]
    pub open_issues_count: Option<u64>,
    pub default_branch: Option<String>,
    pub owner: RepositoryOwner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contributor {
    pub login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoReport {
    pub full_name: String,
    pub description: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub default_branch: Option<String>,
    pub owner: String,
    pub contributors: Vec<String>,
}

impl RepoReport {
    pub fn new(details: RepositoryDetails, contributors: Vec<String>) -> Self {
        Self {
            full_name: details.full_name,
            description: details
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
            stars: details.stargazers_count.unwrap_or(0),
            forks: details.forks_count.unwrap_or(0),
            // `watchers_count` mirrors stars on GitHub; subscribers are the real watchers.
            watchers: details
                .subscribers_count
                .or(details.watchers_count)
                .unwrap_or(0),
            open_issues: details.open_issues_count.unwrap_or(0),
            default_branch: details.default_branch,
            owner: details.owner.login,
            contributors,
        }
    }
}
