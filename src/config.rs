use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::github::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::models::AccessToken;

pub const DEFAULT_CONTRIBUTION_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<AccessToken>,
    pub api_url: String,
    pub timeout: Duration,
    pub repo_limit: Option<usize>,
    pub contribution_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            repo_limit: None,
            contribution_limit: DEFAULT_CONTRIBUTION_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let github_token = lookup("GITHUB_TOKEN").and_then(AccessToken::new);

        let api_url = lookup("GITHUB_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = parse_var(&lookup, "GITHUB_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(Error::Config("GITHUB_TIMEOUT_SECS must be greater than 0".to_string()));
        }

        let repo_limit = parse_var(&lookup, "GHSTATS_REPO_LIMIT")?;

        let contribution_limit = parse_var(&lookup, "GHSTATS_CONTRIBUTION_LIMIT")?
            .unwrap_or(DEFAULT_CONTRIBUTION_LIMIT);

        Ok(Self {
            github_token,
            api_url,
            timeout,
            repo_limit,
            contribution_limit,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got '{}'", key, v))),
    }
}

/// Knobs for a single user report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub include_contributions: bool,
    /// Keep only events of this type, e.g. `PushEvent`.
    pub contribution_filter: Option<String>,
    pub contribution_limit: usize,
    /// Cap on listed repositories. `total_stars` still covers all of them.
    pub repo_limit: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_contributions: true,
            contribution_filter: None,
            contribution_limit: DEFAULT_CONTRIBUTION_LIMIT,
            repo_limit: None,
        }
    }
}

impl From<&Config> for ReportOptions {
    fn from(config: &Config) -> Self {
        Self {
            repo_limit: config.repo_limit,
            contribution_limit: config.contribution_limit,
            ..Self::default()
        }
    }
}
