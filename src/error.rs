use std::fmt;

use thiserror::Error;

/// Pipeline step in which an upstream call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    User,
    Repos,
    Contributions,
    Repo,
    Contributors,
    RateLimit,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::User => "user",
            Stage::Repos => "repos",
            Stage::Contributions => "contributions",
            Stage::Repo => "repo",
            Stage::Contributors => "contributors",
            Stage::RateLimit => "rate_limit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {identity}")]
    NotFound { identity: String },

    #[error("Rate limit exceeded, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("GitHub API error during {stage} fetch: {}", describe_fetch(.status, .detail))]
    Fetch {
        stage: Stage,
        status: Option<u16>,
        /// Upstream response body, or the transport failure reason when there is no status.
        detail: String,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_fetch(status: &Option<u16>, detail: &str) -> String {
    match status {
        Some(status) => format!("{} - {}", status, detail),
        None => detail.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unexpected(Box::new(err))
    }
}

impl Error {
    pub fn fetch(stage: Stage, status: Option<u16>, detail: impl Into<String>) -> Self {
        Error::Fetch {
            stage,
            status,
            detail: detail.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::RateLimited { .. } | Error::Fetch { status: None, .. }
        )
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Fetch { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Status code an HTTP front end should answer with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::NotFound { .. } => 404,
            Error::RateLimited { .. } => 429,
            Error::Fetch { status, .. } => status.unwrap_or(502),
            Error::Unexpected(_) | Error::Config(_) => 500,
        }
    }
}
