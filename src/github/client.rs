use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result, Stage};
use crate::github::paginator::{Paginator, PER_PAGE};
use crate::github::rate_limit::QuotaHeaders;
use crate::github::transport::{ApiRequest, RawResponse, ReqwestTransport, Transport, TransportError};
use crate::models::{
    AccessToken, Contributor, GitHubEvent, GitHubUser, RateLimitResponse, RateLimitStatus,
    Repository, RepositoryDetails,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GitHubClient {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl GitHubClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let transport = ReqwestTransport::new(base_url, timeout)?;
        Ok(Self::with_transport(Arc::new(transport), timeout))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.timeout)
    }

    pub fn with_transport(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub async fn get_user(&self, username: &str, token: Option<&AccessToken>) -> Result<GitHubUser> {
        tracing::info!("Fetching user: {}", username);
        let request = ApiRequest::new(format!("/users/{}", username), token);
        self.get_json(Stage::User, &request, Some(username)).await
    }

    pub async fn get_user_repos(
        &self,
        username: &str,
        token: Option<&AccessToken>,
    ) -> Result<Vec<Repository>> {
        tracing::info!("Fetching repositories for: {}", username);
        let paginator = Paginator::new(self, Stage::Repos);
        paginator
            .fetch_all(&format!("/users/{}/repos", username), PER_PAGE, token)
            .await
    }

    pub async fn get_user_events(
        &self,
        username: &str,
        token: Option<&AccessToken>,
    ) -> Result<Vec<GitHubEvent>> {
        tracing::info!("Fetching public events for: {}", username);
        let request = ApiRequest::new(format!("/users/{}/events/public", username), token);
        self.get_json(Stage::Contributions, &request, None).await
    }

    pub async fn get_repo(
        &self,
        owner: &str,
        repo: &str,
        token: Option<&AccessToken>,
    ) -> Result<RepositoryDetails> {
        let full_name = format!("{}/{}", owner, repo);
        tracing::info!("Fetching repository: {}", full_name);
        let request = ApiRequest::new(format!("/repos/{}", full_name), token);
        self.get_json(Stage::Repo, &request, Some(&full_name)).await
    }

    pub async fn get_repo_contributors(
        &self,
        owner: &str,
        repo: &str,
        token: Option<&AccessToken>,
    ) -> Result<Vec<Contributor>> {
        tracing::debug!("Fetching contributors for: {}/{}", owner, repo);
        let request = ApiRequest::new(format!("/repos/{}/{}/contributors", owner, repo), token);
        let response = self.send(Stage::Contributors, &request).await?;
        check_status(Stage::Contributors, &response, None)?;

        // Empty repositories answer 204 with no body.
        if response.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn get_rate_limit(&self, token: Option<&AccessToken>) -> Result<RateLimitStatus> {
        tracing::info!("Fetching rate limit status");
        let request = ApiRequest::new("/rate_limit", token);
        let response: RateLimitResponse = self.get_json(Stage::RateLimit, &request, None).await?;
        Ok(response.rate)
    }

    /// GET `request` and decode a 2xx body. A 404 becomes `NotFound` only
    /// when `not_found` names the resource; otherwise it is a stage failure.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        stage: Stage,
        request: &ApiRequest,
        not_found: Option<&str>,
    ) -> Result<T> {
        let response = self.send(stage, request).await?;
        check_status(stage, &response, not_found)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn send(&self, stage: Stage, request: &ApiRequest) -> Result<RawResponse> {
        tracing::debug!("GET {}", request.target());

        let response = match tokio::time::timeout(self.timeout, self.transport.get(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(TransportError::InvalidRequest(reason))) => return Err(Error::Validation(reason)),
            Ok(Err(err)) => return Err(Error::fetch(stage, None, err.to_string())),
            Err(_) => return Err(Error::fetch(stage, None, TransportError::Timeout.to_string())),
        };

        let quota = QuotaHeaders::from_headers(&response.headers);
        match (quota.remaining, quota.limit) {
            (Some(remaining), Some(limit)) => {
                tracing::debug!("GitHub quota remaining: {}/{}", remaining, limit)
            }
            (Some(remaining), None) => tracing::debug!("GitHub quota remaining: {}", remaining),
            _ => {}
        }

        Ok(response)
    }
}

fn check_status(stage: Stage, response: &RawResponse, not_found: Option<&str>) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }

    if response.status == 404 {
        if let Some(identity) = not_found {
            return Err(Error::NotFound {
                identity: identity.to_string(),
            });
        }
    }

    let quota = QuotaHeaders::from_headers(&response.headers);
    if let Some(retry_after_secs) = quota.retry_after_secs(response.status, Utc::now()) {
        tracing::warn!(
            "Rate limited during {} fetch, retry after {}s",
            stage,
            retry_after_secs
        );
        return Err(Error::RateLimited { retry_after_secs });
    }

    Err(Error::fetch(stage, Some(response.status), response.body.clone()))
}
