use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use thiserror::Error;

use crate::error::{Error, Result};
use crate::models::AccessToken;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// A GET against the API, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub token: Option<AccessToken>,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>, token: Option<&AccessToken>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            token: token.cloned(),
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Path plus query string, e.g. `/users/octocat/repos?per_page=100&page=2`.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: header::HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("timeout")]
    Timeout,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Network(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &ApiRequest) -> std::result::Result<RawResponse, TransportError>;
}

/// Pooled reqwest client pointed at a GitHub API base URL.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("ghstats/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Unexpected(Box::new(e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &ApiRequest) -> std::result::Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.get(&url).query(&request.query);

        if let Some(token) = &request.token {
            let value = header::HeaderValue::from_str(&token.authorization_value())
                .map_err(|_| TransportError::InvalidRequest("token is not a valid header value".to_string()))?;
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}
