pub mod client;
pub mod transport;
pub mod rate_limit;
pub mod paginator;

#[cfg(test)]
pub(crate) mod scripted;

pub use client::{GitHubClient, DEFAULT_TIMEOUT};
pub use transport::{ApiRequest, RawResponse, ReqwestTransport, Transport, TransportError, DEFAULT_API_URL};
pub use rate_limit::QuotaHeaders;
pub use paginator::Paginator;
