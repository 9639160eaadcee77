pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod aggregator;

pub use config::{Config, ReportOptions};
pub use error::{Error, Result, Stage};
pub use github::GitHubClient;
pub use aggregator::Aggregator;
