use crate::aggregator::normalize::{select_contributions, summarize_repos, top_contributors};
use crate::config::ReportOptions;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::models::{
    AccessToken, AggregationReport, Identity, RateLimitStatus, RepoReport, UserProfile,
};

/// Builds reports from sequential GitHub calls. Holds no per-request state,
/// so one instance can serve concurrent callers.
pub struct Aggregator {
    github: GitHubClient,
}

impl Aggregator {
    pub fn new(github: GitHubClient) -> Self {
        Self { github }
    }

    pub async fn fetch_user_report(
        &self,
        username: &str,
        token: Option<&AccessToken>,
        options: &ReportOptions,
    ) -> Result<AggregationReport> {
        let username = Identity::username(username)?;

        // Step 1: Profile. Nothing else is worth fetching without it.
        let user = self.github.get_user(&username, token).await?;

        // Step 2: Every page of repositories
        let repos = self.github.get_user_repos(&username, token).await?;
        tracing::info!("Found {} repositories for {}", repos.len(), username);

        // Step 3: Normalize, rank, total
        let (repositories, total_stars) = summarize_repos(repos, options.repo_limit);

        // Step 4: Recent public activity
        let recent_contributions = if options.include_contributions {
            let events = self.github.get_user_events(&username, token).await?;
            select_contributions(
                events,
                options.contribution_filter.as_deref(),
                options.contribution_limit,
            )
        } else {
            Vec::new()
        };

        Ok(AggregationReport {
            user: Some(UserProfile::from(user)),
            repositories,
            total_stars,
            recent_contributions,
        })
    }

    pub async fn fetch_repo_report(
        &self,
        owner_repo: &str,
        token: Option<&AccessToken>,
    ) -> Result<RepoReport> {
        let (owner, repo) = Identity::owner_repo(owner_repo)?;

        let details = self.github.get_repo(&owner, &repo, token).await?;

        // Contributors are decoration: a failure here must not sink the report.
        let contributors = match self.github.get_repo_contributors(&owner, &repo, token).await {
            Ok(contributors) => top_contributors(contributors),
            Err(e) => {
                tracing::warn!("Contributors unavailable for {}/{}: {}", owner, repo, e);
                Vec::new()
            }
        };

        Ok(RepoReport::new(details, contributors))
    }

    pub async fn check_rate_limit(&self, token: Option<&AccessToken>) -> Result<RateLimitStatus> {
        self.github.get_rate_limit(token).await
    }
}
