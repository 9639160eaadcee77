use crate::models::{ContributionEvent, Contributor, GitHubEvent, RepoSummary, Repository};

pub const TOP_CONTRIBUTORS: usize = 5;

/// Ranked repositories (optionally capped) and the star total of all of them.
pub fn summarize_repos(repos: Vec<Repository>, repo_limit: Option<usize>) -> (Vec<RepoSummary>, u64) {
    let mut summaries: Vec<RepoSummary> = repos.into_iter().map(RepoSummary::from).collect();
    let total_stars = total_stars(&summaries);

    rank_by_stars(&mut summaries);
    if let Some(limit) = repo_limit {
        summaries.truncate(limit);
    }

    (summaries, total_stars)
}

pub fn total_stars(summaries: &[RepoSummary]) -> u64 {
    summaries.iter().map(|r| r.stars).sum()
}

/// Most-starred first; `sort_by` is stable so ties keep upstream order.
pub fn rank_by_stars(summaries: &mut [RepoSummary]) {
    summaries.sort_by(|a, b| b.stars.cmp(&a.stars));
}

pub fn select_contributions(
    events: Vec<GitHubEvent>,
    event_type: Option<&str>,
    limit: usize,
) -> Vec<ContributionEvent> {
    events
        .into_iter()
        .filter(|e| event_type.map_or(true, |t| e.event_type == t))
        .take(limit)
        .map(ContributionEvent::from)
        .collect()
}

pub fn top_contributors(contributors: Vec<Contributor>) -> Vec<String> {
    contributors
        .into_iter()
        .filter_map(|c| c.login)
        .take(TOP_CONTRIBUTORS)
        .collect()
}
