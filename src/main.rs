use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ghstats::models::{AccessToken, AggregationReport, RateLimitStatus, RepoReport};
use ghstats::{Aggregator, Config, Error, GitHubClient, ReportOptions};

#[derive(Parser, Debug)]
#[command(name = "ghstats")]
#[command(version)]
#[command(about = "Summarize GitHub users, repositories and API quota")]
struct Args {
    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text", global = true)]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// GitHub token; overrides GITHUB_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    /// Per-request timeout in seconds; overrides GITHUB_TIMEOUT_SECS
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Profile, repositories ranked by stars, and recent public activity
    User {
        /// GitHub username
        username: String,

        /// Only list the N most-starred repositories
        #[arg(long)]
        repo_limit: Option<usize>,

        /// How many recent events to show
        #[arg(long)]
        contribution_limit: Option<usize>,

        /// Only show events of this type (e.g. PushEvent)
        #[arg(long)]
        event_type: Option<String>,

        /// Skip the public events request
        #[arg(long)]
        no_contributions: bool,
    },
    /// Repository metadata and top contributors
    Repo {
        /// Repository as owner/repo
        repository: String,
    },
    /// Current API quota for the token in use
    RateLimit,
}

enum Output {
    User(AggregationReport),
    Repo(RepoReport),
    RateLimit(RateLimitStatus),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("ghstats={}", level).parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(token) = args.token.clone() {
        config.github_token = AccessToken::new(token);
    }
    if let Some(secs) = args.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if config.github_token.is_none() {
        tracing::debug!("No GitHub token configured, using anonymous rate limits");
    }

    let aggregator = Aggregator::new(GitHubClient::from_config(&config)?);

    let result = tokio::select! {
        result = run(&aggregator, &config, &args.command) => result,
        _ = wait_for_interrupt(tokio::signal::ctrl_c()) => {
            tracing::warn!("Interrupted, abandoning outstanding GitHub requests");
            return Ok(ExitCode::from(130));
        }
    };

    match result {
        Ok(output) => {
            write_output(&render(&output, &args.format)?, args.output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            Ok(ExitCode::from(exit_code(&e)))
        }
    }
}

/// Resolves once Ctrl-C arrives. If the handler can't be installed, never
/// resolves, so the command runs to completion uninterrupted.
async fn wait_for_interrupt<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Flags win over GHSTATS_* config values.
fn report_options(
    config: &Config,
    repo_limit: Option<usize>,
    contribution_limit: Option<usize>,
    event_type: Option<String>,
    no_contributions: bool,
) -> ReportOptions {
    let mut options = ReportOptions::from(config);
    options.include_contributions = !no_contributions;
    options.contribution_filter = event_type;
    if repo_limit.is_some() {
        options.repo_limit = repo_limit;
    }
    if let Some(limit) = contribution_limit {
        options.contribution_limit = limit;
    }
    options
}

async fn run(aggregator: &Aggregator, config: &Config, command: &Command) -> ghstats::Result<Output> {
    let token = config.github_token.as_ref();

    match command {
        Command::User {
            username,
            repo_limit,
            contribution_limit,
            event_type,
            no_contributions,
        } => {
            let options = report_options(
                config,
                *repo_limit,
                *contribution_limit,
                event_type.clone(),
                *no_contributions,
            );

            tracing::info!("Building report for GitHub user: {}", username);
            let report = aggregator.fetch_user_report(username, token, &options).await?;
            Ok(Output::User(report))
        }
        Command::Repo { repository } => {
            let report = aggregator.fetch_repo_report(repository, token).await?;
            Ok(Output::Repo(report))
        }
        Command::RateLimit => {
            let status = aggregator.check_rate_limit(token).await?;
            Ok(Output::RateLimit(status))
        }
    }
}

fn exit_code(error: &Error) -> u8 {
    match error {
        Error::Validation(_) => 2,
        Error::NotFound { .. } => 3,
        Error::RateLimited { .. } => 4,
        _ => 1,
    }
}

fn render(output: &Output, format: &str) -> anyhow::Result<String> {
    Ok(match (format, output) {
        ("json", Output::User(report)) => to_json(report)?,
        ("json", Output::Repo(report)) => to_json(report)?,
        ("json", Output::RateLimit(status)) => to_json(status)?,
        ("markdown", Output::User(report)) => format_user_markdown(report),
        ("markdown", Output::Repo(report)) => format_repo_markdown(report),
        ("markdown", Output::RateLimit(status)) => format_rate_limit_markdown(status),
        (_, Output::User(report)) => format_user_text(report),
        (_, Output::Repo(report)) => format_repo_text(report),
        (_, Output::RateLimit(status)) => format_rate_limit_text(status),
    })
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn write_output(output: &str, path: Option<&str>) -> anyhow::Result<()> {
    if let Some(path) = path {
        std::fs::write(path, output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn or_dash<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn format_user_text(report: &AggregationReport) -> String {
    let mut output = String::new();

    if let Some(ref user) = report.user {
        output.push_str(&format!("\n=== GitHub Stats: {} ===\n\n", or_dash(&user.login)));
        if let Some(ref name) = user.name {
            output.push_str(&format!("Name: {}\n", name));
        }
        if let Some(ref bio) = user.bio {
            output.push_str(&format!("Bio: {}\n", bio));
        }
        output.push_str(&format!("Public repos: {}\n", or_dash(&user.public_repos)));
        output.push_str(&format!(
            "Followers: {}  Following: {}\n",
            or_dash(&user.followers),
            or_dash(&user.following)
        ));
    }

    output.push_str(&format!("Total stars: {}\n", report.total_stars));

    output.push_str("\nRepositories:\n");
    if report.repositories.is_empty() {
        output.push_str("  (none)\n");
    }
    for repo in &report.repositories {
        output.push_str(&format!(
            "  - {} ★{} ⑂{}\n",
            repo.name, repo.stars, repo.forks
        ));
    }

    if !report.recent_contributions.is_empty() {
        output.push_str("\nRecent activity:\n");
        for event in &report.recent_contributions {
            output.push_str(&format!("  - {} at {}\n", event.event_type, event.created_at));
        }
    }

    output
}

fn format_user_markdown(report: &AggregationReport) -> String {
    let mut output = String::new();

    if let Some(ref user) = report.user {
        output.push_str(&format!("# GitHub Stats: {}\n\n", or_dash(&user.login)));
        if let Some(ref name) = user.name {
            output.push_str(&format!("**Name:** {}\n\n", name));
        }
        if let Some(ref bio) = user.bio {
            output.push_str(&format!("> {}\n\n", bio));
        }
        output.push_str("| Metric | Value |\n|--------|-------|\n");
        output.push_str(&format!("| Public Repos | {} |\n", or_dash(&user.public_repos)));
        output.push_str(&format!("| Followers | {} |\n", or_dash(&user.followers)));
        output.push_str(&format!("| Following | {} |\n", or_dash(&user.following)));
        output.push_str(&format!("| Total Stars | {} |\n", report.total_stars));
    } else {
        output.push_str(&format!("**Total Stars:** {}\n", report.total_stars));
    }

    output.push_str("\n## Repositories\n\n");
    output.push_str("| Repository | Stars | Forks |\n");
    output.push_str("|------------|-------|-------|\n");
    for repo in &report.repositories {
        output.push_str(&format!("| {} | {} | {} |\n", repo.name, repo.stars, repo.forks));
    }

    if !report.recent_contributions.is_empty() {
        output.push_str("\n## Recent Activity\n\n");
        for event in &report.recent_contributions {
            output.push_str(&format!("- **{}** at {}\n", event.event_type, event.created_at));
        }
    }

    output
}

fn format_repo_text(report: &RepoReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== Repository: {} ===\n\n", report.full_name));
    output.push_str(&format!("{}\n\n", report.description));
    output.push_str(&format!("Owner: {}\n", report.owner));
    output.push_str(&format!("Default branch: {}\n", or_dash(&report.default_branch)));
    output.push_str(&format!("Stars: {}\n", report.stars));
    output.push_str(&format!("Forks: {}\n", report.forks));
    output.push_str(&format!("Watchers: {}\n", report.watchers));
    output.push_str(&format!("Open issues: {}\n", report.open_issues));

    if !report.contributors.is_empty() {
        output.push_str(&format!("\nTop contributors: {}\n", report.contributors.join(", ")));
    }

    output
}

fn format_repo_markdown(report: &RepoReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.full_name));
    output.push_str(&format!("> {}\n\n", report.description));
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Owner | {} |\n", report.owner));
    output.push_str(&format!("| Default Branch | {} |\n", or_dash(&report.default_branch)));
    output.push_str(&format!("| Stars | {} |\n", report.stars));
    output.push_str(&format!("| Forks | {} |\n", report.forks));
    output.push_str(&format!("| Watchers | {} |\n", report.watchers));
    output.push_str(&format!("| Open Issues | {} |\n", report.open_issues));

    if !report.contributors.is_empty() {
        output.push_str("\n## Top Contributors\n\n");
        for login in &report.contributors {
            output.push_str(&format!("- {}\n", login));
        }
    }

    output
}

fn format_rate_limit_text(status: &RateLimitStatus) -> String {
    let reset = status
        .reset_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| status.reset.to_string());
    let mut line = format!(
        "Rate limit: {}/{} remaining, resets at {} (in {}s)",
        status.remaining,
        status.limit,
        reset,
        status.seconds_until_reset(chrono::Utc::now())
    );
    if status.is_exhausted() {
        line.push_str(" [exhausted]");
    }
    line
}

fn format_rate_limit_markdown(status: &RateLimitStatus) -> String {
    let reset = status
        .reset_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| status.reset.to_string());
    format!(
        "| Limit | Remaining | Resets |\n|-------|-----------|--------|\n| {} | {} | {} |\n",
        status.limit, status.remaining, reset
    )
}
