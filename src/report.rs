//! Line formats of the human-readable run report.

use crate::types::{PullRequestInfo, RepositoryConfig, SkipReason};

pub fn dry_run_banner() -> String {
    "Working in dry-run mode...".to_string()
}

pub fn repository_disabled(config: &RepositoryConfig) -> String {
    format!("- {} Discarded (repo disabled)", config.display_name())
}

pub fn repository_error(config: &RepositoryConfig, err: &anyhow::Error) -> String {
    format!(
        "! {} Error getting pull request info: {:#}",
        config.display_name(),
        err
    )
}

pub fn repository_header(config: &RepositoryConfig) -> String {
    format!("+ {}", config.display_name())
}

fn score_suffix(info: &PullRequestInfo, required_score: i64) -> String {
    format!("score {} of {} required", info.score, required_score)
}

pub fn skipped(info: &PullRequestInfo, required_score: i64, reason: &SkipReason) -> String {
    format!(
        "  - {} NOP   ({}) {}, {}",
        info.number,
        info.title,
        reason,
        score_suffix(info, required_score)
    )
}

pub fn would_merge(info: &PullRequestInfo, required_score: i64) -> String {
    format!(
        "  - {} (merge) ({}) {}",
        info.number,
        info.title,
        score_suffix(info, required_score)
    )
}

pub fn merged(info: &PullRequestInfo, required_score: i64) -> String {
    format!(
        "  + {} MERGE ({}) {}",
        info.number,
        info.title,
        score_suffix(info, required_score)
    )
}

pub fn merge_failed(info: &PullRequestInfo, err: &anyhow::Error) -> String {
    format!("  ! {} -merge- ({}) {:#}", info.number, info.title, err)
}

/// One line of `reviewer configure` output.
pub fn repository_summary(config: &RepositoryConfig) -> String {
    let mode = if config.enabled { "ENABLED" } else { "DISABLED" };
    format!(
        "- {} / {} {} +1:{}",
        config.username, config.name, mode, config.required_score
    )
}
