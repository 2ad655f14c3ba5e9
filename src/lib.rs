//! Reviewer: merges pull requests once reviewers have voted them in.
//!
//! For every configured repository the open pull requests are scored from
//! their issue comments (`+1` adds a point, `-1` takes one away). A pull
//! request is merged when it is mergeable, its combined CI status is
//! `success` and its score reaches the repository's required score.

pub mod cli;
pub mod config;
pub mod gate;
pub mod github;
pub mod report;
pub mod review;
pub mod score;
pub mod types;

pub use cli::{Command, Invocation, parse_args};
pub use config::{ConfigReader, Settings, TomlConfig};
pub use gate::evaluate;
pub use github::GitHub;
pub use review::{describe_repositories, run};
pub use score::{comment_score, pull_request_infos};
pub use types::{
    CombinedStatus, Decision, Forge, IssueComment, MERGE_COMMIT_MESSAGE, PullRequestDetail,
    PullRequestInfo, PullRequestSummary, Repo, RepositoryConfig, RunSummary, SkipReason,
};
