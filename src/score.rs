//! Review scoring from issue comments.

use anyhow::Result;
use tracing::debug;

use crate::types::{Forge, PullRequestInfo, Repo};

const APPROVE_TOKEN: &str = "+1";
const REJECT_TOKEN: &str = "-1";

/// Returns the score delta of a single comment body.
///
/// The two tokens are independent substring checks, so a comment carrying
/// both nets to zero.
pub fn comment_score(comment: &str) -> i64 {
    let mut score = 0;
    if comment.contains(APPROVE_TOKEN) {
        score += 1;
    }
    if comment.contains(REJECT_TOKEN) {
        score -= 1;
    }
    score
}

/// Lists the open pull requests of `repo` and scores each one from its
/// issue comments.
///
/// Any listing failure aborts the whole aggregation; pull requests scored
/// before the failure are discarded. The result keeps the listing order.
pub async fn pull_request_infos<F>(forge: &F, repo: &Repo) -> Result<Vec<PullRequestInfo>>
where
    F: Forge + Sync + ?Sized,
{
    let pull_requests = forge.list_pull_requests(repo).await?;
    debug!(%repo, count = pull_requests.len(), "listed pull requests");

    let mut infos = Vec::with_capacity(pull_requests.len());
    for pull_request in pull_requests {
        let mut info = PullRequestInfo::new(pull_request.number, pull_request.title);
        let comments = forge.list_issue_comments(repo, info.number).await?;
        info.score = comments
            .iter()
            .filter_map(|comment| comment.body.as_deref())
            .map(comment_score)
            .sum();
        debug!(%repo, number = info.number, score = info.score, "scored pull request");
        infos.push(info);
    }

    Ok(infos)
}
