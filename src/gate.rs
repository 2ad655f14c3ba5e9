use tracing::{debug, warn};

use crate::types::{Decision, Forge, PullRequestInfo, Repo, SkipReason};

/// Decides whether a scored pull request may be merged.
///
/// Checks run in a fixed order and stop at the first failure: live detail
/// fetch, mergeable flag, combined CI status of the head commit, then the
/// score threshold (inclusive). Only read-only calls are made.
pub async fn evaluate<F>(
    forge: &F,
    repo: &Repo,
    info: &PullRequestInfo,
    required_score: i64,
) -> Decision
where
    F: Forge + Sync + ?Sized,
{
    let detail = match forge.get_pull_request(repo, info.number).await {
        Ok(detail) => detail,
        Err(err) => {
            warn!(%repo, number = info.number, error = ?err, "failed to fetch pull request");
            return Decision::Skip(SkipReason::DetailUnavailable);
        }
    };

    // An unknown flag means GitHub has not finished computing it yet.
    if detail.mergeable != Some(true) {
        return Decision::Skip(SkipReason::NotMergeable);
    }

    match forge.combined_status(repo, &detail.head_sha).await {
        Ok(status) if status.is_success() => {}
        Ok(status) => {
            debug!(%repo, number = info.number, state = %status.state, "tests not passed");
            return Decision::Skip(SkipReason::TestsNotPassed);
        }
        Err(err) => return Decision::Skip(SkipReason::StatusError(format!("{err:#}"))),
    }

    if info.score < required_score {
        return Decision::Skip(SkipReason::ScoreBelowRequired);
    }

    Decision::Merge
}
