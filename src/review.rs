use std::io::Write;

use anyhow::Result;
use tracing::{info, warn};

use crate::{
    gate::evaluate,
    report,
    score::pull_request_infos,
    types::{
        Decision, Forge, MERGE_COMMIT_MESSAGE, PullRequestInfo, Repo, RepositoryConfig,
        RunSummary,
    },
};

async fn scored_pull_requests<F>(
    forge: &F,
    config: &RepositoryConfig,
) -> Result<(Repo, Vec<PullRequestInfo>)>
where
    F: Forge + Sync + ?Sized,
{
    let repo = config.repo()?;
    let infos = pull_request_infos(forge, &repo).await?;
    Ok((repo, infos))
}

/// Sweeps every configured repository and merges the pull requests that
/// pass the gate.
///
/// Failures are reported and counted, then the sweep moves on: a listing
/// failure abandons its repository, a detail, status or merge failure
/// abandons its pull request. In dry-run mode the merge call is replaced by
/// a "would merge" line. The returned error only covers writes to `out`.
pub async fn run<F, W>(
    forge: &F,
    repositories: &[RepositoryConfig],
    dry_run: bool,
    out: &mut W,
) -> Result<RunSummary>
where
    F: Forge + Sync + ?Sized,
    W: Write,
{
    let mut summary = RunSummary::default();

    if dry_run {
        writeln!(out, "{}", report::dry_run_banner())?;
    }

    for config in repositories {
        summary.repositories += 1;

        if !config.enabled {
            summary.disabled += 1;
            writeln!(out, "{}", report::repository_disabled(config))?;
            continue;
        }

        let (repo, infos) = match scored_pull_requests(forge, config).await {
            Ok(scored) => scored,
            Err(err) => {
                warn!(repository = %config.display_name(), error = %err, "skipping repository");
                summary.errors += 1;
                writeln!(out, "{}", report::repository_error(config, &err))?;
                continue;
            }
        };

        writeln!(out, "{}", report::repository_header(config))?;

        for pr in &infos {
            let decision = evaluate(forge, &repo, pr, config.required_score).await;
            if decision.is_error() {
                summary.errors += 1;
            }

            if let Decision::Skip(reason) = decision {
                summary.skipped += 1;
                writeln!(out, "{}", report::skipped(pr, config.required_score, &reason))?;
                continue;
            }

            if dry_run {
                summary.would_merge += 1;
                writeln!(out, "{}", report::would_merge(pr, config.required_score))?;
                continue;
            }

            match forge
                .merge_pull_request(&repo, pr.number, MERGE_COMMIT_MESSAGE)
                .await
            {
                Ok(()) => {
                    info!(%repo, number = pr.number, "merged pull request");
                    summary.merged += 1;
                    writeln!(out, "{}", report::merged(pr, config.required_score))?;
                }
                Err(err) => {
                    warn!(%repo, number = pr.number, error = %err, "merge failed");
                    summary.errors += 1;
                    writeln!(out, "{}", report::merge_failed(pr, &err))?;
                }
            }
        }
    }

    Ok(summary)
}

/// Writes one summary line per configured repository.
pub fn describe_repositories<W: Write>(
    repositories: &[RepositoryConfig],
    out: &mut W,
) -> Result<()> {
    for config in repositories {
        writeln!(out, "{}", report::repository_summary(config))?;
    }
    Ok(())
}
