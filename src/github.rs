use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

use crate::types::{
    CombinedStatus, Forge, IssueComment, PullRequestDetail, PullRequestSummary, Repo,
};

/// GitHub REST implementation of [`Forge`].
///
/// Listings only fetch the first page of results.
#[derive(Clone)]
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    /// Creates a client authenticated with a personal access token.
    pub fn new(token: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .context("Failed to create GitHub client")?;
        Ok(Self { client })
    }

    pub fn from_octocrab(client: Octocrab) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CombinedStatusResponse {
    state: String,
}

#[async_trait]
impl Forge for GitHub {
    async fn list_pull_requests(&self, repo: &Repo) -> Result<Vec<PullRequestSummary>> {
        debug!(%repo, "listing open pull requests");
        let page = self
            .client
            .pulls(repo.owner(), repo.name())
            .list()
            .state(octocrab::params::State::Open)
            .send()
            .await
            .with_context(|| format!("Failed to list pull requests of {repo}"))?;

        Ok(page
            .items
            .into_iter()
            .map(|pr| PullRequestSummary {
                number: pr.number,
                title: pr.title.unwrap_or_default(),
                mergeable: pr.mergeable,
                head_sha: pr.head.sha,
            })
            .collect())
    }

    async fn get_pull_request(&self, repo: &Repo, number: u64) -> Result<PullRequestDetail> {
        debug!(%repo, number, "fetching pull request");
        let pr = self
            .client
            .pulls(repo.owner(), repo.name())
            .get(number)
            .await
            .with_context(|| format!("Failed to fetch pull request {repo}#{number}"))?;

        Ok(PullRequestDetail {
            number: pr.number,
            mergeable: pr.mergeable,
            head_sha: pr.head.sha,
        })
    }

    async fn list_issue_comments(&self, repo: &Repo, number: u64) -> Result<Vec<IssueComment>> {
        debug!(%repo, number, "listing issue comments");
        let page = self
            .client
            .issues(repo.owner(), repo.name())
            .list_comments(number)
            .send()
            .await
            .with_context(|| format!("Failed to list comments of {repo}#{number}"))?;

        Ok(page
            .items
            .into_iter()
            .map(|comment| IssueComment { body: comment.body })
            .collect())
    }

    async fn combined_status(&self, repo: &Repo, sha: &str) -> Result<CombinedStatus> {
        debug!(%repo, sha, "fetching combined status");
        // combined_status_for_ref takes a named reference, so go through the
        // raw route for commit SHAs.
        let route = format!("/repos/{}/{}/commits/{sha}/status", repo.owner(), repo.name());
        let status: CombinedStatusResponse = self
            .client
            .get(route, None::<&()>)
            .await
            .with_context(|| format!("Failed to fetch combined status of {repo}@{sha}"))?;

        Ok(CombinedStatus::new(status.state))
    }

    async fn merge_pull_request(&self, repo: &Repo, number: u64, message: &str) -> Result<()> {
        debug!(%repo, number, "merging pull request");
        let result = self
            .client
            .pulls(repo.owner(), repo.name())
            .merge(number)
            .message(message)
            .send()
            .await
            .with_context(|| format!("Failed to merge pull request {repo}#{number}"))?;

        if !result.merged {
            anyhow::bail!(
                "GitHub refused to merge {}#{}: {}",
                repo,
                number,
                result.message.unwrap_or_default()
            );
        }
        debug!(%repo, number, sha = ?result.sha, "merged pull request");
        Ok(())
    }
}
