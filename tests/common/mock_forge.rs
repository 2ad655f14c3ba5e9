//! Mock forge for testing
//!
//! Responses are keyed by `owner/name` and pull request number. Every call
//! is recorded so tests can assert on what reached the platform.

#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use anyhow::Result;
use async_trait::async_trait;
use reviewer::{
    CombinedStatus, Forge, IssueComment, PullRequestDetail, PullRequestSummary, Repo,
};

/// Call record for `merge_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub repo: String,
    pub number: u64,
    pub message: String,
}

#[derive(Default)]
pub struct MockForge {
    pull_requests: Mutex<HashMap<String, Vec<PullRequestSummary>>>,
    comments: Mutex<HashMap<(String, u64), Vec<IssueComment>>>,
    statuses: Mutex<HashMap<(String, String), String>>,
    // Error injection
    fail_list: Mutex<HashMap<String, String>>,
    fail_comments: Mutex<HashMap<(String, u64), String>>,
    fail_detail: Mutex<HashMap<(String, u64), String>>,
    fail_status: Mutex<HashMap<(String, String), (String, Option<String>)>>,
    fail_merge: Mutex<HashMap<(String, u64), String>>,
    // Call tracking
    list_calls: Mutex<Vec<String>>,
    comment_calls: Mutex<Vec<(String, u64)>>,
    detail_calls: Mutex<Vec<(String, u64)>>,
    status_calls: Mutex<Vec<(String, String)>>,
    merge_calls: Mutex<Vec<MergeCall>>,
}

impl MockForge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an open pull request whose head commit is `sha-{number}`.
    pub fn add_pull_request(&self, repo: &str, number: u64, title: &str, mergeable: Option<bool>) {
        self.pull_requests
            .lock()
            .unwrap()
            .entry(repo.to_string())
            .or_default()
            .push(PullRequestSummary {
                number,
                title: title.to_string(),
                mergeable,
                head_sha: format!("sha-{number}"),
            });
    }

    /// Registers a repository that has no open pull requests.
    pub fn add_repository(&self, repo: &str) {
        self.pull_requests
            .lock()
            .unwrap()
            .entry(repo.to_string())
            .or_default();
    }

    pub fn add_comments(&self, repo: &str, number: u64, bodies: &[Option<&str>]) {
        self.comments
            .lock()
            .unwrap()
            .entry((repo.to_string(), number))
            .or_default()
            .extend(bodies.iter().map(|body| IssueComment {
                body: body.map(str::to_string),
            }));
    }

    pub fn set_status(&self, repo: &str, number: u64, state: &str) {
        self.statuses
            .lock()
            .unwrap()
            .insert((repo.to_string(), format!("sha-{number}")), state.to_string());
    }

    /// Pull request that passes every check but the score threshold.
    pub fn add_ready_pull_request(&self, repo: &str, number: u64, title: &str, votes: &[&str]) {
        self.add_pull_request(repo, number, title, Some(true));
        let bodies: Vec<Option<&str>> = votes.iter().copied().map(Some).collect();
        self.add_comments(repo, number, &bodies);
        self.set_status(repo, number, "success");
    }

    // === Error injection methods ===

    pub fn fail_list(&self, repo: &str, msg: &str) {
        self.fail_list
            .lock()
            .unwrap()
            .insert(repo.to_string(), msg.to_string());
    }

    pub fn fail_comments(&self, repo: &str, number: u64, msg: &str) {
        self.fail_comments
            .lock()
            .unwrap()
            .insert((repo.to_string(), number), msg.to_string());
    }

    pub fn fail_detail(&self, repo: &str, number: u64, msg: &str) {
        self.fail_detail
            .lock()
            .unwrap()
            .insert((repo.to_string(), number), msg.to_string());
    }

    pub fn fail_status(&self, repo: &str, number: u64, msg: &str) {
        self.fail_status
            .lock()
            .unwrap()
            .insert((repo.to_string(), format!("sha-{number}")), (msg.to_string(), None));
    }

    /// Like `fail_status`, with `context` wrapped around the cause the way
    /// the GitHub adapter reports failures.
    pub fn fail_status_with_context(&self, repo: &str, number: u64, context: &str, cause: &str) {
        self.fail_status.lock().unwrap().insert(
            (repo.to_string(), format!("sha-{number}")),
            (cause.to_string(), Some(context.to_string())),
        );
    }

    pub fn fail_merge(&self, repo: &str, number: u64, msg: &str) {
        self.fail_merge
            .lock()
            .unwrap()
            .insert((repo.to_string(), number), msg.to_string());
    }

    // === Call tracking accessors ===

    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn comment_calls(&self) -> Vec<(String, u64)> {
        self.comment_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<(String, u64)> {
        self.detail_calls.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> Vec<(String, String)> {
        self.status_calls.lock().unwrap().clone()
    }

    pub fn merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls().len()
            + self.comment_calls().len()
            + self.detail_calls().len()
            + self.status_calls().len()
            + self.merge_calls().len()
    }
}

#[async_trait]
impl Forge for MockForge {
    async fn list_pull_requests(&self, repo: &Repo) -> Result<Vec<PullRequestSummary>> {
        let key = repo.to_string();
        self.list_calls.lock().unwrap().push(key.clone());
        if let Some(msg) = self.fail_list.lock().unwrap().get(&key) {
            anyhow::bail!("{msg}");
        }
        Ok(self
            .pull_requests
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_pull_request(&self, repo: &Repo, number: u64) -> Result<PullRequestDetail> {
        let key = (repo.to_string(), number);
        self.detail_calls.lock().unwrap().push(key.clone());
        if let Some(msg) = self.fail_detail.lock().unwrap().get(&key) {
            anyhow::bail!("{msg}");
        }
        let pull_requests = self.pull_requests.lock().unwrap();
        let Some(pr) = pull_requests
            .get(&key.0)
            .and_then(|prs| prs.iter().find(|pr| pr.number == number))
        else {
            anyhow::bail!("404 Not Found: {}#{}", key.0, number);
        };
        Ok(PullRequestDetail {
            number: pr.number,
            mergeable: pr.mergeable,
            head_sha: pr.head_sha.clone(),
        })
    }

    async fn list_issue_comments(&self, repo: &Repo, number: u64) -> Result<Vec<IssueComment>> {
        let key = (repo.to_string(), number);
        self.comment_calls.lock().unwrap().push(key.clone());
        if let Some(msg) = self.fail_comments.lock().unwrap().get(&key) {
            anyhow::bail!("{msg}");
        }
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn combined_status(&self, repo: &Repo, sha: &str) -> Result<CombinedStatus> {
        let key = (repo.to_string(), sha.to_string());
        self.status_calls.lock().unwrap().push(key.clone());
        if let Some((cause, context)) = self.fail_status.lock().unwrap().get(&key) {
            let err = anyhow::anyhow!("{cause}");
            return Err(match context {
                Some(context) => err.context(context.clone()),
                None => err,
            });
        }
        let state = self
            .statuses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| "pending".to_string());
        Ok(CombinedStatus::new(state))
    }

    async fn merge_pull_request(&self, repo: &Repo, number: u64, message: &str) -> Result<()> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            repo: repo.to_string(),
            number,
            message: message.to_string(),
        });
        if let Some(msg) = self
            .fail_merge
            .lock()
            .unwrap()
            .get(&(repo.to_string(), number))
        {
            anyhow::bail!("{msg}");
        }
        Ok(())
    }
}
