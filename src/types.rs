use anyhow::Result;
use async_trait::async_trait;

/// Commit message used for every automatic merge.
pub const MERGE_COMMIT_MESSAGE: &str = "Merged automatically by Reviewer";

/// Combined status state that lets a pull request through the CI check.
pub const SUCCESS_STATE: &str = "success";

/// A repository on the hosting platform, addressed as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let name = name.into();
        if owner.trim().is_empty() {
            anyhow::bail!("Repository owner cannot be empty");
        }
        if name.trim().is_empty() {
            anyhow::bail!("Repository name cannot be empty");
        }
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One entry of an open pull request listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub mergeable: Option<bool>,
    pub head_sha: String,
}

/// Live state of a single pull request, fetched right before gating.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestDetail {
    pub number: u64,
    /// `None` while the platform is still computing mergeability.
    pub mergeable: Option<bool>,
    pub head_sha: String,
}

/// An issue comment on a pull request. GitHub may omit the body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IssueComment {
    pub body: Option<String>,
}

impl IssueComment {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// Aggregate CI state of a commit, reduced to its state string.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedStatus {
    pub state: String,
}

impl CombinedStatus {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == SUCCESS_STATE
    }
}

/// Number, title and comment-derived review score of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    pub score: i64,
}

impl PullRequestInfo {
    pub fn new(number: u64, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            score: 0,
        }
    }
}

/// Per-repository review settings, keyed by repository name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub name: String,
    pub username: String,
    pub enabled: bool,
    pub required_score: i64,
}

impl RepositoryConfig {
    pub fn repo(&self) -> Result<Repo> {
        Repo::new(self.username.clone(), self.name.clone())
    }

    /// `username/name`, usable even when the coordinate is invalid.
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.username, self.name)
    }
}

/// Why the gate refused to merge a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    DetailUnavailable,
    NotMergeable,
    TestsNotPassed,
    StatusError(String),
    ScoreBelowRequired,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DetailUnavailable => write!(f, "Failure getting pull request"),
            SkipReason::NotMergeable => write!(f, "Not mergeable"),
            SkipReason::TestsNotPassed => write!(f, "Tests not passed"),
            SkipReason::StatusError(err) => write!(f, "{err}"),
            SkipReason::ScoreBelowRequired => write!(f, "Score below required"),
        }
    }
}

/// Outcome of the mergeability gate for one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Merge,
    Skip(SkipReason),
}

impl Decision {
    pub fn is_merge(&self) -> bool {
        matches!(self, Decision::Merge)
    }

    /// Whether the skip was caused by a failed remote call rather than by
    /// the pull request itself.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Decision::Skip(SkipReason::DetailUnavailable | SkipReason::StatusError(_))
        )
    }
}

/// Counters describing one sweep over the configured repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub repositories: usize,
    pub disabled: usize,
    pub merged: usize,
    pub would_merge: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl RunSummary {
    /// True when no repository or pull request hit a remote failure.
    pub fn succeeded(&self) -> bool {
        self.errors == 0
    }

    /// Process exit status for this run: 0 when clean, 1 otherwise.
    pub fn exit_status(&self) -> u8 {
        if self.succeeded() { 0 } else { 1 }
    }
}

/// The hosting-platform operations the review pipeline needs.
///
/// Every method is a single remote call. Implementations must not retry;
/// the run loop reports failures and moves on to the next unit of work.
#[async_trait]
pub trait Forge {
    /// Lists open pull requests in the order the platform returns them.
    async fn list_pull_requests(&self, repo: &Repo) -> Result<Vec<PullRequestSummary>>;

    async fn get_pull_request(&self, repo: &Repo, number: u64) -> Result<PullRequestDetail>;

    async fn list_issue_comments(&self, repo: &Repo, number: u64) -> Result<Vec<IssueComment>>;

    /// Combined CI status for a commit.
    async fn combined_status(&self, repo: &Repo, sha: &str) -> Result<CombinedStatus>;

    async fn merge_pull_request(&self, repo: &Repo, number: u64, message: &str) -> Result<()>;
}
