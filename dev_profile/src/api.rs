use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{Commit, Event, Repo, SearchResults, User};

/// Which of the two independently tracked GitHub quotas a request draws
/// from. The search API has a far stricter per-minute quota than the rest
/// of the REST API, so the two must never share a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ApiBudget {
    #[strum(serialize = "Core API")]
    Core,
    #[strum(serialize = "Search API")]
    Search,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub user '{0}' not found")]
    UserNotFound(String),
    #[error("Resource not found")]
    NotFound,
    #[error("{budget} rate limit exceeded. Resets at {}", .reset.format("%H:%M:%S UTC"))]
    RateLimited {
        budget: ApiBudget,
        reset: DateTime<Utc>,
    },
    #[error("GitHub API error: {status}")]
    Api { status: u16 },
    // `reqwest` is a dependency of this crate solely for this conversion
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Typed access to the slice of the GitHub API the profile builder needs.
///
/// Methods returning [`Result`] propagate failures to the caller; the rest
/// follow the soft-failure policy and fall back to an empty or zero value
/// at the call site, so one degraded signal never aborts a profile build.
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn user(&self, username: &str) -> Result<User>;

    async fn repos(&self, username: &str) -> Result<Vec<Repo>>;

    /// Public event feed, capped at 300 events (the upstream retention limit).
    async fn events(&self, username: &str) -> Result<Vec<Event>>;

    /// Bytes of code per language. Best-effort enrichment, empty on failure.
    async fn languages(&self, owner: &str, repo: &str) -> HashMap<String, u64>;

    /// Commits authored by `author`, inferred from pagination metadata
    /// without downloading the commit list. 0 for empty or missing repos.
    async fn commit_count(&self, owner: &str, repo: &str, author: &str) -> Result<u64>;

    /// Recent commits with their file lists, for doc-ratio sampling.
    /// Best-effort, empty on failure.
    async fn commits_with_files(
        &self,
        owner: &str,
        repo: &str,
        author: &str,
        max_commits: usize,
    ) -> Vec<Commit>;

    async fn search_authored_prs(&self, username: &str) -> Result<SearchResults>;

    async fn search_authored_issues(&self, username: &str) -> Result<SearchResults>;

    async fn repo_pr_count(&self, username: &str, owner: &str, repo: &str) -> u64;

    async fn repo_issue_count(&self, username: &str, owner: &str, repo: &str) -> u64;

    async fn repo_review_count(&self, username: &str, owner: &str, repo: &str) -> u64;

    /// Issues by other authors that the user commented on.
    async fn repo_discussion_count(&self, username: &str, owner: &str, repo: &str) -> u64;
}
