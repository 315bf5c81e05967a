//! Shared in-memory [`GithubApi`] stub for analyzer tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::api::{ApiBudget, Error, GithubApi, Result};
use crate::schema::ProjectCounts;
use crate::types::{Commit, Event, Repo, SearchResults, User};

pub fn counts(
    commits: u64,
    pull_requests: u64,
    issues_created: u64,
    reviews: u64,
    discussions: u64,
) -> ProjectCounts {
    ProjectCounts {
        commits,
        pull_requests,
        issues_created,
        reviews,
        docs_commits: 0,
        discussions,
    }
}

/// Canned responses keyed by `owner/repo`. Unset search results simulate an
/// exhausted search budget; `commit_limit_after` makes `commit_count` fail
/// with a core-budget exhaustion after that many calls.
#[derive(Default)]
pub struct StubClient {
    pub authored_prs: Option<SearchResults>,
    pub authored_issues: Option<SearchResults>,
    pub commit_counts: HashMap<String, u64>,
    pub commit_limit_after: Option<usize>,
    pub commit_samples: HashMap<String, Vec<Commit>>,
    pub language_bytes: HashMap<String, HashMap<String, u64>>,
    pub pr_counts: HashMap<String, u64>,
    pub issue_counts: HashMap<String, u64>,
    pub review_counts: HashMap<String, u64>,
    pub discussion_counts: HashMap<String, u64>,
    commit_calls: Mutex<usize>,
}

fn key(owner: &str, repo: &str) -> String {
    format!("{}/{}", owner, repo)
}

fn rate_limited(budget: ApiBudget) -> Error {
    Error::RateLimited {
        budget,
        reset: Utc::now(),
    }
}

#[async_trait]
impl GithubApi for StubClient {
    async fn user(&self, username: &str) -> Result<User> {
        Err(Error::UserNotFound(username.to_string()))
    }

    async fn repos(&self, _username: &str) -> Result<Vec<Repo>> {
        Ok(Vec::new())
    }

    async fn events(&self, _username: &str) -> Result<Vec<Event>> {
        Ok(Vec::new())
    }

    async fn languages(&self, owner: &str, repo: &str) -> HashMap<String, u64> {
        self.language_bytes
            .get(&key(owner, repo))
            .cloned()
            .unwrap_or_default()
    }

    async fn commit_count(&self, owner: &str, repo: &str, _author: &str) -> Result<u64> {
        let mut calls = self.commit_calls.lock().unwrap();
        if let Some(limit) = self.commit_limit_after {
            if *calls >= limit {
                return Err(rate_limited(ApiBudget::Core));
            }
        }
        *calls += 1;
        Ok(self.commit_counts.get(&key(owner, repo)).copied().unwrap_or(0))
    }

    async fn commits_with_files(
        &self,
        owner: &str,
        repo: &str,
        _author: &str,
        max_commits: usize,
    ) -> Vec<Commit> {
        let mut sample = self
            .commit_samples
            .get(&key(owner, repo))
            .cloned()
            .unwrap_or_default();
        sample.truncate(max_commits);
        sample
    }

    async fn search_authored_prs(&self, _username: &str) -> Result<SearchResults> {
        self.authored_prs
            .clone()
            .ok_or_else(|| rate_limited(ApiBudget::Search))
    }

    async fn search_authored_issues(&self, _username: &str) -> Result<SearchResults> {
        self.authored_issues
            .clone()
            .ok_or_else(|| rate_limited(ApiBudget::Search))
    }

    async fn repo_pr_count(&self, _username: &str, owner: &str, repo: &str) -> u64 {
        self.pr_counts.get(&key(owner, repo)).copied().unwrap_or(0)
    }

    async fn repo_issue_count(&self, _username: &str, owner: &str, repo: &str) -> u64 {
        self.issue_counts.get(&key(owner, repo)).copied().unwrap_or(0)
    }

    async fn repo_review_count(&self, _username: &str, owner: &str, repo: &str) -> u64 {
        self.review_counts.get(&key(owner, repo)).copied().unwrap_or(0)
    }

    async fn repo_discussion_count(&self, _username: &str, owner: &str, repo: &str) -> u64 {
        self.discussion_counts
            .get(&key(owner, repo))
            .copied()
            .unwrap_or(0)
    }
}
