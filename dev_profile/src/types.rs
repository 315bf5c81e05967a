//! Deserialized GitHub response shapes, reduced to the fields the profile
//! builder actually reads.

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub created_at: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Repo {
    pub name: String,
    pub full_name: String,
    pub owner: RepoOwner,
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    pub language: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RepoOwner {
    pub login: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: EventRepo,
    pub created_at: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EventRepo {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SearchResults {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearchItem {
    pub repository_url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Commit {
    pub sha: String,
    #[serde(default)]
    pub files: Option<Vec<CommitFile>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommitFile {
    pub filename: String,
}

/// Snapshot of one rate-limit window, taken from response headers after
/// every call. Two live inside the client, one per [`crate::api::ApiBudget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
    pub used: u32,
}
