//! The persisted profile document.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Contribution counters for one project. Independently fetched,
/// zero-initialized, summable across projects in any order.
///
/// `docs_commits` is an estimated enrichment and stays out of both the
/// activity sum and the non-zero test.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectCounts {
    pub commits: u64,
    pub pull_requests: u64,
    pub issues_created: u64,
    pub reviews: u64,
    pub docs_commits: u64,
    pub discussions: u64,
}

impl ProjectCounts {
    /// Five-field sum driving the activity level.
    pub fn total_actions(&self) -> u64 {
        self.commits + self.pull_requests + self.issues_created + self.reviews + self.discussions
    }

    /// Projects where every signal is zero carry no information and are
    /// dropped from the final list.
    pub fn has_activity(&self) -> bool {
        self.total_actions() > 0
    }
}

impl Add for ProjectCounts {
    type Output = ProjectCounts;

    fn add(self, other: ProjectCounts) -> ProjectCounts {
        ProjectCounts {
            commits: self.commits + other.commits,
            pull_requests: self.pull_requests + other.pull_requests,
            issues_created: self.issues_created + other.issues_created,
            reviews: self.reviews + other.reviews,
            docs_commits: self.docs_commits + other.docs_commits,
            discussions: self.discussions + other.discussions,
        }
    }
}

impl AddAssign for ProjectCounts {
    fn add_assign(&mut self, other: ProjectCounts) {
        *self = *self + other;
    }
}

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActivityLevel {
    Inactive,
    Occasional,
    Active,
    Prolific,
}

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Owner,
    Contributor,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub repo: String,
    pub role: Role,
    pub stars: u32,
    pub description: Option<String>,
    pub language: Option<String>,
    pub counts: ProjectCounts,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GithubInfo {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Stats {
    pub total_stars: u32,
    pub total_forks: u32,
    pub recent_events_count: usize,
    pub account_age_years: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OpenSource {
    pub contributes: bool,
    pub activity_level: ActivityLevel,
    pub summary: String,
    pub projects: Vec<Project>,
    pub totals: ProjectCounts,
    pub languages: BTreeMap<String, f64>,
    pub maintained_projects: Vec<String>,
    pub stats: Stats,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    pub username: String,
    pub fetched_at: String,
    pub github: GithubInfo,
    pub open_source: OpenSource,
}
