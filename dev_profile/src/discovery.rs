//! Candidate project discovery.
//!
//! Merges four partial, differently-shaped sources into one deduplicated
//! project set: the user's repo list, their recent public events, and two
//! search fallbacks for contributions to repositories the user neither owns
//! nor recently touched. Identity is the lower-cased `owner/repo` name and
//! the first source to claim a key wins; later sources never overwrite.

use std::collections::HashSet;

use log::debug;

use crate::api::GithubApi;
use crate::types::{Event, Repo};

/// Event types that indicate a contribution to the event's repository.
const DISCOVERY_EVENT_TYPES: [&str; 5] = [
    "PullRequestEvent",
    "IssuesEvent",
    "IssueCommentEvent",
    "PullRequestReviewEvent",
    "PushEvent",
];

/// A candidate project assembled during discovery. Created once, immutable
/// afterwards, consumed by per-project counting.
///
/// Candidates found through events or search carry no star, description or
/// language data; only the repo-list pass has that metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredProject {
    pub owner: String,
    pub repo: String,
    pub full_name: String,
    pub is_owned: bool,
    pub is_fork: bool,
    pub stars: u32,
    pub description: Option<String>,
    pub language: Option<String>,
}

impl DiscoveredProject {
    fn from_repo(repo: &Repo, username: &str) -> Self {
        DiscoveredProject {
            owner: repo.owner.login.clone(),
            repo: repo.name.clone(),
            full_name: repo.full_name.clone(),
            is_owned: repo.owner.login.eq_ignore_ascii_case(username),
            is_fork: repo.fork,
            stars: repo.stargazers_count,
            description: repo.description.clone(),
            language: repo.language.clone(),
        }
    }

    fn minimal(owner: &str, repo: &str, username: &str) -> Self {
        DiscoveredProject {
            owner: owner.to_string(),
            repo: repo.to_string(),
            full_name: format!("{}/{}", owner, repo),
            is_owned: owner.eq_ignore_ascii_case(username),
            is_fork: false,
            stars: 0,
            description: None,
            language: None,
        }
    }
}

/// Identity-keyed, insertion-ordered set with first-writer-wins semantics.
struct ProjectSet {
    seen: HashSet<String>,
    projects: Vec<DiscoveredProject>,
}

impl ProjectSet {
    fn new() -> Self {
        ProjectSet {
            seen: HashSet::new(),
            projects: Vec::new(),
        }
    }

    /// Returns false when the key was already claimed by an earlier source.
    fn insert(&mut self, project: DiscoveredProject) -> bool {
        let key = project.full_name.to_lowercase();
        if !self.seen.insert(key) {
            return false;
        }
        self.projects.push(project);
        true
    }
}

/// Runs the four discovery passes in order: repo list, event feed, PR
/// search, issue search. The two search passes draw on the search budget
/// and are allowed to fail; partial discovery is acceptable.
pub async fn discover_projects<C: GithubApi>(
    client: &C,
    username: &str,
    repos: &[Repo],
    events: &[Event],
    mut progress: impl FnMut(&str),
) -> Vec<DiscoveredProject> {
    let mut set = ProjectSet::new();

    for repo in repos {
        set.insert(DiscoveredProject::from_repo(repo, username));
    }

    for event in events {
        if !DISCOVERY_EVENT_TYPES.contains(&event.kind.as_str()) {
            continue;
        }
        if let Some((owner, repo)) = event.repo.name.split_once('/') {
            set.insert(DiscoveredProject::minimal(owner, repo, username));
        }
    }

    progress("Searching for PRs...");
    match client.search_authored_prs(username).await {
        Ok(results) => merge_search_results(&mut set, &results.items, username),
        Err(err) => debug!("PR search pass skipped: {}", err),
    }

    progress("Searching for issues...");
    match client.search_authored_issues(username).await {
        Ok(results) => merge_search_results(&mut set, &results.items, username),
        Err(err) => debug!("Issue search pass skipped: {}", err),
    }

    set.projects
}

fn merge_search_results(
    set: &mut ProjectSet,
    items: &[crate::types::SearchItem],
    username: &str,
) {
    for item in items {
        if let Some((owner, repo)) = extract_repo_from_url(&item.repository_url) {
            set.insert(DiscoveredProject::minimal(&owner, &repo, username));
        }
    }
}

/// Pulls `owner/repo` out of an API resource URL such as
/// `https://api.github.com/repos/rust-lang/rust`.
fn extract_repo_from_url(repository_url: &str) -> Option<(String, String)> {
    let (_, rest) = repository_url.split_once("/repos/")?;
    let mut segments = rest.split('/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    Some((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubClient;
    use crate::types::{EventRepo, RepoOwner, SearchItem, SearchResults};

    fn repo(owner: &str, name: &str, stars: u32) -> Repo {
        Repo {
            name: name.to_string(),
            full_name: format!("{}/{}", owner, name),
            owner: RepoOwner {
                login: owner.to_string(),
            },
            description: Some("a repo".to_string()),
            fork: false,
            stargazers_count: stars,
            forks_count: 0,
            language: Some("Rust".to_string()),
            created_at: None,
        }
    }

    fn event(kind: &str, repo_name: &str) -> Event {
        Event {
            kind: kind.to_string(),
            repo: EventRepo {
                name: repo_name.to_string(),
            },
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn search_results(urls: &[&str]) -> SearchResults {
        SearchResults {
            total_count: urls.len() as u64,
            items: urls
                .iter()
                .map(|url| SearchItem {
                    repository_url: url.to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn case_insensitive_identity_collation() {
        let client = StubClient::default();
        let repos = vec![repo("alice", "x", 3)];
        let events = vec![event("PullRequestEvent", "ALICE/x")];

        let projects = discover_projects(&client, "alice", &repos, &events, |_| {}).await;

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].full_name, "alice/x");
        // Metadata from the repo-list pass must survive.
        assert_eq!(projects[0].stars, 3);
        assert!(projects[0].is_owned);
    }

    #[tokio::test]
    async fn event_allow_list_is_enforced() {
        let client = StubClient::default();
        let events = vec![
            event("WatchEvent", "bob/watched"),
            event("ForkEvent", "bob/forked"),
            event("IssueCommentEvent", "bob/discussed"),
        ];

        let projects = discover_projects(&client, "alice", &[], &events, |_| {}).await;

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].full_name, "bob/discussed");
        assert!(!projects[0].is_owned);
    }

    #[tokio::test]
    async fn search_passes_extend_the_set() {
        let mut client = StubClient::default();
        client.authored_prs = Some(search_results(&[
            "https://api.github.com/repos/rust-lang/rust",
        ]));
        client.authored_issues = Some(search_results(&[
            "https://api.github.com/repos/rust-lang/rust",
            "https://api.github.com/repos/serde-rs/serde",
        ]));

        let repos = vec![repo("alice", "x", 0)];
        let projects = discover_projects(&client, "alice", &repos, &[], |_| {}).await;

        let names: Vec<_> = projects.iter().map(|p| p.full_name.as_str()).collect();
        assert_eq!(names, vec!["alice/x", "rust-lang/rust", "serde-rs/serde"]);
    }

    #[tokio::test]
    async fn exhausted_search_budget_skips_the_pass() {
        // StubClient reports both searches as rate limited when unset.
        let client = StubClient::default();
        let repos = vec![repo("alice", "x", 0)];

        let projects = discover_projects(&client, "alice", &repos, &[], |_| {}).await;

        assert_eq!(projects.len(), 1);
    }

    #[tokio::test]
    async fn event_order_does_not_change_the_set() {
        let client = StubClient::default();
        let mut events = vec![
            event("PushEvent", "bob/one"),
            event("IssuesEvent", "carol/two"),
            event("PullRequestEvent", "dave/three"),
        ];

        let forward = discover_projects(&client, "alice", &[], &events, |_| {}).await;
        events.reverse();
        let backward = discover_projects(&client, "alice", &[], &events, |_| {}).await;

        let mut forward: Vec<_> = forward.into_iter().map(|p| p.full_name).collect();
        let mut backward: Vec<_> = backward.into_iter().map(|p| p.full_name).collect();
        forward.sort();
        backward.sort();
        assert_eq!(forward, backward);
    }

    #[test]
    fn repo_url_extraction() {
        assert_eq!(
            extract_repo_from_url("https://api.github.com/repos/rust-lang/rust"),
            Some(("rust-lang".to_string(), "rust".to_string()))
        );
        assert_eq!(
            extract_repo_from_url("https://api.github.com/repos/a/b/issues/7"),
            Some(("a".to_string(), "b".to_string()))
        );
        assert_eq!(extract_repo_from_url("https://api.github.com/users/alice"), None);
        assert_eq!(extract_repo_from_url("https://api.github.com/repos/"), None);
    }
}
