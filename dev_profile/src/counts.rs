//! Per-project contribution counting.
//!
//! Each discovered project costs six lean queries: one commit count read
//! from pagination metadata plus four search counters, and an optional
//! commit sample for the docs ratio. Queries run strictly sequentially so
//! the shared search throttle keeps its single-timestamp assumption.

use chrono::{DateTime, Utc};
use derive_more::Constructor;
use log::{debug, warn};

use crate::api::{ApiBudget, Error, GithubApi, Result};
use crate::discovery::DiscoveredProject;
use crate::schema::{Project, ProjectCounts, Role};

const DOCS_SAMPLE_SIZE: usize = 50;
/// Assumed docs share when no commit sample is available. Sample fetches
/// degrade to an empty list, so an empty sample is indistinguishable from
/// a failed one and both take this estimate.
const DOCS_FALLBACK_RATIO: f64 = 0.05;

/// Outcome of a counting batch. `halted` marks a rate-limit stop; the
/// projects analyzed before the stop are still present and valid.
#[derive(Debug)]
pub struct Analysis {
    pub projects: Vec<Project>,
    pub halted: Option<Halt>,
}

/// Terminal marker for a batch cut short by quota exhaustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct Halt {
    /// Projects fully analyzed before the stop.
    pub analyzed: usize,
    pub budget: ApiBudget,
    pub reset: DateTime<Utc>,
}

/// Fetches the six counters for one project.
///
/// The four search counters degrade to zero on their own; commit-count
/// failures other than a missing repo propagate, which is what lets the
/// batch loop above detect quota exhaustion.
pub async fn project_counts<C: GithubApi>(
    client: &C,
    username: &str,
    project: &DiscoveredProject,
    mut progress: impl FnMut(&str),
) -> Result<ProjectCounts> {
    let DiscoveredProject { owner, repo, .. } = project;
    progress(&format!("Analyzing {}/{}...", owner, repo));

    let commits = client.commit_count(owner, repo, username).await?;

    let docs_commits = if commits > 0 && project.is_owned {
        estimate_docs_commits(client, username, project, commits).await
    } else {
        0
    };

    let pull_requests = client.repo_pr_count(username, owner, repo).await;
    let issues_created = client.repo_issue_count(username, owner, repo).await;
    let reviews = client.repo_review_count(username, owner, repo).await;
    let discussions = client.repo_discussion_count(username, owner, repo).await;

    Ok(ProjectCounts {
        commits,
        pull_requests,
        issues_created,
        reviews,
        docs_commits,
        discussions,
    })
}

/// Samples recent commits and extrapolates the docs share to the full
/// commit count. Statistically noisy for small samples; treated as
/// enrichment, never as a reason to fail the project.
async fn estimate_docs_commits<C: GithubApi>(
    client: &C,
    username: &str,
    project: &DiscoveredProject,
    commits: u64,
) -> u64 {
    let sample = client
        .commits_with_files(&project.owner, &project.repo, username, DOCS_SAMPLE_SIZE)
        .await;
    if sample.is_empty() {
        return (commits as f64 * DOCS_FALLBACK_RATIO).round() as u64;
    }

    let docs = sample
        .iter()
        .filter(|commit| {
            commit
                .files
                .as_deref()
                .unwrap_or_default()
                .iter()
                .any(|file| is_doc_file(&file.filename))
        })
        .count() as u64;

    if commits > sample.len() as u64 {
        let ratio = docs as f64 / sample.len() as f64;
        (commits as f64 * ratio).round() as u64
    } else {
        docs
    }
}

fn is_doc_file(filename: &str) -> bool {
    let name = filename.to_ascii_lowercase();
    name.starts_with("docs/")
        || name.ends_with(".md")
        || name.ends_with(".rst")
        || name.starts_with("readme")
        || name.starts_with("changelog")
        || name.starts_with("contributing")
        || name.starts_with("license")
}

/// Counts contributions for every discovered project in order.
///
/// Quota exhaustion is fatal to the batch: once the budget this loop draws
/// on is spent, every remaining project would fail the same way, so the
/// loop stops and returns what it has. Any other per-project error only
/// skips that project. Projects with all-zero counts are dropped.
pub async fn analyze_projects<C: GithubApi>(
    client: &C,
    username: &str,
    discovered: &[DiscoveredProject],
    mut progress: impl FnMut(&str),
) -> Analysis {
    let mut projects = Vec::new();
    let mut halted = None;

    for (index, project) in discovered.iter().enumerate() {
        let label = format!("[{}/{}]", index + 1, discovered.len());
        let outcome = project_counts(client, username, project, |msg| {
            progress(&format!("{} {}", label, msg))
        })
        .await;

        match outcome {
            Ok(counts) if counts.has_activity() => projects.push(Project {
                repo: project.full_name.clone(),
                role: if project.is_owned {
                    Role::Owner
                } else {
                    Role::Contributor
                },
                stars: project.stars,
                description: project.description.clone(),
                language: project.language.clone(),
                counts,
            }),
            Ok(_) => debug!("No activity in {}, dropping", project.full_name),
            Err(Error::RateLimited { budget, reset }) => {
                halted = Some(Halt::new(index, budget, reset));
                break;
            }
            Err(err) => warn!("Skipping {}: {}", project.full_name, err),
        }
    }

    Analysis { projects, halted }
}

/// Componentwise total over retained projects. Commutative and
/// associative, so the fold order never matters.
pub fn sum_counts<'a>(counts: impl IntoIterator<Item = &'a ProjectCounts>) -> ProjectCounts {
    counts
        .into_iter()
        .fold(ProjectCounts::default(), |acc, c| acc + *c)
}
