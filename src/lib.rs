pub mod args;
pub mod display;

use std::cmp::Ordering;

use chrono::Utc;
use dev_profile::activity::compute_activity_level;
use dev_profile::api::{GithubApi, Result};
use dev_profile::counts::{analyze_projects, sum_counts, Analysis};
use dev_profile::discovery::discover_projects;
use dev_profile::languages::aggregate_languages;
use dev_profile::narrative::{generate_narrative, NarrativeInput};
use dev_profile::schema::{
    ActivityLevel, GithubInfo, OpenSource, Profile, Project, Role, Stats,
};
use log::warn;

/// Runs the full pipeline for one user: fetch, discover, count, aggregate,
/// narrate. A rate-limit halt during counting is reported and the profile
/// is built from the projects analyzed up to that point.
pub async fn build_profile<C: GithubApi>(client: &C, username: &str) -> Result<Profile> {
    display::progress("Fetching user info");
    let user = client.user(username).await?;
    display::progress_done(
        "Fetching user info",
        user.name.as_deref().unwrap_or(username),
    );

    display::progress("Fetching repos");
    let repos = client.repos(username).await?;
    display::progress_done("Fetching repos", &format!("{} repos", repos.len()));

    display::progress("Fetching events");
    let events = client.events(username).await?;
    display::progress_done("Fetching events", &format!("{} events", events.len()));

    display::header("Discovering projects...");
    let discovered =
        discover_projects(client, username, &repos, &events, |msg| display::detail(msg)).await;
    display::detail(&format!("Found {} projects to analyze", discovered.len()));

    display::header("Analyzing contributions...");
    let Analysis { projects, halted } =
        analyze_projects(client, username, &discovered, |msg| display::detail(msg)).await;
    if let Some(halt) = halted {
        display::warning(&format!(
            "Rate limit reached. Analyzed {}/{} projects.",
            halt.analyzed,
            discovered.len()
        ));
        display::warning(&format!(
            "{} budget resets at {}",
            halt.budget,
            halt.reset.format("%H:%M:%S UTC")
        ));
    }
    display::detail(&format!("{} projects with contributions", projects.len()));

    display::header("Aggregating languages...");
    let languages = aggregate_languages(client, &discovered, |msg| display::detail(msg)).await;

    let totals = sum_counts(projects.iter().map(|p| &p.counts));
    let activity_level = compute_activity_level(&totals);
    let contributes = !projects.is_empty() && activity_level != ActivityLevel::Inactive;

    let maintained_projects: Vec<String> = projects
        .iter()
        .filter(|p| p.role == Role::Owner && (p.stars > 0 || p.counts.commits > 10))
        .map(|p| p.repo.clone())
        .collect();

    let total_stars: u32 = projects
        .iter()
        .filter(|p| p.role == Role::Owner)
        .map(|p| p.stars)
        .sum();
    let total_forks: u32 = repos.iter().map(|r| r.forks_count).sum();

    let summary = generate_narrative(&NarrativeInput {
        username,
        activity_level,
        projects: &projects,
        totals: &totals,
        languages: &languages,
        maintained_projects: &maintained_projects,
        total_stars,
    });

    let mut projects = projects;
    projects.sort_by(compare_projects);

    Ok(Profile {
        username: username.to_string(),
        fetched_at: Utc::now().to_rfc3339(),
        github: GithubInfo {
            name: user.name,
            bio: user.bio,
            company: user.company,
            location: user.location,
            public_repos: user.public_repos,
            followers: user.followers,
            created_at: user.created_at.clone(),
        },
        open_source: OpenSource {
            contributes,
            activity_level,
            summary,
            projects,
            totals,
            languages,
            maintained_projects,
            stats: Stats {
                total_stars,
                total_forks,
                recent_events_count: events.len(),
                account_age_years: account_age_years(&user.created_at),
            },
        },
    })
}

/// Owners first, then total activity descending.
fn compare_projects(a: &Project, b: &Project) -> Ordering {
    match (a.role, b.role) {
        (Role::Owner, Role::Contributor) => Ordering::Less,
        (Role::Contributor, Role::Owner) => Ordering::Greater,
        _ => b.counts.total_actions().cmp(&a.counts.total_actions()),
    }
}

fn account_age_years(created_at: &str) -> f64 {
    match chrono::DateTime::parse_from_rfc3339(created_at) {
        Ok(created) => {
            let age = Utc::now() - created.with_timezone(&Utc);
            let years = age.num_days() as f64 / 365.0;
            (years * 10.0).round() / 10.0
        }
        Err(err) => {
            warn!("Unparsable account creation date '{}': {}", created_at, err);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dev_profile::schema::ProjectCounts;

    fn project(repo: &str, role: Role, commits: u64) -> Project {
        Project {
            repo: repo.to_string(),
            role,
            stars: 0,
            description: None,
            language: None,
            counts: ProjectCounts {
                commits,
                ..ProjectCounts::default()
            },
        }
    }

    #[test]
    fn owners_sort_before_contributors() {
        let mut projects = vec![
            project("ext/busy", Role::Contributor, 50),
            project("own/quiet", Role::Owner, 1),
            project("own/busy", Role::Owner, 30),
        ];
        projects.sort_by(compare_projects);

        let order: Vec<_> = projects.iter().map(|p| p.repo.as_str()).collect();
        assert_eq!(order, vec!["own/busy", "own/quiet", "ext/busy"]);
    }

    #[test]
    fn account_age_handles_bad_dates() {
        assert_eq!(account_age_years("not-a-date"), 0.0);
        assert!(account_age_years("2015-01-01T00:00:00Z") > 9.0);
    }
}
