//! Templated narrative over the computed counts.

use std::collections::BTreeMap;

use crate::languages::top_languages;
use crate::schema::{ActivityLevel, Project, ProjectCounts, Role};

pub struct NarrativeInput<'a> {
    pub username: &'a str,
    pub activity_level: ActivityLevel,
    pub projects: &'a [Project],
    pub totals: &'a ProjectCounts,
    pub languages: &'a BTreeMap<String, f64>,
    pub maintained_projects: &'a [String],
    pub total_stars: u32,
}

pub fn generate_narrative(input: &NarrativeInput<'_>) -> String {
    let owned: Vec<_> = input
        .projects
        .iter()
        .filter(|p| p.role == Role::Owner)
        .collect();
    let external: Vec<_> = input
        .projects
        .iter()
        .filter(|p| p.role == Role::Contributor)
        .collect();
    let top = top_languages(input.languages, 3);

    if input.activity_level == ActivityLevel::Inactive {
        return format!(
            "{} has a GitHub account but has not yet contributed to public open source projects.",
            input.username
        );
    }

    if input.activity_level == ActivityLevel::Occasional {
        let mut summary = format!(
            "{} has contributed to open source, primarily through {} on {} public {}.",
            input.username,
            contribution_types(input.totals),
            input.projects.len(),
            pluralize("repository", input.projects.len())
        );
        if !top.is_empty() {
            summary.push_str(&format!(" Their work focuses on {}.", format_list(&top)));
        }
        return summary;
    }

    // Active or prolific.
    let mut notable: Vec<_> = external.clone();
    notable.sort_by(|a, b| b.stars.cmp(&a.stars));
    let notable: Vec<String> = notable
        .iter()
        .take(3)
        .map(|p| p.repo.rsplit('/').next().unwrap_or(&p.repo).to_string())
        .collect();

    let mut parts = vec![format!(
        "{} is {} {} open source contributor with {} public {}",
        input.username,
        article(&input.activity_level.to_string()),
        input.activity_level,
        owned.len(),
        pluralize("repository", owned.len())
    )];

    if !external.is_empty() {
        let notable_text = if notable.is_empty() {
            String::new()
        } else {
            format!(" including {}", format_list(&notable))
        };
        parts.push(format!(
            "and contributions to {} external {}{}",
            external.len(),
            pluralize("project", external.len()),
            notable_text
        ));
    }

    let mut summary = parts.join(" ");
    summary.push('.');

    if !top.is_empty() {
        summary.push_str(&format!(" They primarily work in {}.", format_list(&top)));
    }

    if !input.maintained_projects.is_empty() && input.total_stars > 0 {
        summary.push_str(&format!(
            " They maintain {} {} with a combined {}+ stars.",
            input.maintained_projects.len(),
            pluralize("project", input.maintained_projects.len()),
            input.total_stars
        ));
    }

    let types = contribution_types(input.totals);
    if !types.is_empty() {
        summary.push_str(&format!(" Their contributions span {}.", types));
    }

    summary
}

fn contribution_types(totals: &ProjectCounts) -> String {
    let mut types = Vec::new();
    if totals.commits > 0 {
        types.push("code");
    }
    if totals.issues_created > 0 {
        types.push("issue reporting");
    }
    if totals.reviews > 0 {
        types.push("code review");
    }
    if totals.discussions > 0 {
        types.push("discussion");
    }
    format_list(&types)
}

fn format_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [head @ .., last] => {
            let head: Vec<&str> = head.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else if word == "repository" {
        "repositories".to_string()
    } else {
        format!("{}s", word)
    }
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}
