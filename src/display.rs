//! Terminal output and markdown export for finished profiles.

use dev_profile::activity::activity_description;
use dev_profile::schema::{Profile, Project, Role};

pub fn header(text: &str) {
    println!();
    println!("{}", text);
}

pub fn detail(text: &str) {
    println!("   {}", text);
}

pub fn warning(text: &str) {
    println!("   warning: {}", text);
}

pub fn error(text: &str) {
    eprintln!("error: {}", text);
}

pub fn progress(label: &str) {
    println!("   {}...", label);
}

pub fn progress_done(label: &str, result: &str) {
    println!("   {}... {}", label, result);
}

fn separator() {
    println!("{}", "-".repeat(72));
}

pub fn display_profile(profile: &Profile) {
    let os = &profile.open_source;

    println!();
    separator();
    println!("Open Source Contribution Profile: {}", profile.username);
    println!();
    println!("  Status: {}", activity_description(os.activity_level));
    println!();

    println!("  Summary:");
    for line in wrap_text(&os.summary, 70) {
        println!("  {}", line);
    }
    println!();

    if !os.languages.is_empty() {
        let languages = os
            .languages
            .iter()
            .map(|(language, percent)| format!("{} ({}%)", language, percent))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  Primary languages: {}", languages);
    }
    println!(
        "  Recent activity:   {} events in recent history",
        os.stats.recent_events_count
    );
    println!();

    let owned: Vec<&Project> = os.projects.iter().filter(|p| p.role == Role::Owner).collect();
    let external: Vec<&Project> = os
        .projects
        .iter()
        .filter(|p| p.role == Role::Contributor)
        .collect();

    if !owned.is_empty() {
        println!("  Owned projects");
        project_table(&owned, true);
        println!();
    }
    if !external.is_empty() {
        println!("  External contributions");
        project_table(&external, false);
        println!();
    }

    let t = &os.totals;
    println!(
        "  Totals: {} commits, {} PRs, {} issues, {} reviews, {} discussions",
        t.commits, t.pull_requests, t.issues_created, t.reviews, t.discussions
    );
    separator();
}

fn project_table(projects: &[&Project], show_stars: bool) {
    if show_stars {
        println!(
            "  {:<28} {:>6} {:>8} {:>5} {:>7} {:>8} {:>12}",
            "Project", "Stars", "Commits", "PRs", "Issues", "Reviews", "Discussions"
        );
    } else {
        println!(
            "  {:<28} {:>8} {:>5} {:>7} {:>8} {:>12}",
            "Project", "Commits", "PRs", "Issues", "Reviews", "Discussions"
        );
    }
    for project in projects {
        let c = &project.counts;
        if show_stars {
            println!(
                "  {:<28} {:>6} {:>8} {:>5} {:>7} {:>8} {:>12}",
                truncate(&project.repo, 28),
                project.stars,
                c.commits,
                c.pull_requests,
                c.issues_created,
                c.reviews,
                c.discussions
            );
        } else {
            println!(
                "  {:<28} {:>8} {:>5} {:>7} {:>8} {:>12}",
                truncate(&project.repo, 28),
                c.commits,
                c.pull_requests,
                c.issues_created,
                c.reviews,
                c.discussions
            );
        }
    }
}

pub fn display_profile_list(usernames: &[String]) {
    if usernames.is_empty() {
        println!("No saved profiles found.");
        println!("Run `dev-profile build <username>` to create one.");
        return;
    }
    println!("Saved profiles ({}):", usernames.len());
    println!();
    for username in usernames {
        println!("  - {}", username);
    }
}

pub fn export_markdown(profile: &Profile) -> String {
    let os = &profile.open_source;
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# Open Source Profile: {}", profile.username));
    lines.push(String::new());
    lines.push(format!("*Generated: {}*", profile.fetched_at));
    lines.push(String::new());

    if let Some(name) = &profile.github.name {
        lines.push(format!("**{}**", name));
    }
    if let Some(bio) = &profile.github.bio {
        lines.push(format!("> {}", bio));
    }
    if profile.github.name.is_some() || profile.github.bio.is_some() {
        lines.push(String::new());
    }

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(os.summary.clone());
    lines.push(String::new());

    lines.push("## Statistics".to_string());
    lines.push(String::new());
    lines.push(format!(
        "- **Contribution Status:** {}",
        if os.contributes { "Active" } else { "Inactive" }
    ));
    lines.push(format!(
        "- **Activity Level:** {}",
        activity_description(os.activity_level)
    ));
    lines.push(format!(
        "- **Public Repositories:** {}",
        profile.github.public_repos
    ));
    lines.push(format!("- **Total Stars:** {}", os.stats.total_stars));
    lines.push(format!(
        "- **Account Age:** {:.1} years",
        os.stats.account_age_years
    ));
    lines.push(String::new());

    if !os.languages.is_empty() {
        lines.push("## Languages".to_string());
        lines.push(String::new());
        for (language, percent) in &os.languages {
            lines.push(format!("- {}: {}%", language, percent));
        }
        lines.push(String::new());
    }

    let owned: Vec<&Project> = os.projects.iter().filter(|p| p.role == Role::Owner).collect();
    if !owned.is_empty() {
        lines.push("## Owned Projects".to_string());
        lines.push(String::new());
        lines.push("| Project | Stars | Commits | PRs | Issues | Reviews |".to_string());
        lines.push("|---------|-------|---------|-----|--------|---------|".to_string());
        for p in owned {
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} |",
                p.repo,
                p.stars,
                p.counts.commits,
                p.counts.pull_requests,
                p.counts.issues_created,
                p.counts.reviews
            ));
        }
        lines.push(String::new());
    }

    let external: Vec<&Project> = os
        .projects
        .iter()
        .filter(|p| p.role == Role::Contributor)
        .collect();
    if !external.is_empty() {
        lines.push("## External Contributions".to_string());
        lines.push(String::new());
        lines.push("| Project | PRs | Issues | Reviews |".to_string());
        lines.push("|---------|-----|--------|---------|".to_string());
        for p in external {
            lines.push(format!(
                "| {} | {} | {} | {} |",
                p.repo, p.counts.pull_requests, p.counts.issues_created, p.counts.reviews
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Totals".to_string());
    lines.push(String::new());
    lines.push(format!("- **Commits:** {}", os.totals.commits));
    lines.push(format!("- **Pull Requests:** {}", os.totals.pull_requests));
    lines.push(format!("- **Issues Created:** {}", os.totals.issues_created));
    lines.push(format!("- **Code Reviews:** {}", os.totals.reviews));
    lines.push(format!("- **Discussions:** {}", os.totals.discussions));
    lines.push(String::new());

    lines.join("\n")
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > max_width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_length - 1).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("one two three four five six seven", 10);
        assert!(lines.iter().all(|line| line.len() <= 10));
        assert_eq!(lines.join(" "), "one two three four five six seven");
    }

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-rather-long-name", 10), "a-rather-…");
    }
}
