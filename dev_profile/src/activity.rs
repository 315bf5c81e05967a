use crate::schema::{ActivityLevel, ProjectCounts};

/// Buckets the summed totals into an activity level. Pure step function
/// over the five-field sum; `docs_commits` never counts.
pub fn compute_activity_level(totals: &ProjectCounts) -> ActivityLevel {
    match totals.total_actions() {
        0 => ActivityLevel::Inactive,
        1..=49 => ActivityLevel::Occasional,
        50..=500 => ActivityLevel::Active,
        _ => ActivityLevel::Prolific,
    }
}

pub fn activity_description(level: ActivityLevel) -> &'static str {
    match level {
        ActivityLevel::Inactive => "No activity",
        ActivityLevel::Occasional => "Occasional contributor",
        ActivityLevel::Active => "Active contributor",
        ActivityLevel::Prolific => "Prolific contributor",
    }
}
