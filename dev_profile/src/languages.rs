//! Language mix over owned projects.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::api::GithubApi;
use crate::discovery::DiscoveredProject;

/// Languages below this share of total bytes fold into `Other`.
const MIN_LANGUAGE_PERCENT: f64 = 5.0;

/// Sums per-repo language bytes across owned projects and converts them to
/// percentages. Only owned projects are sampled to keep the call count
/// proportional to the user's own repos; per-repo failures are silent.
pub async fn aggregate_languages<C: GithubApi>(
    client: &C,
    projects: &[DiscoveredProject],
    mut progress: impl FnMut(&str),
) -> BTreeMap<String, f64> {
    let owned: Vec<_> = projects.iter().filter(|p| p.is_owned).collect();

    let mut bytes: HashMap<String, u64> = HashMap::new();
    for (index, project) in owned.iter().enumerate() {
        progress(&format!(
            "Fetching languages {}/{}: {}",
            index + 1,
            owned.len(),
            project.full_name
        ));
        for (language, count) in client.languages(&project.owner, &project.repo).await {
            *bytes.entry(language).or_insert(0) += count;
        }
    }

    language_percentages(&bytes)
}

/// Byte counts to percentages, one decimal, sub-5% languages in `Other`.
pub fn language_percentages(bytes: &HashMap<String, u64>) -> BTreeMap<String, f64> {
    let total: u64 = bytes.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }

    let mut percentages = BTreeMap::new();
    let mut other = 0.0;
    for (language, count) in bytes {
        let percent = *count as f64 * 100.0 / total as f64;
        if percent >= MIN_LANGUAGE_PERCENT {
            percentages.insert(language.clone(), round_one_decimal(percent));
        } else {
            other += percent;
        }
    }
    if other > 0.0 {
        percentages.insert("Other".to_string(), round_one_decimal(other));
    }

    percentages
}

/// The `count` largest languages by share, excluding the `Other` bucket.
pub fn top_languages(languages: &BTreeMap<String, f64>, count: usize) -> Vec<String> {
    let mut entries: Vec<_> = languages
        .iter()
        .filter(|(language, _)| language.as_str() != "Other")
        .collect();
    entries.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(Ordering::Equal));
    entries
        .into_iter()
        .take(count)
        .map(|(language, _)| language.clone())
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubClient;

    fn bytes(entries: &[(&str, u64)]) -> HashMap<String, u64> {
        entries
            .iter()
            .map(|(language, count)| (language.to_string(), *count))
            .collect()
    }

    #[test]
    fn small_languages_fold_into_other() {
        let result = language_percentages(&bytes(&[("A", 50), ("B", 30), ("C", 15), ("D", 5)]));

        let expected: BTreeMap<String, f64> = [
            ("A".to_string(), 50.0),
            ("B".to_string(), 30.0),
            ("C".to_string(), 15.0),
            ("Other".to_string(), 5.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn rounding_is_one_decimal() {
        let result = language_percentages(&bytes(&[("A", 2), ("B", 1)]));
        assert_eq!(result["A"], 66.7);
        assert_eq!(result["B"], 33.3);
    }

    #[test]
    fn empty_input_yields_empty_breakdown() {
        assert!(language_percentages(&HashMap::new()).is_empty());
    }

    #[test]
    fn top_languages_skip_other() {
        let languages: BTreeMap<String, f64> = [
            ("Rust".to_string(), 60.0),
            ("Go".to_string(), 25.0),
            ("Other".to_string(), 15.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(top_languages(&languages, 3), vec!["Rust", "Go"]);
    }

    #[tokio::test]
    async fn only_owned_projects_are_sampled() {
        let mut client = StubClient::default();
        client
            .language_bytes
            .insert("alice/mine".to_string(), bytes(&[("Rust", 100)]));
        client
            .language_bytes
            .insert("bob/theirs".to_string(), bytes(&[("C", 100)]));

        let projects = vec![
            project("alice", "mine", true),
            project("bob", "theirs", false),
        ];
        let result = aggregate_languages(&client, &projects, |_| {}).await;

        assert_eq!(result.len(), 1);
        assert_eq!(result["Rust"], 100.0);

        fn project(owner: &str, repo: &str, is_owned: bool) -> DiscoveredProject {
            DiscoveredProject {
                owner: owner.to_string(),
                repo: repo.to_string(),
                full_name: format!("{}/{}", owner, repo),
                is_owned,
                is_fork: false,
                stars: 0,
                description: None,
                language: None,
            }
        }
    }
}
