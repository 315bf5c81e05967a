//! JSON persistence for finished profiles, one file per username.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use crate::schema::Profile;

pub struct ProfileStore {
    dir: PathBuf,
}

impl Default for ProfileStore {
    fn default() -> Self {
        ProfileStore::new("profiles")
    }
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ProfileStore { dir: dir.into() }
    }

    pub fn path(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{}.json", username))
    }

    pub fn save(&self, profile: &Profile) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating profile directory {}", self.dir.display()))?;
        let path = self.path(&profile.username);
        let content = serde_json::to_string_pretty(profile)?;
        fs::write(&path, content)
            .with_context(|| format!("writing profile {}", path.display()))?;
        Ok(path)
    }

    /// `None` for missing as well as unparsable files; a corrupt profile is
    /// rebuilt, not reported.
    pub fn load(&self, username: &str) -> Option<Profile> {
        let content = fs::read_to_string(self.path(username)).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn exists(&self, username: &str) -> bool {
        self.path(username).is_file()
    }

    pub fn list(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        let mut usernames: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension()? != "json" {
                    return None;
                }
                Some(path.file_stem()?.to_string_lossy().into_owned())
            })
            .collect();
        usernames.sort();
        usernames
    }
}
