use super::branch::Commit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag: String,

    #[serde(default)]
    pub name: String,

    pub published_at: DateTime<Utc>,

    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub owner: String,
    pub name: String,

    #[serde(default)]
    pub default_branch: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_release: Option<Release>,

    /// Commits newer than the last release (newest first). Without a
    /// release these are simply the most recent commits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commits: Vec<Commit>,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            default_branch: String::new(),
            url: String::new(),
            last_release: None,
            commits: Vec::new(),
        }
    }

    pub fn with_release(mut self, release: Release) -> Self {
        self.last_release = Some(release);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Lower bound for the history fetch
    pub fn released_at(&self) -> Option<DateTime<Utc>> {
        self.last_release.as_ref().map(|r| r.published_at)
    }
}

/// Keep only repositories that carry a release
pub fn repos_with_release(repos: Vec<Repo>) -> Vec<Repo> {
    repos
        .into_iter()
        .filter(|r| r.last_release.is_some())
        .collect()
}
