use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,

    /// Full commit message; formatting only shows the first line
    pub message: String,

    #[serde(default)]
    pub author: String,

    pub timestamp: DateTime<Utc>,
}

impl Commit {
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }

    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub last_commit: Commit,
}

impl Branch {
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_commit.timestamp
    }
}

/// Ahead/behind counts of a local branch relative to its upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackStat {
    pub ahead: usize,
    pub behind: usize,

    /// Remote-tracking ref the counts were computed against, e.g. `origin/main`
    pub upstream: String,
}

impl TrackStat {
    pub fn is_in_sync(&self) -> bool {
        self.ahead == 0 && self.behind == 0
    }
}

/// Track stats keyed by branch name
pub type TrackStats = HashMap<String, TrackStat>;
