use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,

    /// Hex color without the leading `#`, as providers report it
    #[serde(default)]
    pub color: String,
}

impl Label {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into().trim_start_matches('#').to_string(),
        }
    }

    /// Parse the label color into RGB components
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        if self.color.len() != 6 || !self.color.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&self.color[i..i + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,

    /// Source branch of the change
    #[serde(default)]
    pub head: String,

    /// Branch the change targets
    #[serde(default)]
    pub base: String,

    #[serde(default)]
    pub draft: bool,
}
