use crate::error::{GlanceError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlanceConfig {
    /// Upper bound for a single remote or local retrieval
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// In-flight history fetches when scanning a whole namespace
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Self-hosted providers, keyed by hostname
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<HostSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Github,
    Gitlab,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSettings {
    pub host: String,

    pub provider: ProviderKind,

    /// API root, e.g. `https://git.example.com/api/v4`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Environment variable holding the access token for this host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_fetches() -> usize {
    8
}

impl Default for GlanceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            hosts: Vec::new(),
        }
    }
}

impl GlanceConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, the platform config directory
    /// is consulted and a missing file falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GlanceError::Config(format!("Can't read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GlanceConfig = serde_yaml::from_str(content)?;
        if config.max_concurrent_fetches == 0 {
            return Err(GlanceError::Config(
                "max_concurrent_fetches must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "gitglance")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn host(&self, host: &str) -> Option<&HostSettings> {
        self.hosts
            .iter()
            .find(|h| h.host.eq_ignore_ascii_case(host))
    }
}
