mod all_projects;
mod dashboard;
mod open;
mod version;

pub use all_projects::handle_all_projects;
pub use dashboard::handle_dashboard;
pub use open::handle_open;
pub use version::handle_version;

use std::io::IsTerminal;

use anyhow::{Context, Result};

use super::Cli;
use crate::aggregate::Limits;
use crate::config::GlanceConfig;
use crate::format::ReleaseOptions;
use crate::tui::Theme;

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: GlanceConfig,
    pub theme: Theme,
    pub limits: Limits,
    pub releases: ReleaseOptions,
    pub namespace: Option<String>,
    pub print: bool,
}

impl CommandContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config =
            GlanceConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
        if let Some(secs) = cli.timeout {
            config.timeout_secs = secs;
        }
        Ok(Self {
            config,
            theme: Theme::new(cli.theme),
            limits: cli.limits(),
            releases: cli.release_options(),
            namespace: cli.namespace.clone(),
            print: cli.print,
        })
    }

    /// Whether output goes to the full-screen viewer
    pub fn interactive(&self) -> bool {
        !self.print && std::io::stdout().is_terminal()
    }
}
