use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::aggregate::Limits;
use crate::error::{GlanceError, Result};
use crate::format::ReleaseOptions;
use crate::tui::ThemeVariant;

#[derive(Parser, Debug)]
#[command(name = "gitglance")]
#[command(
    author,
    about = "Contextual information about your git projects, right on the command-line",
    disable_version_flag = true
)]
pub struct Cli {
    /// Repository path or URL, optionally followed by an issue/PR number.
    /// With --all-projects: the provider hostname
    #[arg(value_name = "TARGET", num_args = 0..=2)]
    pub args: Vec<String>,

    /// Maximum number of branches to show
    #[arg(long, default_value_t = 10)]
    pub max_branches: usize,

    /// Maximum number of commits to show
    #[arg(long, default_value_t = 10)]
    pub max_commits: usize,

    /// Maximum number of issues to show
    #[arg(long, default_value_t = 10)]
    pub max_issues: usize,

    /// Maximum number of pull requests to show
    #[arg(long, default_value_t = 10)]
    pub max_pull_requests: usize,

    /// Hide branches without activity in this many days
    #[arg(long, default_value_t = 28)]
    pub max_branch_age: i64,

    /// Minimum new commits for a repository to count as active
    #[arg(long, default_value_t = 1)]
    pub min_new_commits: usize,

    /// Hide repositories without enough new commits (--all-projects)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        require_equals = true
    )]
    pub skip_stale_repos: bool,

    /// List the new commits beneath each repository (--all-projects)
    #[arg(long)]
    pub with_commits: bool,

    /// Release status of every repository in a namespace
    #[arg(long)]
    pub all_projects: bool,

    /// User or organization to scan (defaults to the authenticated user)
    #[arg(long, env = "GITGLANCE_NAMESPACE")]
    pub namespace: Option<String>,

    /// Print version information
    #[arg(long)]
    pub version: bool,

    /// Print the dashboard instead of opening the viewer
    #[arg(long)]
    pub print: bool,

    /// Color theme
    #[arg(long, value_enum, default_value_t = ThemeVariant::Dark)]
    pub theme: ThemeVariant,

    /// Per-retrieval timeout in seconds (overrides the config file)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// What a run does, decided from the flags and positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Version,
    Dashboard { target: String },
    Open { target: String, id: u64 },
    AllProjects { host: String },
}

fn parse_id(raw: &str) -> Option<Result<u64>> {
    let id = raw.parse::<u64>().ok()?;
    if id == 0 {
        return Some(Err(GlanceError::InvalidArgument(
            "issue/PR number must be positive".to_string(),
        )));
    }
    Some(Ok(id))
}

/// Split `[PATH|URL] [ISSUE|PR]`.
///
/// A lone integer is an issue number against the current directory.
pub fn parse_positionals(args: &[String]) -> Result<(String, Option<u64>)> {
    match args {
        [] => Ok((".".to_string(), None)),
        [only] => match parse_id(only) {
            Some(id) => Ok((".".to_string(), Some(id?))),
            None => Ok((only.clone(), None)),
        },
        [target, id] => {
            let id = parse_id(id).ok_or_else(|| {
                GlanceError::InvalidArgument(format!("not an issue/PR number: {}", id))
            })??;
            Ok((target.clone(), Some(id)))
        }
        _ => Err(GlanceError::InvalidArgument(
            "expected at most two arguments".to_string(),
        )),
    }
}

impl Cli {
    pub fn mode(&self) -> Result<Mode> {
        if self.version {
            return Ok(Mode::Version);
        }
        if self.all_projects {
            return match self.args.as_slice() {
                [host] => Ok(Mode::AllProjects { host: host.clone() }),
                _ => Err(GlanceError::InvalidArgument(
                    "--all-projects requires a single hostname argument".to_string(),
                )),
            };
        }
        Ok(match parse_positionals(&self.args)? {
            (target, Some(id)) => Mode::Open { target, id },
            (target, None) => Mode::Dashboard { target },
        })
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_issues: self.max_issues,
            max_pull_requests: self.max_pull_requests,
            max_branches: self.max_branches,
            max_commits: self.max_commits,
            max_branch_age_days: self.max_branch_age,
        }
    }

    pub fn release_options(&self) -> ReleaseOptions {
        ReleaseOptions {
            max_commits: self.max_commits,
            min_new_commits: self.min_new_commits,
            skip_stale_repos: self.skip_stale_repos,
            with_commits: self.with_commits,
        }
    }
}

/// `gitglance <version>`, plus the short commit when the build recorded one
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GITGLANCE_COMMIT_SHA") {
        Some(sha) if !sha.trim().is_empty() => {
            let short: String = sha.trim().chars().take(7).collect();
            format!("gitglance {} ({})", version, short)
        }
        _ => format!("gitglance {}", version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn cli(raw: &[&str]) -> Cli {
        let mut argv = vec!["gitglance"];
        argv.extend_from_slice(raw);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_positionals() {
        assert_eq!(parse_positionals(&[]).unwrap(), (".".to_string(), None));
        assert_eq!(
            parse_positionals(&args(&["42"])).unwrap(),
            (".".to_string(), Some(42))
        );
        assert_eq!(
            parse_positionals(&args(&["../other"])).unwrap(),
            ("../other".to_string(), None)
        );
        assert_eq!(
            parse_positionals(&args(&["https://github.com/o/r", "7"])).unwrap(),
            ("https://github.com/o/r".to_string(), Some(7))
        );
    }

    #[test]
    fn test_positional_errors() {
        assert!(matches!(
            parse_positionals(&args(&["0"])),
            Err(GlanceError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_positionals(&args(&[".", "abc"])),
            Err(GlanceError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_positionals(&args(&[".", "0"])),
            Err(GlanceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.limits(), Limits::default());
        let opts = cli.release_options();
        assert!(opts.skip_stale_repos);
        assert!(!opts.with_commits);
        assert_eq!(opts.min_new_commits, 1);
        assert_eq!(cli.mode().unwrap(), Mode::Dashboard { target: ".".to_string() });
    }

    #[test]
    fn test_skip_stale_repos_can_be_disabled() {
        assert!(!cli(&["--skip-stale-repos=false"]).skip_stale_repos);
        assert!(cli(&["--skip-stale-repos"]).skip_stale_repos);
    }

    #[test]
    fn test_modes() {
        assert_eq!(cli(&["--version"]).mode().unwrap(), Mode::Version);
        assert_eq!(
            cli(&["12"]).mode().unwrap(),
            Mode::Open {
                target: ".".to_string(),
                id: 12
            }
        );
        assert_eq!(
            cli(&["--all-projects", "github.com"]).mode().unwrap(),
            Mode::AllProjects {
                host: "github.com".to_string()
            }
        );
        assert!(cli(&["--all-projects"]).mode().is_err());
    }

    #[test]
    fn test_version_string() {
        assert!(version_string().starts_with(&format!("gitglance {}", env!("CARGO_PKG_VERSION"))));
    }
}
