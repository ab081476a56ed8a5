//! # gitglance - contextual information about your git projects
//!
//! gitglance summarizes a repository's activity (open issues, pull requests,
//! active branches and commits since the latest release) in one compact,
//! column-aligned terminal report.
//!
//! ## Quick Start
//!
//! ```bash
//! # Dashboard for the repository in the current directory
//! gitglance
//!
//! # Any remote repository
//! gitglance https://github.com/owner/name
//!
//! # Open issue or pull request #42 in the browser
//! gitglance 42
//!
//! # Release status of every repository you own
//! gitglance --all-projects github.com
//! ```
//!
//! ## Modules
//!
//! - [`aggregate`]: Concurrent retrieval and joining of dashboard data
//! - [`cli`]: Command-line interface definitions and handlers
//! - [`config`]: Configuration loading
//! - [`error`]: Error types and result aliases
//! - [`format`]: Column-aligned, themed presentation
//! - [`model`]: Data models (Issue, PullRequest, Branch, Repo, etc.)
//! - [`tui`]: Theme and the interactive viewer
//! - [`vcs`]: Provider API clients and local git inspection

/// Concurrent retrieval pipeline.
///
/// Single-repository dashboards and namespace-wide release scans.
pub mod aggregate;

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading.
///
/// Handles the optional `config.yml` in the platform config directory.
pub mod config;

/// Error types and result aliases.
///
/// Defines `GlanceError` enum and `Result<T>` type alias.
pub mod error;

pub mod format;
pub mod logging;

/// Data models for the dashboard.
pub mod model;

/// Terminal user interface.
pub mod tui;

/// VCS collaborators: remote API clients and the local inspector.
pub mod vcs;
