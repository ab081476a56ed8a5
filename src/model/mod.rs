//! Data models for the dashboard.
//!
//! Everything here is a snapshot fetched once per run and discarded at exit:
//!
//! - [`Issue`] and [`PullRequest`]: open work items with their [`Label`]s
//! - [`Branch`] and [`Commit`]: remote branch activity and history
//! - [`TrackStat`]: ahead/behind counts of a local branch against its upstream
//! - [`Repo`] and [`Release`]: repository metadata and its latest release

mod branch;
mod issue;
mod repo;

pub use branch::{Branch, Commit, TrackStat, TrackStats};
pub use issue::{Issue, Label, PullRequest};
pub use repo::{Release, Repo, repos_with_release};
