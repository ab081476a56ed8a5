//! The data-join pipeline.
//!
//! - [`branches`]: staleness filter and the track-stat joiner
//! - [`single`]: concurrent retrieval of one repository's dashboard
//! - [`projects`]: release status across a whole namespace

mod branches;
mod projects;
mod single;

pub use branches::{filter_branches, join_track_stats};
pub use projects::{ProjectScan, aggregate_projects, sort_releases};
pub use single::{Dashboard, Pipeline};

use std::future::Future;
use std::time::Duration;

use crate::error::{GlanceError, Result};

/// Display caps per category plus the branch staleness window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_issues: usize,
    pub max_pull_requests: usize,
    pub max_branches: usize,
    pub max_commits: usize,
    pub max_branch_age_days: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_issues: 10,
            max_pull_requests: 10,
            max_branches: 10,
            max_commits: 10,
            max_branch_age_days: 28,
        }
    }
}

/// Run one retrieval under a deadline
pub(crate) async fn bounded<T>(
    what: &str,
    limit: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(what, secs = limit.as_secs(), "retrieval timed out");
            Err(GlanceError::Timeout {
                what: what.to_string(),
                secs: limit.as_secs(),
            })
        }
    }
}
