use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::branches::{filter_branches, join_track_stats};
use super::{Limits, bounded};
use crate::error::{GlanceError, Result};
use crate::model::{Branch, Issue, PullRequest, Repo, TrackStats};
use crate::vcs::{LocalRepo, RemoteClient, Target, TrackInspector};

/// Everything one dashboard run shows, joined in display order
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub url: String,
    pub issues: Vec<Issue>,
    pub pull_requests: Vec<PullRequest>,
    /// Active branches only, most recent first
    pub branches: Vec<Branch>,
    pub track_stats: TrackStats,
    /// Repository with `commits` filled in since its last release
    pub repo: Repo,
}

/// Single-repository aggregator over a shared client and inspector
#[derive(Clone)]
pub struct Pipeline {
    client: Arc<dyn RemoteClient>,
    inspector: Arc<dyn TrackInspector>,
    limits: Limits,
    timeout: Duration,
}

impl Pipeline {
    pub fn new(
        client: Arc<dyn RemoteClient>,
        inspector: Arc<dyn TrackInspector>,
        limits: Limits,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            inspector,
            limits,
            timeout,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Browser URL for issue or pull request `id`
    pub async fn issue_url(&self, target: &Target, id: u64) -> Result<String> {
        bounded(
            "issue URL",
            self.timeout,
            self.client.issue_url(&target.owner, &target.name, id),
        )
        .await?
        .ok_or_else(|| GlanceError::NotFound(format!("Issue/PR {}", id)))
    }

    /// Fetch all sections concurrently.
    ///
    /// The first failing retrieval aborts the others and nothing is
    /// returned. Track stats are the exception: they degrade to an empty map.
    pub async fn aggregate(&self, target: &Target, now: DateTime<Utc>) -> Result<Dashboard> {
        let (owner, name) = (target.owner.as_str(), target.name.as_str());
        let timeout = self.timeout;
        debug!(host = %target.host, owner, name, "aggregating repository");

        let issues = bounded("issues", timeout, self.client.issues(owner, name));
        let pull_requests = bounded(
            "pull requests",
            timeout,
            self.client.pull_requests(owner, name),
        );
        let branches = async {
            let raw = bounded("branches", timeout, self.client.branches(owner, name)).await?;
            let active = filter_branches(raw, self.limits.max_branch_age_days, now);
            debug!(count = active.len(), "active branches");
            Ok::<_, GlanceError>(self.track_stats(target.local.clone(), active).await)
        };
        let repo = async {
            let mut repo = bounded("repository", timeout, self.client.repository(owner, name)).await?;
            let since = repo.released_at();
            let commits = bounded(
                "commit history",
                timeout,
                self.client.history(&repo, self.limits.max_commits, since),
            )
            .await?;
            repo.commits = commits;
            debug!(commits = repo.commits.len(), "history fetched");
            Ok::<_, GlanceError>(repo)
        };

        let (issues, pull_requests, (branches, track_stats), repo) =
            tokio::try_join!(issues, pull_requests, branches, repo)
                .inspect_err(|err| warn!(error = %err, "dashboard aborted"))?;

        let url = if repo.url.is_empty() {
            target.web_url()
        } else {
            repo.url.clone()
        };
        Ok(Dashboard {
            url,
            issues,
            pull_requests,
            branches,
            track_stats,
            repo,
        })
    }

    async fn track_stats(
        &self,
        local: Option<LocalRepo>,
        branches: Vec<Branch>,
    ) -> (Vec<Branch>, TrackStats) {
        let Some(local) = local else {
            return (branches, TrackStats::new());
        };

        let inspector = Arc::clone(&self.inspector);
        let fallback = branches.clone();
        let task = tokio::task::spawn_blocking(move || {
            join_track_stats(inspector.as_ref(), Some(&local), branches)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(joined)) => joined,
            Ok(Err(err)) => {
                debug!(error = %err, "track stats task failed");
                (fallback, TrackStats::new())
            }
            Err(_) => {
                debug!("track stats timed out");
                (fallback, TrackStats::new())
            }
        }
    }
}
