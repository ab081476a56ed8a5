use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::bounded;
use crate::error::{GlanceError, Result};
use crate::model::{Repo, repos_with_release};
use crate::vcs::RemoteClient;

/// Parameters of a namespace-wide release scan
#[derive(Debug, Clone)]
pub struct ProjectScan {
    /// Defaults to the authenticated user
    pub namespace: Option<String>,
    pub max_commits: usize,
    pub timeout: Duration,
    /// History fetches in flight at once
    pub concurrency: usize,
}

/// Newest release first; equal publish times fall back to the name
pub fn sort_releases(repos: &mut [Repo]) {
    repos.sort_by(|a, b| {
        b.released_at()
            .cmp(&a.released_at())
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Collect commits since the last release for every released repository
/// under a namespace.
///
/// One task is spawned per repository; any failure aborts the rest and no
/// partial result is returned.
pub async fn aggregate_projects(client: Arc<dyn RemoteClient>, scan: &ProjectScan) -> Result<Vec<Repo>> {
    let namespace = match &scan.namespace {
        Some(ns) => ns.clone(),
        None => bounded("username", scan.timeout, client.username()).await?,
    };
    let listed = bounded("repositories", scan.timeout, client.repositories(&namespace)).await?;
    let released = repos_with_release(listed);
    debug!(namespace = %namespace, count = released.len(), "repositories with a release");

    let results = Arc::new(Mutex::new(Vec::with_capacity(released.len())));
    let semaphore = Arc::new(Semaphore::new(scan.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for repo in released {
        let client = Arc::clone(&client);
        let results = Arc::clone(&results);
        let semaphore = Arc::clone(&semaphore);
        let (max_commits, timeout) = (scan.max_commits, scan.timeout);

        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| GlanceError::Task(e.to_string()))?;
            let what = format!("history of {}", repo.full_name());
            let since = repo.released_at();
            let commits = bounded(&what, timeout, client.history(&repo, max_commits, since)).await?;

            let mut repo = repo;
            repo.commits = commits;
            results.lock().await.push(repo);
            Ok::<_, GlanceError>(())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined.map_err(GlanceError::from).and_then(|r| r) {
            warn!(error = %err, "aborting namespace scan");
            tasks.abort_all();
            return Err(err);
        }
    }

    let mut repos = std::mem::take(&mut *results.lock().await);
    sort_releases(&mut repos);
    Ok(repos)
}
