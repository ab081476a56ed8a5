//! Collaborators the aggregators talk to.
//!
//! - [`RemoteClient`]: a VCS provider's API ([`github`], [`gitlab`])
//! - [`TrackInspector`]: ahead/behind stats from a local clone
//! - [`resolve_target`]: path/URL argument to repository coordinates

pub mod github;
pub mod gitlab;
mod http;
mod local;
mod target;

pub use local::{GitInspector, LocalRepo, TrackInspector};
pub use target::{Target, parse_remote_url, resolve_target};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::{GlanceConfig, ProviderKind};
use crate::error::{GlanceError, Result};
use crate::model::{Branch, Commit, Issue, PullRequest, Repo};

/// A VCS provider's API, shared read-only across concurrent retrievals
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn issues(&self, owner: &str, name: &str) -> Result<Vec<Issue>>;

    async fn pull_requests(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>>;

    async fn branches(&self, owner: &str, name: &str) -> Result<Vec<Branch>>;

    /// Repository metadata including its latest release, without commits
    async fn repository(&self, owner: &str, name: &str) -> Result<Repo>;

    /// Commits on the default branch strictly newer than `since`, newest
    /// first, at most `max` (0 = provider page size)
    async fn history(
        &self,
        repo: &Repo,
        max: usize,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Commit>>;

    /// Browser URL of an issue or pull request, `None` when it doesn't exist
    async fn issue_url(&self, owner: &str, name: &str, id: u64) -> Result<Option<String>>;

    /// Login of the authenticated user
    async fn username(&self) -> Result<String>;

    /// All repositories under a user or organization, with latest releases
    async fn repositories(&self, namespace: &str) -> Result<Vec<Repo>>;
}

/// Largest page the providers hand out
pub(crate) const PAGE_SIZE: usize = 100;

/// Requests issued at once when a listing needs per-item follow-ups
pub(crate) const FOLLOW_UP_CONCURRENCY: usize = 8;

pub(crate) fn page_size(max: usize) -> usize {
    if max == 0 { PAGE_SIZE } else { max.min(PAGE_SIZE) }
}

/// `query` plus the page parameters for page number `page` (1-based)
pub(crate) fn paged<'q>(query: &[(&'q str, String)], page: usize) -> Vec<(&'q str, String)> {
    let mut paged = query.to_vec();
    paged.push(("per_page", PAGE_SIZE.to_string()));
    paged.push(("page", page.to_string()));
    paged
}

/// Walk a paginated listing until a page comes back short.
///
/// `fetch` gets the 1-based page number. A `None` page (the listing doesn't
/// exist) ends the walk with `None`.
pub(crate) async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Option<Vec<T>>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Option<Vec<T>>>>,
{
    let mut all = Vec::new();
    for page in 1.. {
        let Some(batch) = fetch(page).await? else {
            return Ok(None);
        };
        let done = batch.len() < PAGE_SIZE;
        all.extend(batch);
        if done {
            break;
        }
    }
    Ok(Some(all))
}

/// Keep commits strictly newer than `since`, capped at `max` (0 = no cap)
pub(crate) fn bound_history(
    mut commits: Vec<Commit>,
    max: usize,
    since: Option<DateTime<Utc>>,
) -> Vec<Commit> {
    if let Some(since) = since {
        commits.retain(|c| c.timestamp > since);
    }
    if max > 0 {
        commits.truncate(max);
    }
    commits
}

fn token_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|t| !t.trim().is_empty())
}

/// Pick an API client for `host`.
///
/// `github.com` and `gitlab.com` are built in; other hosts need an entry in
/// the configuration's `hosts` list.
pub fn guess_client(host: &str, config: &GlanceConfig) -> Result<Arc<dyn RemoteClient>> {
    let host = host.to_lowercase();
    let (kind, api_url, token_env) = match config.host(&host) {
        Some(settings) => (
            settings.provider,
            settings.api_url.clone(),
            settings.token_env.clone(),
        ),
        None => match host.as_str() {
            "github.com" => (ProviderKind::Github, None, None),
            "gitlab.com" => (ProviderKind::Gitlab, None, None),
            _ => return Err(GlanceError::UnsupportedHost(host)),
        },
    };

    let timeout = config.timeout();
    let client: Arc<dyn RemoteClient> = match kind {
        ProviderKind::Github => {
            let api = api_url.unwrap_or_else(|| github::default_api_url(&host));
            let token = token_from_env(token_env.as_deref().unwrap_or("GITHUB_TOKEN"));
            Arc::new(github::GithubClient::new(&host, &api, token, timeout)?)
        }
        ProviderKind::Gitlab => {
            let api = api_url.unwrap_or_else(|| gitlab::default_api_url(&host));
            let token = token_from_env(token_env.as_deref().unwrap_or("GITLAB_TOKEN"));
            Arc::new(gitlab::GitlabClient::new(&host, &api, token, timeout)?)
        }
    };
    Ok(client)
}

/// HTTP timeout for a single request, slightly above the retrieval bound
pub(crate) fn request_timeout(retrieval: Duration) -> Duration {
    retrieval.saturating_add(Duration::from_secs(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostSettings;
    use chrono::Duration as ChronoDuration;

    fn commit(id: &str, at: DateTime<Utc>) -> Commit {
        Commit {
            id: id.to_string(),
            message: String::new(),
            author: String::new(),
            timestamp: at,
        }
    }

    #[test]
    fn test_guess_builtin_hosts() {
        let config = GlanceConfig::default();
        assert!(guess_client("github.com", &config).is_ok());
        assert!(guess_client("GitLab.com", &config).is_ok());
    }

    #[test]
    fn test_guess_unknown_host() {
        let err = guess_client("example.org", &GlanceConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, GlanceError::UnsupportedHost(h) if h == "example.org"));
    }

    #[test]
    fn test_guess_configured_host() {
        let config = GlanceConfig {
            hosts: vec![HostSettings {
                host: "git.example.org".to_string(),
                provider: ProviderKind::Gitlab,
                api_url: None,
                token_env: None,
            }],
            ..Default::default()
        };
        assert!(guess_client("git.example.org", &config).is_ok());
    }

    #[test]
    fn test_request_timeout_outlasts_retrieval() {
        assert_eq!(request_timeout(Duration::from_secs(30)), Duration::from_secs(31));
        assert_eq!(request_timeout(Duration::MAX), Duration::MAX);
    }

    #[test]
    fn test_guess_with_huge_timeout() {
        let config = GlanceConfig {
            timeout_secs: u64::MAX,
            ..Default::default()
        };
        assert!(guess_client("github.com", &config).is_ok());
        assert!(guess_client("gitlab.com", &config).is_ok());
    }

    #[test]
    fn test_bound_history_is_strictly_newer_and_capped() {
        let release = Utc::now() - ChronoDuration::days(10);
        let commits = vec![
            commit("c", release + ChronoDuration::days(3)),
            commit("b", release + ChronoDuration::days(2)),
            commit("a", release + ChronoDuration::days(1)),
            commit("release", release),
            commit("old", release - ChronoDuration::days(1)),
        ];

        let kept = bound_history(commits.clone(), 0, Some(release));
        assert_eq!(kept.len(), 3);

        let kept = bound_history(commits.clone(), 2, Some(release));
        let ids: Vec<&str> = kept.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);

        assert_eq!(bound_history(commits, 0, None).len(), 5);
    }

    #[tokio::test]
    async fn test_collect_pages_stops_at_short_page() {
        let mut calls = Vec::new();
        let all = collect_pages(|page| {
            calls.push(page);
            let len = if page < 3 { PAGE_SIZE } else { 3 };
            async move { Ok(Some(vec![page; len])) }
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(calls, vec![1, 2, 3]);
        assert_eq!(all.len(), 2 * PAGE_SIZE + 3);
        assert_eq!(all.last(), Some(&3));
    }

    #[tokio::test]
    async fn test_collect_pages_full_last_page_needs_empty_follow_up() {
        let mut calls = 0;
        let all = collect_pages(|page| {
            calls += 1;
            let len = if page == 1 { PAGE_SIZE } else { 0 };
            async move { Ok(Some(vec![(); len])) }
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(all.len(), PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_collect_pages_missing_listing() {
        let all = collect_pages(|_| async { Ok(None::<Vec<u8>>) }).await.unwrap();
        assert!(all.is_none());
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_errors() {
        let err = collect_pages(|page| async move {
            if page == 1 {
                Ok(Some(vec![0u8; PAGE_SIZE]))
            } else {
                Err(GlanceError::Api {
                    status: 502,
                    message: "Bad Gateway".to_string(),
                })
            }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, GlanceError::Api { status: 502, .. }));
    }

    #[test]
    fn test_paged_query() {
        let query = paged(&[("state", "open".to_string())], 2);
        assert_eq!(
            query,
            vec![
                ("state", "open".to_string()),
                ("per_page", PAGE_SIZE.to_string()),
                ("page", "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_size() {
        assert_eq!(page_size(0), PAGE_SIZE);
        assert_eq!(page_size(10), 10);
        assert_eq!(page_size(500), PAGE_SIZE);
    }
}
