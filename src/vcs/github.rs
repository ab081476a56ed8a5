//! GitHub REST v3 client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;

use super::http::ApiClient;
use super::{
    FOLLOW_UP_CONCURRENCY, RemoteClient, bound_history, collect_pages, page_size, paged,
    request_timeout,
};
use crate::error::{GlanceError, Result};
use crate::model::{Branch, Commit, Issue, Label, PullRequest, Release, Repo};

pub fn default_api_url(host: &str) -> String {
    if host == "github.com" {
        "https://api.github.com".to_string()
    } else {
        // GitHub Enterprise
        format!("https://{}/api/v3", host)
    }
}

#[derive(Deserialize)]
struct ApiLabel {
    name: String,
    #[serde(default)]
    color: String,
}

#[derive(Deserialize)]
struct ApiIssue {
    number: u64,
    title: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    // Present when the "issue" is really a pull request
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Deserialize)]
struct ApiPull {
    number: u64,
    title: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    head: ApiRef,
    base: ApiRef,
    #[serde(default)]
    draft: bool,
}

#[derive(Deserialize)]
struct ApiBranch {
    name: String,
    commit: ApiSha,
}

#[derive(Deserialize)]
struct ApiSha {
    sha: String,
}

#[derive(Deserialize)]
struct ApiCommitPerson {
    #[serde(default)]
    name: String,
    date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ApiCommitDetail {
    message: String,
    author: Option<ApiCommitPerson>,
    committer: Option<ApiCommitPerson>,
}

#[derive(Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Deserialize)]
struct ApiCommit {
    sha: String,
    commit: ApiCommitDetail,
    author: Option<ApiUser>,
}

#[derive(Deserialize)]
struct ApiRepo {
    name: String,
    owner: ApiUser,
    #[serde(default)]
    default_branch: String,
    #[serde(default)]
    html_url: String,
}

#[derive(Deserialize)]
struct ApiRelease {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    html_url: String,
}

#[derive(Deserialize)]
struct ApiHtmlUrl {
    html_url: String,
}

/// The issues listing mixes in pull requests; keep the real issues
fn open_issues(listed: Vec<ApiIssue>) -> Vec<Issue> {
    listed
        .into_iter()
        .filter(|i| i.pull_request.is_none())
        .map(|i| Issue {
            id: i.number,
            title: i.title,
            created_at: i.created_at,
            labels: labels(i.labels),
        })
        .collect()
}

fn labels(labels: Vec<ApiLabel>) -> Vec<Label> {
    labels
        .into_iter()
        .map(|l| Label::new(l.name, l.color))
        .collect()
}

impl From<ApiCommit> for Commit {
    fn from(c: ApiCommit) -> Self {
        // The committer date reflects when the commit landed on the branch
        let timestamp = c
            .commit
            .committer
            .as_ref()
            .or(c.commit.author.as_ref())
            .map(|p| p.date)
            .unwrap_or_default();
        let author = c
            .author
            .map(|u| u.login)
            .or_else(|| c.commit.author.map(|a| a.name))
            .unwrap_or_default();
        Commit {
            id: c.sha,
            message: c.commit.message,
            author,
            timestamp,
        }
    }
}

impl From<ApiRepo> for Repo {
    fn from(r: ApiRepo) -> Self {
        let mut repo = Repo::new(r.owner.login, r.name);
        repo.default_branch = r.default_branch;
        repo.url = r.html_url;
        repo
    }
}

impl ApiRelease {
    fn into_release(self) -> Option<Release> {
        Some(Release {
            published_at: self.published_at?,
            name: self.name.unwrap_or_default(),
            tag: self.tag_name,
            url: self.html_url,
        })
    }
}

/// Client for github.com and GitHub Enterprise
#[derive(Debug, Clone)]
pub struct GithubClient {
    api: ApiClient,
    host: String,
}

impl GithubClient {
    pub fn new(host: &str, api_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let auth = token.map(|t| ("Authorization", format!("Bearer {}", t)));
        Ok(Self {
            api: ApiClient::new(api_url, auth, request_timeout(timeout))?,
            host: host.to_string(),
        })
    }

    async fn latest_release(&self, owner: &str, name: &str) -> Result<Option<Release>> {
        let url = self
            .api
            .url(&format!("/repos/{}/{}/releases/latest", owner, name), &[])?;
        let release: Option<ApiRelease> = self.api.get_optional(url).await?;
        Ok(release.and_then(ApiRelease::into_release))
    }

    async fn commit(&self, owner: &str, name: &str, sha: &str) -> Result<Commit> {
        let url = self
            .api
            .url(&format!("/repos/{}/{}/commits/{}", owner, name, sha), &[])?;
        let commit: ApiCommit = self.api.get_json(url).await?;
        Ok(commit.into())
    }

    async fn list_pages<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let pages = collect_pages(|page| async move {
            let url = self.api.url(path, &paged(query, page))?;
            self.api.get_json(url).await.map(Some)
        })
        .await?;
        Ok(pages.unwrap_or_default())
    }
}

#[async_trait]
impl RemoteClient for GithubClient {
    async fn issues(&self, owner: &str, name: &str) -> Result<Vec<Issue>> {
        let issues: Vec<ApiIssue> = self
            .list_pages(
                &format!("/repos/{}/{}/issues", owner, name),
                &[("state", "open".to_string())],
            )
            .await?;
        Ok(open_issues(issues))
    }

    async fn pull_requests(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>> {
        let pulls: Vec<ApiPull> = self
            .list_pages(
                &format!("/repos/{}/{}/pulls", owner, name),
                &[("state", "open".to_string())],
            )
            .await?;
        Ok(pulls
            .into_iter()
            .map(|p| PullRequest {
                id: p.number,
                title: p.title,
                created_at: p.created_at,
                labels: labels(p.labels),
                head: p.head.name,
                base: p.base.name,
                draft: p.draft,
            })
            .collect())
    }

    async fn branches(&self, owner: &str, name: &str) -> Result<Vec<Branch>> {
        let branches: Vec<ApiBranch> = self
            .list_pages(&format!("/repos/{}/{}/branches", owner, name), &[])
            .await?;

        // The listing only carries SHAs; dates need one lookup per branch
        stream::iter(branches)
            .map(|b| async move {
                let last_commit = self.commit(owner, name, &b.commit.sha).await?;
                Ok::<_, GlanceError>(Branch {
                    name: b.name,
                    last_commit,
                })
            })
            .buffered(FOLLOW_UP_CONCURRENCY)
            .try_collect()
            .await
    }

    async fn repository(&self, owner: &str, name: &str) -> Result<Repo> {
        let url = self.api.url(&format!("/repos/{}/{}", owner, name), &[])?;
        let repo: ApiRepo = self.api.get_json(url).await?;
        let mut repo = Repo::from(repo);
        repo.last_release = self.latest_release(owner, name).await?;
        Ok(repo)
    }

    async fn history(
        &self,
        repo: &Repo,
        max: usize,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Commit>> {
        let mut query = vec![("per_page", page_size(max).to_string())];
        if !repo.default_branch.is_empty() {
            query.push(("sha", repo.default_branch.clone()));
        }
        if let Some(since) = since {
            query.push(("since", since.to_rfc3339()));
        }
        let url = self
            .api
            .url(&format!("/repos/{}/{}/commits", repo.owner, repo.name), &query)?;
        let commits: Vec<ApiCommit> = self.api.get_json(url).await?;
        Ok(bound_history(
            commits.into_iter().map(Commit::from).collect(),
            max,
            since,
        ))
    }

    async fn issue_url(&self, owner: &str, name: &str, id: u64) -> Result<Option<String>> {
        // Pull requests are issues too as far as this endpoint is concerned
        let url = self
            .api
            .url(&format!("/repos/{}/{}/issues/{}", owner, name, id), &[])?;
        let issue: Option<ApiHtmlUrl> = self.api.get_optional(url).await?;
        Ok(issue.map(|i| i.html_url).filter(|u| !u.is_empty()))
    }

    async fn username(&self) -> Result<String> {
        let url = self.api.url("/user", &[])?;
        let user: ApiUser = self.api.get_json(url).await?;
        Ok(user.login)
    }

    async fn repositories(&self, namespace: &str) -> Result<Vec<Repo>> {
        let repos: Vec<ApiRepo> = self
            .list_pages(&format!("/users/{}/repos", namespace), &[])
            .await?;
        tracing::debug!(host = %self.host, namespace, count = repos.len(), "listed repositories");

        stream::iter(repos)
            .map(|r| async move {
                let mut repo = Repo::from(r);
                repo.last_release = self.latest_release(&repo.owner, &repo.name).await?;
                Ok::<_, GlanceError>(repo)
            })
            .buffered(FOLLOW_UP_CONCURRENCY)
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::PAGE_SIZE;

    #[test]
    fn test_default_api_url() {
        assert_eq!(default_api_url("github.com"), "https://api.github.com");
        assert_eq!(
            default_api_url("github.example.com"),
            "https://github.example.com/api/v3"
        );
    }

    fn listed(number: u64, is_pull: bool) -> ApiIssue {
        ApiIssue {
            number,
            title: format!("Item {}", number),
            created_at: Utc::now(),
            labels: Vec::new(),
            pull_request: is_pull.then(|| serde_json::json!({"url": "x"})),
        }
    }

    #[test]
    fn test_issue_listing_skips_pull_requests() {
        let raw = r#"[
            {"number": 1, "title": "Bug", "created_at": "2024-01-15T10:30:00Z",
             "labels": [{"name": "bug", "color": "d73a4a"}]},
            {"number": 2, "title": "PR", "created_at": "2024-01-15T10:30:00Z",
             "labels": [], "pull_request": {"url": "x"}}
        ]"#;
        let issues = open_issues(serde_json::from_str(raw).unwrap());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, 1);
        assert_eq!(issues[0].labels[0].name, "bug");
    }

    #[tokio::test]
    async fn test_issues_survive_a_first_page_of_pull_requests() {
        // Page 1 is all pull requests, the real issues come after it
        let listing = collect_pages(|page| async move {
            let batch: Vec<ApiIssue> = match page {
                1 => (1..=PAGE_SIZE as u64).map(|n| listed(n, true)).collect(),
                _ => vec![listed(501, false), listed(502, true), listed(503, false)],
            };
            Ok(Some(batch))
        })
        .await
        .unwrap()
        .unwrap();

        let ids: Vec<u64> = open_issues(listing).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![501, 503]);
    }

    #[test]
    fn test_commit_conversion_prefers_login_and_committer_date() {
        let raw = r#"{
            "sha": "0123456789abcdef",
            "commit": {
                "message": "Fix parser\n\nDetails",
                "author": {"name": "Alice", "date": "2024-01-01T00:00:00Z"},
                "committer": {"name": "GitHub", "date": "2024-01-02T00:00:00Z"}
            },
            "author": {"login": "alice"}
        }"#;
        let commit: Commit = serde_json::from_str::<ApiCommit>(raw).unwrap().into();
        assert_eq!(commit.author, "alice");
        assert_eq!(commit.summary(), "Fix parser");
        assert_eq!(commit.timestamp.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }

    #[test]
    fn test_unpublished_release_is_ignored() {
        let raw = r#"{"tag_name": "v1", "name": null, "published_at": null}"#;
        let release: ApiRelease = serde_json::from_str(raw).unwrap();
        assert!(release.into_release().is_none());
    }
}
