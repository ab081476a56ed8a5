//! GitLab REST v4 client.

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
    format!("https://{}/api/v4", host)
}

/// GitLab addresses projects by their URL-encoded full path
fn project_id(owner: &str, name: &str) -> String {
    format!("{}/{}", owner, name).replace('/', "%2F")
}

#[derive(Deserialize)]
struct ApiLabel {
    name: String,
    #[serde(default)]
    color: String,
}

#[derive(Deserialize)]
struct ApiIssue {
    iid: u64,
    title: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
}

#[derive(Deserialize)]
struct ApiMergeRequest {
    iid: u64,
    title: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    #[serde(default)]
    source_branch: String,
    #[serde(default)]
    target_branch: String,
    #[serde(default)]
    draft: bool,
}

#[derive(Deserialize)]
struct ApiCommit {
    id: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    author_name: String,
    committed_date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ApiBranch {
    name: String,
    commit: ApiCommit,
}

#[derive(Deserialize)]
struct ApiNamespace {
    full_path: String,
}

#[derive(Deserialize)]
struct ApiProject {
    path: String,
    namespace: ApiNamespace,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    web_url: String,
}

#[derive(Deserialize)]
struct ApiReleaseLinks {
    #[serde(rename = "self", default)]
    url: String,
}

#[derive(Deserialize)]
struct ApiRelease {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    released_at: Option<DateTime<Utc>>,
    #[serde(rename = "_links", default)]
    links: Option<ApiReleaseLinks>,
}

#[derive(Deserialize)]
struct ApiWebUrl {
    web_url: String,
}

#[derive(Deserialize)]
struct ApiUser {
    username: String,
}

fn labels(labels: Vec<ApiLabel>) -> Vec<Label> {
    labels
        .into_iter()
        .map(|l| Label::new(l.name, l.color))
        .collect()
}

impl From<ApiCommit> for Commit {
    fn from(c: ApiCommit) -> Self {
        Commit {
            id: c.id,
            message: c.message,
            author: c.author_name,
            timestamp: c.committed_date,
        }
    }
}

impl From<ApiProject> for Repo {
    fn from(p: ApiProject) -> Self {
        let mut repo = Repo::new(p.namespace.full_path, p.path);
        repo.default_branch = p.default_branch.unwrap_or_default();
        repo.url = p.web_url;
        repo
    }
}

impl ApiRelease {
    fn into_release(self) -> Option<Release> {
        Some(Release {
            published_at: self.released_at?,
            name: self.name.unwrap_or_default(),
            tag: self.tag_name,
            url: self.links.map(|l| l.url).unwrap_or_default(),
        })
    }
}

fn open_with_labels() -> [(&'static str, String); 2] {
    [
        ("state", "opened".to_string()),
        ("with_labels_details", "true".to_string()),
    ]
}

/// Client for gitlab.com and self-hosted GitLab instances
#[derive(Debug, Clone)]
pub struct GitlabClient {
    api: ApiClient,
    host: String,
}

impl GitlabClient {
    pub fn new(host: &str, api_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let auth = token.map(|t| ("PRIVATE-TOKEN", t));
        Ok(Self {
            api: ApiClient::new(api_url, auth, request_timeout(timeout))?,
            host: host.to_string(),
        })
    }

    async fn latest_release(&self, owner: &str, name: &str) -> Result<Option<Release>> {
        // Releases are sorted by release date, newest first
        let url = self.api.url(
            &format!("/projects/{}/releases", project_id(owner, name)),
            &[("per_page", "1".to_string())],
        )?;
        let releases: Option<Vec<ApiRelease>> = self.api.get_optional(url).await?;
        Ok(releases
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(ApiRelease::into_release))
    }

    /// Every page of a listing, `None` when the listing itself is missing
    async fn list_pages<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<Vec<T>>> {
        collect_pages(|page| async move {
            let url = self.api.url(path, &paged(query, page))?;
            self.api.get_optional(url).await
        })
        .await
    }

    async fn project_listing<T: serde::de::DeserializeOwned>(
        &self,
        owner: &str,
        name: &str,
        listing: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let path = format!("/projects/{}/{}", project_id(owner, name), listing);
        self.list_pages(&path, query)
            .await?
            .ok_or_else(|| GlanceError::NotFound(format!("Project {}/{}", owner, name)))
    }
}

#[async_trait]
impl RemoteClient for GitlabClient {
    async fn issues(&self, owner: &str, name: &str) -> Result<Vec<Issue>> {
        let issues: Vec<ApiIssue> = self
            .project_listing(owner, name, "issues", &open_with_labels())
            .await?;
        Ok(issues
            .into_iter()
            .map(|i| Issue {
                id: i.iid,
                title: i.title,
                created_at: i.created_at,
                labels: labels(i.labels),
            })
            .collect())
    }

    async fn pull_requests(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>> {
        let requests: Vec<ApiMergeRequest> = self
            .project_listing(owner, name, "merge_requests", &open_with_labels())
            .await?;
        Ok(requests
            .into_iter()
            .map(|m| PullRequest {
                id: m.iid,
                title: m.title,
                created_at: m.created_at,
                labels: labels(m.labels),
                head: m.source_branch,
                base: m.target_branch,
                draft: m.draft,
            })
            .collect())
    }

    async fn branches(&self, owner: &str, name: &str) -> Result<Vec<Branch>> {
        let branches: Vec<ApiBranch> = self
            .project_listing(owner, name, "repository/branches", &[])
            .await?;
        Ok(branches
            .into_iter()
            .map(|b| Branch {
                name: b.name,
                last_commit: b.commit.into(),
            })
            .collect())
    }

    async fn repository(&self, owner: &str, name: &str) -> Result<Repo> {
        let url = self
            .api
            .url(&format!("/projects/{}", project_id(owner, name)), &[])?;
        let project: ApiProject = self.api.get_json(url).await?;
        let mut repo = Repo::from(project);
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
            query.push(("ref_name", repo.default_branch.clone()));
        }
        if let Some(since) = since {
            query.push(("since", since.to_rfc3339()));
        }
        let url = self.api.url(
            &format!(
                "/projects/{}/repository/commits",
                project_id(&repo.owner, &repo.name)
            ),
            &query,
        )?;
        let commits: Vec<ApiCommit> = self.api.get_json(url).await?;
        Ok(bound_history(
            commits.into_iter().map(Commit::from).collect(),
            max,
            since,
        ))
    }

    async fn issue_url(&self, owner: &str, name: &str, id: u64) -> Result<Option<String>> {
        let project = project_id(owner, name);
        // Issues and merge requests are numbered independently; issues win
        for kind in ["issues", "merge_requests"] {
            let url = self
                .api
                .url(&format!("/projects/{}/{}/{}", project, kind, id), &[])?;
            let found: Option<ApiWebUrl> = self.api.get_optional(url).await?;
            if let Some(found) = found.filter(|f| !f.web_url.is_empty()) {
                return Ok(Some(found.web_url));
            }
        }
        Ok(None)
    }

    async fn username(&self) -> Result<String> {
        let url = self.api.url("/user", &[])?;
        let user: ApiUser = self.api.get_json(url).await?;
        Ok(user.username)
    }

    async fn repositories(&self, namespace: &str) -> Result<Vec<Repo>> {
        let encoded = namespace.replace('/', "%2F");
        let projects: Vec<ApiProject> =
            match self.list_pages(&format!("/groups/{}/projects", encoded), &[]).await? {
                Some(projects) => projects,
                None => self
                    .list_pages(&format!("/users/{}/projects", encoded), &[])
                    .await?
                    .ok_or_else(|| GlanceError::NotFound(format!("Namespace {}", namespace)))?,
            };
        tracing::debug!(host = %self.host, namespace, count = projects.len(), "listed projects");

        stream::iter(projects)
            .map(|p| async move {
                let mut repo = Repo::from(p);
                repo.last_release = self.latest_release(&repo.owner, &repo.name).await?;
                Ok::<_, GlanceError>(repo)
            })
            .buffered(FOLLOW_UP_CONCURRENCY)
            .try_collect()
            .await
    }
}
