//! Resolve a user-supplied target (path or URL) into a repository coordinate.

use std::path::Path;

use tracing::debug;

use super::local::LocalRepo;
use crate::error::{GlanceError, Result};

const PREFERRED_REMOTE: &str = "origin";

/// Where the dashboard points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub owner: String,
    pub name: String,

    /// Present when the target is a local working copy
    pub local: Option<LocalRepo>,
}

impl Target {
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.name)
    }
}

fn looks_like_url(arg: &str) -> bool {
    arg.contains("://") || scp_parts(arg).is_some()
}

/// `git@host:owner/name.git` style remotes
fn scp_parts(arg: &str) -> Option<(&str, &str)> {
    let (user_host, path) = arg.split_once(':')?;
    let (_, host) = user_host.split_once('@')?;
    if host.is_empty() || host.contains('/') || path.starts_with("//") {
        return None;
    }
    Some((host, path))
}

fn split_path(host: &str, path: &str, original: &str) -> Result<Target> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, name) = path
        .rsplit_once('/')
        .ok_or_else(|| GlanceError::InvalidTarget(original.to_string()))?;
    if host.is_empty() || owner.is_empty() || name.is_empty() {
        return Err(GlanceError::InvalidTarget(original.to_string()));
    }

    Ok(Target {
        host: host.to_lowercase(),
        owner: owner.to_string(),
        name: name.to_string(),
        local: None,
    })
}

/// Parse a remote URL into (host, owner, name).
///
/// Accepts `https://host/owner/name`, `ssh://git@host/owner/name.git` and
/// `git@host:owner/name.git`. Owners may span several path segments
/// (nested groups); the final segment is always the repository name.
pub fn parse_remote_url(raw: &str) -> Result<Target> {
    let raw = raw.trim();
    if !raw.contains("://") {
        if let Some((host, path)) = scp_parts(raw) {
            return split_path(host, path, raw);
        }
    }

    let url = url::Url::parse(raw).map_err(|_| GlanceError::InvalidTarget(raw.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| GlanceError::InvalidTarget(raw.to_string()))?;
    split_path(host, url.path(), raw)
}

/// Resolve a path or URL argument.
///
/// Paths are discovered upwards to the enclosing working copy, whose
/// `origin` remote (or, lacking one, its first remote) names the repository.
pub fn resolve_target(arg: &str) -> Result<Target> {
    if looks_like_url(arg) {
        return parse_remote_url(arg);
    }

    let repo = git2::Repository::discover(Path::new(arg))
        .map_err(|e| GlanceError::InvalidTarget(format!("{}: {}", arg, e.message())))?;
    let remotes = repo.remotes()?;
    let remote_name = if remotes.iter().flatten().any(|r| r == PREFERRED_REMOTE) {
        PREFERRED_REMOTE.to_string()
    } else {
        remotes
            .iter()
            .flatten()
            .next()
            .map(str::to_string)
            .ok_or_else(|| {
                GlanceError::InvalidTarget(format!("{}: repository has no remotes", arg))
            })?
    };

    let remote = repo.find_remote(&remote_name)?;
    let remote_url = remote.url().ok_or_else(|| {
        GlanceError::InvalidTarget(format!("{}: remote {} has no URL", arg, remote_name))
    })?;
    debug!(remote = %remote_name, url = %remote_url, "resolved local remote");

    let workdir = repo
        .workdir()
        .unwrap_or_else(|| repo.path())
        .to_path_buf();
    let mut target = parse_remote_url(remote_url)?;
    target.local = Some(LocalRepo {
        path: workdir,
        remote: remote_name,
    });
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_https_url() {
        let t = parse_remote_url("https://github.com/octo/demo").unwrap();
        assert_eq!(t.host, "github.com");
        assert_eq!(t.owner, "octo");
        assert_eq!(t.name, "demo");
        assert!(t.local.is_none());
        assert_eq!(t.web_url(), "https://github.com/octo/demo");
    }

    #[test]
    fn test_parse_git_suffix_and_trailing_slash() {
        let t = parse_remote_url("https://GitHub.com/octo/demo.git/").unwrap();
        assert_eq!(t.host, "github.com");
        assert_eq!(t.name, "demo");
    }

    #[test]
    fn test_parse_ssh_urls() {
        let t = parse_remote_url("git@github.com:octo/demo.git").unwrap();
        assert_eq!(
            (t.host.as_str(), t.owner.as_str(), t.name.as_str()),
            ("github.com", "octo", "demo")
        );

        let t = parse_remote_url("ssh://git@gitlab.com/group/sub/project.git").unwrap();
        assert_eq!(t.host, "gitlab.com");
        assert_eq!(t.owner, "group/sub");
        assert_eq!(t.name, "project");
    }

    #[test]
    fn test_parse_rejects_incomplete_urls() {
        assert!(parse_remote_url("https://github.com/octo").is_err());
        assert!(parse_remote_url("https://github.com/").is_err());
        assert!(parse_remote_url("not a url").is_err());
    }

    #[test]
    fn test_url_detection() {
        assert!(looks_like_url("https://github.com/a/b"));
        assert!(looks_like_url("git@github.com:a/b.git"));
        assert!(!looks_like_url("."));
        assert!(!looks_like_url("../some/path"));
    }

    #[test]
    fn test_resolve_local_repository_prefers_origin() {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        repo.remote("upstream", "https://gitlab.com/other/fork.git").unwrap();
        repo.remote("origin", "git@github.com:octo/demo.git").unwrap();

        let nested = dir.path().join("src");
        std::fs::create_dir_all(&nested).unwrap();
        let target = resolve_target(nested.to_str().unwrap()).unwrap();

        assert_eq!(target.host, "github.com");
        assert_eq!(target.owner, "octo");
        assert_eq!(target.name, "demo");
        let local = target.local.unwrap();
        assert_eq!(local.remote, "origin");
    }

    #[test]
    fn test_resolve_local_repository_without_remotes_fails() {
        let dir = TempDir::new().unwrap();
        git2::Repository::init(dir.path()).unwrap();

        let err = resolve_target(dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, GlanceError::InvalidTarget(_)));
    }

    #[test]
    fn test_resolve_plain_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = resolve_target(dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, GlanceError::InvalidTarget(_)));
    }
}
