//! Local working-copy inspection.

use std::path::PathBuf;

use git2::{BranchType, ErrorCode, Repository};
use tracing::debug;

use crate::error::Result;
use crate::model::{Branch, TrackStat, TrackStats};

/// Handle to a local clone: its working directory and the remote that
/// corresponds to the dashboard's repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepo {
    pub path: PathBuf,
    pub remote: String,
}

/// Computes ahead/behind counts for branches in a local clone
pub trait TrackInspector: Send + Sync {
    fn branch_track_stats(&self, repo: &LocalRepo, branches: &[Branch]) -> Result<TrackStats>;
}

/// [`TrackInspector`] backed by libgit2
#[derive(Debug, Clone, Copy, Default)]
pub struct GitInspector;

fn find_branch<'r>(
    repo: &'r Repository,
    name: &str,
    kind: BranchType,
) -> Result<Option<git2::Branch<'r>>> {
    match repo.find_branch(name, kind) {
        Ok(b) => Ok(Some(b)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl TrackInspector for GitInspector {
    /// Compares `refs/heads/<b>` with `refs/remotes/<remote>/<b>`. Branches
    /// missing on either side get no entry.
    fn branch_track_stats(&self, local: &LocalRepo, branches: &[Branch]) -> Result<TrackStats> {
        let repo = Repository::open(&local.path)?;
        let mut stats = TrackStats::new();

        for branch in branches {
            let upstream_name = format!("{}/{}", local.remote, branch.name);
            let Some(head) = find_branch(&repo, &branch.name, BranchType::Local)? else {
                continue;
            };
            let Some(upstream) = find_branch(&repo, &upstream_name, BranchType::Remote)? else {
                continue;
            };
            let (Some(head_oid), Some(upstream_oid)) = (head.get().target(), upstream.get().target())
            else {
                continue;
            };

            let (ahead, behind) = repo.graph_ahead_behind(head_oid, upstream_oid)?;
            stats.insert(
                branch.name.clone(),
                TrackStat {
                    ahead,
                    behind,
                    upstream: upstream_name,
                },
            );
        }

        debug!(path = %local.path.display(), tracked = stats.len(), "computed track stats");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Commit;
    use chrono::Utc;
    use git2::{Oid, Signature};
    use tempfile::TempDir;

    fn commit_on(repo: &Repository, parent: Option<Oid>, message: &str) -> Oid {
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit<'_>> =
            parent.into_iter().map(|p| repo.find_commit(p).unwrap()).collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
        repo.commit(None, &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    fn branch(name: &str) -> Branch {
        Branch {
            name: name.to_string(),
            last_commit: Commit {
                id: String::new(),
                message: String::new(),
                author: String::new(),
                timestamp: Utc::now(),
            },
        }
    }

    /// main: base <- local1 <- local2; origin/main: base <- remote1
    fn diverged_repo() -> (TempDir, LocalRepo) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let base = commit_on(&repo, None, "base");
        let local1 = commit_on(&repo, Some(base), "local 1");
        let local2 = commit_on(&repo, Some(local1), "local 2");
        let remote1 = commit_on(&repo, Some(base), "remote 1");

        repo.reference("refs/heads/main", local2, true, "test").unwrap();
        repo.reference("refs/remotes/origin/main", remote1, true, "test")
            .unwrap();
        repo.reference("refs/heads/only-local", base, true, "test")
            .unwrap();

        let local = LocalRepo {
            path: dir.path().to_path_buf(),
            remote: "origin".to_string(),
        };
        (dir, local)
    }

    #[test]
    fn test_ahead_behind_counts() {
        let (_dir, local) = diverged_repo();

        let stats = GitInspector
            .branch_track_stats(&local, &[branch("main")])
            .unwrap();

        let main = &stats["main"];
        assert_eq!(main.ahead, 2);
        assert_eq!(main.behind, 1);
        assert_eq!(main.upstream, "origin/main");
    }

    #[test]
    fn test_branches_missing_locally_or_remotely_are_skipped() {
        let (_dir, local) = diverged_repo();

        let stats = GitInspector
            .branch_track_stats(
                &local,
                &[branch("main"), branch("only-local"), branch("only-remote")],
            )
            .unwrap();

        assert_eq!(stats.len(), 1);
        assert!(stats.contains_key("main"));
    }

    #[test]
    fn test_not_a_repository_is_an_error() {
        let dir = TempDir::new().unwrap();
        let local = LocalRepo {
            path: dir.path().to_path_buf(),
            remote: "origin".to_string(),
        };

        assert!(
            GitInspector
                .branch_track_stats(&local, &[branch("main")])
                .is_err()
        );
    }
}
