use ratatui::text::{Line, Span, Text};

use super::{Formatter, cap, id_width, pad_right, pluralize};
use crate::model::Repo;

const MAX_NAME_WIDTH: usize = 32;
const MAX_TAG_WIDTH: usize = 16;

/// How the all-projects report treats each repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseOptions {
    pub max_commits: usize,
    pub min_new_commits: usize,
    pub skip_stale_repos: bool,
    pub with_commits: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            max_commits: 10,
            min_new_commits: 1,
            skip_stale_repos: true,
            with_commits: false,
        }
    }
}

impl ReleaseOptions {
    /// Whether a repository has too little activity since its release to report
    pub fn is_stale(&self, repo: &Repo) -> bool {
        self.skip_stale_repos && repo.commits.len() < self.min_new_commits
    }
}

impl Formatter<'_> {
    /// Release summary for repositories already sorted for display
    pub fn releases(&self, repos: &[Repo], opts: &ReleaseOptions) -> Text<'static> {
        let mut lines = vec![Line::from(Span::styled(
            format!(
                "{}:",
                pluralize(
                    repos.len(),
                    "repository with a release",
                    "repositories with a release"
                )
            ),
            self.theme.header_style(self.theme.header_releases),
        ))];

        let shown: Vec<&Repo> = repos.iter().filter(|r| !opts.is_stale(r)).collect();
        let name_cols = id_width(shown.iter().map(|r| r.name.as_str())).min(MAX_NAME_WIDTH);
        let tag_cols = id_width(
            shown
                .iter()
                .filter_map(|r| r.last_release.as_ref().map(|l| l.tag.as_str())),
        )
        .min(MAX_TAG_WIDTH);

        for repo in shown {
            let Some(release) = &repo.last_release else {
                continue;
            };

            let mut spans = vec![
                Span::styled("🔖 ", self.theme.fg(self.theme.header_releases)),
                Span::styled(pad_right(&repo.name, name_cols), self.theme.fg(self.theme.link)),
                self.gap(),
                Span::styled(
                    pad_right(&release.tag, tag_cols),
                    self.theme.fg(self.theme.release_tag),
                ),
                self.gap(),
                self.age_span(release.published_at),
                self.gap(),
            ];
            if repo.commits.is_empty() {
                spans.push(Span::styled("no new commits", self.theme.muted_style()));
            } else {
                spans.push(Span::styled(
                    pluralize(repo.commits.len(), "new commit", "new commits"),
                    self.theme.fg(self.theme.new_commits),
                ));
            }
            lines.push(Line::from(spans));

            if opts.with_commits {
                lines.extend(self.commit_rows(cap(&repo.commits, opts.max_commits), "   "));
            }
        }

        Text::from(lines)
    }
}
