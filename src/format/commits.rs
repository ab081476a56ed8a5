use ratatui::text::{Line, Span, Text};

use super::{Formatter, cap, id_width, pad_left, pad_right, pluralize, title_width};
use crate::model::{Commit, Repo};

impl Formatter<'_> {
    /// `🔥 N commits since <tag>`, or `N recent commits` without a release
    pub fn commits(&self, repo: &Repo, max: usize) -> Text<'static> {
        let header = match &repo.last_release {
            Some(release) => format!(
                "{} since {}",
                pluralize(repo.commits.len(), "commit", "commits"),
                release.tag
            ),
            None => pluralize(repo.commits.len(), "recent commit", "recent commits"),
        };
        let mut lines = self.header("🔥", header, self.theme.header_commits);
        lines.extend(self.commit_rows(cap(&repo.commits, max), ""));
        Text::from(lines)
    }

    pub(super) fn commit_rows(&self, commits: &[Commit], indent: &str) -> Vec<Line<'static>> {
        let width = id_width(commits.iter().map(|c| c.short_id()));
        let title_cols = title_width(width + indent.len());

        commits
            .iter()
            .map(|commit| {
                let mut spans = Vec::with_capacity(8);
                if !indent.is_empty() {
                    spans.push(Span::raw(indent.to_string()));
                }
                spans.push(Span::styled(
                    pad_left(commit.short_id(), width),
                    self.theme.fg(self.theme.id),
                ));
                spans.push(self.gap());
                spans.push(Span::styled(
                    pad_right(commit.summary(), title_cols),
                    self.theme.fg(self.theme.title),
                ));
                spans.push(self.gap());
                spans.push(self.age_span(commit.timestamp));
                if !commit.author.is_empty() {
                    spans.push(self.gap());
                    spans.push(Span::styled(
                        commit.author.clone(),
                        self.theme.fg(self.theme.author),
                    ));
                }
                Line::from(spans)
            })
            .collect()
    }
}
