use chrono::{DateTime, Utc};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span, Text};

use super::{Formatter, cap, id_width, pad_left, pad_right, pluralize, title_width};
use crate::model::{Issue, Label, PullRequest};

/// One row of an issue-like listing
struct Row<'r> {
    id: u64,
    title: &'r str,
    created_at: DateTime<Utc>,
    labels: &'r [Label],
    muted: bool,
}

impl Formatter<'_> {
    /// `🐛 N open issues` followed by at most `max` rows
    pub fn issues(&self, issues: &[Issue], max: usize) -> Text<'static> {
        let mut lines = self.header(
            "🐛",
            pluralize(issues.len(), "open issue", "open issues"),
            self.theme.header_issues,
        );
        let rows: Vec<Row<'_>> = cap(issues, max)
            .iter()
            .map(|i| Row {
                id: i.id,
                title: &i.title,
                created_at: i.created_at,
                labels: &i.labels,
                muted: false,
            })
            .collect();
        lines.extend(self.rows(&rows));
        Text::from(lines)
    }

    /// `🌳 N open pull requests`; drafts are rendered muted
    pub fn pull_requests(&self, prs: &[PullRequest], max: usize) -> Text<'static> {
        let mut lines = self.header(
            "🌳",
            pluralize(prs.len(), "open pull request", "open pull requests"),
            self.theme.header_pull_requests,
        );
        let rows: Vec<Row<'_>> = cap(prs, max)
            .iter()
            .map(|p| Row {
                id: p.id,
                title: &p.title,
                created_at: p.created_at,
                labels: &p.labels,
                muted: p.draft,
            })
            .collect();
        lines.extend(self.rows(&rows));
        Text::from(lines)
    }

    fn rows(&self, rows: &[Row<'_>]) -> Vec<Line<'static>> {
        let width = id_width(rows.iter().map(|r| r.id.to_string()));
        let title_cols = title_width(width);

        rows.iter()
            .map(|row| {
                let title_style = if row.muted {
                    self.theme.muted_style()
                } else {
                    self.theme.fg(self.theme.title)
                };

                let mut spans = vec![
                    Span::styled(
                        pad_left(&row.id.to_string(), width),
                        self.theme.fg(self.theme.id).add_modifier(Modifier::BOLD),
                    ),
                    self.gap(),
                    Span::styled(pad_right(row.title, title_cols), title_style),
                    self.gap(),
                    self.age_span(row.created_at),
                ];
                for label in row.labels {
                    spans.push(self.gap());
                    spans.push(Span::styled(
                        label.name.clone(),
                        self.theme.label_style(label.rgb()),
                    ));
                }
                Line::from(spans)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{AGE_WIDTH, ELLIPSIS, ROW_WIDTH, line_text, text_width};
    use crate::tui::theme::Theme;
    use chrono::Duration;

    fn issue(id: u64, title: &str, now: DateTime<Utc>) -> Issue {
        Issue {
            id,
            title: title.to_string(),
            created_at: now - Duration::days(2),
            labels: Vec::new(),
        }
    }

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines.iter().map(line_text).collect()
    }

    #[test]
    fn test_header_counts_all_items_rows_are_capped() {
        let theme = Theme::default();
        let now = Utc::now();
        let f = Formatter::new(&theme, now);
        let issues: Vec<Issue> = (1..=5).map(|i| issue(i, "Title", now)).collect();

        let out = plain(&f.issues(&issues, 3));

        assert_eq!(out[0], "");
        assert_eq!(out[1], "🐛 5 open issues");
        assert_eq!(out.len(), 2 + 3);
    }

    #[test]
    fn test_singular_header() {
        let theme = Theme::default();
        let now = Utc::now();
        let f = Formatter::new(&theme, now);

        let out = plain(&f.issues(&[issue(7, "Only one", now)], 10));
        assert_eq!(out[1], "🐛 1 open issue");

        let out = plain(&f.issues(&[], 10));
        assert_eq!(out[1], "🐛 0 open issues");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_id_width_follows_capped_rows() {
        let theme = Theme::default();
        let now = Utc::now();
        let f = Formatter::new(&theme, now);
        let issues = vec![issue(3, "a", now), issue(42, "b", now), issue(128, "c", now)];

        // Only 3 and 42 are shown, so ids align to two columns
        let out = plain(&f.issues(&issues, 2));
        assert!(out[2].starts_with(" 3 a"));
        assert!(out[3].starts_with("42 b"));

        // Uncapped, 128 widens the column to three
        let out = plain(&f.issues(&issues, 0));
        assert!(out[2].starts_with("  3 a"));
        assert!(out[3].starts_with(" 42 b"));
        assert!(out[4].starts_with("128 c"));
    }

    #[test]
    fn test_row_fills_budget_and_truncates_title() {
        let theme = Theme::default();
        let now = Utc::now();
        let f = Formatter::new(&theme, now);
        let long = "x".repeat(200);

        let out = plain(&f.issues(&[issue(1, &long, now), issue(2, "short", now)], 10));

        assert_eq!(text_width(&out[2]), ROW_WIDTH);
        assert_eq!(text_width(&out[3]), ROW_WIDTH);
        assert!(out[2].contains(ELLIPSIS));
        assert!(!out[3].contains(ELLIPSIS));
        assert!(out[3].ends_with(&format!("{:>width$}", "2d ago", width = AGE_WIDTH)));
    }

    #[test]
    fn test_wide_title_stays_within_row() {
        let theme = Theme::default();
        let now = Utc::now();
        let f = Formatter::new(&theme, now);
        let wide = "修正".repeat(60);

        let out = plain(&f.issues(&[issue(1, &wide, now), issue(2, "修正", now)], 10));

        assert_eq!(text_width(&out[2]), ROW_WIDTH);
        assert_eq!(text_width(&out[3]), ROW_WIDTH);
        assert!(out[2].contains(ELLIPSIS));
    }

    #[test]
    fn test_labels_follow_age() {
        let theme = Theme::default();
        let now = Utc::now();
        let f = Formatter::new(&theme, now);
        let mut i = issue(1, "Crash", now);
        i.labels = vec![Label::new("bug", "d73a4a"), Label::new("help wanted", "")];

        let out = plain(&f.issues(&[i], 10));
        assert!(out[2].ends_with("2d ago bug help wanted"));
    }

    #[test]
    fn test_pull_request_header() {
        let theme = Theme::default();
        let now = Utc::now();
        let f = Formatter::new(&theme, now);
        let pr = PullRequest {
            id: 12,
            title: "Add feature".to_string(),
            created_at: now,
            labels: Vec::new(),
            head: "feature".to_string(),
            base: "main".to_string(),
            draft: true,
        };

        let text = f.pull_requests(&[pr.clone(), pr], 10);
        let out = plain(&text);
        assert_eq!(out[1], "🌳 2 open pull requests");
        assert!(out[2].starts_with("12 Add feature"));
        assert_eq!(text.lines[2].spans[2].style.fg, Some(theme.text_muted));
    }
}
