use ratatui::text::{Line, Span, Text};

use super::{Formatter, cap, id_width, pad_left, pad_right, pluralize, text_width, title_width};
use crate::model::{Branch, TrackStat, TrackStats};

/// Widest branch name column before names get truncated
const MAX_NAME_WIDTH: usize = 32;

fn stat_text(stat: &TrackStat) -> (String, String) {
    (format!("↑{}", stat.ahead), format!("↓{}", stat.behind))
}

impl Formatter<'_> {
    /// `🌿 N active branches`, each row showing track stats when known
    pub fn branches(&self, branches: &[Branch], stats: &TrackStats, max: usize) -> Text<'static> {
        let mut lines = self.header(
            "🌿",
            pluralize(branches.len(), "active branch", "active branches"),
            self.theme.header_branches,
        );

        let shown = cap(branches, max);
        let name_cols = id_width(shown.iter().map(|b| b.name.as_str())).min(MAX_NAME_WIDTH);
        let stat_cols = shown
            .iter()
            .filter_map(|b| stats.get(&b.name))
            .map(|s| {
                let (ahead, behind) = stat_text(s);
                text_width(&ahead) + 1 + text_width(&behind)
            })
            .max()
            .unwrap_or(0);
        let title_cols = title_width(name_cols);

        for branch in shown {
            let mut spans = vec![
                Span::styled(
                    pad_left(&branch.name, name_cols),
                    self.theme.fg(self.theme.id),
                ),
                self.gap(),
            ];

            let mut summary_cols = title_cols;
            if stat_cols > 0 {
                match stats.get(&branch.name) {
                    Some(stat) => {
                        let (ahead, behind) = stat_text(stat);
                        let used = text_width(&ahead) + 1 + text_width(&behind);
                        spans.push(Span::raw(" ".repeat(stat_cols - used)));
                        let (ahead_style, behind_style) = if stat.is_in_sync() {
                            (self.theme.muted_style(), self.theme.muted_style())
                        } else {
                            (self.theme.fg(self.theme.ahead), self.theme.fg(self.theme.behind))
                        };
                        spans.push(Span::styled(ahead, ahead_style));
                        spans.push(self.gap());
                        spans.push(Span::styled(behind, behind_style));
                    }
                    None => spans.push(Span::raw(" ".repeat(stat_cols))),
                }
                spans.push(self.gap());
                summary_cols = summary_cols.saturating_sub(stat_cols + 1);
            }

            spans.push(Span::styled(
                pad_right(branch.last_commit.summary(), summary_cols),
                self.theme.muted_style(),
            ));
            spans.push(self.gap());
            spans.push(self.age_span(branch.last_activity()));
            lines.push(Line::from(spans));
        }

        Text::from(lines)
    }
}
