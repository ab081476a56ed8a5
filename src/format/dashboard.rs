use ratatui::text::{Line, Span, Text};

use super::Formatter;
use crate::aggregate::{Dashboard, Limits};

/// Render every section in fixed order: issues, pull requests, branches, commits
pub fn render_dashboard(dashboard: &Dashboard, limits: &Limits, f: &Formatter<'_>) -> Text<'static> {
    let theme = f.theme();
    let mut lines = vec![Line::from(vec![
        Span::styled("🏠 Repository ", theme.fg(theme.tooltip)),
        Span::styled(dashboard.url.clone(), theme.fg(theme.link)),
    ])];

    let sections = [
        f.issues(&dashboard.issues, limits.max_issues),
        f.pull_requests(&dashboard.pull_requests, limits.max_pull_requests),
        f.branches(&dashboard.branches, &dashboard.track_stats, limits.max_branches),
        f.commits(&dashboard.repo, limits.max_commits),
    ];
    for section in sections {
        lines.extend(section.lines);
    }

    Text::from(lines)
}
