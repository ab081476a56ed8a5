//! Presentation formatter.
//!
//! Turns fetched collections into aligned, truncated and styled text blocks.
//! Every function here is a pure function of its inputs: the collection, a
//! display cap, the [`Theme`] and the reference time used for relative ages.
//!
//! Rows share one layout on an 80-column budget:
//!
//! ```text
//! <id, right-aligned> <title, truncated + padded> <age, 8 wide> <extras>
//! ```
//!
//! Header counts report the full (uncapped) collection, the id column width
//! is computed over the capped rows only, and capping is silent.

pub mod ansi;
mod branches;
mod commits;
mod dashboard;
mod issues;
mod releases;

pub use dashboard::render_dashboard;
pub use releases::ReleaseOptions;

use chrono::{DateTime, Utc};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::theme::Theme;

/// Total width of a row, excluding trailing extras such as labels
pub const ROW_WIDTH: usize = 80;

/// Width of the relative-age column
pub const AGE_WIDTH: usize = 8;

/// Appended to truncated text
pub const ELLIPSIS: &str = "…";

/// Formats collections against a fixed theme and reference time
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    theme: &'a Theme,
    now: DateTime<Utc>,
}

impl<'a> Formatter<'a> {
    pub fn new(theme: &'a Theme, now: DateTime<Utc>) -> Self {
        Self { theme, now }
    }

    pub fn theme(&self) -> &Theme {
        self.theme
    }

    /// Section header: blank spacer line, then `<glyph> <text>`
    fn header(&self, glyph: &str, text: String, color: ratatui::style::Color) -> Vec<Line<'static>> {
        vec![
            Line::default(),
            Line::from(Span::styled(
                format!("{} {}", glyph, text),
                self.theme.header_style(color),
            )),
        ]
    }

    fn age_span(&self, at: DateTime<Utc>) -> Span<'static> {
        Span::styled(
            pad_left(&ago(at, self.now), AGE_WIDTH),
            self.theme.fg(self.theme.age),
        )
    }

    fn gap(&self) -> Span<'static> {
        Span::styled(" ", self.theme.fg(self.theme.separator))
    }
}

/// `1 open issue`, `0 open issues`, `5 open issues`
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Cap a collection for display. A cap of 0 disables capping.
pub fn cap<T>(items: &[T], max: usize) -> &[T] {
    if max > 0 && items.len() > max {
        &items[..max]
    } else {
        items
    }
}

/// Terminal columns taken by `s`; wide CJK and emoji count as two
pub fn text_width(s: &str) -> usize {
    s.width()
}

/// Cut `s` to at most `width` columns, ending in [`ELLIPSIS`] when cut.
///
/// A wide character that would straddle the limit is dropped, so the result
/// can come out one column short.
pub fn truncate(s: &str, width: usize) -> String {
    if text_width(s) <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let budget = width.saturating_sub(ELLIPSIS.width());
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let cols = c.width().unwrap_or(0);
        if used + cols > budget {
            break;
        }
        used += cols;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

/// Left-align `s` in a column of `width`, truncating when too long
pub fn pad_right(s: &str, width: usize) -> String {
    let cut = truncate(s, width);
    let fill = width.saturating_sub(text_width(&cut));
    format!("{}{}", cut, " ".repeat(fill))
}

/// Right-align `s` in a column of `width`, truncating when too long
pub fn pad_left(s: &str, width: usize) -> String {
    let cut = truncate(s, width);
    let fill = width.saturating_sub(text_width(&cut));
    format!("{}{}", " ".repeat(fill), cut)
}

/// Widest rendering among `ids`
pub fn id_width<I, S>(ids: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| text_width(id.as_ref()))
        .max()
        .unwrap_or(0)
}

/// Title column width left over once the id and age columns are placed
pub fn title_width(id_width: usize) -> usize {
    ROW_WIDTH.saturating_sub(id_width + 1 + 1 + AGE_WIDTH)
}

/// Compact relative age, at most [`AGE_WIDTH`] characters
pub fn ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "now".to_string()
    } else if hours < 1 {
        format!("{}m ago", minutes)
    } else if days < 1 {
        format!("{}h ago", hours)
    } else if days < 14 {
        format!("{}d ago", days)
    } else if days < 63 {
        format!("{}w ago", days / 7)
    } else if days < 365 {
        format!("{}mo ago", (days / 30).min(11))
    } else {
        format!("{}y ago", (days / 365).min(99))
    }
}

/// Plain text of a line, without styling
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "open issue", "open issues"), "1 open issue");
        assert_eq!(pluralize(0, "open issue", "open issues"), "0 open issues");
        assert_eq!(pluralize(5, "open issue", "open issues"), "5 open issues");
    }

    #[test]
    fn test_cap() {
        let items = [1, 2, 3];
        assert_eq!(cap(&items, 2), &[1, 2]);
        assert_eq!(cap(&items, 3), &[1, 2, 3]);
        assert_eq!(cap(&items, 10), &[1, 2, 3]);
        assert_eq!(cap(&items, 0), &[1, 2, 3]);
    }

    #[test]
    fn test_truncate_long_title() {
        let cut = truncate("Fix the flaky integration test", 10);
        assert_eq!(cut, "Fix the f…");
        assert_eq!(text_width(&cut), 10);
    }

    #[test]
    fn test_truncate_is_noop_at_or_under_width() {
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("short", 10), "short");
        let once = truncate("a much longer title than fits", 12);
        assert_eq!(truncate(&once, 12), once);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("größer", 6), "größer");
        assert_eq!(truncate("größer als", 6), "größe…");
        assert_eq!(truncate("anything", 0), "");
    }

    #[test]
    fn test_wide_characters_take_two_columns() {
        assert_eq!(text_width("修正"), 4);
        assert_eq!(text_width("🐛 bug"), 6);

        let cut = truncate("修正修正修正", 7);
        assert_eq!(cut, "修正修…");
        assert_eq!(text_width(&cut), 7);

        // No room for a third wide character plus the ellipsis
        let cut = truncate("修正修正", 6);
        assert_eq!(cut, "修正…");
        assert_eq!(text_width(&pad_right("修正修正", 6)), 6);
    }

    #[test]
    fn test_padding() {
        assert_eq!(pad_left("42", 4), "  42");
        assert_eq!(pad_right("42", 4), "42  ");
        assert_eq!(pad_left("12345", 3), "12…");
    }

    #[test]
    fn test_id_width() {
        assert_eq!(id_width(["3", "42", "128"]), 3);
        assert_eq!(id_width(Vec::<String>::new()), 0);
    }

    #[test]
    fn test_title_width_fills_row() {
        assert_eq!(title_width(3) + 3 + 2 + AGE_WIDTH, ROW_WIDTH);
    }

    #[test]
    fn test_ago() {
        let now = Utc::now();
        assert_eq!(ago(now, now), "now");
        assert_eq!(ago(now + Duration::minutes(5), now), "now");
        assert_eq!(ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(ago(now - Duration::days(13), now), "13d ago");
        assert_eq!(ago(now - Duration::days(21), now), "3w ago");
        assert_eq!(ago(now - Duration::days(200), now), "6mo ago");
        assert_eq!(ago(now - Duration::days(364), now), "11mo ago");
        assert_eq!(ago(now - Duration::days(800), now), "2y ago");
    }

    #[test]
    fn test_ago_fits_column() {
        let now = Utc::now();
        for days in [0, 1, 13, 14, 62, 63, 300, 364, 365, 5000, 100_000] {
            let s = ago(now - Duration::days(days), now);
            assert!(text_width(&s) <= AGE_WIDTH, "{} too wide", s);
        }
    }
}
