//! Central theme configuration for the dashboard.
//!
//! All colors used by the formatter and the viewer are defined here. A theme
//! is built once at startup and passed by reference into formatting calls; it
//! is never mutated afterwards.

use clap::ValueEnum;
use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // General text
    pub text: Color,
    pub text_muted: Color,
    pub separator: Color,

    // Repository banner
    pub tooltip: Color,
    pub link: Color,

    // Section headers
    pub header_issues: Color,
    pub header_pull_requests: Color,
    pub header_branches: Color,
    pub header_commits: Color,
    pub header_releases: Color,

    // Columns
    pub id: Color,
    pub title: Color,
    pub age: Color,
    pub author: Color,
    pub label_fallback: Color,

    // Branch tracking
    pub ahead: Color,
    pub behind: Color,

    // Releases
    pub release_tag: Color,
    pub new_commits: Color,

    // Viewer chrome
    pub border: Color,
    pub footer: (Color, Color), // (bg, fg)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl Default for Theme {
    fn default() -> Self {
        // Monokai color scheme
        Self {
            text: Color::Rgb(248, 248, 242),
            text_muted: Color::Rgb(117, 113, 94),
            separator: Color::Rgb(117, 113, 94),

            tooltip: Color::Rgb(117, 113, 94),
            link: Color::Rgb(102, 217, 239), // Monokai blue

            header_issues: Color::Rgb(249, 38, 114), // Monokai pink
            header_pull_requests: Color::Rgb(174, 129, 255), // Monokai purple
            header_branches: Color::Rgb(166, 226, 46), // Monokai green
            header_commits: Color::Rgb(253, 151, 31), // Monokai orange
            header_releases: Color::Rgb(230, 219, 116), // Monokai yellow

            id: Color::Rgb(102, 217, 239),
            title: Color::Rgb(248, 248, 242),
            age: Color::Rgb(166, 226, 46),
            author: Color::Rgb(117, 113, 94),
            label_fallback: Color::Rgb(174, 129, 255),

            ahead: Color::Rgb(166, 226, 46),
            behind: Color::Rgb(249, 38, 114),

            release_tag: Color::Rgb(230, 219, 116),
            new_commits: Color::Rgb(253, 151, 31),

            border: Color::Rgb(117, 113, 94),
            footer: (Color::Rgb(102, 217, 239), Color::Rgb(39, 40, 34)),
        }
    }
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::default(),
            ThemeVariant::Light => Self::light(),
        }
    }

    /// Darker foregrounds for terminals with a light background
    pub fn light() -> Self {
        Self {
            text: Color::Rgb(39, 40, 34),
            text_muted: Color::Rgb(110, 110, 110),
            separator: Color::Rgb(110, 110, 110),

            tooltip: Color::Rgb(110, 110, 110),
            link: Color::Rgb(0, 110, 160),

            header_issues: Color::Rgb(190, 20, 90),
            header_pull_requests: Color::Rgb(110, 70, 190),
            header_branches: Color::Rgb(60, 130, 20),
            header_commits: Color::Rgb(190, 100, 0),
            header_releases: Color::Rgb(140, 120, 0),

            id: Color::Rgb(0, 110, 160),
            title: Color::Rgb(39, 40, 34),
            age: Color::Rgb(60, 130, 20),
            author: Color::Rgb(110, 110, 110),
            label_fallback: Color::Rgb(110, 70, 190),

            ahead: Color::Rgb(60, 130, 20),
            behind: Color::Rgb(190, 20, 90),

            release_tag: Color::Rgb(140, 120, 0),
            new_commits: Color::Rgb(190, 100, 0),

            border: Color::Rgb(110, 110, 110),
            footer: (Color::Rgb(0, 110, 160), Color::Rgb(248, 248, 242)),
        }
    }

    // Style builders

    pub fn fg(&self, color: Color) -> Style {
        Style::default().fg(color)
    }

    pub fn header_style(&self, color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Label color from the provider, or the theme's fallback
    pub fn label_style(&self, rgb: Option<(u8, u8, u8)>) -> Style {
        match rgb {
            Some((r, g, b)) => Style::default().fg(Color::Rgb(r, g, b)),
            None => Style::default().fg(self.label_fallback),
        }
    }

    pub fn footer_style(&self) -> Style {
        let (bg, fg) = self.footer;
        Style::default().bg(bg).fg(fg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }
}
