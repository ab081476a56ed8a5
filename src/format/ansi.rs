//! Render styled text for plain terminal output.

use colored::{ColoredString, Colorize};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Text};

/// Convert ratatui::Color to colored::Color
pub fn convert_color(color: Color) -> Option<colored::Color> {
    let converted = match color {
        Color::Reset => return None,
        Color::Black => colored::Color::Black,
        Color::Red => colored::Color::Red,
        Color::Green => colored::Color::Green,
        Color::Yellow => colored::Color::Yellow,
        Color::Blue => colored::Color::Blue,
        Color::Magenta => colored::Color::Magenta,
        Color::Cyan => colored::Color::Cyan,
        Color::Gray => colored::Color::White,
        Color::DarkGray => colored::Color::BrightBlack,
        Color::LightRed => colored::Color::BrightRed,
        Color::LightGreen => colored::Color::BrightGreen,
        Color::LightYellow => colored::Color::BrightYellow,
        Color::LightBlue => colored::Color::BrightBlue,
        Color::LightMagenta => colored::Color::BrightMagenta,
        Color::LightCyan => colored::Color::BrightCyan,
        Color::White => colored::Color::BrightWhite,
        Color::Rgb(r, g, b) => colored::Color::TrueColor { r, g, b },
        Color::Indexed(i) => {
            let (r, g, b) = indexed_to_rgb(i);
            colored::Color::TrueColor { r, g, b }
        }
    };
    Some(converted)
}

/// Approximate an xterm 256-color palette entry
fn indexed_to_rgb(i: u8) -> (u8, u8, u8) {
    const BASE: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (128, 0, 0),
        (0, 128, 0),
        (128, 128, 0),
        (0, 0, 128),
        (128, 0, 128),
        (0, 128, 128),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (0, 0, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];
    match i {
        0..=15 => BASE[i as usize],
        16..=231 => {
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            let n = i - 16;
            (level(n / 36), level((n / 6) % 6), level(n % 6))
        }
        _ => {
            let v = 8 + (i - 232) * 10;
            (v, v, v)
        }
    }
}

fn apply_style(content: &str, style: Style) -> ColoredString {
    let mut out = ColoredString::from(content);
    if let Some(fg) = style.fg.and_then(convert_color) {
        out = out.color(fg);
    }
    if let Some(bg) = style.bg.and_then(convert_color) {
        out = out.on_color(bg);
    }
    if style.add_modifier.contains(Modifier::BOLD) {
        out = out.bold();
    }
    if style.add_modifier.contains(Modifier::DIM) {
        out = out.dimmed();
    }
    if style.add_modifier.contains(Modifier::ITALIC) {
        out = out.italic();
    }
    if style.add_modifier.contains(Modifier::UNDERLINED) {
        out = out.underline();
    }
    out
}

fn render_span(span: &Span<'_>, line_style: Style) -> String {
    apply_style(&span.content, line_style.patch(span.style)).to_string()
}

/// Render text as newline-separated ANSI-styled lines
pub fn to_ansi(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            let line_style = text.style.patch(line.style);
            line.spans
                .iter()
                .map(|span| render_span(span, line_style))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
