use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use std::io;

use super::theme::Theme;

/// Scroll state of the read-only dashboard view
#[derive(Debug, Clone)]
pub struct Viewer {
    text: Text<'static>,
    title: String,
    offset: usize,
    height: usize,
}

impl Viewer {
    pub fn new(title: impl Into<String>, text: Text<'static>) -> Self {
        Self {
            text,
            title: title.into(),
            offset: 0,
            height: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Visible rows; recomputed on every draw
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    fn max_offset(&self) -> usize {
        self.text.lines.len().saturating_sub(self.height)
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.offset = (self.offset + rows).min(self.max_offset());
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    fn page(&self) -> usize {
        self.height.saturating_sub(1).max(1)
    }

    /// Apply a key press; returns `true` when the viewer should close
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_down(self.page()),
            KeyCode::PageUp => self.scroll_up(self.page()),
            KeyCode::Home | KeyCode::Char('g') => self.offset = 0,
            KeyCode::End | KeyCode::Char('G') => self.offset = self.max_offset(),
            _ => {}
        }
        false
    }
}

/// Show `text` full-screen until the user quits
pub fn run_viewer(title: &str, text: Text<'static>, theme: &Theme) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = restore_terminal(&mut stdout);
        return Err(err);
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = restore_terminal(&mut io::stdout());
            return Err(err);
        }
    };

    let mut viewer = Viewer::new(title, text);
    let res = run_loop(&mut terminal, &mut viewer, theme);

    restore_terminal(terminal.backend_mut())?;
    terminal.show_cursor()?;

    res
}

/// Leave raw mode and the alternate screen
fn restore_terminal(out: &mut impl io::Write) -> io::Result<()> {
    let raw = disable_raw_mode();
    execute!(out, LeaveAlternateScreen)?;
    raw
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    viewer: &mut Viewer,
    theme: &Theme,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, viewer, theme))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if viewer.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn draw(f: &mut Frame, viewer: &mut Viewer, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(
            format!(" {} ", viewer.title),
            theme.header_style(theme.tooltip),
        ));
    viewer.set_height(block.inner(chunks[0]).height as usize);

    let offset = u16::try_from(viewer.offset).unwrap_or(u16::MAX);
    let body = Paragraph::new(viewer.text.clone())
        .block(block)
        .scroll((offset, 0));
    f.render_widget(body, chunks[0]);

    let help = Line::from(" q quit  ↑/↓ j/k scroll  PgUp/PgDn page  g/G top/bottom");
    f.render_widget(
        Paragraph::new(help).style(theme.footer_style()),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_terminal_leaves_alternate_screen() {
        // Not in raw mode here, so only the screen switch is written
        let mut out = Vec::new();
        restore_terminal(&mut out).unwrap();
        assert_eq!(out, b"\x1b[?1049l");
    }

    fn viewer(lines: usize, height: usize) -> Viewer {
        let text = Text::from(
            (0..lines)
                .map(|i| Line::from(format!("line {}", i)))
                .collect::<Vec<_>>(),
        );
        let mut v = Viewer::new("demo", text);
        v.set_height(height);
        v
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut v = viewer(30, 10);
        v.scroll_up(5);
        assert_eq!(v.offset(), 0);
        v.scroll_down(100);
        assert_eq!(v.offset(), 20);
    }

    #[test]
    fn test_short_text_does_not_scroll() {
        let mut v = viewer(5, 10);
        v.handle_key(press(KeyCode::Char('j')));
        assert_eq!(v.offset(), 0);
    }

    #[test]
    fn test_keys() {
        let mut v = viewer(30, 10);
        assert!(!v.handle_key(press(KeyCode::Down)));
        assert_eq!(v.offset(), 1);
        v.handle_key(press(KeyCode::PageDown));
        assert_eq!(v.offset(), 10);
        v.handle_key(press(KeyCode::Char('G')));
        assert_eq!(v.offset(), 20);
        v.handle_key(press(KeyCode::Char('g')));
        assert_eq!(v.offset(), 0);
        assert!(v.handle_key(press(KeyCode::Char('q'))));
        assert!(v.handle_key(press(KeyCode::Esc)));
    }

    #[test]
    fn test_resize_clamps_offset() {
        let mut v = viewer(30, 10);
        v.scroll_down(20);
        v.set_height(25);
        assert_eq!(v.offset(), 5);
    }
}
