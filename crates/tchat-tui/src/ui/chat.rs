//! Chat area
//!
//! Displays the log, newest lines at the bottom. Lines arrive already
//! wrapped; each embedded break becomes its own terminal row.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use tchat_app::{App, LineKind, format::BORDER_WIDTH};

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = app.username().map_or_else(|| " tchat ".to_owned(), |name| format!(" tchat: {name} "));
    let block = Block::default().borders(Borders::ALL).title(title);

    let mut rows: Vec<Line> = Vec::new();
    for entry in app.display_lines() {
        for (i, text) in entry.text.split('\n').enumerate() {
            rows.push(styled_row(entry.kind, text, i == 0));
        }
    }

    let visible_height = area.height.saturating_sub(BORDER_WIDTH) as usize;
    let skip = rows.len().saturating_sub(visible_height);
    let visible: Vec<_> = rows.into_iter().skip(skip).collect();

    frame.render_widget(Paragraph::new(Text::from(visible)).block(block), area);
}

/// One terminal row of a log line. The sender prefix is highlighted on the
/// first row only.
fn styled_row(kind: LineKind, text: &str, first: bool) -> Line<'static> {
    let body = Style::default();
    match kind {
        LineKind::Error => {
            Line::from(Span::styled(text.to_owned(), Style::default().fg(Color::Red)))
        },
        LineKind::Info => {
            Line::from(Span::styled(text.to_owned(), Style::default().fg(Color::DarkGray)))
        },
        LineKind::Own | LineKind::Incoming | LineKind::Server => {
            let sender = match kind {
                LineKind::Own => Style::default().fg(Color::Magenta),
                LineKind::Server => Style::default().fg(Color::Yellow),
                _ => Style::default().fg(Color::Green),
            }
            .add_modifier(Modifier::BOLD);

            match text.split_once(": ").filter(|_| first) {
                Some((name, rest)) => Line::from(vec![
                    Span::styled(format!("{name}: "), sender),
                    Span::styled(rest.to_owned(), body),
                ]),
                None => Line::from(Span::styled(text.to_owned(), body)),
            }
        },
    }
}
