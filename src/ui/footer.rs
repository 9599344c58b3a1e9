use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, ViewMode};
use crate::ui::theme::error_color;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    match app.view_mode {
        ViewMode::Projects => {
            spans.push(hint("↑↓", "navigate"));
            spans.push(hint("enter", "open"));
            spans.push(hint("/", "search"));
            spans.push(hint("r", "refresh"));
            spans.push(hint("q", "quit"));
        }
        ViewMode::Board => {
            spans.push(hint("←↑↓→", "navigate"));
            spans.push(hint("enter", "details"));
            spans.push(hint("[ ]", "move"));
            spans.push(hint("n", "new"));
            spans.push(hint("x", "delete"));
            spans.push(hint("esc", "back"));
        }
        ViewMode::IssueDetail => {
            spans.push(hint("[ ]", "move"));
            spans.push(hint("x", "delete"));
            spans.push(hint("esc", "back"));
        }
        ViewMode::Search => {
            spans.push(hint("↑↓", "navigate"));
            spans.push(hint("enter", "open"));
            spans.push(hint("/", "new search"));
            spans.push(hint("esc", "back"));
        }
    }

    spans.push(Span::raw("  "));
    let sync = match app.synced_at() {
        _ if app.loading() => "syncing...".to_string(),
        Some(at) => format!("synced {}", at.with_timezone(&Local).format("%H:%M:%S")),
        None => "not synced".to_string(),
    };
    spans.push(Span::styled(sync, Style::default().fg(Color::DarkGray)));

    // flash wins over a stored error
    if let Some((msg, _)) = &app.flash_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)));
    } else if let Some(err) = app.store_error() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(err.message, Style::default().fg(error_color(err.kind))));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn hint(key: &str, desc: &str) -> Span<'static> {
    Span::styled(
        format!(" {key}:{desc} "),
        Style::default().fg(Color::DarkGray),
    )
}
