use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::App;
use crate::ui::theme::ACCENT;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let hits = app.search_hits();
    let items: Vec<ListItem> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let style = if i == app.selected_hit {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let number = hit
                .issue
                .number
                .map(|n| format!("#{n} "))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(number, Style::default().fg(Color::DarkGray)),
                Span::styled(hit.issue.title.clone(), style),
                Span::styled(
                    format!("  {} / {}", hit.project_name, hit.issue.column_name),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let query = app.ctx.search.filters().query;
    let title = format!(" Search \"{query}\" ({}) ", hits.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(title),
    );
    f.render_widget(list, area);
}
