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
    let projects = app.projects();
    let items: Vec<ListItem> = projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let selected = i == app.selected_project;

            let number_span = Span::styled(
                format!("#{:<4}", project.number),
                Style::default().fg(Color::DarkGray),
            );

            // Truncate name to fit
            let max_name = area.width.saturating_sub(24) as usize;
            let name: String = project.name.chars().take(max_name).collect();
            let name_style = if selected {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else if project.closed {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            let count_span = Span::styled(
                format!(" ({} issues)", project.issues.len()),
                Style::default().fg(Color::Gray),
            );
            let mut spans = vec![number_span, Span::styled(name, name_style), count_span];
            if project.closed {
                spans.push(Span::styled(" closed", Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if app.loading() {
        " Projects (loading...) "
    } else {
        " Projects "
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(title),
    );

    f.render_widget(list, area);
}
