use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::model::BoardIssue;
use crate::ui::theme::{column_color, label_color, ACCENT};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(project) = app.current_project() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(" Board ");
        f.render_widget(Paragraph::new("Project not found").block(block), area);
        return;
    };

    let columns = app.board_columns();
    if columns.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Ratio(1, columns.len() as u32))
        .collect();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (c, (column, column_area)) in columns.iter().zip(areas.iter()).enumerate() {
        let focused = c == app.selected_column;
        let width = column_area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = column
            .issues
            .iter()
            .enumerate()
            .map(|(r, issue)| issue_item(issue, focused && r == app.selected_row, width))
            .collect();

        let color = column_color(column.column.column_type);
        let border = if focused {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title = if c == 0 {
            format!(" {} / {} ({}) ", project.name, column.column.name, column.issues.len())
        } else {
            format!(" {} ({}) ", column.column.name, column.issues.len())
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(title, Style::default().fg(color))),
        );
        f.render_widget(list, *column_area);
    }
}

fn issue_item(issue: &BoardIssue, selected: bool, width: usize) -> ListItem<'static> {
    let number = match (issue.is_draft, issue.number) {
        (true, _) => "draft ".to_string(),
        (false, Some(n)) => format!("#{n} "),
        (false, None) => String::new(),
    };
    let title: String = issue.title.chars().take(width.saturating_sub(number.len())).collect();
    let title_style = if selected {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(number, Style::default().fg(Color::DarkGray)),
        Span::styled(title, title_style),
    ])];
    if !issue.labels.is_empty() {
        let labels: Vec<Span> = issue
            .labels
            .iter()
            .map(|l| Span::styled(format!("●{} ", l.name), Style::default().fg(label_color(&l.color))))
            .collect();
        lines.push(Line::from(labels));
    }
    ListItem::new(lines)
}
