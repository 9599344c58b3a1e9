use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(mode) = app.input else {
        return;
    };

    let title = match mode {
        InputMode::Search => " Search issues ".to_string(),
        InputMode::NewIssue => {
            let column = app
                .board_columns()
                .get(app.selected_column)
                .map(|c| c.column.name.clone())
                .unwrap_or_default();
            format!(" New issue in {column} ")
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title);

    let paragraph = Paragraph::new(Line::raw(app.input_buffer.clone())).block(block);
    f.render_widget(paragraph, area);

    let x = area.x + 1 + app.input_cursor as u16;
    let y = area.y + 1;
    f.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), y));
}
