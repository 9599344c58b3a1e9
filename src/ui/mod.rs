pub mod board;
pub mod command_bar;
pub mod detail_panel;
pub mod footer;
pub mod project_list;
pub mod search_results;
pub mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{App, ViewMode};

pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    // command bar (3) when input is active, else footer (1)
    let bottom_height = if app.input.is_some() { 3 } else { 1 };

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(bottom_height)])
        .split(size);
    let main_area = vertical[0];
    let bottom_area = vertical[1];

    match app.view_mode {
        ViewMode::Projects => {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(main_area);

            project_list::render(f, horizontal[0], app);
            detail_panel::render_project(f, horizontal[1], app);
        }
        ViewMode::Board => {
            board::render(f, main_area, app);
        }
        ViewMode::IssueDetail => {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(main_area);

            board::render(f, horizontal[0], app);
            detail_panel::render_issue(f, horizontal[1], app);
        }
        ViewMode::Search => {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(main_area);

            search_results::render(f, horizontal[0], app);
            detail_panel::render_hit(f, horizontal[1], app);
        }
    }

    if app.input.is_some() {
        command_bar::render(f, bottom_area, app);
    } else {
        footer::render(f, bottom_area, app);
    }
}
