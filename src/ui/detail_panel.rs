use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::model::{BoardIssue, Project};
use crate::ui::theme::{label_color, ACCENT};

pub fn render_project(f: &mut Frame, area: Rect, app: &App) {
    let project = app.projects().into_iter().nth(app.selected_project);
    let lines = project.as_ref().map(project_lines).unwrap_or_default();
    render_lines(f, area, " Project ", lines);
}

pub fn render_issue(f: &mut Frame, area: Rect, app: &App) {
    let lines = app.selected_issue().as_ref().map(issue_lines).unwrap_or_default();
    render_lines(f, area, " Issue ", lines);
}

pub fn render_hit(f: &mut Frame, area: Rect, app: &App) {
    let hit = app.search_hits().into_iter().nth(app.selected_hit);
    let lines = hit
        .map(|hit| {
            let mut lines = vec![field("Project", hit.project_name)];
            lines.extend(issue_lines(&hit.issue));
            lines
        })
        .unwrap_or_default();
    render_lines(f, area, " Issue ", lines);
}

fn render_lines(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(title.to_string());
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn field(name: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name}: "), Style::default().fg(Color::Gray)),
        Span::raw(value.into()),
    ])
}

fn project_lines(project: &Project) -> Vec<Line<'static>> {
    let mut lines = vec![
        field("Number", format!("#{}", project.number)),
        field("Owner", project.owner.login.clone()),
    ];
    if project.closed {
        lines.push(field("State", "closed"));
    }
    let repos: Vec<&str> = project
        .repositories
        .iter()
        .map(|r| r.name_with_owner.as_str())
        .collect();
    if !repos.is_empty() {
        lines.push(field("Repositories", repos.join(", ")));
    }
    let columns: Vec<String> = project
        .columns
        .iter()
        .map(|c| format!("{} {}", c.name, project.issues_in(&c.id).count()))
        .collect();
    lines.push(field("Columns", columns.join(" | ")));
    if !project.url.is_empty() {
        lines.push(Line::from(Span::styled(
            project.url.clone(),
            Style::default().fg(Color::Blue),
        )));
    }
    if let Some(desc) = &project.description {
        lines.push(Line::raw(""));
        lines.push(Line::raw(desc.clone()));
    }
    lines
}

fn issue_lines(issue: &BoardIssue) -> Vec<Line<'static>> {
    let heading = match issue.number {
        Some(n) => format!("#{n} {}", issue.title),
        None => issue.title.clone(),
    };
    let mut lines = vec![
        Line::from(Span::styled(heading, Style::default().fg(ACCENT))),
        field("Status", issue.column_name.clone()),
    ];
    if issue.is_draft {
        lines.push(field("Type", "draft"));
    }
    if let Some(repo) = &issue.repository {
        lines.push(field("Repository", repo.clone()));
    }
    if let Some(author) = &issue.author {
        lines.push(field("Author", author.login.clone()));
    }
    if !issue.assignees.is_empty() {
        let logins: Vec<&str> = issue.assignees.iter().map(|a| a.login.as_str()).collect();
        lines.push(field("Assignees", logins.join(", ")));
    }
    if !issue.labels.is_empty() {
        let mut spans = vec![Span::styled("Labels: ", Style::default().fg(Color::Gray))];
        for label in &issue.labels {
            spans.push(Span::styled(
                format!("{} ", label.name),
                Style::default().fg(label_color(&label.color)),
            ));
        }
        lines.push(Line::from(spans));
    }
    if let Some(url) = &issue.url {
        lines.push(Line::from(Span::styled(url.clone(), Style::default().fg(Color::Blue))));
    }
    if let Some(body) = &issue.body {
        lines.push(Line::raw(""));
        let truncated: String = body.chars().take(600).collect();
        lines.push(Line::raw(truncated));
    }
    lines
}
