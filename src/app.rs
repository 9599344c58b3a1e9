use std::time::Instant;

use crate::context::AppContext;
use crate::error::AppError;
use crate::event::KeyAction;
use crate::model::{BoardIssue, Project, NO_STATUS_NAME};
use crate::store::{BoardColumn, NewIssue, SearchHit, StoreError};

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub enum Action {
    Key(KeyAction),
    Tick,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Projects,
    Board,
    IssueDetail,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    NewIssue,
    Search,
}

pub struct App {
    pub ctx: AppContext,
    pub view_mode: ViewMode,
    pub selected_project: usize,
    pub selected_column: usize,
    pub selected_row: usize,
    pub selected_hit: usize,
    pub input: Option<InputMode>,
    pub input_buffer: String,
    pub input_cursor: usize,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pending_delete: Option<String>,
    last_load: Option<Instant>,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            view_mode: ViewMode::Projects,
            selected_project: 0,
            selected_column: 0,
            selected_row: 0,
            selected_hit: 0,
            input: None,
            input_buffer: String::new(),
            input_cursor: 0,
            flash_message: None,
            should_quit: false,
            pending_delete: None,
            last_load: None,
        }
    }

    pub async fn update(&mut self, action: Action) {
        if let Some((_, t)) = &self.flash_message {
            if t.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }

        match action {
            Action::Key(key) => self.handle_key(key).await,
            Action::Tick => self.handle_tick().await,
            Action::Quit => self.should_quit = true,
        }
    }

    // Read side used by the renderers.

    pub fn projects(&self) -> Vec<Project> {
        self.ctx.projects.read(|s| s.projects.clone())
    }

    pub fn loading(&self) -> bool {
        self.ctx.projects.read(|s| s.status.loading)
    }

    pub fn store_error(&self) -> Option<StoreError> {
        self.ctx.projects.read(|s| s.status.error.clone())
    }

    pub fn synced_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.ctx.projects.read(|s| s.fetched_at)
    }

    pub fn current_project(&self) -> Option<Project> {
        self.ctx.board.selected_project()
    }

    pub fn board_columns(&self) -> Vec<BoardColumn> {
        self.ctx.board.columns()
    }

    pub fn selected_issue(&self) -> Option<BoardIssue> {
        self.board_columns()
            .get(self.selected_column)?
            .issues
            .get(self.selected_row)
            .cloned()
    }

    pub fn search_hits(&self) -> Vec<SearchHit> {
        self.ctx.search.results().as_ref().clone()
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.flash_message = Some((message.into(), Instant::now()));
    }

    fn report(&mut self, err: &AppError) {
        self.flash(err.user_message());
    }

    pub async fn refresh(&mut self, force: bool) {
        self.last_load = Some(Instant::now());
        if let Err(err) = self.ctx.projects.load(force).await {
            self.report(&err);
            return;
        }
        if force {
            self.flash("Refreshed");
        }
        self.clamp_cursors();
    }

    async fn handle_tick(&mut self) {
        let ttl = self.ctx.sync.settings().cache_ttl;
        let stale = self.last_load.map_or(true, |t| t.elapsed() >= ttl);
        if stale && !self.loading() {
            self.refresh(false).await;
        }
    }

    async fn handle_key(&mut self, key: KeyAction) {
        if self.input.is_some() {
            self.handle_input_key(key).await;
            return;
        }
        if !matches!(key, KeyAction::Char('x')) {
            self.pending_delete = None;
        }

        match key {
            KeyAction::Up => self.move_cursor(-1),
            KeyAction::Down => self.move_cursor(1),
            KeyAction::Left => {
                if self.view_mode == ViewMode::Board && self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_cursors();
                }
            }
            KeyAction::Right => {
                if self.view_mode == ViewMode::Board {
                    self.selected_column += 1;
                    self.clamp_cursors();
                }
            }
            KeyAction::Select => self.open_selected(),
            KeyAction::Escape => self.go_back(),
            KeyAction::Backspace => {}
            KeyAction::Char(c) => match c {
                'q' => self.should_quit = true,
                'r' => self.refresh(true).await,
                '[' => self.move_selected_issue(-1).await,
                ']' => self.move_selected_issue(1).await,
                'n' => self.start_new_issue(),
                'x' => self.delete_selected_issue().await,
                '/' => self.start_input(InputMode::Search),
                _ => {}
            },
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.view_mode {
            ViewMode::Projects => {
                let len = self.projects().len();
                self.selected_project = step(self.selected_project, delta, len);
            }
            ViewMode::Board => {
                let len = self
                    .board_columns()
                    .get(self.selected_column)
                    .map_or(0, |c| c.issues.len());
                self.selected_row = step(self.selected_row, delta, len);
            }
            ViewMode::Search => {
                let len = self.search_hits().len();
                self.selected_hit = step(self.selected_hit, delta, len);
            }
            ViewMode::IssueDetail => {}
        }
    }

    fn clamp_cursors(&mut self) {
        let projects = self.projects().len();
        self.selected_project = self.selected_project.min(projects.saturating_sub(1));

        let columns = self.board_columns();
        self.selected_column = self.selected_column.min(columns.len().saturating_sub(1));
        let rows = columns
            .get(self.selected_column)
            .map_or(0, |c| c.issues.len());
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));

        let hits = self.search_hits().len();
        self.selected_hit = self.selected_hit.min(hits.saturating_sub(1));
    }

    fn open_selected(&mut self) {
        match self.view_mode {
            ViewMode::Projects => {
                let Some(project) = self.projects().into_iter().nth(self.selected_project) else {
                    return;
                };
                self.ctx.board.select_project(Some(&project.id));
                self.selected_column = 0;
                self.selected_row = 0;
                self.view_mode = ViewMode::Board;
            }
            ViewMode::Board => {
                if self.selected_issue().is_some() {
                    self.view_mode = ViewMode::IssueDetail;
                }
            }
            ViewMode::Search => {
                let Some(hit) = self.search_hits().into_iter().nth(self.selected_hit) else {
                    return;
                };
                self.ctx.board.select_project(Some(&hit.project_id));
                if let Some(index) = self.projects().iter().position(|p| p.id == hit.project_id) {
                    self.selected_project = index;
                }
                self.focus_item(&hit.issue.id);
                self.view_mode = ViewMode::IssueDetail;
            }
            ViewMode::IssueDetail => {}
        }
    }

    fn go_back(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::IssueDetail => ViewMode::Board,
            ViewMode::Board => {
                self.ctx.board.select_project(None);
                ViewMode::Projects
            }
            ViewMode::Search => {
                self.ctx.search.clear();
                ViewMode::Projects
            }
            ViewMode::Projects => ViewMode::Projects,
        };
    }

    fn focus_item(&mut self, item_id: &str) {
        for (c, column) in self.board_columns().iter().enumerate() {
            if let Some(r) = column.issues.iter().position(|i| i.id == item_id) {
                self.selected_column = c;
                self.selected_row = r;
                return;
            }
        }
        self.clamp_cursors();
    }

    async fn move_selected_issue(&mut self, step: isize) {
        if !matches!(self.view_mode, ViewMode::Board | ViewMode::IssueDetail) {
            return;
        }
        let Some(issue) = self.selected_issue() else {
            return;
        };
        let result = if step < 0 {
            self.ctx.board.move_issue_left(&issue.id).await
        } else {
            self.ctx.board.move_issue_right(&issue.id).await
        };
        match result {
            Ok(true) => {
                self.focus_item(&issue.id);
                let column = self
                    .selected_issue()
                    .map_or_else(|| NO_STATUS_NAME.to_string(), |i| i.column_name);
                self.flash(format!("Moved \"{}\" to {column}", issue.title));
            }
            Ok(false) => {}
            Err(err) => self.report(&err),
        }
    }

    async fn delete_selected_issue(&mut self) {
        if !matches!(self.view_mode, ViewMode::Board | ViewMode::IssueDetail) {
            return;
        }
        let (Some(project), Some(issue)) = (self.current_project(), self.selected_issue()) else {
            return;
        };
        if self.pending_delete.as_deref() != Some(issue.id.as_str()) {
            self.pending_delete = Some(issue.id.clone());
            self.flash(format!("Press x again to delete \"{}\"", issue.title));
            return;
        }
        self.pending_delete = None;

        match self.ctx.projects.delete_issue(&project.id, &issue.id).await {
            Ok(()) => {
                self.flash(format!("Deleted \"{}\"", issue.title));
                if self.view_mode == ViewMode::IssueDetail {
                    self.view_mode = ViewMode::Board;
                }
                self.clamp_cursors();
            }
            Err(err) => self.report(&err),
        }
    }

    fn start_new_issue(&mut self) {
        if !matches!(self.view_mode, ViewMode::Board | ViewMode::IssueDetail) {
            return;
        }
        let linked = self
            .current_project()
            .is_some_and(|p| !p.repositories.is_empty());
        if !linked {
            self.flash("Link a repository to this project first");
            return;
        }
        self.start_input(InputMode::NewIssue);
    }

    fn start_input(&mut self, mode: InputMode) {
        self.input = Some(mode);
        self.input_buffer.clear();
        self.input_cursor = 0;
        if mode == InputMode::Search {
            self.ctx.search.clear();
        }
    }

    async fn handle_input_key(&mut self, key: KeyAction) {
        let Some(mode) = self.input else {
            return;
        };
        match key {
            KeyAction::Char(c) => {
                let at = byte_index(&self.input_buffer, self.input_cursor);
                self.input_buffer.insert(at, c);
                self.input_cursor += 1;
            }
            KeyAction::Backspace => {
                if self.input_cursor > 0 {
                    self.input_cursor -= 1;
                    let at = byte_index(&self.input_buffer, self.input_cursor);
                    self.input_buffer.remove(at);
                }
            }
            KeyAction::Left => self.input_cursor = self.input_cursor.saturating_sub(1),
            KeyAction::Right => {
                self.input_cursor = (self.input_cursor + 1).min(self.input_buffer.chars().count());
            }
            KeyAction::Escape => {
                self.input = None;
                if mode == InputMode::Search {
                    self.ctx.search.clear();
                }
                return;
            }
            KeyAction::Select => {
                self.input = None;
                self.submit_input(mode).await;
                return;
            }
            KeyAction::Up | KeyAction::Down => return,
        }
        if mode == InputMode::Search {
            self.ctx.search.set_query(self.input_buffer.clone());
        }
    }

    async fn submit_input(&mut self, mode: InputMode) {
        let text = std::mem::take(&mut self.input_buffer);
        self.input_cursor = 0;
        match mode {
            InputMode::Search => {
                self.ctx.search.set_query(text);
                self.selected_hit = 0;
                self.view_mode = ViewMode::Search;
            }
            InputMode::NewIssue => {
                let title = text.trim();
                if title.is_empty() {
                    return;
                }
                self.create_issue(title.to_string()).await;
            }
        }
    }

    async fn create_issue(&mut self, title: String) {
        let Some(project) = self.current_project() else {
            return;
        };
        let Some(repository) = project.repositories.first() else {
            self.flash("Link a repository to this project first");
            return;
        };
        let column_id = self
            .board_columns()
            .get(self.selected_column)
            .map(|c| c.column.id.clone());

        let new = NewIssue {
            project_id: project.id.clone(),
            repository_id: repository.id.clone(),
            title: title.clone(),
            body: None,
            column_id,
        };
        match self.ctx.projects.create_issue(new).await {
            Ok(item_id) => {
                self.focus_item(&item_id);
                self.flash(format!("Created \"{title}\" in {}", repository.name_with_owner));
            }
            Err(err) => self.report(&err),
        }
    }
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map_or(s.len(), |(i, _)| i)
}
