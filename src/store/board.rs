use std::sync::Arc;

use tokio::sync::watch;

use super::{Observable, ProjectStore};
use crate::error::AppError;
use crate::model::{BoardIssue, Column, Project};

#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn {
    pub column: Column,
    pub issues: Vec<BoardIssue>,
}

pub struct BoardStore {
    projects: Arc<ProjectStore>,
    selected: Observable<Option<String>>,
}

impl BoardStore {
    pub fn new(projects: Arc<ProjectStore>) -> Self {
        Self {
            projects,
            selected: Observable::new(None),
        }
    }

    pub fn select_project(&self, project_id: Option<&str>) {
        tracing::debug!(project_id, "board project selected");
        self.selected.set(project_id.map(str::to_string));
    }

    pub fn selected_project_id(&self) -> Option<String> {
        self.selected.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.selected.subscribe()
    }

    pub fn selected_project(&self) -> Option<Project> {
        let id = self.selected.get()?;
        self.projects.read(|s| s.project(&id).cloned())
    }

    /// Issues grouped by column, in column order. Items whose column is
    /// unknown land in the first column.
    pub fn columns(&self) -> Vec<BoardColumn> {
        let Some(project) = self.selected_project() else {
            return Vec::new();
        };
        group_by_column(&project)
    }

    pub async fn move_issue(&self, item_id: &str, column_id: &str) -> Result<(), AppError> {
        let project_id = self.require_selection()?;
        self.projects
            .update_issue_status(&project_id, item_id, column_id)
            .await
    }

    pub async fn move_issue_left(&self, item_id: &str) -> Result<bool, AppError> {
        self.shift(item_id, -1).await
    }

    pub async fn move_issue_right(&self, item_id: &str) -> Result<bool, AppError> {
        self.shift(item_id, 1).await
    }

    async fn shift(&self, item_id: &str, step: isize) -> Result<bool, AppError> {
        let project = self
            .selected_project()
            .ok_or_else(|| AppError::validation("No project selected"))?;
        let issue = project
            .issue(item_id)
            .ok_or_else(|| AppError::not_found("Issue", item_id))?;

        let current = project
            .columns
            .iter()
            .position(|c| c.id == issue.column_id)
            .unwrap_or(0);
        let Some(target) = current
            .checked_add_signed(step)
            .and_then(|i| project.columns.get(i))
        else {
            return Ok(false);
        };

        self.projects
            .update_issue_status(&project.id, item_id, &target.id)
            .await?;
        Ok(true)
    }

    fn require_selection(&self) -> Result<String, AppError> {
        self.selected
            .get()
            .ok_or_else(|| AppError::validation("No project selected"))
    }
}

pub fn group_by_column(project: &Project) -> Vec<BoardColumn> {
    let mut columns: Vec<BoardColumn> = project
        .columns
        .iter()
        .map(|c| BoardColumn {
            column: c.clone(),
            issues: Vec::new(),
        })
        .collect();
    if columns.is_empty() {
        return columns;
    }
    for issue in &project.issues {
        let slot = columns
            .iter()
            .position(|c| c.column.id == issue.column_id)
            .unwrap_or(0);
        columns[slot].issues.push(issue.clone());
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::documents;
    use crate::github::mock::MockTransport;
    use crate::model::NO_STATUS_ID;
    use crate::sync::{Orchestrator, SyncSettings};

    async fn board(mock: &Arc<MockTransport>) -> BoardStore {
        let sync = Orchestrator::new(mock.clone(), SyncSettings::default());
        let projects = Arc::new(ProjectStore::new(mock.clone(), sync));
        projects.load(false).await.unwrap();
        let board = BoardStore::new(projects);
        board.select_project(Some("P_1"));
        board
    }

    #[tokio::test(start_paused = true)]
    async fn columns_follow_project_order() {
        let mock = Arc::new(MockTransport::serving_fixture());
        let board = board(&mock).await;

        let columns = board.columns();
        let names: Vec<_> = columns.iter().map(|c| c.column.name.as_str()).collect();
        assert_eq!(names, ["No Status", "Todo", "In Progress", "Done"]);

        let ids = |i: usize| -> Vec<String> {
            columns[i].issues.iter().map(|x| x.id.clone()).collect()
        };
        assert_eq!(ids(0), ["PVTI_2", "PVTI_3"]);
        assert!(ids(1).is_empty());
        assert_eq!(ids(2), ["PVTI_1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_selected_means_empty_board() {
        let mock = Arc::new(MockTransport::serving_fixture());
        let board = board(&mock).await;
        board.select_project(None);

        assert!(board.columns().is_empty());
        let err = board.move_issue("PVTI_1", "opt_done").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn move_right_targets_next_column() {
        let mock = Arc::new(MockTransport::serving_fixture());
        let board = board(&mock).await;

        assert!(board.move_issue_right("PVTI_1").await.unwrap());
        let mutation = &mock.mutations()[0];
        assert!(mutation.is(documents::UPDATE_ITEM_STATUS));
        assert_eq!(mutation.variables["optionId"], "opt_done");
    }

    #[tokio::test(start_paused = true)]
    async fn move_left_stops_at_board_edge() {
        let mock = Arc::new(MockTransport::serving_fixture());
        let board = board(&mock).await;

        board.move_issue("PVTI_1", "opt_todo").await.unwrap();
        assert!(!board.move_issue_left("PVTI_2").await.unwrap());

        assert!(board.move_issue_left("PVTI_1").await.unwrap());
        let mutations = mock.mutations();
        assert_eq!(mutations.len(), 2);
        // the fixture refresh put PVTI_1 back in "In Progress"
        assert_eq!(mutations[1].variables["optionId"], "opt_todo");

        board.move_issue("PVTI_1", NO_STATUS_ID).await.unwrap();
        assert!(mock.mutations()[2].is(documents::CLEAR_ITEM_STATUS));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_item_is_not_found() {
        let mock = Arc::new(MockTransport::serving_fixture());
        let board = board(&mock).await;

        let err = board.move_issue_right("PVTI_nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
