use serde::{Deserialize, Serialize};
use std::fmt;

use super::repository::{Repository, RepositoryCollaborator};
use super::user::Actor;

/// Id of the column holding items without a status value.
pub const NO_STATUS_ID: &str = "no-status";
pub const NO_STATUS_NAME: &str = "No Status";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub number: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub url: String,
    #[serde(default)]
    pub closed: bool,
    pub owner: Actor,
    pub created_by: Actor,
    /// The single-select field backing the columns, if the project has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_field_id: Option<String>,
    pub columns: Vec<Column>,
    pub issues: Vec<BoardIssue>,
    pub repositories: Vec<Repository>,
    #[serde(default)]
    pub collaborators: Vec<RepositoryCollaborator>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Project {
    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn issue(&self, item_id: &str) -> Option<&BoardIssue> {
        self.issues.iter().find(|i| i.id == item_id)
    }

    pub fn issues_in(&self, column_id: &str) -> impl Iterator<Item = &BoardIssue> {
        let column_id = column_id.to_string();
        self.issues.iter().filter(move |i| i.column_id == column_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
}

impl Column {
    pub fn no_status() -> Self {
        Self {
            id: NO_STATUS_ID.to_string(),
            name: NO_STATUS_NAME.to_string(),
            column_type: ColumnType::Todo,
            field_id: None,
            field_name: None,
        }
    }

    pub fn is_no_status(&self) -> bool {
        self.id == NO_STATUS_ID
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    Todo,
    InProgress,
    Done,
    Backlog,
}

impl ColumnType {
    pub fn infer(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("done") {
            ColumnType::Done
        } else if lower.contains("progress") {
            ColumnType::InProgress
        } else if lower.contains("backlog") {
            ColumnType::Backlog
        } else {
            ColumnType::Todo
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Todo => "TODO",
            ColumnType::InProgress => "IN_PROGRESS",
            ColumnType::Done => "DONE",
            ColumnType::Backlog => "BACKLOG",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardIssue {
    pub id: String,
    /// Underlying issue id; `None` for draft issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub column_id: String,
    pub column_name: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Actor>,
    #[serde(default)]
    pub assignees: Vec<Actor>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub is_draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub name: String,
    /// Always `#RRGGBB`.
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
