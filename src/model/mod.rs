pub mod project;
pub mod repository;
pub mod user;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use project::{BoardIssue, Column, ColumnType, Label, Project, NO_STATUS_ID, NO_STATUS_NAME};
pub use repository::{Permission, Repository, RepositoryCollaborator};
pub use user::{Actor, UserProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub repositories: Vec<Repository>,
    #[serde(default)]
    pub projects: Vec<Project>,
    pub fetched_at: DateTime<Utc>,
}

impl AppData {
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn repository(&self, repository_id: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.id == repository_id)
    }
}
