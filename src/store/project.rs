//! CRUD store for projects, repositories, issues, labels and collaborators.
//!
//! Writes go straight to the transport. A successful write updates the
//! local lists and then forces a refresh through the orchestrator; a
//! failed one is recorded for display and leaves the lists untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{Observable, StoreError, StoreStatus};
use crate::error::AppError;
use crate::github::documents;
use crate::github::raw::{
    AddProjectItemData, ClearItemStatusData, CreateIssueData, CreateLabelData, CreateProjectData,
    DeleteIssueData, DeleteLabelData, DeleteProjectData, DeleteProjectItemData,
    LinkRepositoryData, RawCollaboratorsData, UnlinkRepositoryData, UpdateIssueData,
    UpdateItemStatusData, UpdateLabelData, UpdateProjectData,
};
use crate::github::Transport;
use crate::mapper::label::{map_label, provider_color};
use crate::mapper::repository::map_collaborators;
use crate::model::{
    AppData, Label, Project, Repository, RepositoryCollaborator, UserProfile, NO_STATUS_ID,
};
use crate::sync::Orchestrator;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectState {
    pub user: Option<UserProfile>,
    pub repositories: Vec<Repository>,
    pub projects: Vec<Project>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub status: StoreStatus,
}

impl ProjectState {
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    fn project_mut(&mut self, project_id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == project_id)
    }

    pub fn repository(&self, repository_id: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.id == repository_id)
    }

    fn repositories_mut<'a>(
        &'a mut self,
        repository_id: &'a str,
    ) -> impl Iterator<Item = &'a mut Repository> + 'a {
        self.repositories
            .iter_mut()
            .chain(self.projects.iter_mut().flat_map(|p| p.repositories.iter_mut()))
            .filter(move |r| r.id == repository_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub closed: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewIssue {
    pub project_id: String,
    pub repository_id: String,
    pub title: String,
    pub body: Option<String>,
    /// Target column; `None` or the no-status column leaves Status unset.
    pub column_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLabel {
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LabelUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

pub struct ProjectStore {
    transport: Arc<dyn Transport>,
    sync: Orchestrator,
    state: Observable<ProjectState>,
    /// Collaborators fetched on demand, re-merged after each refresh.
    collaborators: Mutex<HashMap<String, Vec<RepositoryCollaborator>>>,
}

impl ProjectStore {
    pub fn new(transport: Arc<dyn Transport>, sync: Orchestrator) -> Self {
        Self {
            transport,
            sync,
            state: Observable::new(ProjectState::default()),
            collaborators: Mutex::new(HashMap::new()),
        }
    }

    pub fn state(&self) -> ProjectState {
        self.state.get()
    }

    pub fn read<R>(&self, f: impl FnOnce(&ProjectState) -> R) -> R {
        self.state.read(f)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ProjectState> {
        self.state.subscribe()
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.status.error = None);
    }

    pub async fn load(&self, force_refresh: bool) -> Result<(), AppError> {
        self.state.update(|s| s.status.loading = true);
        match self.sync.initialize(force_refresh).await {
            Ok(data) => {
                self.apply(&data);
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn apply(&self, data: &AppData) {
        let known = self.known_collaborators();
        self.state.update(|s| {
            s.user = data.user.clone();
            s.repositories = data.repositories.clone();
            s.projects = data.projects.clone();
            s.fetched_at = Some(data.fetched_at);
            s.status = StoreStatus::default();
            for (repository_id, collaborators) in &known {
                merge_collaborators(s, repository_id, collaborators);
            }
        });
    }

    fn fail(&self, err: &AppError) {
        tracing::warn!(error = %err, "store operation failed");
        let display = StoreError::from(err);
        self.state.update(|s| {
            s.status.loading = false;
            s.status.error = Some(display);
        });
    }

    fn record<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    /// Reconcile with the server after a successful write. Refresh
    /// failures are recorded but do not undo the write.
    async fn reconcile(&self) {
        if let Err(err) = self.load(true).await {
            tracing::warn!(error = %err, "refresh after mutation failed");
        }
    }

    async fn mutate<T: DeserializeOwned>(
        &self,
        operation: &str,
        document: &str,
        variables: Value,
    ) -> Result<T, AppError> {
        tracing::info!(operation, "sending mutation");
        self.transport.mutation(document, variables).await.decode()
    }

    async fn viewer_id(&self) -> Result<String, AppError> {
        let known = |s: &ProjectState| {
            s.user
                .as_ref()
                .map(|u| u.id.clone())
                .filter(|id| !id.is_empty())
        };
        if let Some(id) = self.read(known) {
            return Ok(id);
        }
        self.load(false).await?;
        self.read(known)
            .ok_or_else(|| AppError::validation("No signed-in user"))
    }

    fn known_collaborators(&self) -> HashMap<String, Vec<RepositoryCollaborator>> {
        self.collaborators
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    // Projects

    pub async fn create_project(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<String, AppError> {
        let result = self.create_project_inner(title, description).await;
        let project_id = self.record(result)?;
        self.reconcile().await;
        Ok(project_id)
    }

    async fn create_project_inner(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<String, AppError> {
        let title = require_text(title, "Project title")?;
        let owner_id = self.viewer_id().await?;

        let data: CreateProjectData = self
            .mutate(
                "createProject",
                documents::CREATE_PROJECT,
                json!({ "ownerId": owner_id, "title": title }),
            )
            .await?;
        let project_id = data
            .payload
            .and_then(|p| p.project)
            .and_then(|p| p.id)
            .ok_or_else(|| AppError::validation("Failed to create project"))?;

        if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
            let _: UpdateProjectData = self
                .mutate(
                    "updateProject",
                    documents::UPDATE_PROJECT,
                    json!({ "projectId": project_id, "shortDescription": description }),
                )
                .await?;
        }
        Ok(project_id)
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        update: ProjectUpdate,
    ) -> Result<(), AppError> {
        if let Some(title) = &update.title {
            self.record(require_text(title, "Project title").map(|_| ()))?;
        }
        let result: Result<UpdateProjectData, _> = self
            .mutate(
                "updateProject",
                documents::UPDATE_PROJECT,
                json!({
                    "projectId": project_id,
                    "title": update.title,
                    "shortDescription": update.description,
                    "closed": update.closed,
                }),
            )
            .await;
        let result = result.and_then(|data| {
            data.payload
                .and_then(|p| p.project)
                .map(|_| ())
                .ok_or_else(|| AppError::validation("Failed to update project"))
        });
        self.record(result)?;

        self.state.update(|s| {
            if let Some(project) = s.project_mut(project_id) {
                if let Some(title) = &update.title {
                    project.name = title.trim().to_string();
                }
                if let Some(description) = &update.description {
                    project.description = Some(description.clone()).filter(|d| !d.is_empty());
                }
                if let Some(closed) = update.closed {
                    project.closed = closed;
                }
            }
        });
        self.reconcile().await;
        Ok(())
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<(), AppError> {
        let result: Result<DeleteProjectData, _> = self
            .mutate(
                "deleteProject",
                documents::DELETE_PROJECT,
                json!({ "projectId": project_id }),
            )
            .await;
        let result = result.and_then(|data| {
            data.payload
                .and_then(|p| p.project)
                .map(|_| ())
                .ok_or_else(|| AppError::validation("Failed to delete project"))
        });
        self.record(result)?;

        self.state.update(|s| s.projects.retain(|p| p.id != project_id));
        self.reconcile().await;
        Ok(())
    }

    pub async fn link_repository_to_project(
        &self,
        project_id: &str,
        repository_id: &str,
    ) -> Result<(), AppError> {
        let result: Result<LinkRepositoryData, _> = self
            .mutate(
                "linkRepositoryToProject",
                documents::LINK_REPOSITORY,
                json!({ "projectId": project_id, "repositoryId": repository_id }),
            )
            .await;
        let result = result.and_then(|data| {
            data.payload
                .and_then(|p| p.repository)
                .map(|_| ())
                .ok_or_else(|| AppError::validation("Failed to link repository to project"))
        });
        self.record(result)?;

        self.state.update(|s| {
            let Some(repository) = s.repository(repository_id).cloned() else {
                return;
            };
            if let Some(project) = s.project_mut(project_id) {
                if !project.repositories.iter().any(|r| r.id == repository_id) {
                    for label in &repository.labels {
                        if !project.labels.iter().any(|l| l.id == label.id) {
                            project.labels.push(label.clone());
                        }
                    }
                    project.repositories.push(repository);
                }
            }
        });
        self.reconcile().await;
        Ok(())
    }

    pub async fn unlink_repository_from_project(
        &self,
        project_id: &str,
        repository_id: &str,
    ) -> Result<(), AppError> {
        let result: Result<UnlinkRepositoryData, _> = self
            .mutate(
                "unlinkRepositoryFromProject",
                documents::UNLINK_REPOSITORY,
                json!({ "projectId": project_id, "repositoryId": repository_id }),
            )
            .await;
        let result = result.and_then(|data| {
            data.payload
                .and_then(|p| p.repository)
                .map(|_| ())
                .ok_or_else(|| AppError::validation("Failed to unlink repository from project"))
        });
        self.record(result)?;

        self.state.update(|s| {
            if let Some(project) = s.project_mut(project_id) {
                project.repositories.retain(|r| r.id != repository_id);
            }
        });
        self.reconcile().await;
        Ok(())
    }

    // Issues

    /// Create an issue, add it to the project and place it in a column.
    /// Returns the project item id.
    pub async fn create_issue(&self, new: NewIssue) -> Result<String, AppError> {
        let result = self.create_issue_inner(&new).await;
        let item_id = self.record(result)?;
        self.reconcile().await;
        Ok(item_id)
    }

    async fn create_issue_inner(&self, new: &NewIssue) -> Result<String, AppError> {
        let title = require_text(&new.title, "Issue title")?;

        let data: CreateIssueData = self
            .mutate(
                "createIssue",
                documents::CREATE_ISSUE,
                json!({
                    "repositoryId": new.repository_id,
                    "title": title,
                    "body": new.body,
                }),
            )
            .await?;
        let issue_id = data
            .payload
            .and_then(|p| p.issue)
            .and_then(|i| i.id)
            .ok_or_else(|| AppError::validation("Failed to create issue"))?;

        let data: AddProjectItemData = self
            .mutate(
                "addProjectItem",
                documents::ADD_PROJECT_ITEM,
                json!({ "projectId": new.project_id, "contentId": issue_id }),
            )
            .await?;
        let item_id = data
            .payload
            .and_then(|p| p.item)
            .and_then(|i| i.id)
            .ok_or_else(|| AppError::validation("Failed to add issue to project"))?;

        if let Some(column_id) = new.column_id.as_deref().filter(|c| *c != NO_STATUS_ID) {
            self.send_status(&new.project_id, &item_id, column_id).await?;
        }
        Ok(item_id)
    }

    pub async fn update_issue(
        &self,
        issue_id: &str,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<(), AppError> {
        if let Some(title) = title {
            self.record(require_text(title, "Issue title").map(|_| ()))?;
        }
        let result: Result<UpdateIssueData, _> = self
            .mutate(
                "updateIssue",
                documents::UPDATE_ISSUE,
                json!({ "id": issue_id, "title": title.map(str::trim), "body": body }),
            )
            .await;
        let result = result.and_then(|data| {
            data.payload
                .and_then(|p| p.issue)
                .map(|_| ())
                .ok_or_else(|| AppError::validation("Failed to update issue"))
        });
        self.record(result)?;

        self.state.update(|s| {
            let issues = s
                .projects
                .iter_mut()
                .flat_map(|p| p.issues.iter_mut())
                .filter(|i| i.issue_id.as_deref() == Some(issue_id));
            for issue in issues {
                if let Some(title) = title {
                    issue.title = title.trim().to_string();
                }
                if let Some(body) = body {
                    issue.body = Some(body.to_string()).filter(|b| !b.is_empty());
                }
            }
        });
        self.reconcile().await;
        Ok(())
    }

    pub async fn update_issue_status(
        &self,
        project_id: &str,
        item_id: &str,
        column_id: &str,
    ) -> Result<(), AppError> {
        let result = self.send_status(project_id, item_id, column_id).await;
        self.record(result)?;

        self.state.update(|s| {
            let Some(project) = s.project_mut(project_id) else {
                return;
            };
            let Some(name) = project.column(column_id).map(|c| c.name.clone()) else {
                return;
            };
            if let Some(issue) = project.issues.iter_mut().find(|i| i.id == item_id) {
                issue.column_id = column_id.to_string();
                issue.column_name = name;
            }
        });
        self.reconcile().await;
        Ok(())
    }

    async fn send_status(
        &self,
        project_id: &str,
        item_id: &str,
        column_id: &str,
    ) -> Result<(), AppError> {
        let (column, status_field_id) = self
            .read(|s| {
                s.project(project_id).map(|p| {
                    (
                        p.column(column_id).cloned(),
                        p.status_field_id.clone(),
                    )
                })
            })
            .ok_or_else(|| AppError::not_found("Project", project_id))?;
        let column = column.ok_or_else(|| AppError::not_found("Column", column_id))?;

        if column.is_no_status() {
            let Some(field_id) = status_field_id else {
                // no Status field, nothing to clear
                return Ok(());
            };
            let data: ClearItemStatusData = self
                .mutate(
                    "clearItemStatus",
                    documents::CLEAR_ITEM_STATUS,
                    json!({ "projectId": project_id, "itemId": item_id, "fieldId": field_id }),
                )
                .await?;
            return data
                .payload
                .and_then(|p| p.item)
                .map(|_| ())
                .ok_or_else(|| AppError::validation("Failed to update issue status"));
        }

        let field_id = column
            .field_id
            .or(status_field_id)
            .ok_or_else(|| AppError::validation("Project has no Status field"))?;
        let data: UpdateItemStatusData = self
            .mutate(
                "updateItemStatus",
                documents::UPDATE_ITEM_STATUS,
                json!({
                    "projectId": project_id,
                    "itemId": item_id,
                    "fieldId": field_id,
                    "optionId": column.id,
                }),
            )
            .await?;
        data.payload
            .and_then(|p| p.item)
            .map(|_| ())
            .ok_or_else(|| AppError::validation("Failed to update issue status"))
    }

    /// Remove an item from the project, then delete its issue when it has one.
    pub async fn delete_issue(&self, project_id: &str, item_id: &str) -> Result<(), AppError> {
        let issue_id = self.read(|s| {
            s.project(project_id)
                .and_then(|p| p.issue(item_id))
                .and_then(|i| i.issue_id.clone())
        });

        let result: Result<DeleteProjectItemData, _> = self
            .mutate(
                "deleteProjectItem",
                documents::DELETE_PROJECT_ITEM,
                json!({ "projectId": project_id, "itemId": item_id }),
            )
            .await;
        let result = result.and_then(|data| {
            data.payload
                .and_then(|p| p.deleted_item_id)
                .map(|_| ())
                .ok_or_else(|| AppError::validation("Failed to delete issue"))
        });
        self.record(result)?;

        self.state.update(|s| {
            if let Some(project) = s.project_mut(project_id) {
                project.issues.retain(|i| i.id != item_id);
            }
        });

        if let Some(issue_id) = issue_id {
            let result: Result<DeleteIssueData, _> = self
                .mutate(
                    "deleteIssue",
                    documents::DELETE_ISSUE,
                    json!({ "issueId": issue_id }),
                )
                .await;
            let result = result.and_then(|data| {
                data.payload
                    .map(|_| ())
                    .ok_or_else(|| AppError::validation("Failed to delete issue"))
            });
            if let Err(err) = self.record(result) {
                self.reconcile().await;
                return Err(err);
            }
        }
        self.reconcile().await;
        Ok(())
    }

    // Labels

    pub async fn create_label(
        &self,
        repository_id: &str,
        new: NewLabel,
    ) -> Result<Label, AppError> {
        let result = self.create_label_inner(repository_id, &new).await;
        let label = self.record(result)?;

        self.state.update(|s| {
            let linked: Vec<String> = s
                .projects
                .iter()
                .filter(|p| p.repositories.iter().any(|r| r.id == repository_id))
                .map(|p| p.id.clone())
                .collect();
            for repository in s.repositories_mut(repository_id) {
                repository.labels.push(label.clone());
            }
            for project in s.projects.iter_mut().filter(|p| linked.contains(&p.id)) {
                if !project.labels.iter().any(|l| l.id == label.id) {
                    project.labels.push(label.clone());
                }
            }
        });
        self.reconcile().await;
        Ok(label)
    }

    async fn create_label_inner(
        &self,
        repository_id: &str,
        new: &NewLabel,
    ) -> Result<Label, AppError> {
        let name = require_text(&new.name, "Label name")?;
        let data: CreateLabelData = self
            .mutate(
                "createLabel",
                documents::CREATE_LABEL,
                json!({
                    "repositoryId": repository_id,
                    "name": name,
                    "color": provider_color(&new.color),
                    "description": new.description,
                }),
            )
            .await?;
        data.payload
            .and_then(|p| p.label)
            .filter(|l| l.id.is_some())
            .map(|l| map_label(&l))
            .ok_or_else(|| AppError::validation("Failed to create label"))
    }

    pub async fn update_label(
        &self,
        label_id: &str,
        update: LabelUpdate,
    ) -> Result<Label, AppError> {
        let result: Result<UpdateLabelData, _> = self
            .mutate(
                "updateLabel",
                documents::UPDATE_LABEL,
                json!({
                    "id": label_id,
                    "name": update.name,
                    "color": update.color.as_deref().map(provider_color),
                    "description": update.description,
                }),
            )
            .await;
        let result = result.and_then(|data| {
            data.payload
                .and_then(|p| p.label)
                .map(|l| map_label(&l))
                .ok_or_else(|| AppError::validation("Failed to update label"))
        });
        let mut label = self.record(result)?;
        if label.id.is_empty() {
            label.id = label_id.to_string();
        }

        self.state.update(|s| for_each_label(s, label_id, |l| *l = label.clone()));
        self.reconcile().await;
        Ok(label)
    }

    pub async fn delete_label(&self, label_id: &str) -> Result<(), AppError> {
        let result: Result<DeleteLabelData, _> = self
            .mutate(
                "deleteLabel",
                documents::DELETE_LABEL,
                json!({ "id": label_id }),
            )
            .await;
        let result = result.and_then(|data| {
            data.payload
                .map(|_| ())
                .ok_or_else(|| AppError::validation("Failed to delete label"))
        });
        self.record(result)?;

        self.state.update(|s| {
            for repository in s
                .repositories
                .iter_mut()
                .chain(s.projects.iter_mut().flat_map(|p| p.repositories.iter_mut()))
            {
                repository.labels.retain(|l| l.id != label_id);
            }
            for project in &mut s.projects {
                project.labels.retain(|l| l.id != label_id);
                for issue in &mut project.issues {
                    issue.labels.retain(|l| l.id != label_id);
                }
            }
        });
        self.reconcile().await;
        Ok(())
    }

    // Collaborators

    /// Fetch a repository's collaborators and merge them into every copy
    /// of the repository and into the projects linking it.
    pub async fn fetch_collaborators(
        &self,
        repository_id: &str,
    ) -> Result<Vec<RepositoryCollaborator>, AppError> {
        let result = self
            .transport
            .query(
                documents::REPOSITORY_COLLABORATORS_QUERY,
                json!({ "id": repository_id }),
            )
            .await
            .decode::<RawCollaboratorsData>();
        let raw = self.record(result)?;

        let viewer = self
            .read(|s| s.user.as_ref().map(|u| u.login.clone()))
            .unwrap_or_default();
        let collaborators = map_collaborators(raw, &viewer);
        tracing::debug!(repository_id, count = collaborators.len(), "collaborators loaded");

        self.collaborators
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(repository_id.to_string(), collaborators.clone());
        self.state
            .update(|s| merge_collaborators(s, repository_id, &collaborators));
        Ok(collaborators)
    }
}

fn require_text<'a>(value: &'a str, what: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{what} cannot be empty")));
    }
    Ok(trimmed)
}

fn for_each_label(state: &mut ProjectState, label_id: &str, mut f: impl FnMut(&mut Label)) {
    let repo_labels = state
        .repositories
        .iter_mut()
        .chain(state.projects.iter_mut().flat_map(|p| p.repositories.iter_mut()))
        .flat_map(|r| r.labels.iter_mut());
    for label in repo_labels.filter(|l| l.id == label_id) {
        f(label);
    }
    for project in &mut state.projects {
        let project_labels = project
            .labels
            .iter_mut()
            .chain(project.issues.iter_mut().flat_map(|i| i.labels.iter_mut()));
        for label in project_labels.filter(|l| l.id == label_id) {
            f(label);
        }
    }
}

fn merge_collaborators(
    state: &mut ProjectState,
    repository_id: &str,
    collaborators: &[RepositoryCollaborator],
) {
    for repository in state.repositories_mut(repository_id) {
        repository.collaborators = Some(collaborators.to_vec());
    }
    for project in &mut state.projects {
        if !project.repositories.iter().any(|r| r.id == repository_id) {
            continue;
        }
        for collaborator in collaborators {
            if !project.collaborators.iter().any(|c| c.id == collaborator.id) {
                project.collaborators.push(collaborator.clone());
            }
        }
    }
}
