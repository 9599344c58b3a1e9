//! Provider response shapes, decoded once at the transport boundary.
//!
//! Every field is optional: GitHub nulls out anything the token cannot
//! see, and the mappers substitute defaults.

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` the same as a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_default")]
    pub nodes: Vec<Option<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> Connection<T> {
    pub fn from_nodes(nodes: Vec<T>) -> Self {
        Self {
            nodes: nodes.into_iter().map(Some).collect(),
        }
    }
}

pub fn nodes<T>(conn: Option<Connection<T>>) -> impl Iterator<Item = T> {
    conn.into_iter().flat_map(|c| c.nodes.into_iter().flatten())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAppData {
    pub viewer: Option<RawViewer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawViewer {
    pub id: Option<String>,
    pub login: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub website_url: Option<String>,
    pub twitter_username: Option<String>,
    pub repositories: Option<Connection<RawRepository>>,
    #[serde(rename = "projectsV2")]
    pub projects: Option<Connection<RawProject>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActor {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLabel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRepository {
    pub id: Option<String>,
    pub name: Option<String>,
    pub name_with_owner: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<String>,
    pub owner: Option<RawActor>,
    pub labels: Option<Connection<RawLabel>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    pub id: Option<String>,
    pub number: Option<u64>,
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub url: Option<String>,
    pub closed: Option<bool>,
    pub owner: Option<RawActor>,
    pub creator: Option<RawActor>,
    pub repositories: Option<Connection<RawRepository>>,
    pub fields: Option<Connection<RawField>>,
    pub items: Option<Connection<RawProjectItem>>,
}

/// `ProjectV2FieldConfiguration` union.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum RawField {
    ProjectV2SingleSelectField(RawSingleSelectField),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSingleSelectField {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub options: Vec<RawOption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOption {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProjectItem {
    pub id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub field_values: Option<Connection<RawFieldValue>>,
    pub content: Option<RawItemContent>,
}

/// `ProjectV2ItemFieldValue` union; only single-select values matter here.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum RawFieldValue {
    ProjectV2ItemFieldSingleSelectValue(RawSingleSelectValue),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSingleSelectValue {
    pub name: Option<String>,
    pub option_id: Option<String>,
    pub field: Option<RawFieldName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFieldName {
    pub name: Option<String>,
}

/// `ProjectV2ItemContent` union.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum RawItemContent {
    Issue(RawIssue),
    DraftIssue(RawDraftIssue),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
    pub id: Option<String>,
    pub number: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub author: Option<RawActor>,
    pub assignees: Option<Connection<RawActor>>,
    pub labels: Option<Connection<RawLabel>>,
    pub repository: Option<RawRepositoryRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRepositoryRef {
    pub name_with_owner: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDraftIssue {
    pub id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub creator: Option<RawActor>,
    pub assignees: Option<Connection<RawActor>>,
}

// Collaborators

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCollaboratorsData {
    pub node: Option<RawCollaboratorRepository>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCollaboratorRepository {
    pub collaborators: Option<RawCollaboratorConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCollaboratorConnection {
    #[serde(default, deserialize_with = "null_default")]
    pub edges: Vec<Option<RawCollaboratorEdge>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollaboratorEdge {
    pub permission: Option<String>,
    pub node: Option<RawCollaboratorUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollaboratorUser {
    pub id: Option<String>,
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}

// Mutation payloads. The outer `Option` is `None` when GitHub answers
// with a null payload.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNodeId {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectData {
    #[serde(rename = "createProjectV2")]
    pub payload: Option<CreateProjectPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[serde(rename = "projectV2")]
    pub project: Option<RawProject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectData {
    #[serde(rename = "updateProjectV2")]
    pub payload: Option<ProjectPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteProjectData {
    #[serde(rename = "deleteProjectV2")]
    pub payload: Option<ProjectPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPayload {
    #[serde(rename = "projectV2")]
    pub project: Option<RawNodeId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkRepositoryData {
    #[serde(rename = "linkProjectV2ToRepository")]
    pub payload: Option<RepositoryPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnlinkRepositoryData {
    #[serde(rename = "unlinkProjectV2FromRepository")]
    pub payload: Option<RepositoryPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteIssueData {
    #[serde(rename = "deleteIssue")]
    pub payload: Option<RepositoryPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryPayload {
    pub repository: Option<RawNodeId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateIssueData {
    #[serde(rename = "createIssue")]
    pub payload: Option<IssuePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIssueData {
    #[serde(rename = "updateIssue")]
    pub payload: Option<IssuePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePayload {
    pub issue: Option<RawIssue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddProjectItemData {
    #[serde(rename = "addProjectV2ItemById")]
    pub payload: Option<ItemPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPayload {
    pub item: Option<RawNodeId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemStatusData {
    #[serde(rename = "updateProjectV2ItemFieldValue")]
    pub payload: Option<ProjectItemPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearItemStatusData {
    #[serde(rename = "clearProjectV2ItemFieldValue")]
    pub payload: Option<ProjectItemPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItemPayload {
    #[serde(rename = "projectV2Item")]
    pub item: Option<RawNodeId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectItemData {
    #[serde(rename = "deleteProjectV2Item")]
    pub payload: Option<DeleteProjectItemPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectItemPayload {
    pub deleted_item_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLabelData {
    #[serde(rename = "createLabel")]
    pub payload: Option<LabelPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLabelData {
    #[serde(rename = "updateLabel")]
    pub payload: Option<LabelPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelPayload {
    pub label: Option<RawLabel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteLabelData {
    #[serde(rename = "deleteLabel")]
    pub payload: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_nodes_decode_as_empty() {
        let conn: Connection<RawLabel> = serde_json::from_value(json!({ "nodes": null })).unwrap();
        assert!(conn.nodes.is_empty());
        let conn: Connection<RawLabel> = serde_json::from_value(json!({})).unwrap();
        assert!(conn.nodes.is_empty());
    }

    #[test]
    fn unknown_typenames_fall_back_to_other() {
        let content: RawItemContent =
            serde_json::from_value(json!({ "__typename": "PullRequest", "id": "PR_1" })).unwrap();
        assert!(matches!(content, RawItemContent::Other));

        let value: RawFieldValue =
            serde_json::from_value(json!({ "__typename": "ProjectV2ItemFieldTextValue" })).unwrap();
        assert!(matches!(value, RawFieldValue::Other));
    }

    #[test]
    fn single_select_value_decodes() {
        let value: RawFieldValue = serde_json::from_value(json!({
            "__typename": "ProjectV2ItemFieldSingleSelectValue",
            "name": "In Progress",
            "optionId": "47fc9ee4",
            "field": { "name": "Status" }
        }))
        .unwrap();
        match value {
            RawFieldValue::ProjectV2ItemFieldSingleSelectValue(v) => {
                assert_eq!(v.option_id.as_deref(), Some("47fc9ee4"));
                assert_eq!(v.field.and_then(|f| f.name).as_deref(), Some("Status"));
            }
            RawFieldValue::Other => panic!("expected single select value"),
        }
    }

    #[test]
    fn nodes_skips_nulls() {
        let conn: Connection<RawActor> = serde_json::from_value(json!({
            "nodes": [{ "login": "a" }, null, { "login": "b" }]
        }))
        .unwrap();
        let logins: Vec<_> = nodes(Some(conn)).filter_map(|a| a.login).collect();
        assert_eq!(logins, vec!["a", "b"]);
    }
}
