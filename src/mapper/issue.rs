use crate::github::raw::{nodes, Connection, RawFieldValue, RawItemContent, RawProjectItem};
use crate::model::{BoardIssue, Column, NO_STATUS_ID, NO_STATUS_NAME};

use super::label::map_label;
use super::user::{map_actor, non_empty};
use super::STATUS_FIELD;

/// Map a project item. Pull requests and redacted items yield `None`.
///
/// `columns` must already hold the project's full column list.
pub fn map_item(raw: RawProjectItem, columns: &[Column]) -> Option<BoardIssue> {
    let (column_id, column_name) = resolve_status(raw.field_values, columns);
    let item_id = raw.id.unwrap_or_default();

    match raw.content? {
        RawItemContent::Issue(issue) => Some(BoardIssue {
            id: item_id,
            issue_id: issue.id,
            title: issue.title.unwrap_or_default(),
            body: non_empty(&issue.body),
            number: issue.number,
            url: issue.url,
            repository: issue.repository.and_then(|r| r.name_with_owner),
            column_id,
            column_name,
            labels: nodes(issue.labels).map(|l| map_label(&l)).collect(),
            author: issue.author.as_ref().map(|a| map_actor(Some(a))),
            assignees: nodes(issue.assignees).map(|a| map_actor(Some(&a))).collect(),
            created_at: issue.created_at.or(raw.created_at).unwrap_or_default(),
            updated_at: issue.updated_at.or(raw.updated_at).unwrap_or_default(),
            is_draft: false,
        }),
        RawItemContent::DraftIssue(draft) => Some(BoardIssue {
            id: item_id,
            issue_id: None,
            title: draft.title.unwrap_or_default(),
            body: non_empty(&draft.body),
            number: None,
            url: None,
            repository: None,
            column_id,
            column_name,
            labels: Vec::new(),
            author: draft.creator.as_ref().map(|a| map_actor(Some(a))),
            assignees: nodes(draft.assignees).map(|a| map_actor(Some(&a))).collect(),
            created_at: draft.created_at.or(raw.created_at).unwrap_or_default(),
            updated_at: draft.updated_at.or(raw.updated_at).unwrap_or_default(),
            is_draft: true,
        }),
        RawItemContent::Other => None,
    }
}

pub fn resolve_status(
    field_values: Option<Connection<RawFieldValue>>,
    columns: &[Column],
) -> (String, String) {
    let option_id = nodes(field_values).find_map(|value| match value {
        RawFieldValue::ProjectV2ItemFieldSingleSelectValue(v)
            if v.field.as_ref().and_then(|f| f.name.as_deref()) == Some(STATUS_FIELD) =>
        {
            v.option_id
        }
        _ => None,
    });

    option_id
        .and_then(|id| columns.iter().find(|c| c.id == id))
        .map(|c| (c.id.clone(), c.name.clone()))
        .unwrap_or_else(|| (NO_STATUS_ID.to_string(), NO_STATUS_NAME.to_string()))
}
