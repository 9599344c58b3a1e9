use std::collections::HashSet;

use crate::github::raw::{nodes, Connection, RawField, RawProject};
use crate::model::{Column, ColumnType, Label, Project, Repository, NO_STATUS_ID};

use super::issue::map_item;
use super::repository::map_repository;
use super::user::{map_actor, non_empty};
use super::STATUS_FIELD;

pub fn map_project(raw: RawProject) -> Project {
    // Issues resolve their status against the finished column list.
    let (status_field_id, columns) = build_columns(raw.fields);

    let repositories: Vec<Repository> = nodes(raw.repositories)
        .map(|r| map_repository(&r))
        .collect();
    let labels = collect_labels(&repositories);

    let issues = nodes(raw.items)
        .filter_map(|item| map_item(item, &columns))
        .collect();

    Project {
        id: raw.id.unwrap_or_default(),
        number: raw.number.unwrap_or_default(),
        name: raw.title.unwrap_or_default(),
        description: non_empty(&raw.short_description),
        created_at: raw.created_at.unwrap_or_default(),
        updated_at: raw.updated_at.unwrap_or_default(),
        url: raw.url.unwrap_or_default(),
        closed: raw.closed.unwrap_or_default(),
        owner: map_actor(raw.owner.as_ref()),
        created_by: map_actor(raw.creator.as_ref()),
        status_field_id,
        columns,
        issues,
        repositories,
        collaborators: Vec::new(),
        labels,
    }
}

/// The no-status column followed by the options of the Status field.
pub fn build_columns(fields: Option<Connection<RawField>>) -> (Option<String>, Vec<Column>) {
    let mut columns = vec![Column::no_status()];

    let status = nodes(fields).find_map(|field| match field {
        RawField::ProjectV2SingleSelectField(f) if f.name.as_deref() == Some(STATUS_FIELD) => {
            Some(f)
        }
        _ => None,
    });
    let Some(status) = status else {
        return (None, columns);
    };

    let mut seen = HashSet::new();
    seen.insert(NO_STATUS_ID.to_string());
    for option in status.options {
        let Some(id) = option.id.filter(|id| !id.is_empty()) else {
            continue;
        };
        if !seen.insert(id.clone()) {
            continue;
        }
        let name = option.name.unwrap_or_default();
        columns.push(Column {
            column_type: ColumnType::infer(&name),
            id,
            name,
            field_id: status.id.clone(),
            field_name: status.name.clone(),
        });
    }

    (status.id, columns)
}

/// Labels of all linked repositories, first occurrence wins.
fn collect_labels(repositories: &[Repository]) -> Vec<Label> {
    let mut seen = HashSet::new();
    repositories
        .iter()
        .flat_map(|r| r.labels.iter())
        .filter(|l| seen.insert(l.id.clone()))
        .cloned()
        .collect()
}
