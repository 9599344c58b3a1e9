use crate::github::raw::{nodes, RawCollaboratorsData, RawRepository};
use crate::model::{Permission, Repository, RepositoryCollaborator};

use super::label::map_label;
use super::user::{map_actor, non_empty};

pub fn map_repository(raw: &RawRepository) -> Repository {
    let name = raw.name.clone().unwrap_or_default();
    let owner = map_actor(raw.owner.as_ref());
    let name_with_owner = raw.name_with_owner.clone().unwrap_or_else(|| {
        if owner.login.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", owner.login, name)
        }
    });

    Repository {
        id: raw.id.clone().unwrap_or_default(),
        name,
        name_with_owner,
        owner,
        description: non_empty(&raw.description),
        html_url: raw.url.clone().unwrap_or_default(),
        created_at: raw.created_at.clone().unwrap_or_default(),
        labels: nodes(raw.labels.clone()).map(|l| map_label(&l)).collect(),
        collaborators: None,
    }
}

pub fn map_collaborators(raw: RawCollaboratorsData, viewer_login: &str) -> Vec<RepositoryCollaborator> {
    raw.node
        .and_then(|repo| repo.collaborators)
        .map(|conn| conn.edges)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(|edge| {
            let user = edge.node?;
            let login = user.login.unwrap_or_default();
            Some(RepositoryCollaborator {
                id: user.id.unwrap_or_default(),
                is_current_user: !login.is_empty() && login == viewer_login,
                login,
                avatar_url: user.avatar_url.unwrap_or_default(),
                permission: edge
                    .permission
                    .as_deref()
                    .map(Permission::from_provider)
                    .unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_repository() {
        let repo = map_repository(&RawRepository::default());
        assert_eq!(repo.id, "");
        assert_eq!(repo.html_url, "");
        assert!(repo.labels.is_empty());
        assert_eq!(repo.collaborators, None);
    }

    #[test]
    fn derives_name_with_owner() {
        let raw: RawRepository = serde_json::from_value(json!({
            "id": "R_1", "name": "widgets", "owner": { "login": "octocat" }
        }))
        .unwrap();
        assert_eq!(map_repository(&raw).name_with_owner, "octocat/widgets");
    }

    #[test]
    fn maps_collaborators_and_marks_viewer() {
        let raw: RawCollaboratorsData = serde_json::from_value(json!({
            "node": { "collaborators": { "edges": [
                { "permission": "ADMIN", "node": { "id": "U_1", "login": "octocat", "avatarUrl": "a" } },
                { "permission": "WRITE", "node": { "id": "U_2", "login": "hubot" } },
                { "permission": "READ", "node": null },
                null
            ]}}
        }))
        .unwrap();

        let collaborators = map_collaborators(raw, "octocat");
        assert_eq!(collaborators.len(), 2);
        assert_eq!(collaborators[0].permission, Permission::Admin);
        assert!(collaborators[0].is_current_user);
        assert_eq!(collaborators[1].permission, Permission::Write);
        assert!(!collaborators[1].is_current_user);
        assert_eq!(collaborators[1].avatar_url, "");
    }

    #[test]
    fn missing_collaborator_node_is_empty() {
        assert!(map_collaborators(RawCollaboratorsData::default(), "x").is_empty());
    }
}
