//! Pure translation from provider shapes to domain records.
//!
//! Mappers never fail: missing fields become empty strings, empty lists
//! or `None`.

pub mod issue;
pub mod label;
pub mod project;
pub mod repository;
pub mod user;

use chrono::{DateTime, Utc};

use crate::github::raw::{nodes, RawAppData};
use crate::model::AppData;

/// Name of the single-select field that defines board columns.
pub const STATUS_FIELD: &str = "Status";

pub fn map_app_data(raw: RawAppData, fetched_at: DateTime<Utc>) -> AppData {
    let Some(mut viewer) = raw.viewer else {
        return AppData {
            user: None,
            repositories: Vec::new(),
            projects: Vec::new(),
            fetched_at,
        };
    };

    let user = user::map_user(&viewer);
    let repositories = nodes(viewer.repositories.take())
        .map(|r| repository::map_repository(&r))
        .collect();
    let projects = nodes(viewer.projects.take())
        .map(project::map_project)
        .collect();

    AppData {
        user: Some(user),
        repositories,
        projects,
        fetched_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::sample_app_data;
    use crate::model::NO_STATUS_ID;

    fn sample() -> AppData {
        let raw: RawAppData = serde_json::from_value(sample_app_data()).unwrap();
        map_app_data(raw, Utc::now())
    }

    #[test]
    fn maps_the_sample_payload() {
        let data = sample();
        let user = data.user.as_ref().unwrap();
        assert_eq!(user.id, "U_1");
        assert_eq!(user.login, "octocat");
        assert_eq!(user.email, None);
        assert_eq!(data.repositories.len(), 1);
        assert_eq!(data.projects.len(), 1);

        let project = &data.projects[0];
        assert_eq!(project.name, "Roadmap");
        assert_eq!(project.status_field_id.as_deref(), Some("F_status"));
        let columns: Vec<_> = project.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(columns, vec!["No Status", "Todo", "In Progress", "Done"]);
        // the pull request item is skipped
        assert_eq!(project.issues.len(), 3);
        assert_eq!(project.labels.len(), 2);
    }

    #[test]
    fn every_issue_resolves_to_a_project_column() {
        let data = sample();
        for project in &data.projects {
            assert_eq!(project.columns[0].id, NO_STATUS_ID);
            assert_eq!(
                project.columns.iter().filter(|c| c.id == NO_STATUS_ID).count(),
                1
            );
            for issue in &project.issues {
                assert!(project.column(&issue.column_id).is_some(), "{}", issue.id);
            }
        }
        let project = &data.projects[0];
        assert_eq!(project.issue("PVTI_1").unwrap().column_name, "In Progress");
        assert_eq!(project.issue("PVTI_2").unwrap().column_id, NO_STATUS_ID);
        assert_eq!(project.issue("PVTI_3").unwrap().column_id, NO_STATUS_ID);
    }

    #[test]
    fn all_label_colors_are_normalized() {
        let data = sample();
        let colors = data
            .repositories
            .iter()
            .flat_map(|r| r.labels.iter())
            .chain(data.projects.iter().flat_map(|p| p.labels.iter()))
            .chain(
                data.projects
                    .iter()
                    .flat_map(|p| p.issues.iter().flat_map(|i| i.labels.iter())),
            )
            .map(|l| l.color.clone());
        for color in colors {
            assert!(color.starts_with('#') && color.len() == 7, "{color}");
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn missing_viewer_gives_empty_snapshot() {
        let data = map_app_data(RawAppData::default(), Utc::now());
        assert!(data.user.is_none());
        assert!(data.projects.is_empty());
    }
}
