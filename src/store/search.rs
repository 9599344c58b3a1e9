use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::{Observable, ProjectState, ProjectStore};
use crate::model::BoardIssue;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Matched against title, body and `#number`, ignoring case.
    pub query: String,
    pub label: Option<String>,
    pub column_id: Option<String>,
    pub project_id: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.label.is_none()
            && self.column_id.is_none()
            && self.project_id.is_none()
    }

    fn matches(&self, project_id: &str, issue: &BoardIssue) -> bool {
        if self.project_id.as_deref().is_some_and(|p| p != project_id) {
            return false;
        }
        if self.column_id.as_deref().is_some_and(|c| c != issue.column_id) {
            return false;
        }
        if let Some(label) = &self.label {
            if !issue.labels.iter().any(|l| l.name.eq_ignore_ascii_case(label)) {
                return false;
            }
        }
        matches_text(&self.query, issue)
    }
}

fn matches_text(query: &str, issue: &BoardIssue) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    if issue.title.to_lowercase().contains(&needle) {
        return true;
    }
    if issue
        .body
        .as_deref()
        .is_some_and(|b| b.to_lowercase().contains(&needle))
    {
        return true;
    }
    let number = needle.trim_start_matches('#');
    issue
        .number
        .is_some_and(|n| !number.is_empty() && n.to_string() == number)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub project_id: String,
    pub project_name: String,
    pub issue: BoardIssue,
}

struct Memo {
    projects: watch::Receiver<ProjectState>,
    filters: watch::Receiver<SearchFilters>,
    results: Option<Arc<Vec<SearchHit>>>,
}

/// Issue search across every loaded project. Results are recomputed only
/// when the project state or the filters change.
pub struct SearchStore {
    filters: Observable<SearchFilters>,
    memo: Mutex<Memo>,
}

impl SearchStore {
    pub fn new(projects: &ProjectStore) -> Self {
        let filters = Observable::new(SearchFilters::default());
        let memo = Memo {
            projects: projects.subscribe(),
            filters: filters.subscribe(),
            results: None,
        };
        Self {
            filters,
            memo: Mutex::new(memo),
        }
    }

    pub fn filters(&self) -> SearchFilters {
        self.filters.get()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.filters.update(|f| f.query = query);
    }

    pub fn set_label(&self, label: Option<String>) {
        self.filters.update(|f| f.label = label);
    }

    pub fn set_column(&self, column_id: Option<String>) {
        self.filters.update(|f| f.column_id = column_id);
    }

    pub fn set_project(&self, project_id: Option<String>) {
        self.filters.update(|f| f.project_id = project_id);
    }

    pub fn clear(&self) {
        self.filters.set(SearchFilters::default());
    }

    pub fn results(&self) -> Arc<Vec<SearchHit>> {
        let mut memo = self.memo.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // a closed channel counts as changed so we never serve stale hits
        let changed = memo.projects.has_changed().unwrap_or(true)
            | memo.filters.has_changed().unwrap_or(true);
        if let Some(results) = &memo.results {
            if !changed {
                return results.clone();
            }
        }

        let filters = memo.filters.borrow_and_update().clone();
        let hits = {
            let state = memo.projects.borrow_and_update();
            search(&state, &filters)
        };
        tracing::debug!(hits = hits.len(), "search results recomputed");
        let hits = Arc::new(hits);
        memo.results = Some(hits.clone());
        hits
    }
}

pub fn search(state: &ProjectState, filters: &SearchFilters) -> Vec<SearchHit> {
    state
        .projects
        .iter()
        .flat_map(|project| {
            project
                .issues
                .iter()
                .filter(|issue| filters.matches(&project.id, issue))
                .map(|issue| SearchHit {
                    project_id: project.id.clone(),
                    project_name: project.name.clone(),
                    issue: issue.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::MockTransport;
    use crate::model::NO_STATUS_ID;
    use crate::sync::{Orchestrator, SyncSettings};

    async fn loaded() -> (Arc<ProjectStore>, SearchStore) {
        let mock = Arc::new(MockTransport::serving_fixture());
        let sync = Orchestrator::new(mock.clone(), SyncSettings::default());
        let projects = Arc::new(ProjectStore::new(mock, sync));
        let search = SearchStore::new(&projects);
        projects.load(false).await.unwrap();
        (projects, search)
    }

    fn ids(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.issue.id.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn empty_filters_return_everything() {
        let (_projects, search) = loaded().await;
        assert!(search.filters().is_empty());
        assert_eq!(ids(&search.results()), ["PVTI_1", "PVTI_2", "PVTI_3"]);
        assert_eq!(search.results()[0].project_name, "Roadmap");
    }

    #[tokio::test(start_paused = true)]
    async fn query_matches_title_body_and_number() {
        let (_projects, search) = loaded().await;

        search.set_query("LOGIN");
        assert_eq!(ids(&search.results()), ["PVTI_1"]);

        search.set_query("sso is");
        assert_eq!(ids(&search.results()), ["PVTI_1"]);

        search.set_query("#8");
        assert_eq!(ids(&search.results()), ["PVTI_2"]);

        search.set_query("nothing like this");
        assert!(search.results().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn label_and_column_filters_combine() {
        let (_projects, search) = loaded().await;

        search.set_label(Some("Docs".into()));
        assert_eq!(ids(&search.results()), ["PVTI_2"]);

        search.set_label(None);
        search.set_column(Some(NO_STATUS_ID.into()));
        assert_eq!(ids(&search.results()), ["PVTI_2", "PVTI_3"]);

        search.set_project(Some("P_other".into()));
        assert!(search.results().is_empty());

        search.clear();
        assert_eq!(search.results().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn results_are_memoized_until_something_changes() {
        let (projects, search) = loaded().await;

        let first = search.results();
        assert!(Arc::ptr_eq(&first, &search.results()));

        projects.clear_error();
        let after_state_change = search.results();
        assert!(!Arc::ptr_eq(&first, &after_state_change));

        search.set_query("docs");
        assert!(!Arc::ptr_eq(&after_state_change, &search.results()));
    }
}
