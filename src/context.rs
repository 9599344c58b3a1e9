use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, TOKEN_ENV};
use crate::error::AppError;
use crate::github::{GitHubClient, Transport};
use crate::store::{BoardStore, ProjectStore, SearchStore};
use crate::sync::{Orchestrator, SyncSettings};

pub struct AppContext {
    pub sync: Orchestrator,
    pub projects: Arc<ProjectStore>,
    pub board: BoardStore,
    pub search: SearchStore,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let token = config.token().ok_or_else(|| {
            AppError::config(format!(
                "No GitHub token. Set {TOKEN_ENV} or add token to [github] in ~/.projboard/config.toml"
            ))
        })?;
        let client = GitHubClient::new(
            config.github.endpoint.clone(),
            token,
            Duration::from_secs(config.github.timeout_secs),
        )?;
        Ok(Self::with_transport(
            Arc::new(client),
            SyncSettings::from(&config.sync),
        ))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, settings: SyncSettings) -> Self {
        let sync = Orchestrator::new(transport.clone(), settings);
        let projects = Arc::new(ProjectStore::new(transport, sync.clone()));
        let board = BoardStore::new(projects.clone());
        let search = SearchStore::new(&projects);
        Self {
            sync,
            projects,
            board,
            search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::MockTransport;

    #[tokio::test(start_paused = true)]
    async fn stores_share_one_orchestrator() {
        let mock = Arc::new(MockTransport::serving_fixture());
        let ctx = AppContext::with_transport(mock.clone(), SyncSettings::default());

        ctx.projects.load(false).await.unwrap();
        assert!(ctx.sync.snapshot().is_some());
        ctx.board.select_project(Some("P_1"));
        assert_eq!(ctx.board.columns().len(), 4);
        assert_eq!(ctx.search.results().len(), 3);
        assert_eq!(mock.query_count(), 1);
    }

    #[test]
    fn missing_token_is_a_config_error() {
        if std::env::var(TOKEN_ENV).is_ok() {
            return;
        }
        let err = AppContext::new(&AppConfig::default()).err().unwrap();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
