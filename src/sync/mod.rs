//! Fetch-cache-retry orchestration for the combined query.
//!
//! At most one combined fetch runs at a time. It runs on its own task, so
//! a caller that stops waiting never cancels it; every caller that asked
//! while it was running receives the same result. A forced caller that
//! arrives mid-fetch waits for one queued follow-up fetch instead.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::SyncConfig;
use crate::error::AppError;
use crate::github::documents::{
    APP_DATA_QUERY, ITEM_PAGE_SIZE, PROJECT_PAGE_SIZE, REPOSITORY_PAGE_SIZE,
};
use crate::github::raw::RawAppData;
use crate::github::Transport;
use crate::mapper::map_app_data;
use crate::model::{AppData, Column, BoardIssue, Label, Project, Repository};

#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    pub cache_ttl: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub wait_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from(&SyncConfig::default())
    }
}

impl From<&SyncConfig> for SyncSettings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            cache_ttl: config.cache_ttl(),
            max_retries: config.max_retries,
            backoff_base: config.backoff_base(),
            wait_timeout: config.wait_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncState {
    Idle,
    Initializing,
    Initialized,
    Failed(AppError),
}

pub type SyncResult = Result<Arc<AppData>, AppError>;

/// `2^attempt * base`, attempt counted from 1.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

struct Cached {
    data: Arc<AppData>,
    at: Instant,
}

type ResultTx = watch::Sender<Option<SyncResult>>;
type ResultRx = watch::Receiver<Option<SyncResult>>;

struct Shared {
    state: SyncState,
    cached: Option<Cached>,
    in_flight: Option<ResultRx>,
    queued: Option<(ResultTx, ResultRx)>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    settings: SyncSettings,
    shared: Mutex<Shared>,
}

#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn Transport>, settings: SyncSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                settings,
                shared: Mutex::new(Shared {
                    state: SyncState::Idle,
                    cached: None,
                    in_flight: None,
                    queued: None,
                }),
            }),
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.inner.settings
    }

    pub async fn initialize(&self, force_refresh: bool) -> SyncResult {
        let (rx, joined) = {
            let mut shared = self.inner.lock();

            if !force_refresh {
                if let Some(cached) = &shared.cached {
                    if cached.at.elapsed() < self.inner.settings.cache_ttl {
                        tracing::debug!("serving cached app data");
                        return Ok(cached.data.clone());
                    }
                }
            }

            match (shared.in_flight.clone(), force_refresh) {
                (Some(rx), false) => (rx, true),
                (Some(_), true) => {
                    let (_, rx) = shared
                        .queued
                        .get_or_insert_with(|| watch::channel(None));
                    (rx.clone(), true)
                }
                (None, _) => {
                    let (tx, rx) = watch::channel(None);
                    shared.in_flight = Some(rx.clone());
                    shared.state = SyncState::Initializing;
                    let inner = self.inner.clone();
                    tokio::spawn(inner.refresh(tx));
                    (rx, false)
                }
            }
        };

        if !joined {
            return wait_for_result(rx).await;
        }

        tracing::debug!("joining initialization in progress");
        let limit = self.inner.settings.wait_timeout;
        match tokio::time::timeout(limit, wait_for_result(rx)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(waited_secs = limit.as_secs(), "gave up waiting for initialization");
                Err(AppError::Timeout {
                    waited_secs: limit.as_secs(),
                })
            }
        }
    }

    /// Drop the cached snapshot and any recorded failure. A fetch in
    /// flight keeps running and still publishes its result.
    pub fn reset(&self) {
        let mut shared = self.inner.lock();
        shared.cached = None;
        if shared.in_flight.is_none() {
            shared.state = SyncState::Idle;
        }
        tracing::info!("sync cache reset");
    }

    pub fn state(&self) -> SyncState {
        self.inner.lock().state.clone()
    }

    pub fn last_error(&self) -> Option<AppError> {
        match self.state() {
            SyncState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<Arc<AppData>> {
        self.inner.lock().cached.as_ref().map(|c| c.data.clone())
    }

    pub fn project_by_id(&self, project_id: &str) -> Option<Project> {
        self.snapshot()?.project(project_id).cloned()
    }

    pub fn project_columns(&self, project_id: &str) -> Vec<Column> {
        self.project_by_id(project_id)
            .map(|p| p.columns)
            .unwrap_or_default()
    }

    pub fn project_issues(&self, project_id: &str) -> Vec<BoardIssue> {
        self.project_by_id(project_id)
            .map(|p| p.issues)
            .unwrap_or_default()
    }

    pub fn project_labels(&self, project_id: &str) -> Vec<Label> {
        self.project_by_id(project_id)
            .map(|p| p.labels)
            .unwrap_or_default()
    }

    pub fn repositories(&self) -> Vec<Repository> {
        self.snapshot()
            .map(|d| d.repositories.clone())
            .unwrap_or_default()
    }

    pub fn user_id(&self) -> Option<String> {
        self.snapshot()?.user.as_ref().map(|u| u.id.clone())
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn refresh(self: Arc<Self>, mut tx: ResultTx) {
        loop {
            let result = self.fetch_with_retry().await.map(Arc::new);
            let next = {
                let mut shared = self.lock();
                match &result {
                    Ok(data) => {
                        shared.cached = Some(Cached {
                            data: data.clone(),
                            at: Instant::now(),
                        });
                        shared.state = SyncState::Initialized;
                    }
                    Err(err) => shared.state = SyncState::Failed(err.clone()),
                }
                match shared.queued.take() {
                    Some((next_tx, next_rx)) => {
                        shared.in_flight = Some(next_rx);
                        shared.state = SyncState::Initializing;
                        Some(next_tx)
                    }
                    None => {
                        shared.in_flight = None;
                        None
                    }
                }
            };
            match &result {
                Ok(data) => tracing::info!(
                    repositories = data.repositories.len(),
                    projects = data.projects.len(),
                    "app data refreshed"
                ),
                Err(err) => tracing::error!(error = %err, "app data refresh failed"),
            }
            tx.send_replace(Some(result));
            match next {
                Some(next_tx) => {
                    tracing::debug!("running queued follow-up refresh");
                    tx = next_tx;
                }
                None => break,
            }
        }
    }

    async fn fetch_with_retry(&self) -> Result<AppData, AppError> {
        let max_attempts = self.settings.max_retries.max(1);
        let mut attempt = 1;
        loop {
            match self.fetch_once().await {
                Ok(data) => return Ok(data),
                Err(err) if err.is_rate_limit() => {
                    if attempt >= max_attempts {
                        tracing::error!(attempt, "rate limited on every attempt");
                        return Err(AppError::MaxRetries {
                            attempts: attempt,
                            message: err.to_string(),
                        });
                    }
                    let delay = backoff_delay(self.settings.backoff_base, attempt);
                    tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, "rate limited, backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn fetch_once(&self) -> Result<AppData, AppError> {
        let variables = json!({
            "repoCount": REPOSITORY_PAGE_SIZE,
            "projectCount": PROJECT_PAGE_SIZE,
            "itemCount": ITEM_PAGE_SIZE,
        });
        let raw: RawAppData = self
            .transport
            .query(APP_DATA_QUERY, variables)
            .await
            .decode()?;
        let data = map_app_data(raw, Utc::now());
        if data.user.is_none() {
            return Err(AppError::validation(
                "GitHub returned no viewer; check the access token",
            ));
        }
        Ok(data)
    }
}

async fn wait_for_result(mut rx: ResultRx) -> SyncResult {
    let result = match rx.wait_for(Option::is_some).await {
        Ok(published) => published.clone(),
        Err(_) => None,
    };
    result.unwrap_or_else(|| {
        Err(AppError::Transport {
            message: "initialization task ended without a result".into(),
        })
    })
}
