pub mod board;
pub mod project;
pub mod search;

use serde::Serialize;
use tokio::sync::watch;

use crate::error::AppError;

pub use board::{BoardColumn, BoardStore};
pub use project::{LabelUpdate, NewIssue, NewLabel, ProjectState, ProjectStore, ProjectUpdate};
pub use search::{SearchFilters, SearchHit, SearchStore};

/// State container that notifies subscribers on every change.
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    RateLimit,
    Timeout,
    Validation,
    Network,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AppError> for StoreError {
    fn from(err: &AppError) -> Self {
        let kind = match err {
            AppError::RateLimit { .. } | AppError::MaxRetries { .. } => ErrorKind::RateLimit,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            AppError::Validation { .. } | AppError::NotFound { .. } => ErrorKind::Validation,
            AppError::Transport { .. } => ErrorKind::Network,
            AppError::Config { .. } => ErrorKind::Other,
        };
        Self {
            kind,
            message: err.user_message(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    pub loading: bool,
    pub error: Option<StoreError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RATE_LIMIT_MESSAGE;

    #[test]
    fn observable_notifies_subscribers() {
        let value = Observable::new(1);
        let mut rx = value.subscribe();
        assert!(!rx.has_changed().unwrap());

        value.update(|v| *v += 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 2);
        assert_eq!(value.get(), 2);
        assert_eq!(value.read(|v| v * 10), 20);
    }

    #[test]
    fn rate_limit_errors_get_their_own_kind_and_message() {
        let err = StoreError::from(&AppError::MaxRetries {
            attempts: 5,
            message: "rate limit".into(),
        });
        assert_eq!(err.kind, ErrorKind::RateLimit);
        assert_eq!(err.message, RATE_LIMIT_MESSAGE);

        let err = StoreError::from(&AppError::from_transport("API rate limit exceeded"));
        assert_eq!(err.kind, ErrorKind::RateLimit);
    }

    #[test]
    fn other_errors_are_classified() {
        let err = StoreError::from(&AppError::validation("Failed to create project"));
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Failed to create project");
        assert_eq!(
            StoreError::from(&AppError::Timeout { waited_secs: 30 }).kind,
            ErrorKind::Timeout
        );
        assert_eq!(
            StoreError::from(&AppError::from_transport("connection reset")).kind,
            ErrorKind::Network
        );
    }

    #[test]
    fn response_shape_mismatch_is_not_a_network_error() {
        let decode = serde_json::from_str::<u32>("\"three\"").unwrap_err();
        let err = StoreError::from(&AppError::from(decode));
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.starts_with("Unexpected response shape"));
    }
}
