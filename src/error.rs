//! Error types shared by the transport, the orchestrator and the stores.
//!
//! Errors are `Clone` because a single fetch result is handed to every
//! caller waiting on it.

use serde::Serialize;
use thiserror::Error;

/// Substrings that mark a provider message as a rate-limit failure.
const RATE_LIMIT_MARKERS: &[&str] = &["rate limit", "secondary rate", "abuse detection"];

pub const RATE_LIMIT_MESSAGE: &str =
    "GitHub API rate limit exceeded. Please wait a moment and try again.";

#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    #[error("GitHub API error: {message}")]
    Transport { message: String },

    #[error("Rate limit error: {message}")]
    RateLimit { message: String },

    #[error("max retries reached after {attempts} attempts: {message}")]
    MaxRetries { attempts: u32, message: String },

    #[error("Timed out after {waited_secs}s waiting for initialization in progress")]
    Timeout { waited_secs: u64 },

    #[error("{message}")]
    Validation { message: String },

    #[error("Not found: {resource} {id}")]
    NotFound { resource: String, id: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl AppError {
    pub fn from_transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_rate_limit_message(&message) {
            Self::RateLimit { message }
        } else {
            Self::Transport { message }
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimit { .. } | Self::MaxRetries { .. })
    }

    pub fn user_message(&self) -> String {
        if self.is_rate_limit() {
            RATE_LIMIT_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

pub fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    RATE_LIMIT_MARKERS.iter().any(|m| lower.contains(m))
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(format!("Unexpected response shape: {err}"))
    }
}
