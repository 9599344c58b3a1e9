pub mod client;
pub mod documents;
pub mod raw;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

pub use client::GitHubClient;

/// Outcome of one GraphQL round trip. Failures are carried in `error`,
/// never raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GqlResponse {
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl GqlResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<Value, AppError> {
        if let Some(message) = self.error {
            return Err(AppError::from_transport(message));
        }
        match self.data {
            Some(Value::Null) | None => Err(AppError::Transport {
                message: "Empty response from GitHub".into(),
            }),
            Some(data) => Ok(data),
        }
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, AppError> {
        let data = self.into_result()?;
        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn query(&self, document: &str, variables: Value) -> GqlResponse;
    async fn mutation(&self, document: &str, variables: Value) -> GqlResponse;
}

#[cfg(test)]
pub mod mock;
