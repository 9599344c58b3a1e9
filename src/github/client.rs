use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::{GqlResponse, Transport};
use crate::error::{is_rate_limit_message, AppError};

pub struct GitHubClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GitHubClient {
    pub fn new(endpoint: String, token: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("projboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    async fn execute(&self, document: &str, variables: Value) -> GqlResponse {
        let body = serde_json::json!({ "query": document, "variables": variables });
        let resp = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "GitHub request failed");
                return GqlResponse::err(format!("GitHub request failed: {e}"));
            }
        };

        let status = resp.status();
        let quota_exhausted = resp
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => return GqlResponse::err(format!("Failed to read GitHub response: {e}")),
        };

        let result = parse_body(status, quota_exhausted, &text);
        match &result.error {
            Some(message) => tracing::warn!(%status, %message, "GraphQL call failed"),
            None => tracing::debug!(%status, bytes = text.len(), "GraphQL call succeeded"),
        }
        result
    }
}

#[async_trait]
impl Transport for GitHubClient {
    async fn query(&self, document: &str, variables: Value) -> GqlResponse {
        self.execute(document, variables).await
    }

    async fn mutation(&self, document: &str, variables: Value) -> GqlResponse {
        self.execute(document, variables).await
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GqlError>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct GqlError {
    message: String,
}

fn parse_body(status: StatusCode, quota_exhausted: bool, text: &str) -> GqlResponse {
    let envelope: Option<Envelope> = serde_json::from_str(text).ok();

    if !status.is_success() {
        let mut message = envelope
            .as_ref()
            .and_then(|e| {
                e.message
                    .clone()
                    .or_else(|| e.errors.first().map(|err| err.message.clone()))
            })
            .unwrap_or_else(|| text.trim().chars().take(200).collect());
        let throttled = status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && quota_exhausted);
        if throttled && !is_rate_limit_message(&message) {
            message = format!("API rate limit exceeded ({message})");
        }
        return GqlResponse::err(format!("HTTP {}: {message}", status.as_u16()));
    }

    let Some(envelope) = envelope else {
        return GqlResponse::err("Failed to parse GitHub response as JSON");
    };

    if !envelope.errors.is_empty() {
        let message = envelope
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return GqlResponse {
            data: envelope.data,
            error: Some(message),
        };
    }

    match envelope.data {
        Some(data) => GqlResponse::ok(data),
        None => GqlResponse::err("No data in GitHub response"),
    }
}
