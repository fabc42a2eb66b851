//! ClickUp API client implementation.
//!
//! This module provides the HTTP client for creating tasks through the
//! ClickUp REST API. Every call is a single request: no retries.

use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::{ClickUpError, HelmfixError, Result};

use super::types::{CreateTaskRequest, Task};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// ClickUp API client.
#[derive(Debug, Clone)]
pub struct ClickUpClient {
    /// HTTP client.
    client: Client,
    /// API base URL without trailing slash.
    api_url: String,
    /// Personal API token, sent verbatim in `Authorization`.
    token: String,
}

impl ClickUpClient {
    /// Creates a client against an API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(token: &str, api_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClickUpError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Creates a task in a list.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, on a non-success status (with the
    /// response body), or when the response has no task id.
    pub async fn create_task(&self, list_id: &str, request: &CreateTaskRequest) -> Result<Task> {
        let url = task_endpoint(&self.api_url, list_id);
        debug!("Creating task '{}' in list {list_id}", request.name);
        trace!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, &self.token)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                HelmfixError::ClickUp(ClickUpError::NetworkError {
                    message: format!("Request failed: {e}"),
                })
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            HelmfixError::ClickUp(ClickUpError::NetworkError {
                message: format!("Failed to read response body: {e}"),
            })
        })?;

        if !status.is_success() {
            return Err(HelmfixError::ClickUp(ClickUpError::api_error(
                status.as_u16(),
                body,
            )));
        }

        parse_task(&body)
    }
}

/// Returns the endpoint creating tasks in `list_id`.
#[must_use]
pub fn task_endpoint(api_url: &str, list_id: &str) -> String {
    format!("{}/list/{list_id}/task", api_url.trim_end_matches('/'))
}

/// Extracts the created task from a response body.
fn parse_task(body: &str) -> Result<Task> {
    let json: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        HelmfixError::ClickUp(ClickUpError::InvalidResponse {
            message: format!("Failed to parse response: {e}"),
        })
    })?;

    let Some(id) = json.get("id").and_then(serde_json::Value::as_str) else {
        return Err(HelmfixError::ClickUp(ClickUpError::InvalidResponse {
            message: String::from("Task ID not found in response"),
        }));
    };

    let text = |key: &str| json.get(key).and_then(serde_json::Value::as_str).map(str::to_string);

    Ok(Task {
        id: id.to_string(),
        name: text("name"),
        url: text("url"),
    })
}
