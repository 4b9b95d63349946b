//! HTTP client for the JamAI Base API: file upload and action-table row insertion.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    AnalysisService, FileUploadResponse, MultiRowAddRequest, MultiRowAddResponse, RemoteError,
};
use crate::config::Config;

const UPLOAD_FILE_ENDPOINT: &str = "/api/v1/files/upload";
const ADD_ACTION_ROWS_ENDPOINT: &str = "/api/v1/gen_tables/action/rows/add";
const PROJECT_ID_HEADER: &str = "X-PROJECT-ID";
/// Delay before the first retry. Doubles per attempt up to `MAX_BACKOFF_SHIFT` doublings.
const BACKOFF_BASE: Duration = Duration::from_secs(1);
const MAX_BACKOFF_SHIFT: u32 = 6;

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Value,
}

impl ApiErrorBody {
    fn message(self) -> String {
        match self.detail {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

/// The `detail` of an error body, or the raw body when it is not JSON.
async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ApiErrorBody>(&body)
        .map(ApiErrorBody::message)
        .unwrap_or(body)
}

/// Client for one JamAI project, authenticated with a personal access token.
#[derive(Clone)]
pub struct JamAiClient {
    client: Client,
    base_url: String,
    project_id: String,
    token: String,
    max_retries: u32,
    backoff_base: Duration,
}

impl JamAiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.remote_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.jamai_api_base.clone(),
            project_id: config.jamai_project_id.clone(),
            token: config.jamai_pat.clone(),
            max_retries: config.remote_max_retries,
            backoff_base: BACKOFF_BASE,
        })
    }

    #[cfg(test)]
    fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(PROJECT_ID_HEADER, &self.project_id)
    }

    /// Sends the request built by `build`, retrying only when the service answers 429.
    /// Row inserts are not idempotent, so every other failure is returned immediately.
    async fn send_with_retry<F>(&self, build: F) -> Result<Response, RemoteError>
    where
        F: Fn() -> Result<RequestBuilder, RemoteError> + Send + Sync,
    {
        let mut last_message = String::new();

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let shift = (attempt - 1).min(MAX_BACKOFF_SHIFT);
                let delay = self.backoff_base * (1u32 << shift);
                warn!(
                    "Remote call rate limited (attempt {}), retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = build()?.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                last_message = error_message(response).await;
                continue;
            }

            if !status.is_success() {
                return Err(RemoteError::Api {
                    status: status.as_u16(),
                    message: error_message(response).await,
                });
            }

            return Ok(response);
        }

        Err(RemoteError::RateLimited {
            retries: self.max_retries,
            message: last_message,
        })
    }
}

#[async_trait]
impl AnalysisService for JamAiClient {
    async fn upload_file(&self, path: &Path) -> Result<FileUploadResponse, RemoteError> {
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        let mime = content_type_for(&file_name);
        let url = self.url(UPLOAD_FILE_ENDPOINT);

        debug!("Uploading {} ({} bytes) to {}", file_name, content.len(), url);

        let response = self
            .send_with_retry(|| {
                let part = Part::bytes(content.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)?;
                Ok(self.authorized(self.client.post(&url).multipart(Form::new().part("file", part))))
            })
            .await?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn add_action_rows(
        &self,
        request: &MultiRowAddRequest,
    ) -> Result<MultiRowAddResponse, RemoteError> {
        let url = self.url(ADD_ACTION_ROWS_ENDPOINT);

        debug!(
            "Adding {} row(s) to action table {}",
            request.data.len(),
            request.table_id
        );

        let response = self
            .send_with_retry(|| Ok(self.authorized(self.client.post(&url).json(request))))
            .await?;

        let body = response.text().await?;
        let parsed: MultiRowAddResponse = serde_json::from_str(&body)?;

        debug!("Action table returned {} row(s)", parsed.rows.len());
        Ok(parsed)
    }
}

/// MIME type sent with the multipart upload, keyed on the file extension.
fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
