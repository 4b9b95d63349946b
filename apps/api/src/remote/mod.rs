//! Remote analysis service: the managed table pipeline that scores, profiles,
//! summarizes and translates a resume.
//!
//! ARCHITECTURAL RULE: handlers never talk to the remote service directly.
//! Everything goes through `AnalysisService`, held in `AppState` as
//! `Arc<dyn AnalysisService>` so tests can swap in an in-process fake.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[cfg(test)]
pub mod fake;
pub mod jamai;

pub use jamai::JamAiClient;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries: {message}")]
    RateLimited { retries: u32, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Could not read staged file: {0}")]
    Io(#[from] std::io::Error),
}

/// Response of the file upload operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUploadResponse {
    #[serde(default)]
    pub uri: Option<String>,
}

/// Single-shot (non-streaming) row insert against an action table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiRowAddRequest {
    pub table_id: String,
    pub data: Vec<Map<String, Value>>,
    pub stream: bool,
}

/// One completed row. Cells are kept as raw JSON and decoded by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowCompletion {
    #[serde(default)]
    pub row_id: Option<String>,
    #[serde(default)]
    pub columns: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MultiRowAddResponse {
    #[serde(default)]
    pub rows: Vec<RowCompletion>,
}

/// The two remote operations the analyzer depends on.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Uploads a local file and returns the service's reference to it.
    async fn upload_file(&self, path: &Path) -> Result<FileUploadResponse, RemoteError>;

    /// Adds rows to an action table and blocks until every output column is computed.
    async fn add_action_rows(
        &self,
        request: &MultiRowAddRequest,
    ) -> Result<MultiRowAddResponse, RemoteError>;
}
