//! In-process `AnalysisService` used by unit and router tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{
    AnalysisService, FileUploadResponse, MultiRowAddRequest, MultiRowAddResponse, RemoteError,
    RowCompletion,
};

pub struct FakeService {
    upload_uri: Option<String>,
    upload_error: Option<String>,
    submit_error: Option<String>,
    rows: Vec<Value>,
    upload_delay: Option<Duration>,
    panic_on_upload: bool,
    pub staged_paths: Mutex<Vec<PathBuf>>,
    pub staged_existed: Mutex<Vec<bool>>,
    pub requests: Mutex<Vec<MultiRowAddRequest>>,
    pub upload_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
}

impl FakeService {
    /// Uploads succeed and the table returns one row with the given columns.
    pub fn returning(columns: Value) -> Self {
        Self {
            upload_uri: Some("s3://file/raw/resume.pdf".to_string()),
            upload_error: None,
            submit_error: None,
            rows: vec![columns],
            upload_delay: None,
            panic_on_upload: false,
            staged_paths: Mutex::new(Vec::new()),
            staged_existed: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            upload_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
        }
    }

    /// A fully populated row.
    pub fn complete() -> Self {
        Self::returning(json!({
            "fit_score": {"text": "85"},
            "question_gen": {"text": "Q"},
            "summary": {"text": "S"},
            "profile": {"text": "P"},
            "summary_malay": {"text": "M"},
        }))
    }

    pub fn failing_upload(message: &str) -> Self {
        Self {
            upload_error: Some(message.to_string()),
            ..Self::complete()
        }
    }

    pub fn failing_submit(message: &str) -> Self {
        Self {
            submit_error: Some(message.to_string()),
            ..Self::complete()
        }
    }

    pub fn without_uri() -> Self {
        Self {
            upload_uri: None,
            ..Self::complete()
        }
    }

    pub fn without_rows() -> Self {
        Self {
            rows: Vec::new(),
            ..Self::complete()
        }
    }

    /// Uploads take `delay` before answering.
    pub fn slow_upload(delay: Duration) -> Self {
        Self {
            upload_delay: Some(delay),
            ..Self::complete()
        }
    }

    pub fn panicking_upload() -> Self {
        Self {
            panic_on_upload: true,
            ..Self::complete()
        }
    }

    pub fn calls(&self) -> (usize, usize) {
        (
            self.upload_calls.load(Ordering::SeqCst),
            self.submit_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl AnalysisService for FakeService {
    async fn upload_file(&self, path: &Path) -> Result<FileUploadResponse, RemoteError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_upload {
            panic!("upload handler crashed");
        }
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        self.staged_paths.lock().unwrap().push(path.to_path_buf());
        self.staged_existed.lock().unwrap().push(path.exists());

        if let Some(message) = &self.upload_error {
            return Err(RemoteError::Api {
                status: 500,
                message: message.clone(),
            });
        }
        Ok(FileUploadResponse {
            uri: self.upload_uri.clone(),
        })
    }

    async fn add_action_rows(
        &self,
        request: &MultiRowAddRequest,
    ) -> Result<MultiRowAddResponse, RemoteError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(message) = &self.submit_error {
            return Err(RemoteError::Api {
                status: 500,
                message: message.clone(),
            });
        }
        Ok(MultiRowAddResponse {
            rows: self
                .rows
                .iter()
                .map(|columns| RowCompletion {
                    row_id: Some("row-1".to_string()),
                    columns: columns.as_object().cloned().unwrap_or_default(),
                })
                .collect(),
        })
    }
}
