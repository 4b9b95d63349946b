use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{decode_outputs, JOB_DESC_COL, OUTPUT_COLUMNS, RESUME_COL};
use crate::errors::AppError;
use crate::models::analysis::AnalysisOutputs;
use crate::remote::{AnalysisService, MultiRowAddRequest, RemoteError};

/// Suffix used for staged files whose name carries no extension.
const FALLBACK_SUFFIX: &str = ".bin";

/// A resume file as received from the user.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    /// Extension of the original file name, including the leading dot.
    pub fn suffix(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| FALLBACK_SUFFIX.to_string())
    }
}

/// Stages the resume in a temporary file, uploads it, and returns the remote URI.
///
/// Returns `Ok(None)` when no file was supplied. The staged file is deleted when
/// this function returns, on success and on every error path.
pub async fn upload_resume(
    service: &dyn AnalysisService,
    file: Option<&ResumeFile>,
) -> Result<Option<String>, AppError> {
    let Some(file) = file else {
        return Ok(None);
    };

    let staged = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(&file.suffix())
        .tempfile()
        .context("Failed to create staging file for resume upload")?;

    tokio::fs::write(staged.path(), &file.bytes)
        .await
        .context("Failed to write resume to staging file")?;

    debug!(
        "Staged {} ({} bytes) at {}",
        file.file_name,
        file.bytes.len(),
        staged.path().display()
    );

    let response = service.upload_file(staged.path()).await?;
    let uri = response.uri.ok_or_else(|| {
        RemoteError::MalformedResponse("upload response carried no file URI".to_string())
    })?;

    info!("Uploaded resume {} as {}", file.file_name, uri);
    Ok(Some(uri))
}

/// Submits one row (resume reference + job description) and decodes the computed columns.
///
/// Blocks until the remote pipeline has finished the row. There is no retry at
/// this layer and no partial result: either all five fields come back or the
/// call fails.
pub async fn analyze(
    service: &dyn AnalysisService,
    table_id: &str,
    resume_uri: &str,
    job_description: &str,
) -> Result<AnalysisOutputs, AppError> {
    let mut row = Map::new();
    row.insert(RESUME_COL.to_string(), Value::from(resume_uri));
    row.insert(JOB_DESC_COL.to_string(), Value::from(job_description));

    let request = MultiRowAddRequest {
        table_id: table_id.to_string(),
        data: vec![row],
        stream: false,
    };

    let response = service.add_action_rows(&request).await?;
    let row = response.rows.into_iter().next().ok_or_else(|| {
        RemoteError::MalformedResponse(format!("table {table_id} returned no rows"))
    })?;

    let missing: Vec<&str> = OUTPUT_COLUMNS
        .iter()
        .copied()
        .filter(|col| !row.columns.contains_key(*col))
        .collect();
    if !missing.is_empty() {
        debug!(
            "Row {:?} from table {} has no value for: {}",
            row.row_id,
            table_id,
            missing.join(", ")
        );
    }

    Ok(decode_outputs(&row.columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeService;
    use serde_json::json;

    fn resume(name: &str) -> ResumeFile {
        ResumeFile {
            file_name: name.to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4 fake resume"),
        }
    }

    #[test]
    fn test_suffix_from_extension() {
        assert_eq!(resume("cv.pdf").suffix(), ".pdf");
        assert_eq!(resume("my.resume.docx").suffix(), ".docx");
    }

    #[test]
    fn test_suffix_defaults_to_bin() {
        assert_eq!(resume("resume").suffix(), ".bin");
    }

    #[tokio::test]
    async fn test_upload_without_file_returns_none_and_skips_remote() {
        let service = FakeService::complete();
        let uri = upload_resume(&service, None).await.unwrap();
        assert!(uri.is_none());
        assert_eq!(service.calls(), (0, 0));
    }

    #[tokio::test]
    async fn test_upload_returns_uri_and_removes_staged_file() {
        let service = FakeService::complete();
        let uri = upload_resume(&service, Some(&resume("cv.pdf"))).await.unwrap();

        assert_eq!(uri.as_deref(), Some("s3://file/raw/resume.pdf"));
        let paths = service.staged_paths.lock().unwrap();
        assert_eq!(paths.len(), 1);
        assert!(service.staged_existed.lock().unwrap()[0], "file must exist during upload");
        assert!(paths[0].to_string_lossy().ends_with(".pdf"));
        assert!(!paths[0].exists(), "staged file must be removed after upload");
    }

    #[tokio::test]
    async fn test_failed_upload_propagates_and_removes_staged_file() {
        let service = FakeService::failing_upload("storage unavailable");
        let err = upload_resume(&service, Some(&resume("cv.docx")))
            .await
            .unwrap_err();

        match err {
            AppError::RemoteOperation(msg) => assert!(msg.contains("storage unavailable")),
            other => panic!("expected RemoteOperation, got {other:?}"),
        }
        let paths = service.staged_paths.lock().unwrap();
        assert_eq!(paths.len(), 1);
        assert!(!paths[0].exists(), "staged file must be removed after a failed upload");
    }

    #[tokio::test]
    async fn test_upload_without_uri_is_malformed() {
        let service = FakeService::without_uri();
        let err = upload_resume(&service, Some(&resume("cv.pdf")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RemoteOperation(msg) if msg.contains("URI")));
        assert!(!service.staged_paths.lock().unwrap()[0].exists());
    }

    #[tokio::test]
    async fn test_analyze_submits_single_non_streaming_row() {
        let service = FakeService::complete();
        let outputs = analyze(&service, "Resume_Analyzer", "s3://r.pdf", "Rust engineer")
            .await
            .unwrap();

        assert_eq!(outputs.fit_score, "85");
        assert_eq!(outputs.summary_malay, "M");

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].table_id, "Resume_Analyzer");
        assert!(!requests[0].stream);
        assert_eq!(requests[0].data.len(), 1);
        assert_eq!(requests[0].data[0][RESUME_COL], "s3://r.pdf");
        assert_eq!(requests[0].data[0][JOB_DESC_COL], "Rust engineer");
    }

    #[tokio::test]
    async fn test_analyze_tolerates_missing_columns() {
        let service = FakeService::returning(json!({"fit_score": {"text": "70"}}));
        let outputs = analyze(&service, "Resume_Analyzer", "s3://r.pdf", "JD")
            .await
            .unwrap();
        assert_eq!(outputs.fit_score, "70");
        assert_eq!(outputs.profile, "");
        assert_eq!(outputs.summary_malay, "");
    }

    #[tokio::test]
    async fn test_analyze_propagates_remote_failure() {
        let service = FakeService::failing_submit("pipeline crashed");
        let err = analyze(&service, "Resume_Analyzer", "s3://r.pdf", "JD")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RemoteOperation(msg) if msg.contains("pipeline crashed")));
    }

    #[tokio::test]
    async fn test_analyze_with_no_rows_is_malformed() {
        let service = FakeService::without_rows();
        let err = analyze(&service, "Resume_Analyzer", "s3://r.pdf", "JD")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RemoteOperation(msg) if msg.contains("no rows")));
    }
}
