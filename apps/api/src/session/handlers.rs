//! Axum route handlers for the Session API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::ResumeFile;
use crate::errors::AppError;
use crate::report::{export_file_name, render_report};
use crate::session::controller;
use crate::session::state::{SessionState, SubmissionInputs, SummaryLanguage};
use crate::session::view::{history_view, HistoryEntryView, SessionView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Multipart field carrying the resume file.
pub const RESUME_FIELD: &str = "resume";
/// Multipart field carrying the job description text.
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: SummaryLanguage,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let (id, session) = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionView::build(id, &session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionView::build(id, &session)))
}

/// DELETE /api/v1/sessions/:id
///
/// Ends the session and drops its history. A run still in flight finishes
/// against the remote service but its result is discarded.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/analyze
///
/// Multipart body: `resume` (file) and `job_description` (text).
/// Blocks until the remote pipeline has produced the row.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let inputs = read_submission(multipart).await?;

    let session = controller::submit(
        &state.sessions,
        state.analysis.clone(),
        &state.config.table_id,
        id,
        inputs,
    )
    .await?;

    Ok(Json(SessionView::build(id, &session)))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.update(id, SessionState::reset).await?;
    Ok(Json(SessionView::build(id, &session)))
}

/// PATCH /api/v1/sessions/:id/language
pub async fn handle_set_language(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<LanguageRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = state
        .sessions
        .update(id, |s| Ok(s.with_language(req.language)))
        .await?;
    Ok(Json(SessionView::build(id, &session)))
}

/// GET /api/v1/sessions/:id/history
pub async fn handle_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<HistoryEntryView>>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(history_view(&session)))
}

/// GET /api/v1/sessions/:id/export
///
/// Plain-text report of the current result, served as an attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.get(id).await?;
    let result = session
        .current
        .as_ref()
        .ok_or_else(|| AppError::NotFound("No analysis result to export".to_string()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(&result.timestamp)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_report(result),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart intake
// ────────────────────────────────────────────────────────────────────────────

/// Collects the submit form. A file part with an empty name means no file was chosen.
async fn read_submission(mut multipart: Multipart) -> Result<SubmissionInputs, AppError> {
    let mut inputs = SubmissionInputs::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume upload: {e}")))?;
                if let Some(file_name) = file_name.filter(|n| !n.is_empty()) {
                    inputs.resume = Some(ResumeFile { file_name, bytes });
                }
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                inputs.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job description: {e}")))?;
            }
            _ => {}
        }
    }

    Ok(inputs)
}
