//! Submit action: validate → mark running → upload + analyze → commit or roll back.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::Local;
use tracing::{info, warn};
use uuid::Uuid;

use super::state::{validate, SessionState, SubmissionInputs, ValidSubmission, MISSING_INPUT_MESSAGE};
use super::store::SessionStore;
use crate::analysis::{analyze, upload_resume};
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::remote::AnalysisService;

/// Runs one submission for a session and returns the session state afterwards.
///
/// Validation failures return before anything is touched. Remote failures put
/// the session back to idle with its current result and history unchanged.
///
/// Once the session is marked running, the remote work and the commit or
/// rollback run on their own task. Dropping the returned future (client
/// disconnect, request timeout) does not stop them, so the session always
/// leaves `Running`.
pub async fn submit(
    sessions: &SessionStore,
    service: Arc<dyn AnalysisService>,
    table_id: &str,
    session_id: Uuid,
    inputs: SubmissionInputs,
) -> Result<SessionState, AppError> {
    sessions.get(session_id).await?;
    let submission = validate(inputs)?;

    sessions.update(session_id, SessionState::begin_run).await?;
    info!(
        "Session {session_id}: analyzing {}",
        submission.resume.file_name
    );

    let sessions = sessions.clone();
    let table_id = table_id.to_string();
    let run = tokio::spawn(async move {
        // A panic in the remote call surfaces here as a join error.
        let outcome = tokio::spawn(async move {
            run_analysis(service.as_ref(), &table_id, &submission).await
        })
        .await
        .unwrap_or_else(|e| Err(AppError::Internal(anyhow!("Analysis task failed: {e}"))));

        settle(&sessions, session_id, outcome).await
    });

    run.await
        .map_err(|e| AppError::Internal(anyhow!("Analysis task failed: {e}")))?
}

/// Commits a finished run or rolls the session back to idle.
async fn settle(
    sessions: &SessionStore,
    session_id: Uuid,
    outcome: Result<AnalysisResult, AppError>,
) -> Result<SessionState, AppError> {
    match outcome {
        Ok(result) => {
            info!(
                "Session {session_id}: analysis of {} completed (fit score: {})",
                result.filename, result.fit_score
            );
            sessions
                .update(session_id, |state| Ok(state.complete(result)))
                .await
        }
        Err(err) => {
            warn!("Session {session_id}: analysis failed: {err}");
            sessions
                .update(session_id, |state| Ok(state.fail()))
                .await?;
            Err(err)
        }
    }
}

/// Uploads the resume, analyzes it against the job description and stamps the result.
pub async fn run_analysis(
    service: &dyn AnalysisService,
    table_id: &str,
    submission: &ValidSubmission,
) -> Result<AnalysisResult, AppError> {
    let resume_uri = upload_resume(service, Some(&submission.resume))
        .await?
        .ok_or_else(|| AppError::Validation(MISSING_INPUT_MESSAGE.to_string()))?;

    let outputs = analyze(service, table_id, &resume_uri, &submission.job_description).await?;

    Ok(AnalysisResult::new(
        outputs,
        &submission.resume.file_name,
        Local::now(),
    ))
}
