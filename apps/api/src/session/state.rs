//! Per-session state and its transitions.
//!
//! Transitions are pure: each takes the current state by value and returns the
//! next one. A transition that fails leaves the caller holding nothing new, so
//! the stored state is only replaced on success.

use serde::{Deserialize, Serialize};

use crate::analysis::ResumeFile;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;

pub const MISSING_INPUT_MESSAGE: &str =
    "Please upload a resume AND enter the job description to proceed.";

/// Resume formats accepted from the user, lowercase.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["doc", "docx", "pdf"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Upload and analysis are in flight.
    Running,
}

/// Which summary the results view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryLanguage {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ms")]
    Malay,
}

/// Append-only log of completed analyses, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<AnalysisResult>,
}

impl HistoryLog {
    pub fn push(&mut self, result: AnalysisResult) {
        self.entries.push(result);
    }

    /// Entries in submission order.
    pub fn entries(&self) -> &[AnalysisResult] {
        &self.entries
    }

    pub fn most_recent_first(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.entries.iter().rev()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub current: Option<AnalysisResult>,
    pub history: HistoryLog,
    /// Bumped on every reset so the front end renders fresh, empty inputs.
    pub reset_counter: u64,
    pub phase: SessionPhase,
    pub language: SummaryLanguage,
}

/// Raw inputs of a submit action, straight from the form.
#[derive(Debug, Clone, Default)]
pub struct SubmissionInputs {
    pub resume: Option<ResumeFile>,
    pub job_description: String,
}

/// Inputs that passed validation.
#[derive(Debug, Clone)]
pub struct ValidSubmission {
    pub resume: ResumeFile,
    pub job_description: String,
}

/// Checks a submission before any remote call is made.
pub fn validate(inputs: SubmissionInputs) -> Result<ValidSubmission, AppError> {
    let SubmissionInputs {
        resume,
        job_description,
    } = inputs;

    let Some(resume) = resume else {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    };
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    }

    let extension = resume
        .suffix()
        .trim_start_matches('.')
        .to_lowercase();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported resume format '{}'. Supported formats: DOC, DOCX, PDF",
            resume.file_name
        )));
    }

    Ok(ValidSubmission {
        resume,
        job_description,
    })
}

impl SessionState {
    /// Marks the session as running. Only one submission may be in flight.
    pub fn begin_run(self) -> Result<Self, AppError> {
        if self.phase == SessionPhase::Running {
            return Err(AppError::Conflict(
                "An analysis is already running for this session".to_string(),
            ));
        }
        Ok(Self {
            phase: SessionPhase::Running,
            ..self
        })
    }

    /// Commits a successful analysis as the current result and appends it to history.
    pub fn complete(mut self, result: AnalysisResult) -> Self {
        self.history.push(result.clone());
        self.current = Some(result);
        self.phase = SessionPhase::Idle;
        self
    }

    /// Returns to idle after a failed run. Current result and history are untouched.
    pub fn fail(self) -> Self {
        Self {
            phase: SessionPhase::Idle,
            ..self
        }
    }

    /// Clears the current result and bumps the reset counter. History is kept.
    pub fn reset(self) -> Result<Self, AppError> {
        if self.phase == SessionPhase::Running {
            return Err(AppError::Conflict(
                "Cannot reset while an analysis is running".to_string(),
            ));
        }
        Ok(Self {
            current: None,
            reset_counter: self.reset_counter + 1,
            ..self
        })
    }

    /// Switches the summary language. Display only.
    pub fn with_language(self, language: SummaryLanguage) -> Self {
        Self { language, ..self }
    }
}
