//! Read models returned to the front end.

use serde::Serialize;
use uuid::Uuid;

use super::state::{SessionPhase, SessionState, SummaryLanguage};
use crate::models::analysis::AnalysisResult;
use crate::report::export_file_name;

pub const ENGLISH_SUMMARY_TITLE: &str = "Executive Summary (English)";
pub const MALAY_SUMMARY_TITLE: &str = "Ringkasan Eksekutif (Bahasa Melayu)";
pub const MALAY_UNAVAILABLE: &str = "Malay summary is not available in the results.";

/// History labels longer than this are truncated with `...`.
const HISTORY_LABEL_CHARS: usize = 30;

#[derive(Debug, Clone, Serialize)]
pub struct InputKeys {
    pub resume_file: String,
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub filename: String,
    pub timestamp: String,
    pub fit_score: String,
    pub profile: String,
    pub summary_title: String,
    pub summary_content: String,
    pub question_gen: String,
    pub export_file_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryView {
    pub label: String,
    pub filename: String,
    pub timestamp: String,
    pub fit_score: String,
    pub profile: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    pub language: SummaryLanguage,
    pub reset_counter: u64,
    pub input_keys: InputKeys,
    pub current: Option<ResultView>,
    pub history_count: usize,
    /// Most recent first.
    pub history: Vec<HistoryEntryView>,
}

impl SessionView {
    pub fn build(session_id: Uuid, state: &SessionState) -> Self {
        Self {
            session_id,
            phase: state.phase,
            language: state.language,
            reset_counter: state.reset_counter,
            input_keys: InputKeys::for_counter(state.reset_counter),
            current: state
                .current
                .as_ref()
                .map(|r| ResultView::build(r, state.language)),
            history_count: state.history.entries().len(),
            history: history_view(state),
        }
    }
}

impl InputKeys {
    /// Keys change with every reset so input controls are recreated empty.
    pub fn for_counter(reset_counter: u64) -> Self {
        Self {
            resume_file: format!("resume_file_{reset_counter}"),
            job_description: format!("jd_{reset_counter}"),
        }
    }
}

impl ResultView {
    pub fn build(result: &AnalysisResult, language: SummaryLanguage) -> Self {
        let (title, content) = summary_for(result, language);
        Self {
            filename: result.filename.clone(),
            timestamp: result.timestamp.clone(),
            fit_score: result.fit_score.clone(),
            profile: result.profile.clone(),
            summary_title: title.to_string(),
            summary_content: content.to_string(),
            question_gen: result.question_gen.clone(),
            export_file_name: export_file_name(&result.timestamp),
        }
    }
}

/// Picks the summary title and body for the chosen language.
pub fn summary_for(result: &AnalysisResult, language: SummaryLanguage) -> (&'static str, &str) {
    match language {
        SummaryLanguage::English => (ENGLISH_SUMMARY_TITLE, result.summary.as_str()),
        SummaryLanguage::Malay if result.summary_malay.is_empty() => {
            (MALAY_SUMMARY_TITLE, MALAY_UNAVAILABLE)
        }
        SummaryLanguage::Malay => (MALAY_SUMMARY_TITLE, result.summary_malay.as_str()),
    }
}

pub fn history_view(state: &SessionState) -> Vec<HistoryEntryView> {
    state
        .history
        .most_recent_first()
        .map(|r| HistoryEntryView {
            label: history_label(&r.filename),
            filename: r.filename.clone(),
            timestamp: r.timestamp.clone(),
            fit_score: r.fit_score.clone(),
            profile: r.profile.clone(),
        })
        .collect()
}

fn history_label(filename: &str) -> String {
    if filename.chars().count() > HISTORY_LABEL_CHARS {
        let head: String = filename.chars().take(HISTORY_LABEL_CHARS).collect();
        format!("{head}...")
    } else {
        filename.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(filename: &str, malay: &str) -> AnalysisResult {
        AnalysisResult {
            fit_score: "85".to_string(),
            question_gen: "Q".to_string(),
            summary: "English summary".to_string(),
            profile: "P".to_string(),
            summary_malay: malay.to_string(),
            filename: filename.to_string(),
            timestamp: "2024-01-01 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_summary_for_english() {
        let r = result("r.pdf", "Ringkasan");
        assert_eq!(
            summary_for(&r, SummaryLanguage::English),
            (ENGLISH_SUMMARY_TITLE, "English summary")
        );
    }

    #[test]
    fn test_summary_for_malay() {
        let r = result("r.pdf", "Ringkasan");
        assert_eq!(
            summary_for(&r, SummaryLanguage::Malay),
            (MALAY_SUMMARY_TITLE, "Ringkasan")
        );
    }

    #[test]
    fn test_empty_malay_summary_shows_placeholder() {
        let r = result("r.pdf", "");
        assert_eq!(
            summary_for(&r, SummaryLanguage::Malay),
            (MALAY_SUMMARY_TITLE, MALAY_UNAVAILABLE)
        );
    }

    #[test]
    fn test_history_label_truncates_long_names() {
        assert_eq!(history_label("short.pdf"), "short.pdf");
        let long = "a_very_long_resume_file_name_for_candidate.pdf";
        let label = history_label(long);
        assert_eq!(label, format!("{}...", &long[..30]));
    }

    #[test]
    fn test_history_label_exactly_thirty_chars_is_kept() {
        let name = "x".repeat(26) + ".pdf";
        assert_eq!(history_label(&name), name);
    }

    #[test]
    fn test_view_lists_history_most_recent_first() {
        let state = SessionState::default()
            .complete(result("a.pdf", ""))
            .complete(result("b.pdf", ""));
        let view = SessionView::build(Uuid::new_v4(), &state);

        assert_eq!(view.history_count, 2);
        assert_eq!(view.history[0].filename, "b.pdf");
        assert_eq!(view.history[1].filename, "a.pdf");
        assert_eq!(view.current.unwrap().filename, "b.pdf");
    }

    #[test]
    fn test_input_keys_follow_reset_counter() {
        let state = SessionState::default().reset().unwrap().reset().unwrap();
        let view = SessionView::build(Uuid::new_v4(), &state);
        assert_eq!(view.input_keys.resume_file, "resume_file_2");
        assert_eq!(view.input_keys.job_description, "jd_2");
    }

    #[test]
    fn test_result_view_carries_export_file_name() {
        let view = ResultView::build(&result("r.pdf", ""), SummaryLanguage::English);
        assert_eq!(view.export_file_name, "resume_analysis_2024-01-01_10-00-00.txt");
    }
}
