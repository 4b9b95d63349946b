//! Plain-text export of a completed analysis.

use crate::models::analysis::AnalysisResult;

pub const REPORT_BANNER: &str = "====== AI RESUME ANALYSIS REPORT ======";
const NOT_AVAILABLE: &str = "N/A";

/// Renders the downloadable report. Section order and headers are fixed.
pub fn render_report(result: &AnalysisResult) -> String {
    let malay = if result.summary_malay.is_empty() {
        NOT_AVAILABLE
    } else {
        result.summary_malay.as_str()
    };

    format!(
        "{REPORT_BANNER}\n\
         \n\
         File: {filename}\n\
         Generated: {timestamp}\n\
         \n\
         Fit Score: {fit_score}\n\
         \n\
         Candidate Profile:\n\
         {profile}\n\
         \n\
         Executive Summary (English):\n\
         {summary}\n\
         \n\
         Executive Summary (Malay):\n\
         {malay}\n\
         \n\
         Suggested Interview Questions:\n\
         {questions}\n",
        filename = result.filename,
        timestamp = result.timestamp,
        fit_score = result.fit_score,
        profile = result.profile,
        summary = result.summary,
        questions = result.question_gen,
    )
}

/// Download file name for a report, with `:` and spaces replaced.
pub fn export_file_name(timestamp: &str) -> String {
    format!(
        "resume_analysis_{}.txt",
        timestamp.replace(':', "-").replace(' ', "_")
    )
}
