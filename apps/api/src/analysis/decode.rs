//! Decoding of completed row cells into typed outputs.
//!
//! A missing column, a null cell or a cell without text is never an error:
//! the field simply decodes to an empty string.

use serde_json::{Map, Value};

use super::{FIT_SCORE_COL, PROFILE_COL, QUESTION_GEN_COL, SUMMARY_COL, SUMMARY_MALAY_COL};
use crate::models::analysis::AnalysisOutputs;

/// Extracts the text of one cell.
///
/// Accepted shapes:
/// - a bare JSON string
/// - an object with a string `text` field
/// - a chat completion whose `choices[0].message.content` is a string
pub fn cell_text(cell: Option<&Value>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };

    if let Some(s) = cell.as_str() {
        return s.to_string();
    }

    if let Some(text) = cell.get("text").and_then(Value::as_str) {
        return text.to_string();
    }

    cell.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Maps the columns of one completed row onto `AnalysisOutputs`.
pub fn decode_outputs(columns: &Map<String, Value>) -> AnalysisOutputs {
    AnalysisOutputs {
        fit_score: cell_text(columns.get(FIT_SCORE_COL)),
        question_gen: cell_text(columns.get(QUESTION_GEN_COL)),
        summary: cell_text(columns.get(SUMMARY_COL)),
        profile: cell_text(columns.get(PROFILE_COL)),
        summary_malay: cell_text(columns.get(SUMMARY_MALAY_COL)),
    }
}
