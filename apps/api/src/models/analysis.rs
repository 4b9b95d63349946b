use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Display format for result timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The five text columns the remote pipeline computes per row.
/// Every field is empty when the service returned nothing for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutputs {
    pub fit_score: String,
    pub question_gen: String,
    pub summary: String,
    pub profile: String,
    pub summary_malay: String,
}

/// One completed analysis, as shown in the results view, history and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Free-text verdict; not guaranteed to be numeric.
    pub fit_score: String,
    pub question_gen: String,
    pub summary: String,
    pub profile: String,
    pub summary_malay: String,
    pub filename: String,
    pub timestamp: String,
}

impl AnalysisResult {
    pub fn new<Tz>(outputs: AnalysisOutputs, filename: &str, captured_at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let AnalysisOutputs {
            fit_score,
            question_gen,
            summary,
            profile,
            summary_malay,
        } = outputs;

        Self {
            fit_score,
            question_gen,
            summary,
            profile,
            summary_malay,
            filename: filename.to_string(),
            timestamp: captured_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
