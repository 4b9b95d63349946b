//! Analysis client: stages and uploads the resume, submits one row to the
//! remote action table and decodes the computed columns.

pub mod decode;
pub mod runner;

pub use decode::decode_outputs;
pub use runner::{analyze, upload_resume, ResumeFile};

/// Input column holding the uploaded resume reference.
pub const RESUME_COL: &str = "resume";
/// Input column holding the job description text.
pub const JOB_DESC_COL: &str = "job_description";

pub const FIT_SCORE_COL: &str = "fit_score";
pub const QUESTION_GEN_COL: &str = "question_gen";
pub const SUMMARY_COL: &str = "summary";
pub const PROFILE_COL: &str = "profile";
pub const SUMMARY_MALAY_COL: &str = "summary_malay";

/// Output columns read back from the completed row, in table order.
pub const OUTPUT_COLUMNS: [&str; 5] = [
    FIT_SCORE_COL,
    QUESTION_GEN_COL,
    SUMMARY_COL,
    PROFILE_COL,
    SUMMARY_MALAY_COL,
];
