// ❗ Analysis Errors - failures the pipeline itself can detect
// File loading errors stay in anyhow (see tables.rs); these are the domain ones.

use thiserror::Error;

/// Errors returned by the revenue analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid date '{value}' in {field}")]
    InvalidDate { field: &'static str, value: String },

    #[error("no rows left to model after joining and dropping missing features")]
    EmptyTable,

    #[error("cannot split {rows} row(s) into train/test partitions (test fraction {test_fraction})")]
    DegenerateSplit { rows: usize, test_fraction: f64 },

    #[error("training error: {0}")]
    Training(String),
}
