use commentscope_inference::InferenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    /// A cluster assignment pointed past the end of the comment table.
    #[error("cluster assignment for row {row} but only {rows} rows")]
    ClusterAlignment { row: usize, rows: usize },
}
