use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Input was empty or whitespace only; there is nothing to classify.
    #[error("empty or blank input")]
    EmptyInput,

    #[error("inference backend error: {0}")]
    Backend(String),

    #[error("unexpected model response: {0}")]
    Response(String),

    #[error("clustering error: {0}")]
    Clustering(String),
}

impl InferenceError {
    /// `true` when the error means "no signal" rather than a malfunction.
    #[must_use]
    pub fn is_no_signal(&self) -> bool {
        matches!(self, InferenceError::EmptyInput)
    }
}
