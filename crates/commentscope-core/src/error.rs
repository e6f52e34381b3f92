use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Fatal errors raised while loading the comment dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file {0} not found")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required columns in dataset: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: unparseable timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },
}
