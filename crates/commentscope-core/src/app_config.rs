use std::path::PathBuf;

/// Which inference backend serves the model adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Offline keyword/lexicon models; no network access.
    Lexicon,
    /// Hugging Face Inference-style HTTP endpoints.
    Http,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Lexicon => write!(f, "lexicon"),
            BackendKind::Http => write!(f, "http"),
        }
    }
}

/// Endpoint URLs for the HTTP backend, one per model task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceEndpoints {
    pub ner_url: String,
    pub sentiment_url: String,
    pub zero_shot_url: String,
    pub intent_url: String,
    /// TEI base URL; `/embed` is appended by the client.
    pub embed_url: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub chart_path: PathBuf,
    pub report_path: PathBuf,
    /// Brand handle used in the report title and as an extra stopword.
    pub brand: String,
    pub log_level: String,
    pub backend: BackendKind,
    /// Present only when `backend` is [`BackendKind::Http`].
    pub endpoints: Option<InferenceEndpoints>,
    pub inference_token: Option<String>,
    pub request_timeout_secs: u64,
    pub cluster_count: usize,
    pub cluster_seed: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("input_path", &self.input_path)
            .field("chart_path", &self.chart_path)
            .field("report_path", &self.report_path)
            .field("brand", &self.brand)
            .field("log_level", &self.log_level)
            .field("backend", &self.backend)
            .field("endpoints", &self.endpoints)
            .field(
                "inference_token",
                &self.inference_token.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("cluster_count", &self.cluster_count)
            .field("cluster_seed", &self.cluster_seed)
            .finish()
    }
}
