//! Hugging Face Inference-style HTTP backend.
//!
//! Each task gets its own endpoint URL. Request and response shapes follow
//! the hosted Inference API (`{"inputs": ...}` bodies); embeddings use the
//! TEI `/embed` route.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::backend::{
    EntityRecognizer, EntitySpan, Embedder, LabelScore, TextClassifier, ZeroShotClassifier,
};
use crate::error::InferenceError;

/// Maximum number of texts per `/embed` call.
const EMBED_BATCH_SIZE: usize = 64;

/// A single model endpoint: HTTP client, URL, and optional bearer token.
pub struct InferenceEndpoint {
    client: Client,
    url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct TextRequest<'a> {
    inputs: &'a str,
}

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
    multi_label: bool,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

/// Text classification responses come either flat or wrapped per input.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Columns { labels: Vec<String>, scores: Vec<f32> },
    Rows(Vec<LabelScore>),
}

impl InferenceEndpoint {
    /// Create an endpoint client.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(url: &str, token: Option<String>, timeout_secs: u64) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("commentscope/0.1 (comment-analysis)")
            .build()?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, InferenceError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Backend(format!(
                "{url} returned status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| InferenceError::Response(format!("{url}: {e}")))
    }
}

/// Token classification endpoint (`aggregation_strategy=simple` output).
pub struct NerEndpoint(pub InferenceEndpoint);

#[async_trait]
impl EntityRecognizer for NerEndpoint {
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, InferenceError> {
        let endpoint = &self.0;
        endpoint
            .post_json(&endpoint.url, &TextRequest { inputs: text })
            .await
    }
}

/// Sequence classification endpoint (sentiment or intent).
pub struct ClassifierEndpoint(pub InferenceEndpoint);

#[async_trait]
impl TextClassifier for ClassifierEndpoint {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, InferenceError> {
        let endpoint = &self.0;
        let response: ClassificationResponse = endpoint
            .post_json(&endpoint.url, &TextRequest { inputs: text })
            .await?;

        Ok(match response {
            ClassificationResponse::Nested(mut per_input) => {
                if per_input.is_empty() {
                    Vec::new()
                } else {
                    per_input.swap_remove(0)
                }
            }
            ClassificationResponse::Flat(scores) => scores,
        })
    }
}

/// Zero-shot (NLI) classification endpoint.
pub struct ZeroShotEndpoint(pub InferenceEndpoint);

#[async_trait]
impl ZeroShotClassifier for ZeroShotEndpoint {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Vec<LabelScore>, InferenceError> {
        let endpoint = &self.0;
        let request = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels,
                multi_label: false,
            },
        };
        let response: ZeroShotResponse = endpoint.post_json(&endpoint.url, &request).await?;

        let mut scores = match response {
            ZeroShotResponse::Columns { labels, scores } => {
                if labels.len() != scores.len() {
                    return Err(InferenceError::Response(format!(
                        "zero-shot returned {} labels but {} scores",
                        labels.len(),
                        scores.len()
                    )));
                }
                labels
                    .into_iter()
                    .zip(scores)
                    .map(|(label, score)| LabelScore { label, score })
                    .collect::<Vec<_>>()
            }
            ZeroShotResponse::Rows(rows) => rows,
        };
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scores)
    }
}

/// TEI embeddings endpoint.
pub struct EmbedEndpoint {
    endpoint: InferenceEndpoint,
    embed_url: String,
}

impl EmbedEndpoint {
    /// Wrap a TEI base URL; requests go to `{base}/embed`.
    #[must_use]
    pub fn new(endpoint: InferenceEndpoint) -> Self {
        let embed_url = format!("{}/embed", endpoint.url);
        Self {
            endpoint,
            embed_url,
        }
    }
}

#[async_trait]
impl Embedder for EmbedEndpoint {
    /// Texts are sent in batches of [`EMBED_BATCH_SIZE`]; output order matches input.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, InferenceError> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(EMBED_BATCH_SIZE) {
            let embeddings: Vec<Vec<f32>> = self
                .endpoint
                .post_json(&self.embed_url, &EmbedRequest { inputs: chunk })
                .await?;

            if embeddings.len() != chunk.len() {
                return Err(InferenceError::Response(format!(
                    "TEI returned {} embeddings for {} inputs",
                    embeddings.len(),
                    chunk.len()
                )));
            }

            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }
}
