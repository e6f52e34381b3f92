//! Model task traits and the [`ModelClients`] context that carries them.

use std::sync::Arc;

use async_trait::async_trait;
use commentscope_core::{AppConfig, BackendKind, InferenceEndpoints};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;
use crate::http::{ClassifierEndpoint, EmbedEndpoint, InferenceEndpoint, NerEndpoint, ZeroShotEndpoint};
use crate::lexicon::{HashingEmbedder, KeywordEntities, KeywordZeroShot, LexiconIntent, LexiconSentiment};

/// One entity detected by a token-classification model, after span aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Aggregated entity category (`ORG`, `PRODUCT`, `MISC`, ...).
    pub entity_group: String,
    /// Surface text of the span.
    pub word: String,
    #[serde(default)]
    pub score: f32,
}

/// A class label with its model score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Return the highest-scoring label, if any.
#[must_use]
pub fn top_label(scores: &[LabelScore]) -> Option<&LabelScore> {
    scores.iter().max_by(|a, b| a.score.total_cmp(&b.score))
}

/// Named-entity recognition.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, InferenceError>;
}

/// Single-label sequence classification (sentiment, intent).
///
/// Implementations return every label they score; callers pick the arg-max.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, InferenceError>;
}

/// Zero-shot classification against caller-supplied candidate labels.
///
/// Returns one score per candidate, sorted by descending score.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Vec<LabelScore>, InferenceError>;
}

/// Sentence embeddings. Returns one vector per input text, in order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, InferenceError>;
}

/// The model clients used by one pipeline run.
///
/// Built once at start-up and passed by reference to every adapter call.
/// Clients are stateless and read-only.
#[derive(Clone)]
pub struct ModelClients {
    pub entities: Arc<dyn EntityRecognizer>,
    pub sentiment: Arc<dyn TextClassifier>,
    pub zero_shot: Arc<dyn ZeroShotClassifier>,
    pub intent: Arc<dyn TextClassifier>,
    pub embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for ModelClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClients").finish_non_exhaustive()
    }
}

impl ModelClients {
    /// Offline keyword/lexicon models. Never touches the network.
    #[must_use]
    pub fn lexicon() -> Self {
        Self {
            entities: Arc::new(KeywordEntities::default()),
            sentiment: Arc::new(LexiconSentiment),
            zero_shot: Arc::new(KeywordZeroShot::default()),
            intent: Arc::new(LexiconIntent),
            embedder: Arc::new(HashingEmbedder::default()),
        }
    }

    /// HTTP clients, one per task endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Http`] if an HTTP client cannot be built.
    pub fn http(
        endpoints: &InferenceEndpoints,
        token: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, InferenceError> {
        let endpoint =
            |url: &str| InferenceEndpoint::new(url, token.map(str::to_owned), timeout_secs);

        Ok(Self {
            entities: Arc::new(NerEndpoint(endpoint(&endpoints.ner_url)?)),
            sentiment: Arc::new(ClassifierEndpoint(endpoint(&endpoints.sentiment_url)?)),
            zero_shot: Arc::new(ZeroShotEndpoint(endpoint(&endpoints.zero_shot_url)?)),
            intent: Arc::new(ClassifierEndpoint(endpoint(&endpoints.intent_url)?)),
            embedder: Arc::new(EmbedEndpoint::new(endpoint(&endpoints.embed_url)?)),
        })
    }

    /// Build the clients selected by `config.backend`.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Backend`] if the HTTP backend is selected
    /// without endpoints, or any error from [`ModelClients::http`].
    pub fn from_config(config: &AppConfig) -> Result<Self, InferenceError> {
        match config.backend {
            BackendKind::Lexicon => Ok(Self::lexicon()),
            BackendKind::Http => {
                let endpoints = config.endpoints.as_ref().ok_or_else(|| {
                    InferenceError::Backend("http backend selected without endpoints".into())
                })?;
                Self::http(
                    endpoints,
                    config.inference_token.as_deref(),
                    config.request_timeout_secs,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_label_picks_highest_score() {
        let scores = vec![
            LabelScore {
                label: "LABEL_0".into(),
                score: 0.2,
            },
            LabelScore {
                label: "LABEL_2".into(),
                score: 0.7,
            },
            LabelScore {
                label: "LABEL_1".into(),
                score: 0.1,
            },
        ];
        assert_eq!(top_label(&scores).map(|l| l.label.as_str()), Some("LABEL_2"));
    }

    #[test]
    fn top_label_empty_is_none() {
        assert!(top_label(&[]).is_none());
    }

    #[test]
    fn entity_span_deserializes_hf_shape() {
        let json = r#"{"entity_group":"ORG","score":0.98,"word":"Tree Hut","start":0,"end":8}"#;
        let span: EntitySpan = serde_json::from_str(json).unwrap();
        assert_eq!(span.entity_group, "ORG");
        assert_eq!(span.word, "Tree Hut");
    }
}
