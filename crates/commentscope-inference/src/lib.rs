//! Model inference for commentscope.
//!
//! Pretrained models sit behind small traits ([`EntityRecognizer`],
//! [`TextClassifier`], [`ZeroShotClassifier`], [`Embedder`]) bundled into a
//! [`ModelClients`] context built once at start-up. Two backends implement
//! them: Hugging Face Inference-style HTTP endpoints and an offline lexicon
//! backend. The [`adapters`] turn raw model output into typed, fail-soft
//! per-comment signals; [`clustering`] groups comments by embedding.

pub mod adapters;
pub mod backend;
pub mod clustering;
pub mod error;
pub mod http;
pub mod lexicon;

pub use adapters::{
    extract_pricing_discussion, extract_products_and_deals, extract_requests, get_sentiment,
    try_extract_pricing_discussion, try_extract_products_and_deals, try_extract_requests,
    try_get_sentiment,
};
pub use backend::{
    EntityRecognizer, EntitySpan, Embedder, LabelScore, ModelClients, TextClassifier,
    ZeroShotClassifier,
};
pub use clustering::{cluster_comments, try_cluster_comments, ClusterOutcome, ClusterParams};
pub use error::InferenceError;
