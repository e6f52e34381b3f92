//! The per-comment signal source used by the aggregator.

use async_trait::async_trait;
use commentscope_core::{CustomerRequest, PricingSignal, ProductMentions};
use commentscope_inference::{
    cluster_comments, extract_pricing_discussion, extract_products_and_deals, extract_requests,
    get_sentiment, ClusterOutcome, ClusterParams, InferenceError, ModelClients,
};

/// Everything the aggregator needs to enrich a comment table.
///
/// Returning `Err` from any method aborts the whole analysis, which then
/// degrades to an empty summary.
#[async_trait]
pub trait CommentSignals: Send + Sync {
    async fn products_and_deals(&self, text: &str) -> Result<ProductMentions, InferenceError>;
    async fn sentiment(&self, text: &str) -> Result<f64, InferenceError>;
    async fn requests(&self, text: &str) -> Result<Vec<CustomerRequest>, InferenceError>;
    async fn pricing(&self, text: &str) -> Result<PricingSignal, InferenceError>;
    /// Cluster the whole comment column; blank entries are skipped.
    async fn clusters(&self, texts: &[&str]) -> Result<ClusterOutcome, InferenceError>;
}

/// [`CommentSignals`] backed by real model clients.
///
/// Each call goes through the fail-soft adapters, so per-comment model
/// failures become neutral values and never reach the aggregator.
#[derive(Debug, Clone)]
pub struct ModelSignals {
    clients: ModelClients,
    params: ClusterParams,
}

impl ModelSignals {
    #[must_use]
    pub fn new(clients: ModelClients, params: ClusterParams) -> Self {
        Self { clients, params }
    }
}

#[async_trait]
impl CommentSignals for ModelSignals {
    async fn products_and_deals(&self, text: &str) -> Result<ProductMentions, InferenceError> {
        Ok(extract_products_and_deals(self.clients.entities.as_ref(), text).await)
    }

    async fn sentiment(&self, text: &str) -> Result<f64, InferenceError> {
        Ok(get_sentiment(self.clients.sentiment.as_ref(), text).await)
    }

    async fn requests(&self, text: &str) -> Result<Vec<CustomerRequest>, InferenceError> {
        Ok(extract_requests(self.clients.intent.as_ref(), text).await)
    }

    async fn pricing(&self, text: &str) -> Result<PricingSignal, InferenceError> {
        Ok(extract_pricing_discussion(
            self.clients.zero_shot.as_ref(),
            self.clients.sentiment.as_ref(),
            text,
        )
        .await)
    }

    async fn clusters(&self, texts: &[&str]) -> Result<ClusterOutcome, InferenceError> {
        Ok(cluster_comments(&self.clients, texts, &self.params).await)
    }
}
