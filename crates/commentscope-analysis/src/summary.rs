use std::collections::BTreeMap;

use commentscope_core::RequestKind;
use serde::Serialize;

/// Mean sentiment for one ISO calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklySentiment {
    pub week: u32,
    pub sentiment: f64,
}

/// Aggregated statistics for one analysis run.
///
/// `Default` is the degraded result: every map empty, every count zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngagementSummary {
    /// Product name → mean sentiment of the comments that mention it.
    pub product_sentiment: BTreeMap<String, f64>,
    /// Deal name → mean sentiment of the comments that mention it.
    pub deal_sentiment: BTreeMap<String, f64>,
    pub request_counts: BTreeMap<RequestKind, usize>,
    /// Up to three example texts per request kind, first seen first.
    pub request_examples: BTreeMap<RequestKind, Vec<String>>,
    pub pricing_count: usize,
    pub pricing_sentiment_avg: f64,
    /// Cluster label → mean sentiment of its members.
    pub cluster_sentiment: BTreeMap<String, f64>,
    /// Cluster label → request kind → count.
    pub cluster_requests: BTreeMap<String, BTreeMap<RequestKind, usize>>,
    /// Ascending by ISO week.
    pub weekly_sentiment: Vec<WeeklySentiment>,
}
