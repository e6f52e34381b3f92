//! Pure aggregation over enriched comment records.
//!
//! Nothing here calls a model; every function reads fields that the
//! enrichment pass has already filled in.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use commentscope_core::{CommentRecord, RequestKind};

use crate::summary::{EngagementSummary, WeeklySentiment};

/// Maximum number of example texts kept per request kind.
pub const MAX_REQUEST_EXAMPLES: usize = 3;

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn average_each<K: Ord>(groups: BTreeMap<K, Vec<f64>>) -> BTreeMap<K, f64> {
    groups
        .into_iter()
        .filter_map(|(key, values)| mean(&values).map(|avg| (key, avg)))
        .collect()
}

/// Build the full summary from enriched records and the cluster label map.
#[must_use]
pub fn summarize(
    records: &[CommentRecord],
    cluster_labels: &BTreeMap<usize, String>,
) -> EngagementSummary {
    let (request_counts, request_examples) = request_stats(records);
    let (pricing_count, pricing_sentiment_avg) = pricing_stats(records);
    let (cluster_sentiment, cluster_requests) = cluster_stats(records, cluster_labels);

    EngagementSummary {
        product_sentiment: mention_sentiment(records, |r| &r.products),
        deal_sentiment: mention_sentiment(records, |r| &r.deals),
        request_counts,
        request_examples,
        pricing_count,
        pricing_sentiment_avg,
        cluster_sentiment,
        cluster_requests,
        weekly_sentiment: weekly_sentiment(records),
    }
}

/// Mean sentiment per mentioned name.
///
/// A record contributes once for each distinct name it mentions, however
/// many times the name repeats in that comment.
#[must_use]
pub fn mention_sentiment<F>(records: &[CommentRecord], names: F) -> BTreeMap<String, f64>
where
    F: Fn(&CommentRecord) -> &[String],
{
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in records {
        let distinct: BTreeSet<&String> = names(record).iter().collect();
        for name in distinct {
            groups.entry(name.clone()).or_default().push(record.sentiment);
        }
    }
    average_each(groups)
}

/// Request counts per kind, plus up to [`MAX_REQUEST_EXAMPLES`] examples.
///
/// The example map always has an entry for every [`RequestKind`].
#[must_use]
pub fn request_stats(
    records: &[CommentRecord],
) -> (BTreeMap<RequestKind, usize>, BTreeMap<RequestKind, Vec<String>>) {
    let mut counts: BTreeMap<RequestKind, usize> = BTreeMap::new();
    let mut examples: BTreeMap<RequestKind, Vec<String>> =
        RequestKind::ALL.iter().map(|kind| (*kind, Vec::new())).collect();

    for request in records.iter().flat_map(|r| &r.requests) {
        *counts.entry(request.kind).or_default() += 1;
        let bucket = examples.entry(request.kind).or_default();
        if bucket.len() < MAX_REQUEST_EXAMPLES {
            bucket.push(request.text.clone());
        }
    }
    (counts, examples)
}

/// Number of pricing discussions and their mean pricing sentiment.
#[must_use]
pub fn pricing_stats(records: &[CommentRecord]) -> (usize, f64) {
    let sentiments = pricing_sentiments(records);
    (sentiments.len(), mean(&sentiments).unwrap_or(0.0))
}

/// Pricing sentiment of every record flagged as a pricing discussion.
#[must_use]
pub fn pricing_sentiments(records: &[CommentRecord]) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.is_pricing)
        .map(|r| r.pricing_sentiment)
        .collect()
}

/// Per-cluster mean sentiment and request histogram, keyed by cluster label.
///
/// Clusters with no member records are left out of both maps.
#[must_use]
pub fn cluster_stats(
    records: &[CommentRecord],
    cluster_labels: &BTreeMap<usize, String>,
) -> (
    BTreeMap<String, f64>,
    BTreeMap<String, BTreeMap<RequestKind, usize>>,
) {
    let mut sentiment = BTreeMap::new();
    let mut requests = BTreeMap::new();

    for (cluster_id, label) in cluster_labels {
        let members: Vec<&CommentRecord> = records
            .iter()
            .filter(|r| r.cluster == Some(*cluster_id))
            .collect();
        let sentiments: Vec<f64> = members.iter().map(|r| r.sentiment).collect();
        let Some(avg) = mean(&sentiments) else {
            continue;
        };

        let mut counts: BTreeMap<RequestKind, usize> = BTreeMap::new();
        for request in members.iter().flat_map(|r| &r.requests) {
            *counts.entry(request.kind).or_default() += 1;
        }

        sentiment.insert(label.clone(), avg);
        requests.insert(label.clone(), counts);
    }
    (sentiment, requests)
}

/// Mean sentiment per ISO week, ascending by week number.
#[must_use]
pub fn weekly_sentiment(records: &[CommentRecord]) -> Vec<WeeklySentiment> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.timestamp.iso_week().week())
            .or_default()
            .push(record.sentiment);
    }
    average_each(groups)
        .into_iter()
        .map(|(week, sentiment)| WeeklySentiment { week, sentiment })
        .collect()
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
