//! End-to-end engagement analysis: enrich, cluster, aggregate, chart.

use std::path::PathBuf;

use commentscope_core::CommentRecord;
use commentscope_inference::ClusterOutcome;

use crate::aggregate::{pricing_sentiments, summarize};
use crate::chart::render_dashboard;
use crate::error::AnalysisError;
use crate::signals::CommentSignals;
use crate::summary::EngagementSummary;

#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Where to write the SVG dashboard. `None` skips rendering.
    pub chart_path: Option<PathBuf>,
}

/// Fill in the model-derived fields of every record.
///
/// Sentiment is scored on the normalized text; every other signal sees the
/// raw comment.
async fn enrich(
    records: &mut [CommentRecord],
    signals: &dyn CommentSignals,
) -> Result<(), AnalysisError> {
    for record in records.iter_mut() {
        let mentions = signals.products_and_deals(&record.comment_text).await?;
        record.apply_mentions(mentions);
        record.sentiment = signals.sentiment(&record.comment_text_clean).await?;
        record.requests = signals.requests(&record.comment_text).await?;
        let pricing = signals.pricing(&record.comment_text).await?;
        record.apply_pricing(pricing);
    }
    Ok(())
}

/// Write cluster ids onto the records they were computed for.
fn assign_clusters(
    records: &mut [CommentRecord],
    outcome: &ClusterOutcome,
) -> Result<(), AnalysisError> {
    for record in records.iter_mut() {
        record.cluster = None;
    }
    let rows = records.len();
    for &(row, cluster_id) in &outcome.assignments {
        let record = records
            .get_mut(row)
            .ok_or(AnalysisError::ClusterAlignment { row, rows })?;
        record.cluster = Some(cluster_id);
    }
    Ok(())
}

/// Run the analysis, propagating the first error.
///
/// Records are enriched in place, so callers can inspect per-row results
/// afterwards.
///
/// # Errors
///
/// Returns [`AnalysisError`] if a signal call fails, a cluster assignment
/// does not match a row, or the dashboard cannot be rendered.
pub async fn try_analyze_engagement(
    records: &mut [CommentRecord],
    signals: &dyn CommentSignals,
    options: &AnalysisOptions,
) -> Result<EngagementSummary, AnalysisError> {
    enrich(records, signals).await?;

    let texts: Vec<&str> = records.iter().map(|r| r.comment_text.as_str()).collect();
    let outcome = signals.clusters(&texts).await?;
    assign_clusters(records, &outcome)?;

    let summary = summarize(records, &outcome.labels);

    if let Some(path) = &options.chart_path {
        render_dashboard(path, &summary, &pricing_sentiments(records))?;
        tracing::info!(path = %path.display(), "engagement and request visualizations generated");
    }

    Ok(summary)
}

/// Fail-soft form of [`try_analyze_engagement`].
///
/// Any error is logged and the empty [`EngagementSummary::default`] is
/// returned instead.
pub async fn analyze_engagement(
    records: &mut [CommentRecord],
    signals: &dyn CommentSignals,
    options: &AnalysisOptions,
) -> EngagementSummary {
    match try_analyze_engagement(records, signals, options).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "error in engagement analysis");
            EngagementSummary::default()
        }
    }
}

#[cfg(test)]
#[path = "engagement_test.rs"]
mod tests;
