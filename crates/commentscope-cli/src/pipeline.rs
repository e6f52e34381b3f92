//! The single batch run: load, normalize, analyze, report.

use anyhow::Context;
use commentscope_analysis::{analyze_engagement, write_report, AnalysisOptions, ModelSignals};
use commentscope_core::{load_comments, AppConfig, TextNormalizer};
use commentscope_inference::{ClusterParams, ModelClients};

/// Extra stopword alongside the brand handle.
const DOMAIN_STOPWORD: &str = "skin";

pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let mut records = load_comments(&config.input_path)?;

    let normalizer = TextNormalizer::new([config.brand.as_str(), DOMAIN_STOPWORD]);
    for record in &mut records {
        record.comment_text_clean = normalizer.normalize(&record.comment_text);
    }

    let clients = ModelClients::from_config(config)?;
    tracing::info!(backend = %config.backend, "model clients ready");

    let signals = ModelSignals::new(
        clients,
        ClusterParams {
            k: config.cluster_count,
            seed: config.cluster_seed,
        },
    );
    let options = AnalysisOptions {
        chart_path: Some(config.chart_path.clone()),
    };
    let summary = analyze_engagement(&mut records, &signals, &options).await;

    write_report(&config.report_path, &summary, &config.brand)
        .with_context(|| format!("writing report to {}", config.report_path.display()))?;
    Ok(())
}
