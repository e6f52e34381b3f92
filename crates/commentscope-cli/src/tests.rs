use std::path::{Path, PathBuf};

use commentscope_core::{AppConfig, BackendKind};

use super::*;

#[test]
fn no_input_argument_is_none() {
    let cli = Cli::try_parse_from(["commentscope"]).expect("expected valid cli args");
    assert!(cli.input.is_none());
}

#[test]
fn parses_input_path() {
    let cli = Cli::try_parse_from(["commentscope", "data/march.csv"])
        .expect("expected valid cli args");
    assert_eq!(cli.input, Some(PathBuf::from("data/march.csv")));
}

#[test]
fn rejects_extra_positional_arguments() {
    assert!(Cli::try_parse_from(["commentscope", "a.csv", "b.csv"]).is_err());
}

fn test_config(dir: &Path, input: PathBuf) -> AppConfig {
    AppConfig {
        input_path: input,
        chart_path: dir.join("engagement_analysis.svg"),
        report_path: dir.join("engagement_report.md"),
        brand: "treehut".to_string(),
        log_level: "info".to_string(),
        backend: BackendKind::Lexicon,
        endpoints: None,
        inference_token: None,
        request_timeout_secs: 30,
        cluster_count: 2,
        cluster_seed: 42,
    }
}

#[tokio::test]
async fn pipeline_writes_chart_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("engagements.csv");
    std::fs::write(
        &input,
        "timestamp,media_id,media_caption,comment_text\n\
         2025-03-03 10:00:00,m1,cap,love this scrub\n\
         2025-03-04 10:00:00,m1,cap,bogo deal is great\n\
         2025-03-05 10:00:00,m1,cap,\n",
    )
    .unwrap();
    let config = test_config(dir.path(), input);

    pipeline::run(&config).await.expect("pipeline should succeed");

    let report = std::fs::read_to_string(&config.report_path).unwrap();
    assert!(report.starts_with("# @treehut Instagram Comments Analysis"));
    assert!(report.contains("- scrub: "));
    assert!(config.chart_path.exists());
}

#[tokio::test]
async fn missing_input_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), dir.path().join("nope.csv"));

    let err = pipeline::run(&config).await.unwrap_err();
    assert!(err.to_string().contains("nope.csv"));
    assert!(!config.report_path.exists());
}

#[tokio::test]
async fn http_backend_without_endpoints_fails_before_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("engagements.csv");
    std::fs::write(
        &input,
        "timestamp,media_id,media_caption,comment_text\n2025-03-03 10:00:00,m1,cap,hi\n",
    )
    .unwrap();
    let mut config = test_config(dir.path(), input);
    config.backend = BackendKind::Http;

    assert!(pipeline::run(&config).await.is_err());
    assert!(!config.report_path.exists());
}
