use crate::app_config::{AppConfig, BackendKind, InferenceEndpoints};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default except the HTTP endpoint URLs, which are
/// required only when `COMMENTSCOPE_BACKEND=http`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let input_path = PathBuf::from(or_default(
        "COMMENTSCOPE_INPUT_PATH",
        "data/engagements.csv",
    ));
    let chart_path = PathBuf::from(or_default(
        "COMMENTSCOPE_CHART_PATH",
        "engagement_analysis.svg",
    ));
    let report_path = PathBuf::from(or_default(
        "COMMENTSCOPE_REPORT_PATH",
        "engagement_report.md",
    ));
    let brand = or_default("COMMENTSCOPE_BRAND", "treehut");
    let log_level = or_default("COMMENTSCOPE_LOG_LEVEL", "info");

    let backend = parse_backend(&or_default("COMMENTSCOPE_BACKEND", "lexicon")).ok_or_else(
        || ConfigError::InvalidEnvVar {
            var: "COMMENTSCOPE_BACKEND".to_string(),
            reason: "expected 'lexicon' or 'http'".to_string(),
        },
    )?;

    let endpoints = match backend {
        BackendKind::Lexicon => None,
        BackendKind::Http => Some(InferenceEndpoints {
            ner_url: require("COMMENTSCOPE_NER_URL")?,
            sentiment_url: require("COMMENTSCOPE_SENTIMENT_URL")?,
            zero_shot_url: require("COMMENTSCOPE_ZERO_SHOT_URL")?,
            intent_url: require("COMMENTSCOPE_INTENT_URL")?,
            embed_url: require("COMMENTSCOPE_EMBED_URL")?,
        }),
    };

    let inference_token = lookup("COMMENTSCOPE_INFERENCE_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    let request_timeout_secs = parse_u64("COMMENTSCOPE_REQUEST_TIMEOUT_SECS", "30")?;

    let cluster_count = parse_usize("COMMENTSCOPE_CLUSTERS", "5")?;
    if cluster_count == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COMMENTSCOPE_CLUSTERS".to_string(),
            reason: "cluster count must be at least 1".to_string(),
        });
    }
    let cluster_seed = parse_u64("COMMENTSCOPE_CLUSTER_SEED", "42")?;

    Ok(AppConfig {
        input_path,
        chart_path,
        report_path,
        brand,
        log_level,
        backend,
        endpoints,
        inference_token,
        request_timeout_secs,
        cluster_count,
        cluster_seed,
    })
}

/// Parse a backend name. Case-insensitive; unknown names yield `None`.
fn parse_backend(s: &str) -> Option<BackendKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "lexicon" => Some(BackendKind::Lexicon),
        "http" => Some(BackendKind::Http),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map selecting the HTTP backend with every endpoint set.
    fn http_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("COMMENTSCOPE_BACKEND", "http");
        m.insert("COMMENTSCOPE_NER_URL", "http://models:8080/ner");
        m.insert("COMMENTSCOPE_SENTIMENT_URL", "http://models:8080/sentiment");
        m.insert("COMMENTSCOPE_ZERO_SHOT_URL", "http://models:8080/zero-shot");
        m.insert("COMMENTSCOPE_INTENT_URL", "http://models:8080/intent");
        m.insert("COMMENTSCOPE_EMBED_URL", "http://tei:8080");
        m
    }

    #[test]
    fn parse_backend_known_values() {
        assert_eq!(parse_backend("lexicon"), Some(BackendKind::Lexicon));
        assert_eq!(parse_backend("HTTP"), Some(BackendKind::Http));
        assert_eq!(parse_backend(" http "), Some(BackendKind::Http));
    }

    #[test]
    fn parse_backend_unknown_is_none() {
        assert_eq!(parse_backend("onnx"), None);
    }

    #[test]
    fn build_app_config_defaults_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.input_path.to_str(), Some("data/engagements.csv"));
        assert_eq!(cfg.chart_path.to_str(), Some("engagement_analysis.svg"));
        assert_eq!(cfg.report_path.to_str(), Some("engagement_report.md"));
        assert_eq!(cfg.brand, "treehut");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.backend, BackendKind::Lexicon);
        assert!(cfg.endpoints.is_none());
        assert!(cfg.inference_token.is_none());
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.cluster_count, 5);
        assert_eq!(cfg.cluster_seed, 42);
    }

    #[test]
    fn build_app_config_rejects_unknown_backend() {
        let mut map = HashMap::new();
        map.insert("COMMENTSCOPE_BACKEND", "torch");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "COMMENTSCOPE_BACKEND"),
            "expected InvalidEnvVar(COMMENTSCOPE_BACKEND), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_http_backend_requires_endpoints() {
        let mut map = http_env();
        map.remove("COMMENTSCOPE_ZERO_SHOT_URL");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "COMMENTSCOPE_ZERO_SHOT_URL"),
            "expected MissingEnvVar(COMMENTSCOPE_ZERO_SHOT_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_http_backend_collects_endpoints() {
        let map = http_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.backend, BackendKind::Http);
        let endpoints = cfg.endpoints.expect("endpoints set for http backend");
        assert_eq!(endpoints.ner_url, "http://models:8080/ner");
        assert_eq!(endpoints.embed_url, "http://tei:8080");
    }

    #[test]
    fn build_app_config_lexicon_ignores_endpoint_vars() {
        let mut map = http_env();
        map.insert("COMMENTSCOPE_BACKEND", "lexicon");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.endpoints.is_none());
    }

    #[test]
    fn build_app_config_cluster_count_override() {
        let mut map = HashMap::new();
        map.insert("COMMENTSCOPE_CLUSTERS", "8");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.cluster_count, 8);
    }

    #[test]
    fn build_app_config_cluster_count_zero_is_invalid() {
        let mut map = HashMap::new();
        map.insert("COMMENTSCOPE_CLUSTERS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "COMMENTSCOPE_CLUSTERS"),
            "expected InvalidEnvVar(COMMENTSCOPE_CLUSTERS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_cluster_seed_invalid() {
        let mut map = HashMap::new();
        map.insert("COMMENTSCOPE_CLUSTER_SEED", "forty-two");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "COMMENTSCOPE_CLUSTER_SEED"),
            "expected InvalidEnvVar(COMMENTSCOPE_CLUSTER_SEED), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_request_timeout_override() {
        let mut map = HashMap::new();
        map.insert("COMMENTSCOPE_REQUEST_TIMEOUT_SECS", "90");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 90);
    }

    #[test]
    fn build_app_config_blank_token_is_none() {
        let mut map = HashMap::new();
        map.insert("COMMENTSCOPE_INFERENCE_TOKEN", "  ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.inference_token.is_none());
    }

    #[test]
    fn debug_output_redacts_token() {
        let mut map = HashMap::new();
        map.insert("COMMENTSCOPE_INFERENCE_TOKEN", "hf_secret_value");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("hf_secret_value"));
        assert!(rendered.contains("[redacted]"));
    }
}
