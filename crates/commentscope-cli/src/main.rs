mod pipeline;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "commentscope")]
#[command(about = "Analyze social-media comments for products, deals, requests, and pricing")]
struct Cli {
    /// Comment CSV to analyze. Overrides `COMMENTSCOPE_INPUT_PATH`.
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = commentscope_core::load_app_config()?;
    if let Some(input) = cli.input {
        config.input_path = input;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    if let Err(e) = pipeline::run(&config).await {
        tracing::error!(error = %e, "error in main pipeline");
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
