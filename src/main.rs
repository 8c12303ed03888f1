use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod config;
mod dump;
mod emit;
mod error;
mod fetch;
mod model;
mod output;
mod pipeline;
mod scan;

use cli::RootArgs;
use config::{load_config, validate_config, PipelineConfig};
use fetch::{DocumentFetcher, HttpFetcher};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_logging(args.logging_level);

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    args.apply_overrides(&mut config);
    validate_config(&config)?;

    let http = HttpFetcher;
    let fetcher: Option<&dyn DocumentFetcher> = if args.download_live {
        Some(&http)
    } else {
        None
    };
    let summary = pipeline::run(&config, fetcher).context("generate ESOUI constant tables")?;

    if args.json {
        let text = serde_json::to_string_pretty(&summary).context("serialize run summary")?;
        println!("{text}");
    }
    tracing::info!(
        categories = summary.categories,
        constants = summary.constants,
        "all done"
    );
    Ok(())
}

fn init_logging(level: cli::LogLevel) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
