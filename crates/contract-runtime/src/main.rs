//! # Contract Runtime
//!
//! Entry point invoked by the host once per consensus round.
//!
//! Logs go to stderr; stdout carries only reply lines.

use std::io::{self, Read};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use contract_runtime::config::RuntimeConfig;
use contract_runtime::run_round;

fn read_context(config: &RuntimeConfig) -> Result<String> {
    match &config.context_path {
        Some(path) => {
            let path = config.resolve(path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read context file {}", path.display()))
        }
        None => {
            let mut json = String::new();
            io::stdin()
                .read_to_string(&mut json)
                .context("failed to read context from stdin")?;
            Ok(json)
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    // Load configuration
    let config = RuntimeConfig::from_env();
    let json = read_context(&config)?;

    let stats = run_round(&config, &json, io::stdout().lock())?;

    info!(
        inputs = stats.inputs_processed,
        replies = stats.replies(),
        appended = stats.records_appended,
        "[echo] round finished"
    );
    Ok(())
}
