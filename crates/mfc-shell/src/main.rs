//! Clinic Accessibility Shell - Main Entry Point

mod page;
mod session;

use anyhow::{Context, Result};
use mfc_a11y::RuntimeConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Optional config path
    let config = match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::load(&path).with_context(|| format!("loading config from {path}"))?,
        None => RuntimeConfig::default(),
    };
    tracing::info!(language = %config.default_language, "starting clinic accessibility session");

    session::run(config)
}
