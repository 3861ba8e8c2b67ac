//! clicklink server entry point.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use clicklink::config::{self, Config};
use clicklink::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables win anyway.
    let _ = dotenvy::dotenv();

    let config = config::load_from_env().context("Invalid configuration")?;

    init_tracing(&config);
    config.print_summary();

    server::run(config).await
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
