// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! `atvr serve` — run the REST API server.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::output;
use crate::config::Config;
use crate::fetch::Fetcher;
use crate::media::{MediaIngestor, MediaStore};
use crate::rest::{self, AppState};
use crate::search::SearchAggregator;

/// Start the HTTP server on the configured (or overridden) port.
pub async fn run(port: Option<u16>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("atvr=info".parse().unwrap()),
        )
        .init();

    let config = Arc::new(Config::from_env());
    let port = port.unwrap_or(config.http_port);

    info!("starting atvr-scraper v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(
        MediaStore::open(&config.media_db_path).context("failed to open media store")?,
    );
    let fetcher = Arc::new(Fetcher::new(Arc::clone(&config)));
    let aggregator = Arc::new(SearchAggregator::new(fetcher, Arc::clone(&config)));
    let ingestor = Arc::new(MediaIngestor::new(store, Arc::clone(&config)));

    if !output::is_quiet() {
        eprintln!(
            "  atvr-scraper v{} serving on port {port}",
            env!("CARGO_PKG_VERSION")
        );
    }

    rest::start(port, AppState { aggregator, ingestor }).await
}
