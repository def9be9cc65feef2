// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use lp_archive_scraper::application::use_cases::scrape_lp_archive::ScrapeLpArchiveUseCase;
use lp_archive_scraper::config::settings::Settings;
use lp_archive_scraper::engines::chromium_engine::ChromiumCrawler;
use lp_archive_scraper::engines::traits::Crawler;
use lp_archive_scraper::infrastructure::metrics::init_metrics;
use lp_archive_scraper::presentation::routes;
use lp_archive_scraper::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize Telemetry
    telemetry::init_telemetry();

    // 2. Load Configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Initialize Metrics
    init_metrics(&settings.metrics);

    // 4. Initialize Crawler
    let crawler = Arc::new(ChromiumCrawler::new(
        settings.crawler.clone(),
        &settings.llm,
    ));
    if !crawler.is_available() {
        warn!(
            "{} is not available; scrape requests will fail until it is installed",
            crawler.name()
        );
    }
    let use_case = Arc::new(ScrapeLpArchiveUseCase::new(crawler));

    // 5. Start HTTP server
    let app = routes::routes(use_case, &settings.cors);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);
    info!("API docs: http://localhost:{}/docs", settings.server.port);
    info!("Health check: http://localhost:{}/health", settings.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
