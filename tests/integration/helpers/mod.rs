// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use lp_archive_scraper::application::use_cases::scrape_lp_archive::ScrapeLpArchiveUseCase;
use lp_archive_scraper::config::settings::Settings;
use lp_archive_scraper::engines::traits::{CrawlOutcome, Crawler, CrawlerError, CrawlerRunConfig};
use lp_archive_scraper::presentation::routes;
use std::sync::{Arc, Mutex};

/// 返回固定结果的抓取协作方，记录每次调用的 URL 和运行配置
pub struct StubCrawler {
    available: bool,
    outcome: Result<CrawlOutcome, String>,
    calls: Mutex<Vec<(String, CrawlerRunConfig)>>,
}

impl StubCrawler {
    pub fn returning(outcome: CrawlOutcome) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            outcome: Ok(outcome),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// 模拟浏览器未安装
    pub fn unavailable(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            available: false,
            outcome: Err(detail.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, CrawlerRunConfig)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Crawler for StubCrawler {
    async fn crawl(
        &self,
        url: &str,
        config: &CrawlerRunConfig,
    ) -> Result<CrawlOutcome, CrawlerError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), config.clone()));
        self.outcome
            .clone()
            .map_err(|detail| CrawlerError::Unavailable {
                engine: "chromium",
                detail,
            })
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub fn create_router(crawler: Arc<StubCrawler>) -> Router {
    let settings = Settings::default_settings().unwrap();
    let use_case = Arc::new(ScrapeLpArchiveUseCase::new(crawler));
    routes::routes(use_case, &settings.cors)
}

pub fn create_test_server(crawler: Arc<StubCrawler>) -> TestServer {
    TestServer::new(create_router(crawler)).unwrap()
}
