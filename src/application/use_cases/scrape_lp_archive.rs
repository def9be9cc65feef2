// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::application::dto::scrape_request::ScrapeRequestDto;
use crate::application::dto::scrape_response::ScrapeResponseDto;
use crate::domain::models::extraction::ExtractionConfig;
use crate::domain::models::lp_result::LpResult;
use crate::domain::services::result_normalizer::ResultNormalizer;
use crate::domain::services::strategy_selector::StrategySelector;
use crate::engines::traits::{Crawler, CrawlerError, CrawlerRunConfig};
use crate::infrastructure::metrics::{self, ScrapeOutcome};
use crate::utils::url_utils::build_target_url;

/// 协作方报告失败但没有给出原因时使用的信息
pub const GENERIC_FAILURE_MESSAGE: &str = "スクレイピングに失敗しました";

// === Section: Errors ===

/// 抓取用例错误类型
///
/// 只在用例内部使用，`execute` 会把它们全部转换为 `success = false` 的响应
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationErrors),

    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Crawler(#[from] CrawlerError),

    /// 协作方自己报告的失败（导航被拦截、超时等）
    #[error("{0}")]
    Collaborator(String),

    #[error("{0}")]
    Panicked(String),
}

impl ScrapeError {
    fn outcome(&self) -> ScrapeOutcome {
        match self {
            ScrapeError::Crawler(CrawlerError::Unavailable { .. }) => ScrapeOutcome::Unavailable,
            _ => ScrapeOutcome::Failure,
        }
    }
}

// === Section: Use Case Definition ===

/// LP 归档抓取用例
///
/// 组合 URL 构建、策略选择、协作方抓取和结果规范化。
/// 每个请求只调用一次协作方，不重试，不在请求之间共享可变状态。
pub struct ScrapeLpArchiveUseCase {
    crawler: Arc<dyn Crawler>,
}

// === Section: Implementation ===

impl ScrapeLpArchiveUseCase {
    pub fn new(crawler: Arc<dyn Crawler>) -> Self {
        Self { crawler }
    }

    /// 协作方是否可用
    pub fn collaborator_available(&self) -> bool {
        self.crawler.is_available()
    }

    /// 执行抓取
    ///
    /// 从不返回错误：所有失败都转换为 `{success: false, results: [], error}`。
    /// 抽取结果为空（页面可达但没有找到 LP）仍然是成功。
    pub async fn execute(&self, request: &ScrapeRequestDto) -> ScrapeResponseDto {
        let start = Instant::now();
        let extraction = StrategySelector::select(
            request.use_llm,
            request.api_key(),
            request.result_limit(),
        );
        let strategy = extraction.strategy_name();

        match self.run(request, extraction).await {
            Ok(results) => {
                info!(
                    "Scraped {} LPs from {} using {} strategy in {}ms",
                    results.len(),
                    request.url,
                    strategy,
                    start.elapsed().as_millis()
                );
                metrics::record_scrape(strategy, ScrapeOutcome::Success, results.len());
                ScrapeResponseDto::success(results)
            }
            Err(e) => {
                warn!("Scrape of {} failed: {}", request.url, e);
                metrics::record_scrape(strategy, e.outcome(), 0);
                ScrapeResponseDto::failure(e.to_string())
            }
        }
    }

    async fn run(
        &self,
        request: &ScrapeRequestDto,
        extraction: ExtractionConfig,
    ) -> Result<Vec<LpResult>, ScrapeError> {
        request.validate()?;

        let url = build_target_url(&request.url, request.image_type_filter())?;
        info!(
            "Crawling {} with {} strategy",
            url,
            extraction.strategy_name()
        );

        let config = CrawlerRunConfig::new(extraction);
        let outcome = AssertUnwindSafe(self.crawler.crawl(url.as_str(), &config))
            .catch_unwind()
            .await
            .map_err(|payload| ScrapeError::Panicked(panic_message(payload)))??;

        if !outcome.success {
            let message = outcome
                .error_message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            return Err(ScrapeError::Collaborator(message));
        }

        Ok(outcome
            .extracted_content
            .map(|raw| ResultNormalizer::normalize(raw, request.result_limit()))
            .unwrap_or_default())
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "crawler panicked".to_string()
    }
}
