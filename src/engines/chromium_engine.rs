// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::settings::{CrawlerSettings, LlmSettings};
use crate::domain::models::extraction::ExtractionConfig;
use crate::domain::services::strategy_selector::StrategySelector;
use crate::engines::css_extractor::CssExtractor;
use crate::engines::llm_extractor::LlmExtractor;
use crate::engines::traits::{CrawlOutcome, Crawler, CrawlerError, CrawlerRunConfig};

const ENGINE_NAME: &str = "chromium";

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const WEBDRIVER_OVERRIDE: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// Chromium 抓取引擎
///
/// 基于 chromiumoxide 的浏览器自动化协作方。每次抓取都会启动（或连接）独立的浏览器会话，
/// 会话在所有退出路径上关闭，请求之间不共享任何状态。
pub struct ChromiumCrawler {
    settings: CrawlerSettings,
    llm: LlmExtractor,
}

impl ChromiumCrawler {
    pub fn new(settings: CrawlerSettings, llm_settings: &LlmSettings) -> Self {
        Self {
            settings,
            llm: LlmExtractor::new(llm_settings),
        }
    }

    /// 构建浏览器启动配置
    ///
    /// 找不到 chrome 可执行文件时返回 `CrawlerError::Unavailable`
    fn browser_config(&self, run: &CrawlerRunConfig) -> Result<BrowserConfig, CrawlerError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(self.settings.page_load_timeout_secs))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if !run.headless {
            builder = builder.with_head();
        }
        if run.magic {
            builder = builder.arg("--disable-blink-features=AutomationControlled");
        }
        if let Some(path) = &self.settings.chrome_executable {
            if !Path::new(path).exists() {
                return Err(unavailable(format!("chrome executable not found at {}", path)));
            }
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(unavailable)
    }

    async fn open_session(&self, run: &CrawlerRunConfig) -> Result<BrowserSession, CrawlerError> {
        let (browser, mut handler, launched) =
            if let Some(url) = &self.settings.remote_debugging_url {
                debug!("Connecting to remote Chrome instance at: {}", url);
                let (browser, handler) = Browser::connect(url.as_str()).await.map_err(|e| {
                    unavailable(format!("failed to connect to remote Chrome at {}: {}", url, e))
                })?;
                (browser, handler, false)
            } else {
                let config = self.browser_config(run)?;
                let (browser, handler) = Browser::launch(config)
                    .await
                    .map_err(|e| unavailable(e.to_string()))?;
                (browser, handler, true)
            };

        // Drive the CDP event loop for the lifetime of the session
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(BrowserSession {
            browser,
            handler_task,
            launched,
        })
    }

    /// 渲染页面并返回 HTML
    ///
    /// 导航失败、等待超时等以错误信息返回，由调用方作为协作方失败报告
    async fn render_page(
        &self,
        page: &Page,
        url: &str,
        run: &CrawlerRunConfig,
    ) -> Result<String, String> {
        if run.magic {
            page.set_user_agent(DESKTOP_USER_AGENT)
                .await
                .map_err(|e| e.to_string())?;
            page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
                WEBDRIVER_OVERRIDE,
            ))
            .await
            .map_err(|e| e.to_string())?;
        }

        if run.screenshot {
            warn!("Screenshots are not supported by the {} engine", ENGINE_NAME);
        }

        let timeout = Duration::from_secs(self.settings.page_load_timeout_secs);
        tokio::time::timeout(timeout, async {
            page.goto(url).await?;
            page.find_element(run.wait_for.as_str()).await?;
            Ok::<(), CdpError>(())
        })
        .await
        .map_err(|_| {
            format!(
                "Timed out after {}s waiting for '{}' on {}",
                timeout.as_secs(),
                run.wait_for,
                url
            )
        })?
        .map_err(|e| format!("Failed to load {}: {}", url, e))?;

        tokio::time::sleep(run.delay_before_return).await;

        page.content().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl Crawler for ChromiumCrawler {
    async fn crawl(
        &self,
        url: &str,
        config: &CrawlerRunConfig,
    ) -> Result<CrawlOutcome, CrawlerError> {
        let session = self.open_session(config).await?;
        let page = match session.browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                session.close().await;
                return Err(CrawlerError::Other(format!("Failed to open page: {}", e)));
            }
        };

        let rendered = self.render_page(&page, url, config).await;
        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }
        session.close().await;

        let html = match rendered {
            Ok(html) => html,
            Err(message) => {
                warn!("Crawl of {} failed: {}", url, message);
                return Ok(CrawlOutcome::failed(message));
            }
        };
        info!("Rendered {} ({} bytes)", url, html.len());

        match &config.extraction {
            ExtractionConfig::Selector(selector) => Ok(CrawlOutcome::succeeded(
                CssExtractor::extract(&html, selector)?,
            )),
            ExtractionConfig::Llm(llm) => match self.llm.extract(url, &html, llm).await {
                Ok(raw) => Ok(CrawlOutcome::succeeded(raw)),
                Err(e) => {
                    warn!("LLM extraction for {} failed: {}", url, e);
                    Ok(CrawlOutcome::failed(e.to_string()))
                }
            },
        }
    }

    fn is_available(&self) -> bool {
        if self.settings.remote_debugging_url.is_some() {
            return true;
        }
        let probe =
            CrawlerRunConfig::new(ExtractionConfig::Selector(StrategySelector::selector_extraction()));
        self.browser_config(&probe).is_ok()
    }

    fn name(&self) -> &'static str {
        ENGINE_NAME
    }
}

fn unavailable(detail: impl Into<String>) -> CrawlerError {
    CrawlerError::Unavailable {
        engine: ENGINE_NAME,
        detail: detail.into(),
    }
}

/// 单次请求的浏览器会话
///
/// 自己启动的浏览器在 `close` 时关闭并回收进程；连接的远程浏览器只断开事件循环。
/// 未显式关闭（例如 future 被丢弃）时 `Drop` 会终止事件循环任务，
/// chromiumoxide 在 `Browser` 析构时会杀掉子进程。
struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    launched: bool,
}

impl BrowserSession {
    async fn close(mut self) {
        if self.launched {
            if let Err(e) = self.browser.close().await {
                debug!("Failed to close browser: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                debug!("Failed to wait for browser exit: {}", e);
            }
        }
        self.handler_task.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(chrome_executable: Option<&str>, remote: Option<&str>) -> CrawlerSettings {
        CrawlerSettings {
            remote_debugging_url: remote.map(str::to_string),
            chrome_executable: chrome_executable.map(str::to_string),
            page_load_timeout_secs: 5,
        }
    }

    fn llm_settings() -> LlmSettings {
        LlmSettings {
            api_base_url: "http://127.0.0.1:1".to_string(),
            max_input_chars: 100,
        }
    }

    #[test]
    fn test_missing_executable_is_unavailable() {
        let crawler = ChromiumCrawler::new(
            settings(Some("/definitely/not/a/chrome"), None),
            &llm_settings(),
        );
        assert!(!crawler.is_available());
        assert_eq!(crawler.name(), "chromium");
    }

    #[test]
    fn test_remote_browser_counts_as_available() {
        let crawler = ChromiumCrawler::new(
            settings(None, Some("http://127.0.0.1:9222")),
            &llm_settings(),
        );
        assert!(crawler.is_available());
    }

    #[tokio::test]
    async fn test_crawl_without_browser_reports_unavailable() {
        let crawler = ChromiumCrawler::new(
            settings(Some("/definitely/not/a/chrome"), None),
            &llm_settings(),
        );
        let config =
            CrawlerRunConfig::new(ExtractionConfig::Selector(StrategySelector::selector_extraction()));

        let err = crawler
            .crawl("https://rdlp.jp/lp-archive", &config)
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("chromium is not installed: "));
    }
}
