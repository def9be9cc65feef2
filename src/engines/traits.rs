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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::extraction::{ExtractionConfig, RawExtraction};

/// 抓取引擎错误类型
///
/// 只表示协作方自身无法工作的情况；页面导航失败等由 `CrawlOutcome` 报告
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// 浏览器不可用（未安装或无法启动/连接）
    #[error("{engine} is not installed: {detail}")]
    Unavailable { engine: &'static str, detail: String },
    /// 抽取器错误
    #[error(transparent)]
    Extractor(#[from] ExtractorError),
    /// 其他错误
    #[error("{0}")]
    Other(String),
}

/// 抽取器错误类型
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// 选择器无法解析
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
    /// LLM 请求失败
    #[error("LLM request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// LLM 返回错误状态
    #[error("LLM API returned error: {status} - {body}")]
    Api { status: u16, body: String },
    /// LLM 响应格式不符合预期
    #[error("Invalid response format from LLM API")]
    InvalidResponse,
}

/// 浏览器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserType {
    Chromium,
}

impl BrowserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserType::Chromium => "chromium",
        }
    }
}

/// 一次抓取的运行配置
#[derive(Debug, Clone)]
pub struct CrawlerRunConfig {
    /// 抽取策略
    pub extraction: ExtractionConfig,
    /// 是否无头模式
    pub headless: bool,
    /// 浏览器类型
    pub browser_type: BrowserType,
    /// 返回前等待出现的元素选择器
    pub wait_for: String,
    /// 返回 HTML 前的固定等待时间
    pub delay_before_return: Duration,
    /// 是否启用反机器人检测
    pub magic: bool,
    /// 是否截图
    pub screenshot: bool,
}

impl CrawlerRunConfig {
    /// 使用固定运行参数创建配置
    ///
    /// 无头 chromium，等待 `body`，返回前等待 3 秒，启用反检测，不截图
    pub fn new(extraction: ExtractionConfig) -> Self {
        Self {
            extraction,
            headless: true,
            browser_type: BrowserType::Chromium,
            wait_for: "body".to_string(),
            delay_before_return: Duration::from_secs(3),
            magic: true,
            screenshot: false,
        }
    }
}

/// 协作方报告的抓取结果
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOutcome {
    /// 协作方是否报告成功
    pub success: bool,
    /// 抽取得到的原始内容
    pub extracted_content: Option<RawExtraction>,
    /// 失败信息
    pub error_message: Option<String>,
}

impl CrawlOutcome {
    pub fn succeeded(extracted_content: RawExtraction) -> Self {
        Self {
            success: true,
            extracted_content: Some(extracted_content),
            error_message: None,
        }
    }

    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            extracted_content: None,
            error_message: Some(error_message.into()),
        }
    }
}

/// 抓取协作方特质
///
/// 每次 `crawl` 调用都在独立的会话中完成，会话资源在所有退出路径上释放
#[async_trait]
pub trait Crawler: Send + Sync {
    /// 抓取页面并按配置抽取内容
    async fn crawl(&self, url: &str, config: &CrawlerRunConfig)
        -> Result<CrawlOutcome, CrawlerError>;

    /// 当前环境下协作方是否可用（无副作用）
    fn is_available(&self) -> bool;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
