// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{Html, Node, Selector};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::settings::LlmSettings;
use crate::domain::models::extraction::{LlmExtraction, RawExtraction};
use crate::engines::traits::ExtractorError;

/// LLM 抽取器
///
/// 通过 OpenAI 兼容的 chat completions 接口，按 schema 和指令从页面内容中抽取结构化数据。
///
/// # 配置
///
/// - `api_base_url` - 接口基础 URL（默认为 Gemini 的 OpenAI 兼容端点）
/// - `max_input_chars` - 发送给模型的页面内容最大字符数
pub struct LlmExtractor {
    client: reqwest::Client,
    api_base_url: String,
    max_input_chars: usize,
}

impl LlmExtractor {
    pub fn new(settings: &LlmSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    pub fn with_client(client: reqwest::Client, settings: &LlmSettings) -> Self {
        Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            max_input_chars: settings.max_input_chars,
        }
    }

    /// 使用 LLM 从页面内容中抽取结构化数据
    ///
    /// # 参数
    /// * `page_url` - 页面地址，供模型把相对 URL 转为绝对 URL
    /// * `content` - 渲染后的 HTML，发送前压缩为正文文本
    /// * `config` - LLM 抽取配置
    ///
    /// # 返回值
    /// 模型回复的原始文本（已去除 markdown 代码块标记），由结果规范化器负责解码
    ///
    /// # 错误
    /// * 请求发送失败或接口返回非 2xx 状态
    /// * 回复中没有消息内容
    pub async fn extract(
        &self,
        page_url: &str,
        content: &str,
        config: &LlmExtraction,
    ) -> Result<RawExtraction, ExtractorError> {
        let text = page_text(content);
        let truncated = truncate_chars(&text, self.max_input_chars);

        let prompt = format!(
            "{}\n\nOutput JSON must follow this schema: {}\n\
             Return ONLY the JSON object, no markdown formatting.\n\
             Page URL: {}\n\
             Page content:\n{}",
            config.instruction.trim(),
            config.schema,
            page_url,
            truncated
        );

        let request_body = json!({
            "model": config.model(),
            "messages": [
                {
                    "role": "system",
                    "content": "You are a helpful data extraction assistant. You output only valid JSON."
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": 0.0
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        debug!("Sending extraction request to {} (model {})", url, config.model());

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ExtractorError::InvalidResponse)?;

        Ok(RawExtraction::Text(strip_code_fence(content).to_string()))
    }
}

/// 不会出现列表内容的元素
const SKIPPED_ELEMENTS: [&str; 6] = ["script", "style", "noscript", "svg", "template", "iframe"];

/// 把渲染后的 HTML 压缩为 `<body>` 中的可见文本
///
/// 链接和图片保留为 `<a href>` / `<img src alt>`，供模型还原 `lp_url` 和 `thumbnail_url`
fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = body.unwrap_or_else(|| document.root_element());

    let mut out = String::new();
    for node in root.descendants() {
        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
        });
        if skipped {
            continue;
        }

        match node.value() {
            Node::Text(text) => {
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !text.is_empty() {
                    out.push_str(&text);
                    out.push('\n');
                }
            }
            Node::Element(element) => match element.name() {
                "a" => {
                    if let Some(href) = element.attr("href") {
                        out.push_str(&format!("<a href=\"{}\">\n", href));
                    }
                }
                "img" => {
                    if let Some(src) = element.attr("src") {
                        out.push_str(&format!(
                            "<img src=\"{}\" alt=\"{}\">\n",
                            src,
                            element.attr("alt").unwrap_or_default()
                        ));
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }
    out
}

/// 去掉模型回复中可能包裹的 markdown 代码块
fn strip_code_fence(content: &str) -> &str {
    content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// 按字符截断，避免切在多字节字符中间
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
