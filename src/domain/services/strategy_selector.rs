// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{json, Value};

use crate::domain::models::extraction::{
    ExtractionConfig, FieldKind, FieldSelector, LlmExtraction, SelectorExtraction,
};

/// LLM 提供商标识
pub const LLM_PROVIDER: &str = "gemini/gemini-2.0-flash";

/// 列表项容器选择器
pub const LISTING_BASE_SELECTOR: &str = ".lp-item, [class*='lp-card'], article, .archive-item";

const TITLE_SELECTOR: &str = "h3, h2, .title, [class*='title'], .name";

/// 抽取策略选择器
///
/// 根据请求参数决定使用 LLM 抽取还是 CSS 选择器抽取。
/// 选择是全函数：任何满足请求约束的输入都会得到一种配置。
pub struct StrategySelector;

impl StrategySelector {
    /// 选择抽取策略
    ///
    /// 仅当 `use_llm` 为 true 且提供了非空 API 密钥时选择 LLM 抽取，否则选择 CSS 选择器抽取
    pub fn select(use_llm: bool, api_key: Option<&str>, limit: usize) -> ExtractionConfig {
        match api_key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(api_key) if use_llm => ExtractionConfig::Llm(Self::llm_extraction(api_key, limit)),
            _ => ExtractionConfig::Selector(Self::selector_extraction()),
        }
    }

    /// 构建 LLM 抽取配置
    pub fn llm_extraction(api_key: &str, limit: usize) -> LlmExtraction {
        LlmExtraction {
            provider: LLM_PROVIDER.to_string(),
            api_token: api_key.to_string(),
            schema: listing_schema(),
            instruction: listing_instruction(limit),
        }
    }

    /// 构建 CSS 选择器抽取配置
    pub fn selector_extraction() -> SelectorExtraction {
        SelectorExtraction {
            name: "LP List".to_string(),
            base_selector: LISTING_BASE_SELECTOR.to_string(),
            fields: vec![
                FieldSelector {
                    name: "title".to_string(),
                    selector: TITLE_SELECTOR.to_string(),
                    kind: FieldKind::Text,
                },
                FieldSelector {
                    name: "thumbnail_url".to_string(),
                    selector: "img".to_string(),
                    kind: FieldKind::Attribute {
                        attribute: "src".to_string(),
                    },
                },
                FieldSelector {
                    name: "lp_url".to_string(),
                    selector: "a".to_string(),
                    kind: FieldKind::Attribute {
                        attribute: "href".to_string(),
                    },
                },
            ],
        }
    }
}

/// `{"lps": [{title, thumbnail_url, lp_url, category}]}`
fn listing_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "lps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "thumbnail_url": {"type": "string"},
                        "lp_url": {"type": "string"},
                        "category": {"type": "string"}
                    }
                }
            }
        }
    })
}

fn listing_instruction(limit: usize) -> String {
    format!(
        "Extract the list of landing pages (LPs) shown on this page.\n\
         For each LP, return:\n\
         - title: the LP title (product or service name)\n\
         - thumbnail_url: the full URL of the thumbnail image\n\
         - lp_url: the link URL of the LP\n\
         - category: the category, if any\n\
         \n\
         Return at most {limit} items.\n\
         Convert relative URLs to absolute URLs."
    )
}
