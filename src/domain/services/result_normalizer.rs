// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::models::extraction::RawExtraction;
use crate::domain::models::lp_result::{LpResult, UNTITLED_PLACEHOLDER};

/// 候选列表所在的键
const LPS_KEY: &str = "lps";

/// 结果规范化器
///
/// 把协作方返回的形状不确定的抽取结果解释为有界、已校验的 `LpResult` 序列。
///
/// 容错规则：
/// 1. 文本先尝试按 JSON 解码，解码失败则得到空结果（不是错误）
/// 2. 映射取 `lps` 键的值作为候选列表
/// 3. 序列的首元素若是含 `lps` 的映射，取该值；否则序列本身就是候选列表
/// 4. 其他形状得到空候选列表
/// 5. 先按 `limit` 截断候选列表，再做有效性过滤
/// 6. 丢弃非映射或 `lp_url` 为空的条目，其余条目补默认值
pub struct ResultNormalizer;

impl ResultNormalizer {
    /// 规范化抽取结果
    ///
    /// 返回的序列长度不超过 `limit`，每个元素的 `lp_url` 非空，顺序与候选列表一致
    pub fn normalize(raw: RawExtraction, limit: usize) -> Vec<LpResult> {
        Self::candidates(raw)
            .into_iter()
            .take(limit)
            .filter_map(Self::to_result)
            .collect()
    }

    /// 解包得到候选列表
    pub fn candidates(raw: RawExtraction) -> Vec<Value> {
        let decoded = match raw {
            RawExtraction::Text(text) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => RawExtraction::from(value),
                Err(e) => {
                    debug!("Extracted content is not valid JSON, yielding no results: {}", e);
                    return Vec::new();
                }
            },
            other => other,
        };

        match decoded {
            RawExtraction::Mapping(mut map) => map
                .remove(LPS_KEY)
                .map(into_candidate_list)
                .unwrap_or_default(),
            RawExtraction::Sequence(mut items) => {
                // LLM output sometimes arrives as [{"lps": [...]}]
                let wrapped = items
                    .first()
                    .and_then(Value::as_object)
                    .is_some_and(|first| first.contains_key(LPS_KEY));
                if wrapped {
                    match items.swap_remove(0) {
                        Value::Object(mut first) => first
                            .remove(LPS_KEY)
                            .map(into_candidate_list)
                            .unwrap_or_default(),
                        _ => Vec::new(),
                    }
                } else {
                    items
                }
            }
            RawExtraction::Text(_) | RawExtraction::Other(_) => Vec::new(),
        }
    }

    fn to_result(candidate: Value) -> Option<LpResult> {
        let Value::Object(entry) = candidate else {
            return None;
        };

        let lp_url = non_empty_str(&entry, "lp_url")?.to_string();

        Some(LpResult {
            title: non_empty_str(&entry, "title")
                .unwrap_or(UNTITLED_PLACEHOLDER)
                .to_string(),
            thumbnail_url: entry
                .get("thumbnail_url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            lp_url,
            category: entry
                .get("category")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// `lps` 的值不是数组时视为空候选列表
fn into_candidate_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

fn non_empty_str<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
