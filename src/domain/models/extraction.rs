// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 抽取策略配置
///
/// 每个请求只会激活其中一种策略：LLM 结构化抽取或 CSS 选择器抽取
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractionConfig {
    /// 基于 JSON Schema 的 LLM 抽取
    Llm(LlmExtraction),
    /// 基于 CSS 选择器的规则抽取
    Selector(SelectorExtraction),
}

impl ExtractionConfig {
    /// 策略名称，用于日志和指标标签
    pub fn strategy_name(&self) -> &'static str {
        match self {
            ExtractionConfig::Llm(_) => "llm",
            ExtractionConfig::Selector(_) => "selector",
        }
    }
}

/// LLM 抽取配置
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmExtraction {
    /// 提供商标识，形如 `gemini/gemini-2.0-flash`
    pub provider: String,
    /// 提供商 API 密钥
    pub api_token: String,
    /// 期望的输出结构
    pub schema: Value,
    /// 自然语言指令
    pub instruction: String,
}

impl LlmExtraction {
    /// 提供商标识中的模型部分
    ///
    /// `gemini/gemini-2.0-flash` -> `gemini-2.0-flash`
    pub fn model(&self) -> &str {
        self.provider
            .split_once('/')
            .map(|(_, model)| model)
            .unwrap_or(&self.provider)
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for LlmExtraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmExtraction")
            .field("provider", &self.provider)
            .field("api_token", &"[REDACTED]")
            .field("schema", &self.schema)
            .field("instruction", &self.instruction)
            .finish()
    }
}

/// CSS 选择器抽取配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorExtraction {
    /// 配置名称
    pub name: String,
    /// 列表项容器选择器
    pub base_selector: String,
    /// 每个列表项内的字段抽取规则
    pub fields: Vec<FieldSelector>,
}

/// 单个字段的抽取规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSelector {
    /// 输出字段名
    pub name: String,
    /// 字段选择器（取第一个匹配元素）
    pub selector: String,
    /// 取值方式
    pub kind: FieldKind,
}

/// 字段取值方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// 元素文本内容
    Text,
    /// 元素属性值
    Attribute { attribute: String },
}

/// 抓取协作方返回的原始抽取结果
///
/// 协作方的输出形状并不固定：可能是一段 JSON 文本、一个映射、一个序列，
/// 或其他任意值。这里把每种形状显式列出，由结果规范化器逐一解释。
#[derive(Debug, Clone, PartialEq)]
pub enum RawExtraction {
    /// 尚未解码的文本（通常是 JSON 编码的字符串）
    Text(String),
    /// 映射，可能包含 `lps` 键
    Mapping(Map<String, Value>),
    /// 序列，可能是候选列表本身，也可能是 `[{"lps": [...]}]` 这样的包装
    Sequence(Vec<Value>),
    /// 其他任意形状
    Other(Value),
}

impl From<Value> for RawExtraction {
    /// 从已解码的 JSON 值转换
    ///
    /// JSON 字符串视为已解码的标量，归入 `Other`，不会被二次解码。
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => RawExtraction::Mapping(map),
            Value::Array(items) => RawExtraction::Sequence(items),
            other => RawExtraction::Other(other),
        }
    }
}
