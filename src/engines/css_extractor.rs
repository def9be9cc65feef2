// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

use crate::domain::models::extraction::{FieldKind, RawExtraction, SelectorExtraction};
use crate::engines::traits::ExtractorError;

/// CSS 选择器抽取器
///
/// 对每个匹配 `base_selector` 的列表项，取各字段选择器的第一个匹配元素的文本或属性值。
/// 没有匹配到的字段直接省略。
pub struct CssExtractor;

impl CssExtractor {
    /// 从 HTML 中抽取列表项
    pub fn extract(
        html_content: &str,
        config: &SelectorExtraction,
    ) -> Result<RawExtraction, ExtractorError> {
        let base = parse_selector(&config.base_selector)?;
        let fields = config
            .fields
            .iter()
            .map(|field| Ok((field, parse_selector(&field.selector)?)))
            .collect::<Result<Vec<_>, ExtractorError>>()?;

        let document = Html::parse_document(html_content);

        let items = document
            .select(&base)
            .map(|item| {
                let mut record = Map::new();
                for (field, selector) in &fields {
                    if let Some(value) = item
                        .select(selector)
                        .next()
                        .and_then(|element| field_value(element, &field.kind))
                    {
                        record.insert(field.name.clone(), Value::String(value));
                    }
                }
                Value::Object(record)
            })
            .collect();

        Ok(RawExtraction::Sequence(items))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractorError> {
    Selector::parse(selector).map_err(|e| ExtractorError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn field_value(element: ElementRef<'_>, kind: &FieldKind) -> Option<String> {
    match kind {
        FieldKind::Text => {
            let text = element.text().collect::<Vec<_>>().join(" ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!text.is_empty()).then_some(text)
        }
        FieldKind::Attribute { attribute } => element.value().attr(attribute).map(str::to_string),
    }
}
