// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 标题缺失时使用的占位文本
pub const UNTITLED_PLACEHOLDER: &str = "タイトルなし";

/// 落地页（LP）抓取结果
///
/// 只由结果规范化器根据校验通过的原始条目构造，构造后不再修改。
/// `lp_url` 保证非空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpResult {
    /// LP 标题，缺失时为占位文本
    pub title: String,
    /// 缩略图地址，缺失时为空字符串
    pub thumbnail_url: String,
    /// LP 链接，原样保留
    pub lp_url: String,
    /// 分类（可选）
    pub category: Option<String>,
}
