// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 构建实际抓取的 URL
///
/// 存在非空的 `image_type` 过滤条件时，作为查询参数追加到目标 URL；已有的查询参数保留
pub fn build_target_url(base_url: &str, image_type: Option<&str>) -> Result<Url, ParseError> {
    let mut url = Url::parse(base_url.trim())?;
    if let Some(image_type) = image_type.filter(|t| !t.trim().is_empty()) {
        url.query_pairs_mut().append_pair("image_type", image_type);
    }
    Ok(url)
}
