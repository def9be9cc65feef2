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

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 默认最多返回的结果条数
pub const DEFAULT_LIMIT: i64 = 10;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

fn default_use_llm() -> bool {
    true
}

/// LP 归档抓取请求数据传输对象
///
/// 用于封装客户端发起的 LP 列表页抓取请求参数
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ScrapeRequestDto {
    /// 列表页 URL
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: String,
    /// 图片类型过滤条件，存在时作为查询参数附加到 URL
    #[serde(default)]
    pub image_type: Option<String>,
    /// 颜色过滤条件（接受但不参与抽取）
    #[serde(default)]
    pub color: Option<String>,
    /// 最多返回的结果条数
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: i64,
    /// 是否使用 LLM 抽取
    #[serde(default = "default_use_llm")]
    pub use_llm: bool,
    /// LLM API 密钥
    #[serde(default, alias = "gemini_api_key")]
    pub llm_api_key: Option<String>,
}

impl ScrapeRequestDto {
    /// 创建只带 URL 的请求，其余字段取默认值
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            image_type: None,
            color: None,
            limit: DEFAULT_LIMIT,
            use_llm: true,
            llm_api_key: None,
        }
    }

    /// 有效的 API 密钥
    ///
    /// 空字符串或纯空白视为未提供
    pub fn api_key(&self) -> Option<&str> {
        self.llm_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// 有效的图片类型过滤条件
    ///
    /// 空字符串或纯空白视为未提供
    pub fn image_type_filter(&self) -> Option<&str> {
        self.image_type
            .as_deref()
            .filter(|image_type| !image_type.trim().is_empty())
    }

    /// 结果条数上限
    pub fn result_limit(&self) -> usize {
        usize::try_from(self.limit.max(1)).unwrap_or(usize::MAX)
    }
}
