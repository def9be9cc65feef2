// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::domain::models::lp_result::LpResult;

/// LP 归档抓取响应数据传输对象
///
/// `success = false` 时 `results` 必为空，`error` 只在失败时设置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScrapeResponseDto {
    /// 请求处理是否成功
    pub success: bool,
    /// 抓取结果
    pub results: Vec<LpResult>,
    /// 失败原因
    pub error: Option<String>,
}

impl ScrapeResponseDto {
    pub fn success(results: Vec<LpResult>) -> Self {
        Self {
            success: true,
            results,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            error: Some(error.into()),
        }
    }
}
