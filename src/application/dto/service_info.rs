// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 服务名称
pub const SERVICE_NAME: &str = "lp-archive-scraper";

/// 健康检查响应
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub service: String,
    /// 抓取协作方（浏览器）在当前环境是否可用
    pub collaborator_available: bool,
    pub version: String,
}

impl HealthResponseDto {
    pub fn healthy(collaborator_available: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            collaborator_available,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// 根路径的静态服务信息
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceInfoDto {
    pub message: String,
    pub docs: String,
    pub health: String,
}

impl Default for ServiceInfoDto {
    fn default() -> Self {
        Self {
            message: "LP Archive Scraper".to_string(),
            docs: "/docs".to_string(),
            health: "/health".to_string(),
        }
    }
}
