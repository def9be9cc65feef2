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

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::debug;

use crate::application::dto::{scrape_request::ScrapeRequestDto, scrape_response::ScrapeResponseDto};
use crate::application::use_cases::scrape_lp_archive::ScrapeLpArchiveUseCase;

/// 抓取 LP 归档页面
///
/// 成功和已处理的失败都返回 200，由响应中的 `success` 字段区分。
/// 请求体不是合法 JSON 时由 `Json` 提取器直接拒绝。
pub async fn scrape_lp_archive(
    Extension(use_case): Extension<Arc<ScrapeLpArchiveUseCase>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> Json<ScrapeResponseDto> {
    debug!(
        "Received LP archive scrape request: url={}, image_type={:?}, color={:?}, limit={}, use_llm={}",
        payload.url, payload.image_type, payload.color, payload.limit, payload.use_llm
    );

    Json(use_case.execute(&payload).await)
}
