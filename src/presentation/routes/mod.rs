// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::service_info::{HealthResponseDto, ServiceInfoDto};
use crate::application::use_cases::scrape_lp_archive::ScrapeLpArchiveUseCase;
use crate::config::settings::CorsSettings;
use crate::presentation::handlers::scrape_handler;
use axum::{
    extract::{Extension, Json},
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// 创建应用路由
///
/// # 参数
///
/// * `use_case` - 抓取用例
/// * `cors` - 跨域配置
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(use_case: Arc<ScrapeLpArchiveUseCase>, cors: &CorsSettings) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/scrape/lp-archive",
            post(scrape_handler::scrape_lp_archive),
        )
        .layer(Extension(use_case))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// 只允许配置中的来源；携带凭据时不能使用通配符，所以方法和请求头按预检请求回显
fn cors_layer(cors: &CorsSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回服务标识和抓取协作方是否可用
pub async fn health_check(
    Extension(use_case): Extension<Arc<ScrapeLpArchiveUseCase>>,
) -> Json<HealthResponseDto> {
    Json(HealthResponseDto::healthy(use_case.collaborator_available()))
}

/// 服务信息端点
pub async fn root() -> Json<ServiceInfoDto> {
    Json(ServiceInfoDto::default())
}
