// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::config::settings::MetricsSettings;

/// 抓取请求计数器
pub const SCRAPE_REQUESTS_TOTAL: &str = "lp_scrape_requests_total";
/// 单次请求返回的结果条数
pub const SCRAPE_RESULTS_COUNT: &str = "lp_scrape_results_count";

/// 抓取请求的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Success,
    Failure,
    Unavailable,
}

impl ScrapeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeOutcome::Success => "success",
            ScrapeOutcome::Failure => "failure",
            ScrapeOutcome::Unavailable => "unavailable",
        }
    }
}

/// 安装 Prometheus 导出器
///
/// 未启用或地址无效时只记录日志，不影响服务启动
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address '{}': {}", settings.listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    info!("Metrics exporter listening on {}", addr);
}

/// 记录一次抓取请求
pub fn record_scrape(strategy: &'static str, outcome: ScrapeOutcome, result_count: usize) {
    ::metrics::counter!(
        SCRAPE_REQUESTS_TOTAL,
        "strategy" => strategy,
        "outcome" => outcome.as_str()
    )
    .increment(1);
    ::metrics::histogram!(SCRAPE_RESULTS_COUNT, "strategy" => strategy).record(result_count as f64);
}
