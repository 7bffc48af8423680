// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::config::settings::MetricsSettings;

/// 初始化 Prometheus 指标导出
///
/// 地址被占用或无效时只记录警告，服务照常运行
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", settings.listen_addr, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!(
        "image_tasks_created_total",
        "Image generation tasks accepted by the upstream service"
    );
    describe_counter!(
        "image_tasks_finished_total",
        "Image tasks that reached a terminal state, by status"
    );
    describe_gauge!("image_tasks_active", "Polling jobs currently running");
    describe_histogram!(
        "image_task_duration_seconds",
        "Time from task submission to terminal state"
    );
    describe_counter!(
        "image_downloads_total",
        "Result image downloads, by result"
    );
    describe_counter!(
        "image_variant_uploads_total",
        "Variant uploads to object storage, by result"
    );
    describe_counter!(
        "blog_persist_total",
        "Blog record writes, stored or degraded"
    );
    describe_counter!("blog_runs_total", "Scheduler units, by result");
}
