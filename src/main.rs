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

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use blogforge::application::use_cases::generate_image::ImageTaskService;
use blogforge::config::settings::Settings;
use blogforge::domain::repositories::storage_repository::ObjectOptions;
use blogforge::domain::services::image_naming::ImageNaming;
use blogforge::domain::services::image_uploader::ImageUploader;
use blogforge::domain::services::variant_processor::VariantProcessor;
use blogforge::infrastructure::clients::dashscope_client::DashScopeClient;
use blogforge::infrastructure::clients::image_fetcher::HttpImageFetcher;
use blogforge::infrastructure::registry::TaskRegistry;
use blogforge::infrastructure::storage::create_storage_repository;
use blogforge::presentation::routes;
use blogforge::utils::telemetry;
use blogforge::workers::{ImageTaskWorker, JobSupervisor};

/// 主函数
///
/// 图像服务入口点，负责初始化所有组件并启动HTTP服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting blogforge image service...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");
    if settings.dashscope.api_key.is_empty() {
        warn!("DashScope API key is not configured, task creation will be rejected upstream");
    }

    // 3. Initialize Prometheus metrics
    blogforge::infrastructure::metrics::init_metrics(&settings.metrics);

    // 4. Initialize storage
    let storage = create_storage_repository(&settings.storage).await?;
    let naming = ImageNaming::from_settings(&settings.storage, &settings.server.public_url_base);
    let uploader = Arc::new(ImageUploader::new(
        storage.clone(),
        naming,
        ObjectOptions::public_png(
            &settings.storage.cache_control,
            &settings.storage.generated_by,
        ),
    ));
    info!(backend = storage.backend(), "Storage initialized");

    // 5. Initialize upstream clients
    let provider = Arc::new(DashScopeClient::new(&settings.dashscope)?);
    let fetcher = Arc::new(HttpImageFetcher::from_settings(&settings.polling)?);

    // 6. Registry, supervisor and polling worker
    let registry = Arc::new(TaskRegistry::new());
    let supervisor = Arc::new(JobSupervisor::new());
    let worker = Arc::new(ImageTaskWorker::new(
        provider.clone(),
        fetcher,
        Arc::new(VariantProcessor::standard()),
        uploader,
        registry.clone(),
        settings.polling.clone(),
    ));
    let service = Arc::new(ImageTaskService::new(
        provider,
        registry,
        worker,
        supervisor.clone(),
        settings.dashscope.clone(),
    ));

    // 7. Start HTTP server
    let app = routes::routes(service, settings.clone(), storage);
    let addr = settings.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 8. Drain background jobs
    let grace = Duration::from_secs(settings.server.shutdown_grace_secs);
    info!(active = supervisor.active(), "Waiting up to {:?} for polling jobs", grace);
    let aborted = supervisor.shutdown(grace).await;
    if aborted > 0 {
        warn!("Aborted {} polling jobs at shutdown", aborted);
    }
    info!("Image service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
