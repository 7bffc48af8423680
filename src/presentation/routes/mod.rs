// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::application::use_cases::generate_image::ImageTaskService;
use crate::config::settings::Settings;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::presentation::handlers::{health_handler, image_handler, manifest_handler};

/// 构建图像服务的完整路由
///
/// 本地存储模式下额外在 `/images` 挂载存储目录
pub fn routes(
    service: Arc<ImageTaskService>,
    settings: Arc<Settings>,
    storage: Arc<dyn StorageRepository>,
) -> Router {
    let mut router = Router::new()
        .route("/generate-image", post(image_handler::generate_image))
        .route("/task/{task_id}", get(image_handler::get_task_status))
        .route("/openapi.json", get(manifest_handler::openapi))
        .route(
            "/.well-known/ai-plugin.json",
            get(manifest_handler::plugin_manifest),
        )
        .route("/health", get(health_handler::health_check))
        .route("/health/storage", get(health_handler::storage_check))
        .route("/version", get(health_handler::version));

    if settings.storage.storage_type == "local" {
        let path = settings
            .storage
            .local_path
            .clone()
            .unwrap_or_else(|| "./images".to_string());
        info!("Serving local images from {}", path);
        router = router.nest_service("/images", ServeDir::new(path));
    }

    router
        .layer(Extension(service))
        .layer(Extension(storage))
        .layer(Extension(settings))
        .layer(TraceLayer::new_for_http())
}
