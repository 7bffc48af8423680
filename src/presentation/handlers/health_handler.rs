// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::config::settings::Settings;
use crate::domain::repositories::storage_repository::StorageRepository;

const STORAGE_LIST_LIMIT: usize = 10;

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 服务版本
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 存储诊断结果
#[derive(Debug, Serialize)]
pub struct StorageReport {
    pub status: &'static str,
    pub message: String,
    pub backend: &'static str,
    pub bucket: String,
    pub prefix: String,
    pub region: String,
}

/// 存储连通性检查
///
/// 列出前缀下最多 10 个对象；失败时返回 `status = "error"`，不返回 5xx
pub async fn storage_check(
    Extension(storage): Extension<Arc<dyn StorageRepository>>,
    Extension(settings): Extension<Arc<Settings>>,
) -> Json<StorageReport> {
    let prefix = settings.storage.s3_prefix.clone();
    let (status, message) = match storage.list(&prefix, STORAGE_LIST_LIMIT).await {
        Ok(keys) if keys.is_empty() => (
            "success",
            "Connected to storage, no objects under prefix".to_string(),
        ),
        Ok(keys) => (
            "success",
            format!("Connected to storage and listed {} objects", keys.len()),
        ),
        Err(e) => {
            error!("Storage check failed: {}", e);
            ("error", format!("Failed to reach storage: {}", e))
        }
    };

    Json(StorageReport {
        status,
        message,
        backend: storage.backend(),
        bucket: settings.storage.s3_bucket.clone(),
        prefix,
        region: settings.storage.s3_region.clone(),
    })
}
