// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::image_variant::ImageVariant;
use crate::domain::repositories::storage_repository::{ObjectOptions, StorageRepository};
use crate::domain::services::image_naming::ImageNaming;

/// 图片上传服务
///
/// 把一组规格图片写入对象存储并返回公开URL
pub struct ImageUploader {
    storage: Arc<dyn StorageRepository>,
    naming: ImageNaming,
    options: ObjectOptions,
}

impl ImageUploader {
    pub fn new(storage: Arc<dyn StorageRepository>, naming: ImageNaming, options: ObjectOptions) -> Self {
        Self {
            storage,
            naming,
            options,
        }
    }

    pub fn naming(&self) -> &ImageNaming {
        &self.naming
    }

    pub fn storage(&self) -> &Arc<dyn StorageRepository> {
        &self.storage
    }

    /// 上传一组规格图片
    ///
    /// 单个规格上传失败只记录日志并跳过，返回成功上传的URL，顺序与输入一致
    pub async fn upload_variants(
        &self,
        variants: &[ImageVariant],
        unique_id: &str,
        date: &str,
    ) -> Vec<String> {
        let mut urls = Vec::with_capacity(variants.len());
        for variant in variants {
            let key = self.naming.object_key(date, unique_id, variant.suffix);
            match self.storage.save(&key, &variant.data, &self.options).await {
                Ok(()) => {
                    let url = self.naming.public_url(&key);
                    info!(
                        backend = self.storage.backend(),
                        suffix = %variant.suffix,
                        "Uploaded image variant: {}",
                        url
                    );
                    metrics::counter!("image_variant_uploads_total", "result" => "ok").increment(1);
                    urls.push(url);
                }
                Err(e) => {
                    warn!("Failed to upload {} variant to {}: {}", variant.suffix, key, e);
                    metrics::counter!("image_variant_uploads_total", "result" => "error")
                        .increment(1);
                }
            }
        }
        urls
    }
}
