// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Local};

use crate::config::settings::StorageSettings;
use crate::domain::models::blog::BlogImageUrls;
use crate::domain::models::image_variant::VariantSuffix;

/// 对象的公开访问地址规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicUrlScheme {
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`
    S3 { bucket: String, region: String },
    /// `{base}/{key}`，用于兼容 S3 的自建服务和本地静态目录
    Prefixed(String),
}

impl PublicUrlScheme {
    pub fn url_for(&self, key: &str) -> String {
        match self {
            PublicUrlScheme::S3 { bucket, region } => {
                format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
            }
            PublicUrlScheme::Prefixed(base) => {
                format!("{}/{}", base.trim_end_matches('/'), key)
            }
        }
    }
}

/// 日期目录，格式 `YYYYMMDD`
pub fn date_prefix(now: DateTime<Local>) -> String {
    now.format("%Y%m%d").to_string()
}

/// 图片对象命名规则
///
/// 键的格式为 `{prefix}{date}/{unique_id}-{suffix}.png`。
/// 上传与降级占位URL共用同一套规则，下游可只凭URL形状处理有无图片。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNaming {
    prefix: String,
    urls: PublicUrlScheme,
}

impl ImageNaming {
    pub fn new(prefix: impl Into<String>, urls: PublicUrlScheme) -> Self {
        let prefix: String = prefix.into();
        let trimmed = prefix.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}/", trimmed)
        };
        Self { prefix, urls }
    }

    /// 根据存储配置构造命名规则
    ///
    /// 本地存储的图片通过 `{public_url_base}/images` 暴露
    pub fn from_settings(settings: &StorageSettings, public_url_base: &str) -> Self {
        let urls = match settings.storage_type.as_str() {
            "local" => PublicUrlScheme::Prefixed(format!(
                "{}/images",
                public_url_base.trim_end_matches('/')
            )),
            _ => match &settings.s3_endpoint {
                Some(endpoint) => PublicUrlScheme::Prefixed(format!(
                    "{}/{}",
                    endpoint.trim_end_matches('/'),
                    settings.s3_bucket
                )),
                None => PublicUrlScheme::S3 {
                    bucket: settings.s3_bucket.clone(),
                    region: settings.s3_region.clone(),
                },
            },
        };
        Self::new(settings.s3_prefix.clone(), urls)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn object_key(&self, date: &str, unique_id: &str, suffix: VariantSuffix) -> String {
        format!("{}{}/{}-{}.png", self.prefix, date, unique_id, suffix)
    }

    pub fn public_url(&self, key: &str) -> String {
        self.urls.url_for(key)
    }

    /// 构造降级占位URL
    ///
    /// 对应的对象不一定存在
    pub fn fallback_urls(&self, unique_id: &str, date: &str) -> BlogImageUrls {
        let url = |suffix| self.public_url(&self.object_key(date, unique_id, suffix));
        BlogImageUrls {
            card: url(VariantSuffix::Card),
            cover: url(VariantSuffix::Cover),
            org: url(VariantSuffix::Org),
        }
    }
}
