// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;

use crate::config::settings::PollingSettings;
use crate::domain::services::image_provider::ImageFetcher;
use crate::utils::errors::UpstreamError;

/// 通过 HTTP 下载上游结果图片
///
/// 使用独立的连接池，结果图片所在的 OSS 主机与任务接口不同
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(
        timeout: Duration,
        connect_timeout: Duration,
        max_idle_connections: usize,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(max_idle_connections)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_settings(settings: &PollingSettings) -> Result<Self, UpstreamError> {
        Self::new(
            Duration::from_secs(settings.download_timeout_secs),
            Duration::from_secs(settings.download_connect_timeout_secs),
            settings.download_max_idle_connections,
        )
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, UpstreamError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.bytes().await?)
    }
}
