// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::application::dto::image_response::ImageResponse;
use crate::config::settings::SchedulerSettings;
use crate::domain::models::task::TaskStatus;
use crate::domain::services::content_source::ImageTaskTracker;
use crate::utils::errors::UpstreamError;

/// 图像服务客户端
///
/// 轮询 `GET /task/{id}` 直到任务完成、失败或查询次数耗尽
pub struct ImageServiceClient {
    client: Client,
    base_url: String,
    max_attempts: u32,
    interval: Duration,
}

impl ImageServiceClient {
    pub fn new(
        base_url: impl Into<String>,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_attempts,
            interval,
        })
    }

    pub fn from_settings(settings: &SchedulerSettings) -> Result<Self, UpstreamError> {
        Self::new(
            settings.image_service_url.clone(),
            settings.image_poll_attempts,
            Duration::from_secs(settings.image_poll_interval_secs),
        )
    }

    /// 查询一次任务状态
    pub async fn task_status(&self, task_id: &str) -> Result<ImageResponse, UpstreamError> {
        let response = self
            .client
            .get(format!("{}/task/{}", self.base_url, task_id))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ImageTaskTracker for ImageServiceClient {
    async fn wait_for_images(&self, task_id: &str) -> Vec<String> {
        info!(task_id, "Waiting for image task");

        for attempt in 1..=self.max_attempts {
            match self.task_status(task_id).await {
                Ok(task) => match task.status {
                    TaskStatus::Completed if !task.image_urls.is_empty() => {
                        info!(task_id, "Image task completed: {:?}", task.image_urls);
                        return task.image_urls;
                    }
                    TaskStatus::Failed | TaskStatus::Error | TaskStatus::Timeout => {
                        warn!(
                            task_id,
                            "Image task failed: {}",
                            task.error.as_deref().unwrap_or("Unknown error")
                        );
                        return Vec::new();
                    }
                    status => {
                        info!(
                            task_id,
                            "Image task {} ({}/{}), waiting {:?}",
                            status,
                            attempt,
                            self.max_attempts,
                            self.interval
                        );
                    }
                },
                Err(e) => warn!(task_id, "Error querying image task status: {}", e),
            }

            if attempt < self.max_attempts {
                sleep(self.interval).await;
            }
        }

        warn!(task_id, "Timed out waiting for image generation");
        Vec::new()
    }
}
