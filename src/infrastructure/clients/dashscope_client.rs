// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::settings::DashScopeSettings;
use crate::domain::models::task::ImageGenerationParams;
use crate::domain::services::image_provider::ImageTaskProvider;
use crate::utils::errors::UpstreamError;

/// DashScope 文生图接口客户端
///
/// 连接池大小固定，避免并发任务压垮上游限流
pub struct DashScopeClient {
    client: Client,
    api_key: String,
    base_url: String,
    create_timeout: Duration,
    query_timeout: Duration,
}

impl DashScopeClient {
    pub fn new(settings: &DashScopeSettings) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .pool_max_idle_per_host(settings.max_idle_connections)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            create_timeout: Duration::from_secs(settings.create_timeout_secs),
            query_timeout: Duration::from_secs(settings.query_timeout_secs),
        })
    }

    fn create_url(&self) -> String {
        format!("{}/services/aigc/text2image/image-synthesis", self.base_url)
    }

    fn query_url(&self, task_id: &str) -> String {
        format!("{}/tasks/{}", self.base_url, task_id)
    }

    /// 构造创建任务的请求体，`negative_prompt` 为空时省略
    pub fn create_payload(params: &ImageGenerationParams) -> Value {
        let mut input = json!({ "prompt": params.prompt });
        if !params.negative_prompt.is_empty() {
            input["negative_prompt"] = json!(params.negative_prompt);
        }

        json!({
            "model": params.model,
            "input": input,
            "parameters": { "n": params.n, "size": params.size }
        })
    }
}

/// 非 2xx 响应转换为携带原始响应体的错误
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ImageTaskProvider for DashScopeClient {
    async fn create_task(&self, params: &ImageGenerationParams) -> Result<String, UpstreamError> {
        let payload = Self::create_payload(params);
        info!(model = %params.model, n = params.n, "Creating image task");
        debug!("Create task payload: {}", payload);

        let response = self
            .client
            .post(self.create_url())
            .bearer_auth(&self.api_key)
            .header("X-DashScope-Async", "enable")
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.create_timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("Image task creation request failed: {}", e);
                UpstreamError::from(e)
            })?;

        let body: Value = error_for_status(response).await?.json().await?;
        debug!("Create task response: {}", body);

        body.get("output")
            .and_then(|o| o.get("task_id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| UpstreamError::InvalidResponse(format!("missing output.task_id: {}", body)))
    }

    async fn query_task(&self, task_id: &str) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(self.query_url(task_id))
            .bearer_auth(&self.api_key)
            .timeout(self.query_timeout)
            .send()
            .await?;

        let body: Value = error_for_status(response).await?.json().await?;
        debug!(task_id, "Query task response: {}", body);
        Ok(body)
    }
}
