// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::settings::WorkflowSettings;
use crate::domain::models::workflow::{WorkflowResponse, WorkflowRun};
use crate::domain::services::content_source::WorkflowTrigger;
use crate::utils::errors::UpstreamError;

/// 内容工作流客户端
pub struct WorkflowClient {
    client: Client,
    api_url: String,
    api_key: String,
    user: String,
}

impl WorkflowClient {
    pub fn new(settings: &WorkflowSettings) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .pool_max_idle_per_host(settings.max_idle_connections)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            user: settings.user.clone(),
        })
    }
}

#[async_trait]
impl WorkflowTrigger for WorkflowClient {
    async fn trigger(&self) -> Result<WorkflowRun, UpstreamError> {
        let payload = json!({
            "inputs": {},
            "files": [],
            "response_mode": "blocking",
            "user": self.user,
        });
        info!("Triggering workflow: {}", self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Workflow API returned {}: {}", status, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        debug!("Workflow response: {}", text.chars().take(200).collect::<String>());

        let parsed: WorkflowResponse = serde_json::from_str(&text)
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;
        let run = parsed.into_run().ok_or_else(|| {
            UpstreamError::InvalidResponse(format!("missing workflow_run_id: {}", text))
        })?;

        info!(
            workflow_run_id = %run.workflow_run_id,
            status = %run.status,
            elapsed_time = run.elapsed_time,
            "Workflow finished"
        );
        Ok(run)
    }
}
