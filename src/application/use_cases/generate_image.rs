// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::{info, warn};

use crate::application::dto::image_request::ImageRequestDto;
use crate::application::dto::image_response::ImageResponse;
use crate::config::settings::DashScopeSettings;
use crate::domain::models::task::TaskStatus;
use crate::domain::services::image_provider::{upstream_status, ImageTaskProvider};
use crate::infrastructure::registry::TaskRegistry;
use crate::utils::errors::UpstreamError;
use crate::workers::image_task_worker::ImageTaskWorker;
use crate::workers::supervisor::JobSupervisor;

/// 图像任务用例
///
/// 提交时先在上游创建任务，再登记为 Processing 并交给监督器启动轮询作业
pub struct ImageTaskService {
    provider: Arc<dyn ImageTaskProvider>,
    registry: Arc<TaskRegistry>,
    worker: Arc<ImageTaskWorker>,
    supervisor: Arc<JobSupervisor>,
    defaults: DashScopeSettings,
}

impl ImageTaskService {
    pub fn new(
        provider: Arc<dyn ImageTaskProvider>,
        registry: Arc<TaskRegistry>,
        worker: Arc<ImageTaskWorker>,
        supervisor: Arc<JobSupervisor>,
        defaults: DashScopeSettings,
    ) -> Self {
        Self {
            provider,
            registry,
            worker,
            supervisor,
            defaults,
        }
    }

    pub fn supervisor(&self) -> &Arc<JobSupervisor> {
        &self.supervisor
    }

    /// 提交生成请求
    ///
    /// 上游创建失败时返回错误，不登记任何任务
    pub async fn submit(&self, request: ImageRequestDto) -> Result<ImageResponse, UpstreamError> {
        let params = request.into_params(&self.defaults);
        let task_id = self.provider.create_task(&params).await?;
        metrics::counter!("image_tasks_created_total").increment(1);

        self.registry.begin(&task_id, &params.prompt);
        let worker = self.worker.clone();
        let job_task_id = task_id.clone();
        self.supervisor.spawn(&task_id, async move {
            worker.run(&job_task_id).await;
        });

        info!(task_id = %task_id, "Image task accepted");
        Ok(ImageResponse::new(task_id, TaskStatus::Processing))
    }

    /// 查询任务状态
    ///
    /// 注册表中没有该任务时直接查询上游；查询失败时返回 ERROR 响应而不是错误
    pub async fn status(&self, task_id: &str) -> ImageResponse {
        if let Some(task) = self.registry.snapshot(task_id) {
            return task.into();
        }

        info!(task_id, "Task not in registry, querying upstream");
        match self.provider.query_task(task_id).await {
            Ok(payload) => ImageResponse::new(task_id, upstream_status(&payload)),
            Err(e) => {
                warn!(task_id, "Live status query failed: {}", e);
                ImageResponse::new(task_id, TaskStatus::Error)
                    .with_error(format!("Task status query failed: {}", e))
            }
        }
    }
}
