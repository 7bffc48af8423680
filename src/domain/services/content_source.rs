// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use crate::domain::models::workflow::WorkflowRun;
use crate::utils::errors::UpstreamError;

/// 内容工作流触发器
#[async_trait]
pub trait WorkflowTrigger: Send + Sync {
    /// 以阻塞模式运行一次工作流
    async fn trigger(&self) -> Result<WorkflowRun, UpstreamError>;
}

/// 图像任务跟踪器
///
/// 等待图像服务完成任务；失败、超时或查询耗尽时返回空列表
#[async_trait]
pub trait ImageTaskTracker: Send + Sync {
    async fn wait_for_images(&self, task_id: &str) -> Vec<String>;
}
