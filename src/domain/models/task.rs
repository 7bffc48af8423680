// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 图像生成任务
///
/// 由上游服务在创建时分配 `id`，此后只由该任务的轮询作业修改；
/// 到达终态后不再变化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationTask {
    /// 上游分配的任务ID
    pub id: String,
    /// 当前状态
    pub status: TaskStatus,
    /// 创建任务时使用的提示词
    pub prompt: String,
    /// 上传后的图片URL，仅在 Completed 时填充
    pub image_urls: Vec<String>,
    /// 失败原因
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 任务状态枚举
///
/// 本地注册表中的状态流转：
/// Processing → Completed/Failed/Timeout/Error
///
/// Pending/Running/Succeeded/Unknown 只在直接透传上游查询结果时出现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// 上游已排队
    Pending,
    /// 上游执行中
    Running,
    /// 本地轮询中
    Processing,
    /// 上游已成功（未经本地后处理）
    Succeeded,
    /// 图片已下载、裁剪并上传
    Completed,
    Failed,
    Timeout,
    Error,
    Unknown,
}

impl TaskStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded
                | TaskStatus::Completed
                | TaskStatus::Failed
                | TaskStatus::Timeout
                | TaskStatus::Error
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Processing => "PROCESSING",
            TaskStatus::Succeeded => "SUCCEEDED",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Timeout => "TIMEOUT",
            TaskStatus::Error => "ERROR",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TaskStatus::Pending),
            "RUNNING" => Ok(TaskStatus::Running),
            "PROCESSING" => Ok(TaskStatus::Processing),
            "SUCCEEDED" => Ok(TaskStatus::Succeeded),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "FAILED" => Ok(TaskStatus::Failed),
            "TIMEOUT" => Ok(TaskStatus::Timeout),
            "ERROR" => Ok(TaskStatus::Error),
            "UNKNOWN" => Ok(TaskStatus::Unknown),
            _ => Err(()),
        }
    }
}

/// 轮询作业的终态结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// 后处理完成，携带全部上传成功的URL（可能为空）
    Completed(Vec<String>),
    /// 上游报告失败
    Failed(String),
    /// 超过最长等待时间
    TimedOut,
    /// 上游响应无法解释，或作业被中断
    Error(String),
}

impl TaskOutcome {
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskOutcome::Completed(_) => TaskStatus::Completed,
            TaskOutcome::Failed(_) => TaskStatus::Failed,
            TaskOutcome::TimedOut => TaskStatus::Timeout,
            TaskOutcome::Error(_) => TaskStatus::Error,
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// 无效的状态转换，终态任务不能再次变更
    #[error("Invalid state transition from {0}")]
    InvalidStateTransition(TaskStatus),
}

impl GenerationTask {
    /// 创建处于 Processing 状态的任务记录
    pub fn processing(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: TaskStatus::Processing,
            prompt: prompt.into(),
            image_urls: Vec::new(),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 将任务推进到终态
    ///
    /// # 返回值
    ///
    /// * `Ok(GenerationTask)` - 已进入终态的任务
    /// * `Err(DomainError)` - 任务已处于终态
    pub fn finish(mut self, outcome: TaskOutcome) -> Result<Self, DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidStateTransition(self.status));
        }

        self.status = outcome.status();
        match outcome {
            TaskOutcome::Completed(urls) => {
                self.image_urls = urls;
                self.error = None;
            }
            TaskOutcome::Failed(message) | TaskOutcome::Error(message) => {
                self.error = Some(message);
            }
            TaskOutcome::TimedOut => {
                self.error = Some("Task processing timeout".to_string());
            }
        }
        self.updated_at = Utc::now();
        Ok(self)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// 创建图像任务的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGenerationParams {
    pub model: String,
    pub prompt: String,
    /// 为空时不发送给上游
    pub negative_prompt: String,
    pub n: u32,
    pub size: String,
}
