// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::domain::models::task::{GenerationTask, TaskStatus};

/// 图像任务状态响应
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageResponse {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ImageResponse {
    pub fn new(task_id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            image_urls: Vec::new(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

impl From<GenerationTask> for ImageResponse {
    fn from(task: GenerationTask) -> Self {
        Self {
            task_id: task.id,
            status: task.status,
            image_urls: task.image_urls,
            error: task.error,
        }
    }
}
