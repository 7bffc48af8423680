// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::domain::models::task::{GenerationTask, TaskOutcome};

/// 进程内任务注册表
///
/// 由图像服务在启动时创建并注入到处理器和轮询作业中。
/// 任务ID由上游分配，同一ID只会被一个轮询作业修改；终态写入后不再变化。
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: DashMap<String, GenerationTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 Processing 状态登记任务
    pub fn begin(&self, task_id: &str, prompt: &str) {
        let task = GenerationTask::processing(task_id, prompt);
        if self.tasks.insert(task_id.to_string(), task).is_some() {
            warn!(task_id, "Task id registered twice, previous entry replaced");
        }
    }

    /// 写入终态
    ///
    /// 返回是否成功写入；任务不存在或已处于终态时返回 `false`
    pub fn finish(&self, task_id: &str, outcome: TaskOutcome) -> bool {
        let Some(mut entry) = self.tasks.get_mut(task_id) else {
            warn!(task_id, "Cannot finish unknown task");
            return false;
        };

        match entry.clone().finish(outcome) {
            Ok(task) => {
                debug!(task_id, status = %task.status, "Task reached terminal state");
                *entry = task;
                true
            }
            Err(e) => {
                debug!(task_id, "Ignoring late outcome: {}", e);
                false
            }
        }
    }

    /// 读取任务快照
    pub fn snapshot(&self, task_id: &str) -> Option<GenerationTask> {
        self.tasks.get(task_id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
