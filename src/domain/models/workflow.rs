// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use serde_json::Value;

/// 一次阻塞式工作流运行的结果
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRun {
    pub workflow_run_id: String,
    pub status: String,
    /// 工作流输出，包含 `text`（文章 JSON）与 `image`（图片任务）
    pub outputs: Value,
    pub elapsed_time: f64,
}

impl WorkflowRun {
    /// 输出为空（null、空对象）时返回 `true`
    pub fn has_outputs(&self) -> bool {
        match &self.outputs {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }
}

/// 工作流接口的响应体
#[derive(Debug, Deserialize)]
pub(crate) struct WorkflowResponse {
    pub workflow_run_id: Option<String>,
    #[serde(default)]
    pub data: WorkflowResponseData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WorkflowResponseData {
    pub status: String,
    pub outputs: Value,
    pub elapsed_time: f64,
}

impl WorkflowResponse {
    pub(crate) fn into_run(self) -> Option<WorkflowRun> {
        let workflow_run_id = self.workflow_run_id?;
        Some(WorkflowRun {
            workflow_run_id,
            status: self.data.status,
            outputs: self.data.outputs,
            elapsed_time: self.data.elapsed_time,
        })
    }
}
