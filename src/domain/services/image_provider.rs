// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::domain::models::task::{ImageGenerationParams, TaskStatus};
use crate::utils::errors::UpstreamError;

/// 上游图像生成服务
///
/// 只负责发出请求，响应中的状态由调用方解释
#[async_trait]
pub trait ImageTaskProvider: Send + Sync {
    /// 创建异步生成任务，返回上游任务ID
    async fn create_task(&self, params: &ImageGenerationParams) -> Result<String, UpstreamError>;

    /// 查询任务，返回原始响应体
    async fn query_task(&self, task_id: &str) -> Result<Value, UpstreamError>;
}

/// 结果图片下载器
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, UpstreamError>;
}

/// 一次查询所反映的上游任务阶段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamPhase {
    /// PENDING / RUNNING
    InProgress(String),
    /// `results` 缺失时为 `None`；每一项取其 `url` 字段
    Succeeded { results: Option<Vec<Option<String>>> },
    Failed(String),
    /// 无法识别的状态值
    Unrecognized(String),
}

/// 解释任务查询响应
///
/// 响应形状不符合预期时返回 `Err`，附带描述信息
pub fn interpret_task_payload(payload: &Value) -> Result<UpstreamPhase, String> {
    let output = payload
        .get("output")
        .filter(|o| o.is_object())
        .ok_or_else(|| format!("Invalid response format: missing output in {}", payload))?;

    let status = output
        .get("task_status")
        .and_then(Value::as_str)
        .ok_or_else(|| format!("Invalid response format: missing task_status in {}", output))?;

    match status {
        "PENDING" | "RUNNING" => Ok(UpstreamPhase::InProgress(status.to_string())),
        "SUCCEEDED" => {
            let results = match output.get("results") {
                None | Some(Value::Null) => None,
                Some(Value::Array(items)) => Some(
                    items
                        .iter()
                        .map(|item| item.get("url").and_then(Value::as_str).map(str::to_string))
                        .collect(),
                ),
                Some(other) => {
                    return Err(format!(
                        "Invalid response format: results is not a list: {}",
                        other
                    ))
                }
            };
            Ok(UpstreamPhase::Succeeded { results })
        }
        "FAILED" => {
            let message = output
                .get("error")
                .and_then(|e| e.get("message"))
                .or_else(|| output.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            Ok(UpstreamPhase::Failed(message.to_string()))
        }
        other => Ok(UpstreamPhase::Unrecognized(other.to_string())),
    }
}

/// 读取上游状态并直接映射为本地状态，无法识别时为 `Unknown`
pub fn upstream_status(payload: &Value) -> TaskStatus {
    payload
        .get("output")
        .and_then(|o| o.get("task_status"))
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(TaskStatus::Unknown)
}
