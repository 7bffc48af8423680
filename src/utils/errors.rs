// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 上游接口错误
///
/// 与外部 API（图像生成、工作流、图像服务、图片下载）交互失败
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// 请求超时
    #[error("upstream request timed out: {0}")]
    Timeout(String),

    /// 非 2xx 响应，携带上游返回的原始响应体
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    /// 连接或传输层错误
    #[error("upstream transport error: {0}")]
    Transport(String),

    /// 响应体无法解析或缺少必需字段
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout(_))
    }

    /// 是否为可在下个周期重试的暂时性错误
    ///
    /// 超时、传输错误、5xx 与 429 可重试；无法解析的响应和其他 4xx 不可重试
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Timeout(_) | UpstreamError::Transport(_) => true,
            UpstreamError::Status { status, .. } => *status >= 500 || *status == 429,
            UpstreamError::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err.to_string())
        } else if err.is_decode() {
            UpstreamError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// 图像处理错误
#[derive(Error, Debug)]
pub enum ImageError {
    /// 源字节不是有效图片
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    /// 目标尺寸无效（宽或高为 0）
    #[error("invalid target size {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
}

/// 持久化错误
///
/// 重试耗尽后仍无法写入记录库；只会被记录，不会向调用方传播
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(String),

    #[error("gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// 单篇博客处理流程中的其他错误
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("workflow trigger failed: {0}")]
    Workflow(#[from] UpstreamError),

    #[error("workflow returned no outputs")]
    EmptyOutputs,
}

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("上游错误: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("图像错误: {0}")]
    Image(#[from] ImageError),
}
