// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json, Path},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::application::dto::image_request::ImageRequestDto;
use crate::application::use_cases::generate_image::ImageTaskService;
use crate::presentation::errors::AppError;

/// 提交图像生成请求
///
/// 上游接受任务后立即返回 `PROCESSING`，后续状态通过 `/task/{task_id}` 查询
pub async fn generate_image(
    Extension(service): Extension<Arc<ImageTaskService>>,
    Json(payload): Json<ImageRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    info!(n = payload.n, "Received image generation request");

    let response = service.submit(payload).await?;
    Ok(Json(response))
}

/// 查询任务状态
///
/// 总是返回 200；查询失败体现在响应的 `status` 与 `error` 字段中
pub async fn get_task_status(
    Extension(service): Extension<Arc<ImageTaskService>>,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    Json(service.status(&task_id).await)
}
