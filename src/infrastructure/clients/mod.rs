// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 外部 HTTP 接口客户端
///
/// - DashScope 文生图（dashscope_client）
/// - 结果图片下载（image_fetcher）
/// - 图像服务轮询（image_service_client）
/// - 内容工作流（workflow_client）
pub mod dashscope_client;
pub mod image_fetcher;
pub mod image_service_client;
pub mod workflow_client;
