// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// - 图像任务（generate_image）：提交生成请求与查询任务状态
/// - 博客发布（publish_blog）：单篇博客的完整处理流程
pub mod generate_image;
pub mod publish_blog;
