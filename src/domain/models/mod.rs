// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 博客（blog）：博客记录、文章草稿与图片任务描述
/// - 图片规格（image_variant）：三种固定尺寸的派生图片
/// - 任务（task）：图像生成任务及其状态机
/// - 工作流（workflow）：内容工作流的运行结果
pub mod blog;
pub mod image_variant;
pub mod task;
pub mod workflow;
