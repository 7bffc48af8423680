// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务：
/// - 博客组装（blog_composer）：由文章草稿与图片URL生成博客记录
/// - 博客持久化（blog_persistence）：带重试、永不失败的记录写入
/// - 内容来源（content_source）：工作流触发与图像任务跟踪抽象
/// - 图片命名（image_naming）：对象键与公开URL规则
/// - 上游接口（image_provider）：图像生成服务与下载器抽象，以及查询结果解释
/// - 图片上传（image_uploader）：把规格图片写入对象存储
/// - 规格处理（variant_processor）：居中裁剪与缩放
pub mod blog_composer;
pub mod blog_persistence;
pub mod content_source;
pub mod image_naming;
pub mod image_provider;
pub mod image_uploader;
pub mod variant_processor;
