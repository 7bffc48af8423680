// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 文章镜像（blog_archive）：文章正文的本地文件副本
/// - 客户端（clients）：上游 HTTP 接口
/// - 数据库（database）：记录库连接与实体映射
/// - 指标（metrics）：Prometheus 指标导出
/// - 注册表（registry）：进程内图像任务状态
/// - 仓库实现（repositories）：领域仓库接口的具体实现
/// - 存储（storage）：对象存储后端
pub mod blog_archive;
pub mod clients;
pub mod database;
pub mod metrics;
pub mod registry;
pub mod repositories;
pub mod storage;
