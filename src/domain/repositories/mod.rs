// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，具体实现由基础设施层提供。
///
/// - 博客仓库（blog_repository）：博客记录的持久化
/// - 存储仓库（storage_repository）：图片对象的存储
pub mod blog_repository;
pub mod storage_repository;
