// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排领域服务与基础设施，实现图像服务和博客调度器的业务流程
pub mod dto;
pub mod use_cases;
