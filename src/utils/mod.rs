// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供错误类型、重试策略、遥测和 slug 生成等通用功能
pub mod errors;
pub mod retry_policy;
pub mod slug;
pub mod telemetry;
