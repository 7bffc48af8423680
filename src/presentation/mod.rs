// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 错误处理模块
///
/// 把处理器错误映射为HTTP状态码和统一响应体
pub mod errors;

/// 处理器模块
pub mod handlers;

/// 路由模块
pub mod routes;
