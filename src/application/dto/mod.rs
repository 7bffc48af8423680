// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义图像服务接口的请求与响应
pub mod image_request;
pub mod image_response;
