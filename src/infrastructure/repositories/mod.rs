// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的 sea-orm 实现，以及记录库不可达时的降级实现
pub mod blog_repo_impl;
pub mod unavailable_repo;
