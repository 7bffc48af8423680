// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 博客记录库迁移工具
///
/// 连接地址取自 `DATABASE_URL`，例如 `sqlite://blogs.db?mode=rwc`
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
