// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台作业及其生命周期管理
/// - 批量生成（batch_worker）：调度器的主循环
/// - 图像任务轮询（image_task_worker）：单个生成任务的状态机
/// - 作业监督（supervisor）：后台作业的登记、回收与关闭
pub mod batch_worker;
pub mod image_task_worker;
pub mod supervisor;


pub use batch_worker::BatchRunner;
pub use image_task_worker::ImageTaskWorker;
pub use supervisor::JobSupervisor;
