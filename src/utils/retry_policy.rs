// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// 重试策略配置
///
/// 图片下载（3 次，间隔 1 秒）和记录写入（3 次，间隔 2 秒）都使用固定间隔
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大尝试次数（包含第一次）
    pub max_attempts: u32,
    /// 两次尝试之间的等待时间
    pub delay: Duration,
}

impl RetryPolicy {
    /// 创建固定间隔的重试策略，至少尝试一次
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// 第 `attempt` 次失败之后是否还应重试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// 按策略执行异步操作
    ///
    /// `on_failure` 在每次失败时被调用，参数为尝试序号与错误；
    /// 返回最后一次的错误以及总尝试次数
    pub async fn run<T, E, F, Fut, L>(&self, mut op: F, mut on_failure: L) -> Result<T, (E, u32)>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        L: FnMut(u32, &E),
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    on_failure(attempt, &err);
                    if !self.should_retry(attempt) {
                        return Err((err, attempt));
                    }
                    sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
