// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{error, info, info_span, warn, Instrument};

/// 后台作业监督器
///
/// 持有全部后台作业的生命周期：登记、回收已结束的作业，
/// 关闭时在宽限期内等待剩余作业，超时后中止它们
#[derive(Default)]
pub struct JobSupervisor {
    jobs: Mutex<JoinSet<()>>,
    active: Arc<AtomicUsize>,
}

/// 作业结束（包括被中止）时减少活跃计数
struct ActiveJob(Arc<AtomicUsize>);

impl Drop for ActiveJob {
    fn drop(&mut self) {
        let remaining = self.0.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::gauge!("image_tasks_active").set(remaining as f64);
    }
}

impl JobSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 启动一个后台作业
    pub fn spawn<F>(&self, name: &str, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::gauge!("image_tasks_active").set(running as f64);
        let guard = ActiveJob(self.active.clone());

        let span = info_span!("job", name = %name);
        let mut jobs = self.jobs.lock();
        Self::reap(&mut jobs);
        jobs.spawn(
            async move {
                let _guard = guard;
                job.await;
            }
            .instrument(span),
        );
    }

    /// 当前仍在运行的作业数
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn reap(jobs: &mut JoinSet<()>) {
        while let Some(result) = jobs.try_join_next() {
            if let Err(e) = result {
                if e.is_panic() {
                    error!("Background job panicked: {}", e);
                }
            }
        }
    }

    /// 关闭监督器
    ///
    /// 在 `grace` 内等待作业自然结束，之后中止剩余作业；返回被中止的作业数
    pub async fn shutdown(&self, grace: Duration) -> usize {
        let mut jobs = std::mem::take(&mut *self.jobs.lock());
        if jobs.is_empty() {
            return 0;
        }

        info!("Waiting up to {:?} for {} background jobs", grace, jobs.len());
        let drained = tokio::time::timeout(grace, async {
            while let Some(result) = jobs.join_next().await {
                if let Err(e) = result {
                    if e.is_panic() {
                        error!("Background job panicked: {}", e);
                    }
                }
            }
        })
        .await;

        if drained.is_ok() {
            info!("All background jobs finished");
            return 0;
        }

        let aborted = jobs.len();
        warn!("Aborting {} background jobs after grace period", aborted);
        jobs.shutdown().await;
        aborted
    }
}
