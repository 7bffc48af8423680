// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

use crate::application::use_cases::publish_blog::BlogPipeline;
use crate::config::settings::SchedulerSettings;

/// 一次批量运行的汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: u32,
    pub failed: u32,
    pub total: u32,
    pub elapsed: Duration,
}

/// 批量博客生成器
///
/// 依次运行指定数量的博客流程，两次之间随机等待以避开上游限流
pub struct BatchRunner {
    pipeline: Arc<BlogPipeline>,
    total: u32,
    min_delay: Duration,
    max_delay: Duration,
}

impl BatchRunner {
    pub fn new(pipeline: Arc<BlogPipeline>, total: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            pipeline,
            total,
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }

    pub fn from_settings(pipeline: Arc<BlogPipeline>, settings: &SchedulerSettings) -> Self {
        Self::new(
            pipeline,
            settings.total_count,
            Duration::from_millis(settings.min_delay_ms),
            Duration::from_millis(settings.max_delay_ms),
        )
    }

    fn next_delay(&self) -> Duration {
        if self.max_delay == self.min_delay {
            return self.min_delay;
        }
        let millis = rand::rng()
            .random_range(self.min_delay.as_millis() as u64..=self.max_delay.as_millis() as u64);
        Duration::from_millis(millis)
    }

    pub async fn run(&self) -> BatchSummary {
        let started = Instant::now();
        let mut succeeded = 0;
        let mut failed = 0;

        for index in 1..=self.total {
            info!("Starting to process blog {}/{}", index, self.total);
            match self.pipeline.process_single_blog().await {
                Ok(report) => {
                    succeeded += 1;
                    metrics::counter!("blog_runs_total", "result" => "ok").increment(1);
                    if !report.persist.is_clean() {
                        warn!(uid = %report.record.uid, "Blog {}/{} processed without being stored", index, self.total);
                    }
                    info!(uid = %report.record.uid, "Successfully processed blog {}/{}", index, self.total);
                }
                Err(e) => {
                    failed += 1;
                    metrics::counter!("blog_runs_total", "result" => "failed").increment(1);
                    error!("Failed to process blog {}/{}: {}", index, self.total, e);
                }
            }

            if index < self.total {
                sleep(self.next_delay()).await;
            }
        }

        let summary = BatchSummary {
            succeeded,
            failed,
            total: self.total,
            elapsed: started.elapsed(),
        };
        info!(
            "Batch processing complete: success {}/{}, failed {}, elapsed {:.2}s",
            summary.succeeded,
            summary.total,
            summary.failed,
            summary.elapsed.as_secs_f64()
        );
        summary
    }
}
