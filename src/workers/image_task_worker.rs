// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 图像任务轮询作业
//!
//! 每个被接受的生成请求对应一个作业：按固定间隔查询上游任务，
//! 成功后下载结果图片、生成规格并上传，最后向注册表写入唯一一次终态。

use bytes::Bytes;
use chrono::Local;
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::settings::PollingSettings;
use crate::domain::models::task::TaskOutcome;
use crate::domain::services::image_naming::date_prefix;
use crate::domain::services::image_provider::{
    interpret_task_payload, ImageFetcher, ImageTaskProvider, UpstreamPhase,
};
use crate::domain::services::image_uploader::ImageUploader;
use crate::domain::services::variant_processor::VariantProcessor;
use crate::infrastructure::registry::TaskRegistry;
use crate::utils::errors::{UpstreamError, WorkerError};
use crate::utils::retry_policy::RetryPolicy;

const CANCELLED_MESSAGE: &str = "job cancelled before completion";

/// 作业被丢弃而未写入终态时，向注册表写入 ERROR
struct CancelGuard {
    registry: Arc<TaskRegistry>,
    task_id: String,
    armed: bool,
}

impl CancelGuard {
    fn new(registry: Arc<TaskRegistry>, task_id: &str) -> Self {
        Self {
            registry,
            task_id: task_id.to_string(),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if self.armed {
            warn!(task_id = %self.task_id, "Polling job dropped before completion");
            self.registry
                .finish(&self.task_id, TaskOutcome::Error(CANCELLED_MESSAGE.to_string()));
        }
    }
}

/// 图像任务轮询作业
pub struct ImageTaskWorker {
    provider: Arc<dyn ImageTaskProvider>,
    fetcher: Arc<dyn ImageFetcher>,
    processor: Arc<VariantProcessor>,
    uploader: Arc<ImageUploader>,
    registry: Arc<TaskRegistry>,
    polling: PollingSettings,
}

impl ImageTaskWorker {
    pub fn new(
        provider: Arc<dyn ImageTaskProvider>,
        fetcher: Arc<dyn ImageFetcher>,
        processor: Arc<VariantProcessor>,
        uploader: Arc<ImageUploader>,
        registry: Arc<TaskRegistry>,
        polling: PollingSettings,
    ) -> Self {
        Self {
            provider,
            fetcher,
            processor,
            uploader,
            registry,
            polling,
        }
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// 运行作业直到终态，并写入注册表
    pub async fn run(&self, task_id: &str) -> TaskOutcome {
        let guard = CancelGuard::new(self.registry.clone(), task_id);
        let started = Instant::now();

        let outcome = self.poll(task_id).await;

        guard.disarm();
        self.registry.finish(task_id, outcome.clone());

        let status = outcome.status();
        metrics::counter!("image_tasks_finished_total", "status" => status.as_str()).increment(1);
        metrics::histogram!("image_task_duration_seconds").record(started.elapsed().as_secs_f64());
        match &outcome {
            TaskOutcome::Completed(urls) => {
                info!(task_id, urls = urls.len(), "Image task completed")
            }
            TaskOutcome::Failed(message) | TaskOutcome::Error(message) => {
                warn!(task_id, %status, "Image task ended: {}", message)
            }
            TaskOutcome::TimedOut => warn!(task_id, "Image task timed out"),
        }
        outcome
    }

    /// 轮询状态机
    async fn poll(&self, task_id: &str) -> TaskOutcome {
        let started = Instant::now();
        let max_wait = self.polling.max_wait();
        let interval = self.polling.check_interval();

        loop {
            if started.elapsed() >= max_wait {
                return TaskOutcome::TimedOut;
            }

            match self.provider.query_task(task_id).await {
                Ok(payload) => match interpret_task_payload(&payload) {
                    Ok(UpstreamPhase::InProgress(token)) => {
                        debug!(task_id, status = %token, "Task still in progress");
                    }
                    Ok(UpstreamPhase::Succeeded { results: None }) => {
                        return TaskOutcome::Failed("No results in response".to_string());
                    }
                    Ok(UpstreamPhase::Succeeded {
                        results: Some(results),
                    }) => {
                        let urls = self.post_process(task_id, results).await;
                        return TaskOutcome::Completed(urls);
                    }
                    Ok(UpstreamPhase::Failed(message)) => {
                        return TaskOutcome::Failed(message);
                    }
                    Ok(UpstreamPhase::Unrecognized(token)) => {
                        return TaskOutcome::Error(format!("Unknown task status: {}", token));
                    }
                    Err(message) => {
                        error!(task_id, "Uninterpretable task payload: {}", message);
                        return TaskOutcome::Error(message);
                    }
                },
                Err(e) if e.is_transient() => {
                    warn!(task_id, "Task status query failed, retrying: {}", e);
                }
                Err(e) => {
                    error!(task_id, "Task status query returned an unusable response: {}", e);
                    return TaskOutcome::Error(e.to_string());
                }
            }

            sleep(interval).await;
        }
    }

    /// 下载、裁剪并上传全部结果图片，返回上传成功的URL
    async fn post_process(&self, task_id: &str, results: Vec<Option<String>>) -> Vec<String> {
        info!(task_id, results = results.len(), "Post-processing task results");
        let date = date_prefix(Local::now());
        let mut urls = Vec::new();

        for (index, url) in results.into_iter().enumerate() {
            let Some(url) = url else {
                warn!(task_id, index, "Result item has no url, skipping");
                continue;
            };

            match self.process_item(&url, &date).await {
                Ok(uploaded) => {
                    if uploaded.is_empty() {
                        warn!(task_id, index, "No variant of result item was uploaded");
                    }
                    urls.extend(uploaded);
                }
                Err(e) => warn!(task_id, index, "Skipping result item {}: {}", url, e),
            }
        }

        urls
    }

    async fn process_item(&self, url: &str, date: &str) -> Result<Vec<String>, WorkerError> {
        let source = self.download(url).await?;
        let variants = self.processor.clone().produce_variants_async(source).await?;
        let unique_id = Uuid::new_v4().to_string();
        Ok(self
            .uploader
            .upload_variants(&variants, &unique_id, date)
            .await)
    }

    async fn download(&self, url: &str) -> Result<Bytes, UpstreamError> {
        let policy = RetryPolicy::fixed(
            self.polling.download_attempts,
            self.polling.download_backoff(),
        );
        let fetcher = &self.fetcher;

        let result = policy
            .run(
                |_| async move { fetcher.fetch(url).await },
                |attempt, err| {
                    warn!(
                        "Image download attempt {}/{} failed for {}: {}",
                        attempt, policy.max_attempts, url, err
                    )
                },
            )
            .await;

        match result {
            Ok(bytes) => {
                metrics::counter!("image_downloads_total", "result" => "ok").increment(1);
                Ok(bytes)
            }
            Err((err, _)) => {
                metrics::counter!("image_downloads_total", "result" => "error").increment(1);
                Err(err)
            }
        }
    }
}
