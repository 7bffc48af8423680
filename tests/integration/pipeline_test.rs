// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use blogforge::application::use_cases::publish_blog::BlogPipeline;
use blogforge::config::settings::BlogSettings;
use blogforge::domain::models::blog::{BlogRecord, PersistOutcome};
use blogforge::domain::models::workflow::WorkflowRun;
use blogforge::domain::repositories::blog_repository::BlogRepository;
use blogforge::domain::services::blog_composer::BlogComposer;
use blogforge::domain::services::blog_persistence::BlogPersistence;
use blogforge::domain::services::content_source::{ImageTaskTracker, WorkflowTrigger};
use blogforge::domain::services::image_naming::{ImageNaming, PublicUrlScheme};
use blogforge::infrastructure::blog_archive::BlogArchive;
use blogforge::infrastructure::repositories::unavailable_repo::UnavailableBlogRepository;
use blogforge::utils::errors::{PipelineError, UpstreamError};
use blogforge::workers::BatchRunner;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// 按脚本依次返回工作流结果，脚本耗尽后重复最后一项
struct ScriptedWorkflow {
    script: Mutex<VecDeque<Option<Value>>>,
    calls: Mutex<u32>,
}

impl ScriptedWorkflow {
    fn new(script: Vec<Option<Value>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(0),
        })
    }
}

#[async_trait]
impl WorkflowTrigger for ScriptedWorkflow {
    async fn trigger(&self) -> Result<WorkflowRun, UpstreamError> {
        *self.calls.lock() += 1;
        let next = {
            let mut script = self.script.lock();
            if script.len() > 1 {
                script.pop_front().flatten()
            } else {
                script.front().cloned().flatten()
            }
        };
        match next {
            Some(outputs) => Ok(WorkflowRun {
                workflow_run_id: "run-1".to_string(),
                status: "succeeded".to_string(),
                outputs,
                elapsed_time: 1.5,
            }),
            None => Err(UpstreamError::Status {
                status: 503,
                body: "workflow unavailable".to_string(),
            }),
        }
    }
}

struct RecordingTracker {
    urls: Vec<String>,
    queried: Mutex<Vec<String>>,
}

impl RecordingTracker {
    fn new(urls: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            queried: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ImageTaskTracker for RecordingTracker {
    async fn wait_for_images(&self, task_id: &str) -> Vec<String> {
        self.queried.lock().push(task_id.to_string());
        self.urls.clone()
    }
}

#[derive(Default)]
struct MemoryRepository {
    records: Mutex<Vec<BlogRecord>>,
    fail: bool,
}

#[async_trait]
impl BlogRepository for MemoryRepository {
    async fn put(&self, record: &BlogRecord) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("ProvisionedThroughputExceeded");
        }
        self.records.lock().push(record.clone());
        Ok(())
    }

    async fn find_by_uid(&self, uid: &str) -> anyhow::Result<Option<BlogRecord>> {
        Ok(self.records.lock().iter().find(|r| r.uid == uid).cloned())
    }
}

fn naming() -> ImageNaming {
    ImageNaming::new(
        "starrybook/image/blogs/",
        PublicUrlScheme::S3 {
            bucket: "sparkle-web-static".into(),
            region: "ap-southeast-1".into(),
        },
    )
}

fn article_outputs(image: Value) -> Value {
    let text = json!({
        "title": "A Cat in a Garden!",
        "article": "# Cats\n\nThey love gardens.",
        "tag": "pets",
        "keywords": " cats , gardens, spring",
        "description": "Why cats love gardens"
    })
    .to_string();
    json!({ "text": text, "image": image })
}

fn pipeline(
    workflow: Arc<ScriptedWorkflow>,
    tracker: Arc<RecordingTracker>,
    repo: Arc<MemoryRepository>,
    archive: Option<BlogArchive>,
) -> BlogPipeline {
    BlogPipeline::new(
        workflow,
        tracker,
        BlogComposer::new(BlogSettings::default(), naming()),
        BlogPersistence::new(repo, 3, Duration::from_secs(2)),
        archive,
    )
}

#[tokio::test]
async fn test_single_blog_with_generated_images() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = ScriptedWorkflow::new(vec![Some(article_outputs(json!("img-7")))]);
    let tracker = RecordingTracker::new(&[
        "https://cdn/2026/u-org.png",
        "https://cdn/2026/u-card.png",
        "https://cdn/2026/u-cover.png",
    ]);
    let repo = Arc::new(MemoryRepository::default());
    let pipeline = pipeline(
        workflow,
        tracker.clone(),
        repo.clone(),
        Some(BlogArchive::new(dir.path())),
    );

    let report = pipeline.process_single_blog().await.unwrap();
    assert_eq!(*tracker.queried.lock(), vec!["img-7".to_string()]);

    let record = &report.record;
    assert_eq!(record.title, "A Cat in a Garden!");
    assert_eq!(record.slug, "a-cat-in-a-garden");
    assert_eq!(record.keyword, "cats");
    assert_eq!(record.content, "# Cats\n\nThey love gardens.");
    assert_eq!(record.card_url, "https://cdn/2026/u-card.png");
    assert_eq!(record.cover_url, "https://cdn/2026/u-cover.png");
    assert_eq!(record.org_url, "https://cdn/2026/u-org.png");
    assert!(record.published);
    assert_eq!(record.created_at, record.updated_at);
    assert!(record.avatar.ends_with(&format!("/{}.webp", record.author)));

    assert_eq!(report.persist, PersistOutcome::Stored { attempts: 1 });
    assert_eq!(repo.records.lock().len(), 1);

    let archived = report.archived.unwrap();
    assert!(archived.starts_with(dir.path()));
    let saved = tokio::fs::read_to_string(&archived).await.unwrap();
    assert_eq!(saved, "# Cats\n\nThey love gardens.");
}

#[tokio::test]
async fn test_descriptor_encoded_as_json_string() {
    let descriptor = json!({ "task_id": "img-9", "status": "PENDING" }).to_string();
    let workflow = ScriptedWorkflow::new(vec![Some(article_outputs(json!(descriptor)))]);
    let tracker = RecordingTracker::new(&["https://cdn/x-card.png"]);
    let pipeline = pipeline(workflow, tracker.clone(), Arc::default(), None);

    let report = pipeline.process_single_blog().await.unwrap();
    assert_eq!(*tracker.queried.lock(), vec!["img-9".to_string()]);
    assert_eq!(report.record.card_url, "https://cdn/x-card.png");
    assert!(report.archived.is_none());
}

#[tokio::test]
async fn test_missing_images_fall_back_to_placeholder_urls() {
    let workflow = ScriptedWorkflow::new(vec![Some(article_outputs(Value::Null))]);
    let tracker = RecordingTracker::new(&[]);
    let pipeline = pipeline(workflow, tracker.clone(), Arc::default(), None);

    let report = pipeline.process_single_blog().await.unwrap();
    assert!(tracker.queried.lock().is_empty());

    let record = &report.record;
    let base = "https://sparkle-web-static.s3.ap-southeast-1.amazonaws.com/starrybook/image/blogs/";
    for (url, suffix) in [
        (&record.card_url, "card"),
        (&record.cover_url, "cover"),
        (&record.org_url, "org"),
    ] {
        assert!(url.starts_with(base), "{}", url);
        assert!(url.ends_with(&format!("/{}-{}.png", record.uid, suffix)), "{}", url);
    }
}

#[tokio::test]
async fn test_workflow_failures_are_errors() {
    let failing = ScriptedWorkflow::new(vec![None]);
    let err = pipeline(failing, RecordingTracker::new(&[]), Arc::default(), None)
        .process_single_blog()
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Workflow(UpstreamError::Status { status: 503, .. })));

    let empty = ScriptedWorkflow::new(vec![Some(json!({}))]);
    let err = pipeline(empty, RecordingTracker::new(&[]), Arc::default(), None)
        .process_single_blog()
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::EmptyOutputs));
}

/// 写库失败不影响本次运行的成功
#[tokio::test(start_paused = true)]
async fn test_store_failure_degrades_but_run_succeeds() {
    let workflow = ScriptedWorkflow::new(vec![Some(article_outputs(json!("img-1")))]);
    let tracker = RecordingTracker::new(&["https://cdn/x-card.png"]);
    let repo = Arc::new(MemoryRepository {
        fail: true,
        ..Default::default()
    });
    let pipeline = pipeline(workflow, tracker, repo, None);

    let started = tokio::time::Instant::now();
    let report = pipeline.process_single_blog().await.unwrap();
    match &report.persist {
        PersistOutcome::Degraded { reason } => {
            assert!(reason.contains("ProvisionedThroughputExceeded"))
        }
        other => panic!("expected degraded outcome, got {:?}", other),
    }
    assert!(started.elapsed() >= Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_batch_runner_counts_failed_units_and_continues() {
    let workflow = ScriptedWorkflow::new(vec![
        Some(article_outputs(json!("img-1"))),
        None,
        Some(json!({})),
        Some(article_outputs(Value::Null)),
    ]);
    let repo = Arc::new(MemoryRepository::default());
    let runner = BatchRunner::new(
        Arc::new(pipeline(
            workflow.clone(),
            RecordingTracker::new(&["https://cdn/x-org.png"]),
            repo.clone(),
            None,
        )),
        4,
        Duration::from_millis(1000),
        Duration::from_millis(3000),
    );

    let summary = runner.run().await;
    assert_eq!(summary.total, 4);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 2);
    assert_eq!(*workflow.calls.lock(), 4);
    assert_eq!(repo.records.lock().len(), 2);
    // 三次间隔，每次 1..=3 秒
    assert!(summary.elapsed >= Duration::from_secs(3));
    assert!(summary.elapsed <= Duration::from_secs(9));
}

/// 记录库不可达时批量任务仍逐条完成
#[tokio::test(start_paused = true)]
async fn test_batch_runs_to_completion_without_a_store() {
    let workflow = ScriptedWorkflow::new(vec![Some(article_outputs(json!("img-1")))]);
    let pipeline = BlogPipeline::new(
        workflow.clone(),
        RecordingTracker::new(&["https://cdn/x-card.png"]),
        BlogComposer::new(BlogSettings::default(), naming()),
        BlogPersistence::new(
            Arc::new(UnavailableBlogRepository::new("connection refused")),
            3,
            Duration::from_secs(2),
        ),
        None,
    );

    let report = pipeline.process_single_blog().await.unwrap();
    match &report.persist {
        PersistOutcome::Degraded { reason } => {
            assert!(reason.contains("blog store unavailable"), "{}", reason)
        }
        other => panic!("expected degraded outcome, got {:?}", other),
    }

    let runner = BatchRunner::new(
        Arc::new(pipeline),
        3,
        Duration::from_millis(1000),
        Duration::from_millis(1000),
    );
    let summary = runner.run().await;

    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(*workflow.calls.lock(), 4);
}
