// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{png_fixture, spawn_image_service, test_settings};
use axum::http::StatusCode;
use blogforge::infrastructure::storage::{InMemoryStorage, LocalStorage};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREATE_PATH: &str = "/services/aigc/text2image/image-synthesis";

async fn mount_create(server: &MockServer, task_id: &str) {
    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .and(header("authorization", "Bearer test-key"))
        .and(header("X-DashScope-Async", "enable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": { "task_id": task_id, "task_status": "PENDING" },
            "request_id": "req-1"
        })))
        .mount(server)
        .await;
}

async fn mount_succeeded(server: &MockServer, task_id: &str, delay: Duration) {
    let image_url = format!("{}/results/{}-0.png", server.uri(), task_id);
    Mock::given(method("GET"))
        .and(path(format!("/tasks/{}", task_id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "output": {
                        "task_id": task_id,
                        "task_status": "SUCCEEDED",
                        "results": [{ "url": image_url }]
                    }
                }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/results/{}-0.png", task_id)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(png_fixture(320, 240)),
        )
        .mount(server)
        .await;
}

/// 轮询状态直到离开 PROCESSING
async fn wait_for_terminal(server: &axum_test::TestServer, task_id: &str) -> Value {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
    loop {
        let body: Value = server.get(&format!("/task/{}", task_id)).await.json();
        if body["status"] != "PROCESSING" {
            return body;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "task {} still processing",
            task_id
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// 端到端：提交后立即返回 PROCESSING，上游成功后变为 COMPLETED 并带 3 个规格URL
#[tokio::test]
async fn test_generate_image_end_to_end() {
    let upstream = MockServer::start().await;
    mount_create(&upstream, "task-e2e").await;
    mount_succeeded(&upstream, "task-e2e", Duration::from_millis(500)).await;

    let storage = Arc::new(InMemoryStorage::new());
    let app = spawn_image_service(test_settings(&upstream.uri()), storage.clone());

    let response = app
        .server
        .post("/generate-image")
        .json(&json!({ "prompt": "a cat in a garden", "n": 1 }))
        .await;
    response.assert_status_ok();
    let accepted: Value = response.json();
    assert_eq!(accepted["task_id"], "task-e2e");
    assert_eq!(accepted["status"], "PROCESSING");
    assert_eq!(accepted["image_urls"], json!([]));

    let pending: Value = app.server.get("/task/task-e2e").await.json();
    assert_eq!(pending["status"], "PROCESSING");

    let done = wait_for_terminal(&app.server, "task-e2e").await;
    assert_eq!(done["status"], "COMPLETED", "unexpected body: {}", done);
    let urls: Vec<String> = serde_json::from_value(done["image_urls"].clone()).unwrap();
    assert_eq!(urls.len(), 3);
    for suffix in ["-org.png", "-card.png", "-cover.png"] {
        assert!(urls.iter().any(|u| u.ends_with(suffix)), "missing {}", suffix);
    }
    assert!(urls.iter().all(|u| u.starts_with(
        "https://sparkle-web-static.s3.ap-southeast-1.amazonaws.com/starrybook/image/blogs/"
    )));

    let keys = storage.keys();
    assert_eq!(keys.len(), 3);
    let stored = storage.object(&keys[0]).unwrap();
    assert_eq!(stored.options.content_type, "image/png");
    assert!(stored.options.public_read);
    assert_eq!(stored.options.cache_control.as_deref(), Some("max-age=31536000"));

    let sent = upstream.received_requests().await.unwrap();
    let create: Value = sent
        .iter()
        .find(|r| r.url.path() == CREATE_PATH)
        .map(|r| r.body_json().unwrap())
        .unwrap();
    assert_eq!(create["model"], "wanx2.1-t2i-turbo");
    assert_eq!(create["input"]["prompt"], "a cat in a garden");
    assert!(create["input"].get("negative_prompt").is_none());
    assert_eq!(create["parameters"], json!({ "n": 1, "size": "1024*1024" }));
}

#[tokio::test]
async fn test_generate_image_rejects_invalid_requests() {
    let upstream = MockServer::start().await;
    let app = spawn_image_service(test_settings(&upstream.uri()), Arc::new(InMemoryStorage::new()));

    let empty = app
        .server
        .post("/generate-image")
        .json(&json!({ "prompt": "" }))
        .expect_failure()
        .await;
    empty.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = empty.json();
    assert!(body["error"].as_str().unwrap().contains("prompt cannot be empty"));

    let too_many = app
        .server
        .post("/generate-image")
        .json(&json!({ "prompt": "a cat", "n": 5 }))
        .expect_failure()
        .await;
    too_many.assert_status(StatusCode::BAD_REQUEST);

    assert!(app.registry.is_empty());
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_image_upstream_rejection_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "InvalidApiKey",
            "message": "Invalid API-key provided."
        })))
        .mount(&upstream)
        .await;
    let app = spawn_image_service(test_settings(&upstream.uri()), Arc::new(InMemoryStorage::new()));

    let response = app
        .server
        .post("/generate-image")
        .json(&json!({ "prompt": "a cat" }))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("InvalidApiKey"));
    assert!(app.registry.is_empty());
}

#[tokio::test]
async fn test_generate_image_passes_optional_fields() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .and(body_json(json!({
            "model": "wanx-v1",
            "input": { "prompt": "a lighthouse", "negative_prompt": "people" },
            "parameters": { "n": 2, "size": "1280*720" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": { "task_id": "task-opts" }
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/task-opts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": { "task_status": "FAILED", "error": { "message": "content moderation" } }
        })))
        .mount(&upstream)
        .await;
    let app = spawn_image_service(test_settings(&upstream.uri()), Arc::new(InMemoryStorage::new()));

    app.server
        .post("/generate-image")
        .json(&json!({
            "prompt": "a lighthouse",
            "negative_prompt": "people",
            "model": "wanx-v1",
            "size": "1280*720",
            "n": 2
        }))
        .await
        .assert_status_ok();

    let done = wait_for_terminal(&app.server, "task-opts").await;
    assert_eq!(done["status"], "FAILED");
    assert_eq!(done["error"], "content moderation");
    assert_eq!(done["image_urls"], json!([]));
}

/// 注册表中没有的任务直接透传上游状态
#[tokio::test]
async fn test_task_status_falls_back_to_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/foreign-task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": { "task_id": "foreign-task", "task_status": "RUNNING" }
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/broken-task"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&upstream)
        .await;
    let app = spawn_image_service(test_settings(&upstream.uri()), Arc::new(InMemoryStorage::new()));

    let running = app.server.get("/task/foreign-task").await;
    running.assert_status_ok();
    let body: Value = running.json();
    assert_eq!(body["status"], "RUNNING");
    assert_eq!(body["image_urls"], json!([]));

    let broken = app.server.get("/task/broken-task").await;
    broken.assert_status_ok();
    let body: Value = broken.json();
    assert_eq!(body["status"], "ERROR");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Task status query failed"));
    assert!(app.registry.is_empty());
}

#[tokio::test]
async fn test_local_storage_serves_uploaded_images() {
    let upstream = MockServer::start().await;
    mount_create(&upstream, "task-local").await;
    mount_succeeded(&upstream, "task-local", Duration::ZERO).await;

    let dir = tempfile::tempdir().unwrap();
    let mut settings = test_settings(&upstream.uri());
    settings.storage.storage_type = "local".to_string();
    settings.storage.local_path = Some(dir.path().to_string_lossy().to_string());
    settings.server.public_url_base = "http://localhost:8000".to_string();
    let storage = Arc::new(LocalStorage::new(dir.path()));
    let app = spawn_image_service(settings, storage);

    app.server
        .post("/generate-image")
        .json(&json!({ "prompt": "a cat in a garden" }))
        .await
        .assert_status_ok();
    let done = wait_for_terminal(&app.server, "task-local").await;
    assert_eq!(done["status"], "COMPLETED");

    let card = done["image_urls"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .find(|u| u.ends_with("-card.png"))
        .unwrap()
        .to_string();
    let local_path = card.strip_prefix("http://localhost:8000").unwrap();
    assert!(local_path.starts_with("/images/starrybook/image/blogs/"));

    let served = app.server.get(local_path).await;
    served.assert_status_ok();
    let decoded = image::load_from_memory(served.as_bytes()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (776, 435));
}

#[tokio::test]
async fn test_descriptive_and_health_endpoints() {
    let upstream = MockServer::start().await;
    let storage = Arc::new(InMemoryStorage::new());
    let app = spawn_image_service(test_settings(&upstream.uri()), storage);

    assert_eq!(app.server.get("/health").await.text(), "OK");
    assert_eq!(
        app.server.get("/version").await.text(),
        env!("CARGO_PKG_VERSION")
    );

    let openapi: Value = app.server.get("/openapi.json").await.json();
    assert_eq!(openapi["openapi"], "3.1.0");
    assert!(openapi["paths"]["/task/{task_id}"].is_object());

    let manifest: Value = app.server.get("/.well-known/ai-plugin.json").await.json();
    assert_eq!(manifest["api"]["url"], "http://localhost:8000/openapi.json");

    let report: Value = app.server.get("/health/storage").await.json();
    assert_eq!(report["status"], "success");
    assert_eq!(report["backend"], "memory");
    assert_eq!(report["bucket"], "sparkle-web-static");
    assert_eq!(report["prefix"], "starrybook/image/blogs/");
    assert_eq!(report["region"], "ap-southeast-1");
}

/// 关闭时被中止的轮询作业在注册表中留下 ERROR
#[tokio::test]
async fn test_shutdown_marks_unfinished_tasks_as_error() {
    let upstream = MockServer::start().await;
    mount_create(&upstream, "task-stuck").await;
    Mock::given(method("GET"))
        .and(path("/tasks/task-stuck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": { "task_id": "task-stuck", "task_status": "RUNNING" }
        })))
        .mount(&upstream)
        .await;
    let app = spawn_image_service(test_settings(&upstream.uri()), Arc::new(InMemoryStorage::new()));

    app.server
        .post("/generate-image")
        .json(&json!({ "prompt": "a cat in a garden" }))
        .await
        .assert_status_ok();
    assert_eq!(app.supervisor.active(), 1);

    let aborted = app.supervisor.shutdown(Duration::from_millis(200)).await;
    assert_eq!(aborted, 1);

    let body: Value = app.server.get("/task/task-stuck").await.json();
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["error"], "job cancelled before completion");
}
