// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::test_settings;
use blogforge::domain::models::task::{ImageGenerationParams, TaskStatus};
use blogforge::domain::services::content_source::{ImageTaskTracker, WorkflowTrigger};
use blogforge::domain::services::image_provider::{
    upstream_status, ImageFetcher, ImageTaskProvider,
};
use blogforge::infrastructure::clients::dashscope_client::DashScopeClient;
use blogforge::infrastructure::clients::image_fetcher::HttpImageFetcher;
use blogforge::infrastructure::clients::image_service_client::ImageServiceClient;
use blogforge::infrastructure::clients::workflow_client::WorkflowClient;
use blogforge::utils::errors::UpstreamError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn params() -> ImageGenerationParams {
    ImageGenerationParams {
        model: "wanx2.1-t2i-turbo".into(),
        prompt: "a cat in a garden".into(),
        negative_prompt: String::new(),
        n: 1,
        size: "1024*1024".into(),
    }
}

fn workflow_client(server: &MockServer) -> WorkflowClient {
    let mut settings = test_settings(&server.uri()).workflow;
    settings.api_url = format!("{}/v1/workflows/run", server.uri());
    settings.api_key = "wf-key".into();
    WorkflowClient::new(&settings).unwrap()
}

#[tokio::test]
async fn test_dashscope_create_returns_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/aigc/text2image/image-synthesis"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("X-DashScope-Async", "enable"))
        .and(body_json(json!({
            "model": "wanx2.1-t2i-turbo",
            "input": { "prompt": "a cat in a garden" },
            "parameters": { "n": 1, "size": "1024*1024" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": { "task_id": "abc-123", "task_status": "PENDING" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DashScopeClient::new(&test_settings(&server.uri()).dashscope).unwrap();
    assert_eq!(client.create_task(&params()).await.unwrap(), "abc-123");
}

#[tokio::test]
async fn test_dashscope_create_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Throttling.RateQuota"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output": {} })))
        .mount(&server)
        .await;

    let client = DashScopeClient::new(&test_settings(&server.uri()).dashscope).unwrap();
    match client.create_task(&params()).await {
        Err(UpstreamError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "Throttling.RateQuota");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert!(matches!(
        client.create_task(&params()).await,
        Err(UpstreamError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_dashscope_create_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "output": { "task_id": "late" } }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut settings = test_settings(&server.uri()).dashscope;
    settings.create_timeout_secs = 1;
    let client = DashScopeClient::new(&settings).unwrap();
    let err = client.create_task(&params()).await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
}

#[tokio::test]
async fn test_dashscope_query_passes_payload_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/abc-123"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": { "task_id": "abc-123", "task_status": "RUNNING" }
        })))
        .mount(&server)
        .await;

    let client = DashScopeClient::new(&test_settings(&server.uri()).dashscope).unwrap();
    let payload = client.query_task("abc-123").await.unwrap();
    assert_eq!(upstream_status(&payload), TaskStatus::Running);

    let missing = client.query_task("nope").await.unwrap_err();
    assert!(matches!(missing, UpstreamError::Status { status: 404, .. }));
    assert!(!missing.is_transient());
}

#[tokio::test]
async fn test_dashscope_query_html_body_is_not_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = DashScopeClient::new(&test_settings(&server.uri()).dashscope).unwrap();
    let err = client.query_task("abc-123").await.unwrap_err();

    assert!(
        matches!(err, UpstreamError::InvalidResponse(_)),
        "expected invalid response, got {:?}",
        err
    );
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_image_fetcher_built_from_polling_settings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/result/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG".to_vec()))
        .mount(&server)
        .await;

    let mut settings = test_settings(&server.uri());
    settings.polling.download_max_idle_connections = 1;
    settings.polling.download_connect_timeout_secs = 1;
    let fetcher = HttpImageFetcher::from_settings(&settings.polling).unwrap();

    let bytes = fetcher
        .fetch(&format!("{}/result/1.png", server.uri()))
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"\x89PNG");

    let missing = fetcher
        .fetch(&format!("{}/result/2.png", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(missing, UpstreamError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_workflow_trigger_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workflows/run"))
        .and(header("authorization", "Bearer wf-key"))
        .and(body_json(json!({
            "inputs": {},
            "files": [],
            "response_mode": "blocking",
            "user": "auto-scheduler"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "t-1",
            "workflow_run_id": "run-42",
            "data": {
                "id": "run-42",
                "status": "succeeded",
                "outputs": { "text": "{\"title\":\"Hello\"}", "image": "img-1" },
                "elapsed_time": 12.5
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let run = workflow_client(&server).trigger().await.unwrap();
    assert_eq!(run.workflow_run_id, "run-42");
    assert_eq!(run.status, "succeeded");
    assert_eq!(run.outputs["image"], "img-1");
    assert!((run.elapsed_time - 12.5).abs() < f64::EPSILON);
    assert!(run.has_outputs());
}

#[tokio::test]
async fn test_workflow_trigger_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "status": "succeeded", "outputs": {} }
        })))
        .mount(&server)
        .await;

    let client = workflow_client(&server);
    match client.trigger().await {
        Err(UpstreamError::Status { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert!(matches!(
        client.trigger().await,
        Err(UpstreamError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_image_service_client_waits_for_completion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/task/img-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "img-1", "status": "PROCESSING", "image_urls": []
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/task/img-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "img-1",
            "status": "COMPLETED",
            "image_urls": ["https://cdn/x-org.png", "https://cdn/x-card.png", "https://cdn/x-cover.png"]
        })))
        .mount(&server)
        .await;

    let client = ImageServiceClient::new(server.uri(), 5, Duration::from_millis(20)).unwrap();
    let urls = client.wait_for_images("img-1").await;
    assert_eq!(urls.len(), 3);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_image_service_client_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/task/failed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "failed", "status": "FAILED", "image_urls": [], "error": "moderation"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/task/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "slow", "status": "PROCESSING", "image_urls": []
        })))
        .mount(&server)
        .await;

    let client = ImageServiceClient::new(server.uri(), 3, Duration::from_millis(10)).unwrap();
    assert!(client.wait_for_images("failed").await.is_empty());
    assert!(client.wait_for_images("slow").await.is_empty());
    // 未登记的路径返回 404，作为查询错误重试直到次数耗尽
    assert!(client.wait_for_images("missing").await.is_empty());

    let requests = server.received_requests().await.unwrap();
    let count = |p: &str| requests.iter().filter(|r| r.url.path() == p).count();
    assert_eq!(count("/task/failed"), 1);
    assert_eq!(count("/task/slow"), 3);
    assert_eq!(count("/task/missing"), 3);
}
