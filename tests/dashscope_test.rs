//! DashScope client against a mock API: submit, poll, download

mod common;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use httpmock::prelude::*;
use image_gateway::providers::{
    GenerationParams, ImageError, ImageProvider, ImageRequest, ProviderKind,
};

const SYNTHESIS_PATH: &str = "/api/v1/services/aigc/text2image/image-synthesis";

fn submitted(task_id: &str) -> serde_json::Value {
    serde_json::json!({
        "request_id": "req-1",
        "output": {"task_id": task_id, "task_status": "PENDING"}
    })
}

#[tokio::test]
async fn test_text_to_image_submits_polls_and_downloads() {
    let server = MockServer::start_async().await;
    let submit = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(SYNTHESIS_PATH)
                .header("authorization", "Bearer ds-key")
                .header("x-dashscope-async", "enable")
                .body_contains(r#""model":"wanx-v1""#)
                .body_contains(r#""style":"<watercolor>""#)
                .body_contains(r#""size":"1024*1024""#);
            then.status(200).json_body(submitted("task-1"));
        })
        .await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/tasks/task-1");
            then.status(200).json_body(serde_json::json!({
                "request_id": "req-2",
                "output": {
                    "task_id": "task-1",
                    "task_status": "SUCCEEDED",
                    "results": [{"url": server.url("/oss/1.png")}]
                }
            }));
        })
        .await;
    let download = server
        .mock_async(|when, then| {
            when.method(GET).path("/oss/1.png");
            then.status(200).body(common::FAKE_PNG);
        })
        .await;

    let provider =
        common::factory_for(&server.base_url()).create_provider(ProviderKind::Aliyun, "wanx-v1");
    let request = ImageRequest::text_to_image("a red panda")
        .with_params(GenerationParams::default().with_style("<watercolor>"));
    let image = provider.generate(request).await.expect("Generation should succeed");

    submit.assert_async().await;
    poll.assert_async().await;
    download.assert_async().await;
    assert_eq!(&image[..], common::FAKE_PNG);
}

#[tokio::test]
async fn test_image_to_image_sends_data_uri_and_reference_defaults() {
    let input = b"sketch";
    let data_uri = format!("data:image/png;base64,{}", BASE64.encode(input));

    let server = MockServer::start_async().await;
    let submit = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(SYNTHESIS_PATH)
                .body_contains(format!(r#""sketch_image_url":"{}""#, data_uri))
                .body_contains(r#""ref_mode":"repaint""#)
                .body_contains(r#""ref_strength":1.0"#);
            then.status(200).json_body(submitted("task-2"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/tasks/task-2");
            then.status(200).json_body(serde_json::json!({
                "output": {
                    "task_id": "task-2",
                    "task_status": "SUCCEEDED",
                    "results": [{"url": server.url("/oss/2.png")}]
                }
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/oss/2.png");
            then.status(200).body(common::FAKE_PNG);
        })
        .await;

    let provider = common::factory_for(&server.base_url())
        .create_provider(ProviderKind::Aliyun, "wanx-sketch-to-image-lite");
    let image = provider
        .generate(ImageRequest::image_to_image("a cottage", input.to_vec()))
        .await
        .expect("Generation should succeed");

    submit.assert_async().await;
    assert_eq!(&image[..], common::FAKE_PNG);
}

#[tokio::test]
async fn test_failed_task_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(SYNTHESIS_PATH);
            then.status(200).json_body(submitted("task-3"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/tasks/task-3");
            then.status(200).json_body(serde_json::json!({
                "output": {
                    "task_id": "task-3",
                    "task_status": "FAILED",
                    "code": "DataInspectionFailed",
                    "message": "Input data may contain inappropriate content."
                }
            }));
        })
        .await;

    let provider =
        common::factory_for(&server.base_url()).create_provider(ProviderKind::Aliyun, "wanx-v1");
    let err = provider
        .generate(ImageRequest::text_to_image("something"))
        .await
        .unwrap_err();

    match err {
        ImageError::TaskFailed { task_id, message } => {
            assert_eq!(task_id, "task-3");
            assert!(message.contains("DataInspectionFailed"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_pending_task_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(SYNTHESIS_PATH);
            then.status(200).json_body(submitted("task-4"));
        })
        .await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/tasks/task-4");
            then.status(200).json_body(serde_json::json!({
                "output": {"task_id": "task-4", "task_status": "RUNNING"}
            }));
        })
        .await;

    let provider =
        common::factory_for(&server.base_url()).create_provider(ProviderKind::Aliyun, "wanx-v1");
    let err = provider
        .generate(ImageRequest::text_to_image("a slow painting"))
        .await
        .unwrap_err();

    assert!(matches!(err, ImageError::Timeout { ref task_id, .. } if task_id == "task-4"));
    assert!(poll.hits_async().await >= 2);
}

#[tokio::test]
async fn test_submit_error_keeps_status_and_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(SYNTHESIS_PATH);
            then.status(401).json_body(serde_json::json!({
                "request_id": "req-9",
                "code": "InvalidApiKey",
                "message": "Invalid API-key provided."
            }));
        })
        .await;

    let provider =
        common::factory_for(&server.base_url()).create_provider(ProviderKind::Aliyun, "wanx-v1");
    let err = provider
        .generate(ImageRequest::text_to_image("a red panda"))
        .await
        .unwrap_err();

    match err {
        ImageError::HttpError { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "InvalidApiKey: Invalid API-key provided.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_poll_error_status_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(SYNTHESIS_PATH);
            then.status(200).json_body(submitted("task-5"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/tasks/task-5");
            then.status(502).body("Bad Gateway");
        })
        .await;

    let provider =
        common::factory_for(&server.base_url()).create_provider(ProviderKind::Aliyun, "wanx-v1");
    let err = provider
        .generate(ImageRequest::text_to_image("a red panda"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ImageError::HttpError { status: 502, ref body } if body == "Bad Gateway"
    ));
}
