//! Cloudflare Workers AI client against a mock API

mod common;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use httpmock::prelude::*;
use image_gateway::providers::{
    GenerationParams, ImageError, ImageProvider, ImageRequest, ProviderKind,
};

const SDXL: &str = "@cf/stabilityai/stable-diffusion-xl-base-1.0";
const IMG2IMG: &str = "@cf/runwayml/stable-diffusion-v1-5-img2img";

#[tokio::test]
async fn test_text_to_image_returns_binary_body() {
    let server = MockServer::start_async().await;
    let run = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/client/v4/accounts/acct-123/ai/run/{}", SDXL))
                .header("authorization", "Bearer cf-token")
                .body_contains(r#""prompt":"a lighthouse""#)
                .body_contains(r#""num_steps":20"#);
            then.status(200)
                .header("content-type", "image/png")
                .body(common::FAKE_PNG);
        })
        .await;

    let provider = common::factory_for(&server.base_url())
        .create_provider(ProviderKind::Cloudflare, SDXL);
    let params = GenerationParams {
        num_steps: Some(20),
        ..Default::default()
    };
    let image = provider
        .generate(ImageRequest::text_to_image("a lighthouse").with_params(params))
        .await
        .expect("Generation should succeed");

    run.assert_async().await;
    assert_eq!(&image[..], common::FAKE_PNG);
}

#[tokio::test]
async fn test_text_to_image_decodes_json_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/client/v4/accounts/acct-123/ai/run/@cf/black-forest-labs/flux-1-schnell");
            then.status(200).json_body(serde_json::json!({
                "success": true,
                "result": {"image": BASE64.encode(common::FAKE_PNG)},
                "errors": [],
                "messages": []
            }));
        })
        .await;

    let provider = common::factory_for(&server.base_url()).create_provider(
        ProviderKind::Cloudflare,
        "@cf/black-forest-labs/flux-1-schnell",
    );
    let image = provider
        .generate(ImageRequest::text_to_image("a fox"))
        .await
        .expect("Generation should succeed");

    assert_eq!(&image[..], common::FAKE_PNG);
}

#[tokio::test]
async fn test_image_to_image_sends_base64_input() {
    let input = b"input-image-bytes";
    let expected = format!(r#""image_b64":"{}""#, BASE64.encode(input));

    let server = MockServer::start_async().await;
    let run = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/client/v4/accounts/acct-123/ai/run/{}", IMG2IMG))
                .body_contains(expected.as_str());
            then.status(200)
                .header("content-type", "image/png")
                .body(common::FAKE_PNG);
        })
        .await;

    let provider = common::factory_for(&server.base_url())
        .create_provider(ProviderKind::Cloudflare, IMG2IMG);
    let image = provider
        .generate(ImageRequest::image_to_image("make it snow", input.to_vec()))
        .await
        .expect("Generation should succeed");

    run.assert_async().await;
    assert_eq!(&image[..], common::FAKE_PNG);
}

#[tokio::test]
async fn test_error_status_is_reported_with_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(401).body("Authentication error");
        })
        .await;

    let provider = common::factory_for(&server.base_url())
        .create_provider(ProviderKind::Cloudflare, SDXL);
    let err = provider
        .generate(ImageRequest::text_to_image("a lighthouse"))
        .await
        .unwrap_err();

    match err {
        ImageError::HttpError { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Authentication error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
