//! Cloudflare Workers AI request and response types

use serde::{Deserialize, Serialize};

use crate::providers::core::types::GenerationParams;

/// Input of a Workers AI image model run
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Base64-encoded input image (img2img models)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_b64: Option<String>,
}

impl RunRequest {
    pub fn new(prompt: &str, params: &GenerationParams) -> Self {
        Self {
            prompt: prompt.to_string(),
            negative_prompt: params.negative_prompt.clone(),
            height: params.height,
            width: params.width,
            num_steps: params.num_steps,
            strength: params.strength,
            guidance: params.guidance,
            seed: params.seed,
            image_b64: None,
        }
    }

    pub fn with_image_b64(mut self, image_b64: String) -> Self {
        self.image_b64 = Some(image_b64);
        self
    }
}

/// JSON envelope returned by models that do not answer with raw bytes
#[derive(Debug, Clone, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub success: bool,
    pub result: Option<RunResult>,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunResult {
    /// Base64-encoded image
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}
