//! DashScope image synthesis request and response types

use serde::{Deserialize, Serialize};

use crate::providers::core::types::GenerationParams;

pub const DEFAULT_STYLE: &str = "<auto>";
pub const DEFAULT_SIZE: &str = "1024*1024";
pub const DEFAULT_REF_MODE: &str = "repaint";
pub const DEFAULT_REF_STRENGTH: f32 = 1.0;

/// Body of the image-synthesis task submission
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest {
    pub model: String,
    pub input: SynthesisInput,
    pub parameters: SynthesisParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisInput {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Input image for sketch/reference guided generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sketch_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisParameters {
    pub n: u32,
    pub style: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_strength: Option<f32>,
}

impl SynthesisRequest {
    /// Text-to-image submission; only the first image is ever used, so `n` is 1
    pub fn text_to_image(model: &str, prompt: &str, params: &GenerationParams) -> Self {
        Self {
            model: model.to_string(),
            input: SynthesisInput {
                prompt: prompt.to_string(),
                negative_prompt: params.negative_prompt.clone(),
                sketch_image_url: None,
            },
            parameters: SynthesisParameters {
                n: 1,
                style: params
                    .style
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STYLE.to_string()),
                size: params.size.clone().unwrap_or_else(|| DEFAULT_SIZE.to_string()),
                seed: params.seed,
                ref_mode: None,
                ref_strength: None,
            },
        }
    }

    /// Image-to-image submission with the input image as a data URI
    pub fn image_to_image(
        model: &str,
        prompt: &str,
        image_data_uri: String,
        params: &GenerationParams,
    ) -> Self {
        let mut request = Self::text_to_image(model, prompt, params);
        request.input.sketch_image_url = Some(image_data_uri);
        request.parameters.ref_mode = Some(DEFAULT_REF_MODE.to_string());
        request.parameters.ref_strength = Some(params.strength.unwrap_or(DEFAULT_REF_STRENGTH));
        request
    }
}

/// Response of a task submission
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub output: SubmitOutput,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitOutput {
    pub task_id: String,
    pub task_status: TaskState,
}

/// Response of a task status query
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResponse {
    pub output: TaskOutput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskOutput {
    pub task_id: String,
    pub task_status: TaskState,
    #[serde(default)]
    pub results: Vec<TaskResult>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One generated image; failed sub-results carry a code instead of a URL
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Pending,
    Running,
    Suspended,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Error body DashScope returns with a non-2xx status
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_image_defaults() {
        let request =
            SynthesisRequest::text_to_image("wanx-v1", "a red panda", &GenerationParams::default());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "model": "wanx-v1",
                "input": {"prompt": "a red panda"},
                "parameters": {"n": 1, "style": "<auto>", "size": "1024*1024"}
            })
        );
    }

    #[test]
    fn test_image_to_image_reference_defaults() {
        let request = SynthesisRequest::image_to_image(
            "wanx-sketch-to-image-lite",
            "a house",
            "data:image/png;base64,AAAA".to_string(),
            &GenerationParams::default().with_style("<watercolor>"),
        );

        assert_eq!(
            request.input.sketch_image_url.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(request.parameters.style, "<watercolor>");
        assert_eq!(request.parameters.ref_mode.as_deref(), Some("repaint"));
        assert_eq!(request.parameters.ref_strength, Some(1.0));
    }

    #[test]
    fn test_task_state_deserialization() {
        let state: TaskState = serde_json::from_str(r#""SUCCEEDED""#).unwrap();
        assert_eq!(state, TaskState::Succeeded);
        let state: TaskState = serde_json::from_str(r#""SOMETHING_NEW""#).unwrap();
        assert_eq!(state, TaskState::Unknown);
    }

    #[test]
    fn test_task_response_deserialization() {
        let json = r#"{
            "request_id": "85eaba38",
            "output": {
                "task_id": "86ecf553",
                "task_status": "SUCCEEDED",
                "results": [{"url": "https://dashscope-result.oss/1.png"}],
                "task_metrics": {"TOTAL": 1, "SUCCEEDED": 1, "FAILED": 0}
            },
            "usage": {"image_count": 1}
        }"#;
        let response: TaskResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.output.task_status, TaskState::Succeeded);
        assert_eq!(
            response.output.results[0].url.as_deref(),
            Some("https://dashscope-result.oss/1.png")
        );
    }
}
