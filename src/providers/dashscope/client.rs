//! DashScope client implementation

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use reqwest::{Client, Response};

use crate::providers::core::{
    config::PollSettings, error::ImageError, provider::ImageProvider, types::GenerationParams,
};
use crate::providers::http::{download_image, poll_for_result, TaskStatus};

use super::types::{ApiErrorBody, SubmitResponse, SynthesisRequest, TaskResponse, TaskState};

/// Client for one DashScope image synthesis model, e.g. `wanx-v1`
pub struct DashScopeClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
    poll: PollSettings,
}

impl DashScopeClient {
    pub fn new(
        http_client: Client,
        base_url: &str,
        api_key: String,
        model: &str,
        poll: PollSettings,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            poll,
        }
    }

    fn synthesis_url(&self) -> String {
        format!(
            "{}/api/v1/services/aigc/text2image/image-synthesis",
            self.base_url
        )
    }

    fn task_url(&self, task_id: &str) -> String {
        format!("{}/api/v1/tasks/{}", self.base_url, task_id)
    }

    /// Submit a synthesis task and return its id
    async fn submit(&self, request: &SynthesisRequest) -> Result<String, ImageError> {
        let response = self
            .http_client
            .post(self.synthesis_url())
            .bearer_auth(&self.api_key)
            .header("X-DashScope-Async", "enable")
            .json(request)
            .send()
            .await?;
        let submitted: SubmitResponse = check_response(response).await?.json().await?;

        tracing::debug!(
            task_id = %submitted.output.task_id,
            request_id = ?submitted.request_id,
            status = ?submitted.output.task_status,
            "DashScope task submitted"
        );
        Ok(submitted.output.task_id)
    }

    /// Query a task, yielding the first image URL once it has succeeded
    async fn query(&self, task_id: String) -> Result<TaskStatus<String>, ImageError> {
        let response = self
            .http_client
            .get(self.task_url(&task_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let task: TaskResponse = check_response(response).await?.json().await?;

        Ok(task_status(task))
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<Bytes, ImageError> {
        tracing::debug!(model = %self.model, "Submitting DashScope synthesis");

        let task_id = self.submit(&request).await?;
        let url = poll_for_result(&task_id, self.poll, |id| self.query(id)).await?;

        download_image(&self.http_client, &url).await
    }
}

fn task_status(task: TaskResponse) -> TaskStatus<String> {
    let output = task.output;
    match output.task_status {
        TaskState::Pending | TaskState::Running | TaskState::Suspended => TaskStatus::Pending,
        TaskState::Succeeded => {
            match output.results.iter().find_map(|result| result.url.clone()) {
                Some(url) => TaskStatus::Complete(url),
                None => {
                    let reason = output
                        .results
                        .first()
                        .and_then(|result| result.message.clone())
                        .unwrap_or_else(|| "no image URL in results".to_string());
                    TaskStatus::Failed(reason)
                }
            }
        }
        TaskState::Failed | TaskState::Canceled | TaskState::Unknown => {
            TaskStatus::Failed(format!(
                "status {:?}, code: {}, message: {}",
                output.task_status,
                output.code.as_deref().unwrap_or("-"),
                output.message.as_deref().unwrap_or("-")
            ))
        }
    }
}

/// Like `ensure_success`, but condenses DashScope's `{code, message}` error body
async fn check_response(response: Response) -> Result<Response, ImageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_else(|_| String::new());
    Err(ImageError::HttpError {
        status: status.as_u16(),
        body: error_summary(body),
    })
}

fn error_summary(body: String) -> String {
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(error) => format!("{}: {}", error.code, error.message),
        Err(_) => body,
    }
}

fn png_data_uri(image: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(image))
}

#[async_trait]
impl ImageProvider for DashScopeClient {
    async fn text_to_image(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Bytes, ImageError> {
        self.synthesize(SynthesisRequest::text_to_image(&self.model, prompt, params))
            .await
    }

    async fn image_to_image(
        &self,
        input_image: &[u8],
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Bytes, ImageError> {
        let request = SynthesisRequest::image_to_image(
            &self.model,
            prompt,
            png_data_uri(input_image),
            params,
        );
        self.synthesize(request).await
    }
}
