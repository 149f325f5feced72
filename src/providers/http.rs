//! HTTP helpers shared by provider clients

use bytes::Bytes;
use reqwest::{Client, Response};
use std::future::Future;
use tokio::time::{sleep, Instant};

use crate::providers::core::{config::PollSettings, error::ImageError};

/// Turn a non-2xx response into an `HttpError` carrying the body
pub async fn ensure_success(response: Response) -> Result<Response, ImageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_else(|_| String::new());
    Err(ImageError::HttpError {
        status: status.as_u16(),
        body,
    })
}

/// Download a generated image from the URL a provider returned
pub async fn download_image(http_client: &Client, url: &str) -> Result<Bytes, ImageError> {
    tracing::debug!(url, "Downloading generated image");
    let response = ensure_success(http_client.get(url).send().await?).await?;
    Ok(response.bytes().await?)
}

/// State of an asynchronous provider task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus<T> {
    /// Still queued or running
    Pending,
    /// Finished with a result
    Complete(T),
    /// Finished unsuccessfully
    Failed(String),
}

/// Poll an asynchronous task until it completes, fails or times out
///
/// `check` is called once per interval with the task id. The first call
/// happens immediately.
pub async fn poll_for_result<T, F, Fut>(
    task_id: &str,
    settings: PollSettings,
    mut check: F,
) -> Result<T, ImageError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<TaskStatus<T>, ImageError>>,
{
    let started = Instant::now();

    while started.elapsed() < settings.timeout {
        match check(task_id.to_string()).await? {
            TaskStatus::Complete(result) => return Ok(result),
            TaskStatus::Failed(message) => {
                return Err(ImageError::TaskFailed {
                    task_id: task_id.to_string(),
                    message,
                })
            }
            TaskStatus::Pending => {
                tracing::debug!(task_id, "Task pending, polling again");
                sleep(settings.interval).await;
            }
        }
    }

    Err(ImageError::Timeout {
        task_id: task_id.to_string(),
        timeout: settings.timeout,
    })
}
