// POST /generate handler

use bytes::{Buf, BufMut, Bytes};
use futures_util::TryStreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;
use warp::multipart::{FormData, Part};
use warp::Reply;

use crate::error::{
    ApiError, EMPTY_IMAGE_FILENAME, INVALID_TASK, MISSING_IMAGE, MISSING_PARAMETERS,
};
use crate::models::{GenerateForm, UploadedFile};
use crate::providers::{GenerationParams, ImageRequest, ProviderKind, Task};
use crate::state::AppState;

const IMAGE_FIELD: &str = "image";
const DOWNLOAD_NAME: &str = "generated_image.png";

pub async fn generate_handler(
    form: FormData,
    state: Arc<AppState>,
) -> Result<warp::reply::Response, Infallible> {
    let span = tracing::info_span!("generate", request_id = %Uuid::new_v4());

    let result = async {
        let form = read_form(form, state.max_upload_bytes).await?;
        generate_image(&state, &form).await
    }
    .instrument(span)
    .await;

    Ok(match result {
        Ok(image) => image_reply(image),
        Err(err) => err.into_response(),
    })
}

/// Validate a decoded form and run the generation it describes
pub async fn generate_image(state: &AppState, form: &GenerateForm) -> Result<Bytes, ApiError> {
    let (Some(provider), Some(model), Some(task), Some(prompt)) = (
        form.field("provider"),
        form.field("model"),
        form.field("task"),
        form.field("prompt"),
    ) else {
        return Err(ApiError::BadRequest(MISSING_PARAMETERS.to_string()));
    };

    let task: Task = task
        .parse()
        .map_err(|_| ApiError::BadRequest(INVALID_TASK.to_string()))?;

    state
        .catalog
        .validate(provider, model, task.as_str())
        .map_err(ApiError::BadRequest)?;

    let input_image = match task {
        Task::TextToImage => None,
        Task::ImageToImage => {
            let image = form
                .image
                .as_ref()
                .ok_or_else(|| ApiError::BadRequest(MISSING_IMAGE.to_string()))?;
            if image.filename.is_empty() {
                return Err(ApiError::BadRequest(EMPTY_IMAGE_FILENAME.to_string()));
            }
            Some(image.data.clone())
        }
    };

    let params = read_params(form)?;

    let kind: ProviderKind = provider
        .parse()
        .map_err(|_| ApiError::NotImplemented(provider.to_string()))?;
    let client = state.factory.create_provider(kind, model);

    tracing::info!(provider, model, %task, "Generating image");
    let started = Instant::now();

    let request = ImageRequest {
        task,
        prompt: prompt.to_string(),
        input_image,
        params,
    };

    match client.generate(request).await {
        Ok(image) => {
            tracing::info!(
                provider,
                model,
                bytes = image.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Image generated"
            );
            Ok(image)
        }
        Err(err) => {
            tracing::warn!(provider, model, error = %err, "Image generation failed");
            Err(ApiError::GenerationFailed(err))
        }
    }
}

fn read_params(form: &GenerateForm) -> Result<GenerationParams, ApiError> {
    let mut params = GenerationParams::default();
    for name in GenerationParams::FIELD_NAMES {
        if let Some(value) = form.field(name) {
            params
                .set(name, value)
                .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        }
    }
    Ok(params)
}

/// Collect the multipart stream into a form
///
/// A part named `image` counts as the upload only when it carries a
/// filename; otherwise it is an ordinary text field. The size limit is
/// counted over the decoded parts, so chunked bodies without a
/// `Content-Length` are accepted too.
async fn read_form(form: FormData, max_bytes: u64) -> Result<GenerateForm, ApiError> {
    let mut parts = Box::pin(form);
    let mut decoded = GenerateForm::default();
    let mut received = 0u64;

    while let Some(part) = parts.try_next().await.map_err(invalid_body)? {
        let name = part.name().to_string();
        let filename = part.filename().map(str::to_string);
        let data = read_part(part, max_bytes, &mut received).await?;

        match filename {
            Some(filename) if name == IMAGE_FIELD => {
                if decoded.image.is_none() {
                    decoded.image = Some(UploadedFile { filename, data });
                }
            }
            _ => {
                let value = String::from_utf8(data.to_vec()).map_err(|_| {
                    ApiError::BadRequest(format!("Field '{}' is not valid UTF-8.", name))
                })?;
                decoded.insert_field(name, value);
            }
        }
    }

    Ok(decoded)
}

async fn read_part(part: Part, max_bytes: u64, received: &mut u64) -> Result<Bytes, ApiError> {
    let mut chunks = Box::pin(part.stream());
    let mut data = Vec::new();

    while let Some(chunk) = chunks.try_next().await.map_err(invalid_body)? {
        *received += chunk.remaining() as u64;
        if *received > max_bytes {
            return Err(ApiError::PayloadTooLarge(max_bytes));
        }
        data.put(chunk);
    }

    Ok(Bytes::from(data))
}

fn invalid_body(err: warp::Error) -> ApiError {
    ApiError::BadRequest(format!("Invalid multipart body: {}", err))
}

fn image_reply(image: Bytes) -> warp::reply::Response {
    let reply = warp::reply::with_header(image.to_vec(), "content-type", "image/png");
    warp::reply::with_header(
        reply,
        "content-disposition",
        format!("attachment; filename={}", DOWNLOAD_NAME),
    )
    .into_response()
}
