use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Html;
use dermadetect_ai::{DetectError, detect};
use dermadetect_core::DetectionResponse;
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;
use crate::pages::Page;

/// Multipart field that carries the image.
pub const FILE_FIELD: &str = "file";

pub async fn index() -> Html<String> {
    Html(Page::Index.render())
}

pub async fn signin() -> Html<String> {
    Html(Page::Signin.render())
}

pub async fn signup() -> Html<String> {
    Html(Page::Signup.render())
}

pub async fn dashboard() -> Html<String> {
    Html(Page::Dashboard.render())
}

pub async fn detect_form() -> Html<String> {
    Html(Page::Detect.render())
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// `POST /detect`: classify the uploaded image.
pub async fn detect_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectionResponse>, ApiError> {
    let upload = read_file_field(multipart?).await?;
    debug!(filename = %upload.filename, size = upload.bytes.len(), "received upload");

    let classifier = state.classifier.clone();
    let result = tokio::task::spawn_blocking(move || {
        detect(classifier.as_ref(), &upload.bytes, &upload.filename)
    })
    .await
    .map_err(|e| DetectError::Inference(anyhow::anyhow!("detection task failed: {e}")))??;

    Ok(Json(DetectionResponse::from(&result)))
}

/// Pull the `file` part out of the form, skipping any other fields.
///
/// Only a part with a filename counts as an uploaded file; a plain text
/// field that happens to be named `file` is ignored.
async fn read_file_field(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?.to_vec();
        return Ok(Upload { filename, bytes });
    }
    Err(ApiError::missing_file())
}
