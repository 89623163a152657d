//! Handlers for the simulated image extraction flow.
//!
//! The upload is the raw request body; its `Content-Type` must be an image
//! type and the optional `x-file-name` header names the file.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use dtrack_core::discount::Category;
use dtrack_core::error::CoreError;
use dtrack_core::extraction::{ExtractionStatus, ImageUpload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional header naming the uploaded file.
pub const FILE_NAME_HEADER: &str = "x-file-name";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStarted {
    pub upload_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionCancelled {
    pub cancelled: bool,
}

/// Body for `POST /extractions/current/accept`. The image never carries
/// these, so the user supplies them when saving.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptExtraction {
    pub expiry_date: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub is_public: bool,
}

/// POST /api/v1/extractions
///
/// Start extracting an uploaded image. Supersedes any pending extraction.
pub async fn start_extraction(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let content_type = header_str(CONTENT_TYPE.as_str())
        .ok_or_else(|| AppError::BadRequest("Missing Content-Type header".to_string()))?;

    let upload = ImageUpload {
        file_name: header_str(FILE_NAME_HEADER).unwrap_or_else(|| "upload".to_string()),
        content_type,
        bytes: body.to_vec(),
    };

    let upload_id = state.extraction.start(upload).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: ExtractionStarted { upload_id },
        }),
    ))
}

/// GET /api/v1/extractions/current
pub async fn get_extraction(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.extraction.status(),
    }))
}

/// DELETE /api/v1/extractions/current
pub async fn cancel_extraction(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let cancelled = state.extraction.cancel().await;

    Ok(Json(DataResponse {
        data: ExtractionCancelled { cancelled },
    }))
}

/// POST /api/v1/extractions/current/accept
///
/// Save the ready offer as a new discount and reset the slot.
pub async fn accept_extraction(
    State(state): State<AppState>,
    Json(input): Json<AcceptExtraction>,
) -> AppResult<impl IntoResponse> {
    let ExtractionStatus::Ready { upload_id, offer } = state.extraction.status() else {
        return Err(CoreError::Conflict("No extraction result is ready".to_string()).into());
    };

    let mut create = offer.into_create(input.expiry_date);
    create.category = input.category;
    create.is_public = input.is_public;

    let discount = state.store.write().await.create(create)?.clone();
    state.extraction.clear_ready(upload_id);

    tracing::info!(discount_id = %discount.id, upload_id = %upload_id, "Extracted offer saved");

    Ok((StatusCode::CREATED, Json(DataResponse { data: discount })))
}
