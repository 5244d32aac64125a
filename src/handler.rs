//! HTTP request handlers for the extraction API
//!
//! This module implements:
//! - Resolving a video page URL into its direct media URL
//! - The JSON fallbacks for unknown routes and unsupported methods

use axum::{extract::State, Json};

use crate::config::AppState;
use crate::error::{ApiError, ApiQuery};
use crate::extractor::resolve_media_url;
use crate::model::{SuccessResponse, ValidatedUrl, VideoUrlParams};

/// Resolves the direct media URL of a video page
///
/// This handler:
/// 1. Validates the `url` query parameter
/// 2. Runs the extraction engine with a bounded timeout (no download, quiet)
/// 3. Returns the direct media URL from the engine's result
///
/// # Example Request
///
/// `GET /v1/yt-dlp?url=https://www.youtube.com/watch?v=abc&api_key=secret`
///
/// # Response
///
/// - **200 OK** - `{"data":{"url":...},"code":"success","message":"Request was successful"}`
/// - **400 Bad Request** - `url_required`, `invalid_url`, `video_url_extraction_error` or `bad_request`
pub async fn get_video_url(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<VideoUrlParams>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let url = ValidatedUrl::parse(params.url.as_deref())?;

    let media_url = resolve_media_url(
        state.extractor.as_ref(),
        &url,
        state.config.extract_timeout,
    )
    .await?;

    tracing::debug!(page = %url, "resolved media url");

    Ok(Json(SuccessResponse::new(media_url)))
}

/// Fallback for paths that match no route
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Fallback for known paths requested with an unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
