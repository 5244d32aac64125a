//! Data models for the extraction API
//!
//! Request parameters, the validated URL type handed to the extractor, the
//! extractor's result document and the success response body.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;

/// Query parameters read by `GET /v1/yt-dlp`
///
/// `api_key` is consumed by the request gate and ignored here.
///
/// # Example
/// Query string: `?url=https://www.youtube.com/watch?v=abc&api_key=secret`
#[derive(Debug, Default, Deserialize)]
pub struct VideoUrlParams {
    /// Page URL of the video to resolve
    pub url: Option<String>,
}

/// An absolute `http`/`https` URL with a host
///
/// The only way to obtain one is [`ValidatedUrl::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(Url);

impl ValidatedUrl {
    /// Validates client input
    ///
    /// - Missing or empty input fails with `url_required`
    /// - Anything that is not an absolute http(s) URL with a host fails with `invalid_url`
    pub fn parse(input: Option<&str>) -> Result<Self, ApiError> {
        let raw = match input.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(ApiError::url_required()),
        };

        let url = Url::parse(raw).map_err(|_| ApiError::invalid_url())?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::invalid_url());
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self(url)),
            _ => Err(ApiError::invalid_url()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Info document returned by the extraction engine
///
/// Only the fields this service reads are modelled; all of them are optional
/// because the engine omits whatever it could not resolve.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionResult {
    /// Direct media URL for the selected format
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Name of the engine extractor that handled the page, e.g. `Youtube`
    #[serde(default)]
    pub extractor_key: Option<String>,
}

impl ExtractionResult {
    /// The direct media URL, or `None` when the field is missing or empty
    pub fn media_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct VideoUrlData {
    pub url: String,
}

/// Body returned on a successful extraction
///
/// # Example
/// ```json
/// {
///   "data": { "url": "https://cdn.example.com/video.mp4" },
///   "code": "success",
///   "message": "Request was successful"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub data: VideoUrlData,
    pub code: &'static str,
    pub message: &'static str,
}

impl SuccessResponse {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            data: VideoUrlData { url: url.into() },
            code: "success",
            message: "Request was successful",
        }
    }
}
