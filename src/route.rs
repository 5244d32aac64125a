//! Route definitions for the extraction API
//!
//! This module configures the HTTP routes, the JSON fallbacks and the
//! middleware stack around them.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::AppState;
use crate::handler::{get_video_url, method_not_allowed, not_found};
use crate::middleware::{log_requests, require_api_key};

/// Creates and configures the Axum application router
///
/// # Route Definitions
///
/// - `GET /v1/yt-dlp` - Resolves a page URL into its direct media URL
/// - other methods on `/v1/yt-dlp` - 405 JSON error
/// - anything else - 404 JSON error
///
/// # Middleware (outermost first)
///
/// 1. Request logger, when `Config::log_requests` is set
/// 2. API key gate, covering the fallback and CORS preflights as well
/// 3. CORS, allowing any origin, method and header with credentials
pub fn create_app(state: AppState) -> Router {
    let log_enabled = state.config.log_requests;

    let router = Router::new()
        .route(
            "/v1/yt-dlp",
            get(get_video_url).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(cors_layer())
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state);

    if log_enabled {
        router.layer(middleware::from_fn(log_requests))
    } else {
        router
    }
}

fn cors_layer() -> CorsLayer {
    // Wildcards cannot be combined with credentials, so request values are mirrored.
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
