use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use url::form_urlencoded;

use crate::config::AppState;
use crate::error::ApiError;

const API_KEY_PARAM: &str = "api_key";

/// Middleware that rejects requests without an allow-listed `api_key` query parameter
///
/// Runs before routing, so unknown paths are gated too. The allow-list comes
/// from [`crate::config::Config`]; when it is empty every request gets a 403.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let api_key = request.uri().query().and_then(|query| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == API_KEY_PARAM)
            .map(|(_, value)| value.into_owned())
    });

    match api_key {
        Some(key) if state.config.is_allowed_key(&key) => Ok(next.run(request).await),
        _ => Err(ApiError::invalid_api_key()),
    }
}

/// Middleware that logs every request together with the status it produced
///
/// The `api_key` value is replaced by `***` before logging.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();
    let query_params = redacted_query(uri.query());

    let response = next.run(request).await;

    tracing::info!(
        %timestamp,
        %client_ip,
        %method,
        uri = %redacted_uri(&uri),
        ?query_params,
        status = response.status().as_u16(),
        "request handled"
    );

    response
}

fn redacted_query(query: Option<&str>) -> Vec<(String, String)> {
    let Some(query) = query else {
        return Vec::new();
    };

    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| {
            let value = if key == API_KEY_PARAM {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect()
}

fn redacted_uri(uri: &axum::http::Uri) -> String {
    match uri.query() {
        Some(_) => {
            let query: String = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(redacted_query(uri.query()))
                .finish();
            format!("{}?{}", uri.path(), query)
        }
        None => uri.path().to_string(),
    }
}
