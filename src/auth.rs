//! API key gate.
//!
//! Every gateway route requires the configured key, taken from the
//! `X-API-Key` header or, when the header is absent or empty, from the
//! `api_key` query parameter. A mismatch stops the request before any
//! handler runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::api::{ApiError, AppState};

/// Header carrying the key (`X-API-Key`; header names are case-insensitive).
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query parameter carrying the key.
pub const API_KEY_PARAM: &str = "api_key";

/// The key presented by a request, if any.
pub fn presented_key(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let from_header = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());

    if let Some(key) = from_header {
        return Some(key.to_string());
    }

    let query = uri.query()?;
    let params: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
    params
        .into_iter()
        .find(|(name, _)| name == API_KEY_PARAM)
        .map(|(_, value)| value)
}

/// Middleware rejecting requests without the configured key.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    match presented_key(request.headers(), request.uri()) {
        Some(key) if key == state.config.api_key => next.run(request).await,
        presented => {
            warn!(
                uri = %request.uri().path(),
                key_present = presented.is_some(),
                "Rejected request with invalid API key"
            );
            ApiError::Unauthorized.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_key_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("secret"));

        assert_eq!(
            presented_key(&headers, &uri("/api/hugo/list-post/post?api_key=other")),
            Some("secret".to_string())
        );
    }

    #[test]
    fn test_key_from_query() {
        let headers = HeaderMap::new();
        assert_eq!(
            presented_key(&headers, &uri("/x?foo=1&api_key=s%20k")),
            Some("s k".to_string())
        );
    }

    #[test]
    fn test_empty_header_falls_back_to_query() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static(""));
        assert_eq!(
            presented_key(&headers, &uri("/x?api_key=q")),
            Some("q".to_string())
        );
    }

    #[test]
    fn test_no_key() {
        let headers = HeaderMap::new();
        assert_eq!(presented_key(&headers, &uri("/x")), None);
        assert_eq!(presented_key(&headers, &uri("/x?other=1")), None);
    }
}
