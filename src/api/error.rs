//! Response bodies and the error type every handler returns.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::site::{BuildError, DateError, StoreError, DATE_PATTERN};

/// Status string for successful responses.
pub const STATUS_SUCCESS: &str = "success";

/// Status string for failed responses.
pub const STATUS_ERROR: &str = "error";

/// Body returned by the create endpoints, and by any handler on failure.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    /// "success" or "error".
    pub status: &'static str,

    /// Human-readable outcome.
    pub message: String,

    /// Name of the written file, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Underlying failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body returned by the listing endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub status: &'static str,
    pub message: String,
    pub md_files: Vec<String>,
    pub dir_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body returned when fetching a single entry.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub status: &'static str,
    pub message: String,
    pub filename: String,
    pub content: String,
    pub dir_path: String,
}

/// Serialize `body` with `application/json; charset=utf-8`.
pub fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    response
}

/// Everything a request can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API key")]
    Unauthorized,

    #[error("only {0} is supported")]
    MethodNotAllowed(&'static str),

    #[error("unsupported content type")]
    UnsupportedMediaType(String),

    #[error("{message}")]
    Parse {
        message: &'static str,
        detail: String,
    },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Parse { .. } | Self::MissingField(_) | Self::InvalidFilename(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Date(DateError::InvalidFormat(_)) => StatusCode::BAD_REQUEST,
            Self::Date(DateError::TimeZone) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Build(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short summary for the `message` field.
    pub fn message(&self) -> String {
        match self {
            Self::Date(DateError::InvalidFormat(_)) => {
                format!("invalid date, expected format {DATE_PATTERN}")
            }
            Self::Date(DateError::TimeZone) => "failed to load time zone".to_string(),
            Self::Store(StoreError::Write { .. }) => "failed to save content".to_string(),
            Self::Store(StoreError::FileNotFound(_)) => "entry not found".to_string(),
            Self::Store(StoreError::Read { .. }) => "failed to read entry".to_string(),
            Self::Store(_) => "failed to read directory".to_string(),
            Self::Build(_) => "site build failed".to_string(),
            other => other.to_string(),
        }
    }

    /// Underlying detail for the `error` field, when there is one.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Unauthorized | Self::MethodNotAllowed(_) | Self::MissingField(_) => None,
            Self::UnsupportedMediaType(content_type) => Some(content_type.clone()),
            Self::Parse { detail, .. } => Some(detail.clone()),
            Self::InvalidFilename(_) => None,
            Self::Date(e) => Some(e.to_string()),
            Self::Store(e) => Some(e.to_string()),
            Self::Build(e) => Some(format!("build log: {}, cause: {}", e.output(), e)),
        }
    }

    /// Create-shaped error body.
    pub fn to_body(&self) -> CreateResponse {
        CreateResponse {
            status: STATUS_ERROR,
            message: self.message(),
            filename: None,
            error: self.detail(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        json_response(self.status_code(), self.to_body())
    }
}
