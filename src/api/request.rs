//! Submission parsing.
//!
//! The body format is chosen by the `Content-Type` header only:
//! JSON, multipart form, or (for anything else) URL-encoded form.
//! Form submissions also read fields from the URL query; body values win.

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use serde::Deserialize;

use super::error::ApiError;

/// Largest accepted request body, and the multipart memory bound.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// A post or moment as submitted by the caller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub filename: Option<String>,
    /// `None` when the caller did not say; the handler defaults it to false.
    pub draft: Option<bool>,
    pub date: Option<String>,
}

impl Submission {
    /// Require a non-empty title and content. Content is never normalized.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.is_empty() {
            return Err(ApiError::MissingField("title"));
        }
        if self.content.is_empty() {
            return Err(ApiError::MissingField("content"));
        }
        Ok(())
    }

    /// Build a submission from decoded form fields. The first value of a
    /// repeated field wins; absent fields stay empty.
    pub fn from_form_fields(fields: &[(String, String)]) -> Self {
        let get = |name: &str| form_value(fields, name);
        let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());

        Self {
            title: get("title").to_string(),
            content: get("content").to_string(),
            tags: split_csv(get("tags")),
            categories: split_csv(get("categories")),
            filename: non_empty(get("filename")),
            draft: non_empty(get("draft")).map(|v| v.eq_ignore_ascii_case("true")),
            date: non_empty(get("date")),
        }
    }
}

fn form_value<'a>(fields: &'a [(String, String)], name: &str) -> &'a str {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .unwrap_or("")
}

/// JSON wire shape. Nulls are accepted anywhere and read as absent.
#[derive(Debug, Deserialize)]
struct JsonSubmission {
    title: Option<String>,
    content: Option<String>,
    tags: Option<Vec<String>>,
    categories: Option<Vec<String>>,
    filename: Option<String>,
    draft: Option<bool>,
    date: Option<String>,
}

impl From<JsonSubmission> for Submission {
    fn from(json: JsonSubmission) -> Self {
        Self {
            title: json.title.unwrap_or_default(),
            content: json.content.unwrap_or_default(),
            tags: json.tags.unwrap_or_default(),
            categories: json.categories.unwrap_or_default(),
            filename: json.filename.filter(|f| !f.is_empty()),
            draft: json.draft,
            date: json.date.filter(|d| !d.is_empty()),
        }
    }
}

/// Comma-separated list, each element trimmed. Blank input is an empty list.
pub fn split_csv(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(|part| part.trim().to_string()).collect()
}

/// Parse a request body into a [`Submission`].
pub async fn parse_submission(request: Request) -> Result<Submission, ApiError> {
    let content_type = match request.headers().get(header::CONTENT_TYPE) {
        Some(value) => value
            .to_str()
            .map_err(|_| ApiError::UnsupportedMediaType(format!("{value:?}")))?
            .to_string(),
        None => String::new(),
    };

    if content_type.contains("application/json") {
        let body = read_body(request).await?;
        serde_json::from_slice::<JsonSubmission>(&body)
            .map(Submission::from)
            .map_err(|e| ApiError::Parse {
                message: "failed to parse JSON body",
                detail: e.to_string(),
            })
    } else if content_type.contains("multipart/form-data") {
        let query = query_fields(&request);
        let mut fields = read_multipart(request).await?;
        fields.extend(query);
        Ok(Submission::from_form_fields(&fields))
    } else {
        let query = query_fields(&request);
        let body = read_body(request).await?;
        let mut fields: Vec<(String, String)> =
            serde_urlencoded::from_bytes(&body).map_err(|e| ApiError::Parse {
                message: "failed to parse form body",
                detail: e.to_string(),
            })?;
        fields.extend(query);
        Ok(Submission::from_form_fields(&fields))
    }
}

/// Decoded query pairs. An undecodable query contributes nothing.
fn query_fields(request: &Request) -> Vec<(String, String)> {
    request
        .uri()
        .query()
        .and_then(|query| serde_urlencoded::from_str(query).ok())
        .unwrap_or_default()
}

async fn read_body(request: Request) -> Result<Bytes, ApiError> {
    axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::Parse {
            message: "failed to read request body",
            detail: e.to_string(),
        })
}

/// Text fields of a multipart body. File parts are skipped.
async fn read_multipart(request: Request) -> Result<Vec<(String, String)>, ApiError> {
    let multipart_error = |detail: String| ApiError::Parse {
        message: "failed to parse multipart/form-data body",
        detail,
    };

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| multipart_error(e.to_string()))?;

    let mut fields = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e.to_string()))?
    {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| multipart_error(e.to_string()))?;
        fields.push((name, value));
    }

    Ok(fields)
}
