//! Reading a single entry back.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::Response,
};

use crate::api::error::{json_response, ApiError, EntryResponse, STATUS_SUCCESS};
use crate::api::{AppState, ContentKind};
use crate::site::{ensure_markdown_ext, store};

/// Query parameter naming the entry.
pub const FILENAME_PARAM: &str = "filename";

/// `GET /api/hugo/get-post?filename=...`
pub async fn get_post(State(state): State<Arc<AppState>>, request: Request) -> Response {
    respond(get_entry(&state, ContentKind::Post, &request))
}

/// `GET /api/hugo/get-moment?filename=...`
pub async fn get_moment(State(state): State<Arc<AppState>>, request: Request) -> Response {
    respond(get_entry(&state, ContentKind::Moment, &request))
}

fn respond(result: Result<EntryResponse, ApiError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => json_response(e.status_code(), e.to_body()),
    }
}

fn get_entry(
    state: &AppState,
    kind: ContentKind,
    request: &Request,
) -> Result<EntryResponse, ApiError> {
    if request.method() != Method::GET {
        return Err(ApiError::MethodNotAllowed("GET"));
    }

    let requested = request
        .uri()
        .query()
        .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
        .and_then(|params| {
            params
                .into_iter()
                .find(|(name, _)| name == FILENAME_PARAM)
                .map(|(_, value)| value)
        })
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::MissingField(FILENAME_PARAM))?;

    let filename = checked_filename(&requested)?;
    let dir = kind.dir(&state.config);
    let content = store::read_entry(dir, &filename)?;

    Ok(EntryResponse {
        status: STATUS_SUCCESS,
        message: format!("read {filename}"),
        filename,
        content,
        dir_path: dir.display().to_string(),
    })
}

/// A single path component with `.md` appended as on creation.
fn checked_filename(requested: &str) -> Result<String, ApiError> {
    if requested.contains(['/', '\\']) || requested == "." || requested == ".." {
        return Err(ApiError::InvalidFilename(requested.to_string()));
    }
    Ok(ensure_markdown_ext(requested))
}
