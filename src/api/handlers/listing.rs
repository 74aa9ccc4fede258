//! Markdown file listings.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::Response,
};
use tracing::error;

use crate::api::error::{json_response, ApiError, ListResponse, STATUS_ERROR, STATUS_SUCCESS};
use crate::api::{AppState, ContentKind};
use crate::site::store;

/// `GET /api/hugo/list-post/post`
pub async fn list_posts(State(state): State<Arc<AppState>>, request: Request) -> Response {
    list_content(&state, ContentKind::Post, &request)
}

/// `GET /api/hugo/list-post/moment`
pub async fn list_moments(State(state): State<Arc<AppState>>, request: Request) -> Response {
    list_content(&state, ContentKind::Moment, &request)
}

fn list_content(state: &AppState, kind: ContentKind, request: &Request) -> Response {
    if request.method() != Method::GET {
        let e = ApiError::MethodNotAllowed("GET");
        return json_response(e.status_code(), e.to_body());
    }

    let dir = kind.dir(&state.config);
    let dir_path = dir.display().to_string();

    match store::list_markdown(dir) {
        Ok(md_files) => json_response(
            StatusCode::OK,
            ListResponse {
                status: STATUS_SUCCESS,
                message: format!("found {} .md files in {}", md_files.len(), dir_path),
                md_files,
                dir_path,
                error: None,
            },
        ),
        Err(e) => {
            error!(dir = %dir_path, error = %e, "Failed to list directory");
            let e = ApiError::from(e);
            json_response(
                e.status_code(),
                ListResponse {
                    status: STATUS_ERROR,
                    message: e.message(),
                    md_files: Vec::new(),
                    dir_path,
                    error: e.detail(),
                },
            )
        }
    }
}
