//! Post and moment creation.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::Response,
};
use tracing::info;

use crate::api::error::{json_response, ApiError, CreateResponse, STATUS_SUCCESS};
use crate::api::request::parse_submission;
use crate::api::{AppState, ContentKind};
use crate::site::{build, resolve_date, resolve_filename, store, FrontMatter};

/// `POST /api/hugo/create-post`
pub async fn create_post(State(state): State<Arc<AppState>>, request: Request) -> Response {
    respond(create_content(&state, ContentKind::Post, request).await)
}

/// `POST /api/hugo/create-moment`
pub async fn create_moment(State(state): State<Arc<AppState>>, request: Request) -> Response {
    respond(create_content(&state, ContentKind::Moment, request).await)
}

fn respond(result: Result<CreateResponse, ApiError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => json_response(e.status_code(), e.to_body()),
    }
}

/// Parse, validate, write, then rebuild the site.
async fn create_content(
    state: &AppState,
    kind: ContentKind,
    request: Request,
) -> Result<CreateResponse, ApiError> {
    if request.method() != Method::POST {
        return Err(ApiError::MethodNotAllowed("POST"));
    }

    let submission = parse_submission(request).await?;
    submission.validate()?;

    let date = resolve_date(submission.date.as_deref())?;
    let filename = resolve_filename(submission.filename.as_deref(), &submission.title, &date);
    let dir = kind.dir(&state.config);

    let header = FrontMatter {
        title: &submission.title,
        date,
        draft: submission.draft.unwrap_or(false),
        tags: &submission.tags,
        categories: &submission.categories,
    }
    .render();

    store::write_entry(dir, &filename, &(header + &submission.content))?;

    info!(
        kind = kind.as_str(),
        dir = %dir.display(),
        filename = %filename,
        "Content saved"
    );

    build::run(Arc::clone(&state.builder)).await?;

    Ok(CreateResponse {
        status: STATUS_SUCCESS,
        message: format!("content created and published (/{})", kind.as_str()),
        filename: Some(filename),
        error: None,
    })
}
