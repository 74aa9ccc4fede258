//! HTTP API for the gateway.
//!
//! Provides endpoints for:
//! - Creating posts and moments (JSON or form bodies)
//! - Listing the Markdown files in each content directory
//! - Reading a single entry back

pub mod error;
pub mod handlers;
pub mod request;

use std::path::Path;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::any, Router};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::site::{CommandBuilder, SiteBuilder};

pub use error::{ApiError, CreateResponse, EntryResponse, ListResponse};
pub use request::{Submission, MAX_BODY_BYTES};

/// Which content directory a request targets. Decided by the route alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Moment,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Moment => "moment",
        }
    }

    /// Directory holding entries of this kind.
    pub fn dir<'a>(&self, config: &'a Config) -> &'a Path {
        match self {
            Self::Post => &config.content_dir,
            Self::Moment => &config.moment_dir,
        }
    }
}

/// Shared state for API handlers.
pub struct AppState {
    /// Read-only configuration.
    pub config: Arc<Config>,

    /// Site build runner.
    pub builder: Arc<dyn SiteBuilder>,
}

impl AppState {
    /// State that builds with the configured executable.
    pub fn new(config: Config) -> Self {
        let builder = Arc::new(CommandBuilder::from_config(&config));
        Self::with_builder(config, builder)
    }

    pub fn with_builder(config: Config, builder: Arc<dyn SiteBuilder>) -> Self {
        Self {
            config: Arc::new(config),
            builder,
        }
    }
}

/// Route paths, in registration order.
pub const ROUTES: [&str; 6] = [
    "/api/hugo/create-post",
    "/api/hugo/create-moment",
    "/api/hugo/list-post/post",
    "/api/hugo/list-post/moment",
    "/api/hugo/get-post",
    "/api/hugo/get-moment",
];

/// Build the API router with all routes.
///
/// Routes accept any method so that a wrong one still gets a JSON 405,
/// and only after the key check.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(ROUTES[0], any(handlers::content::create_post))
        .route(ROUTES[1], any(handlers::content::create_moment))
        .route(ROUTES[2], any(handlers::listing::list_posts))
        .route(ROUTES[3], any(handlers::listing::list_moments))
        .route(ROUTES[4], any(handlers::entry::get_post))
        .route(ROUTES[5], any(handlers::entry::get_moment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri().path(),
                    )
                })
                // Only log requests/responses that are NOT successful
                .on_request(())
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = response.status();
                        if !status.is_success() {
                            tracing::warn!(
                                status = %status,
                                latency_ms = latency.as_millis(),
                                "request failed"
                            );
                        }
                    },
                ),
        )
        .with_state(state)
}

/// Start the API server.
pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let bind_addr = state.config.bind_addr();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Hugo gateway listening on {}", bind_addr);
    for route in ROUTES {
        tracing::info!(route, "Route registered");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
