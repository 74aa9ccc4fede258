//! Hugo gateway - publish Markdown content over HTTP.
//!
//! Accepts posts and moments as JSON or form submissions, writes them as
//! Markdown files with generated front matter into the configured content
//! directories, and rebuilds the site with an external `hugo` run.
//!
//! # Request flow
//!
//! ```text
//! request ─▶ API key gate ─▶ body parser ─▶ validation
//!                                              │
//!            ┌─────────────────────────────────┘
//!            ▼
//!      date + filename ─▶ front matter ─▶ file write ─▶ site build ─▶ JSON
//! ```
//!
//! Listing requests go straight from the key gate to a directory read.

/// Configuration file loading.
pub mod config;

/// REST API.
pub mod api;

/// API key gate.
pub mod auth;

/// Content pipeline.
pub mod site;

// === Re-exports ===

pub use api::{AppState, ContentKind};
pub use config::{Config, ConfigError};
pub use site::{BuildError, CommandBuilder, SiteBuilder};
