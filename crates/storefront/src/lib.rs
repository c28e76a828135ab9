//! Takshashil Foundation site library.
//!
//! This crate provides the public site (pages, library, shops, donations)
//! as a library, allowing it to be tested and reused. The binary in
//! `main.rs` adds configuration loading, Sentry and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod catalog;
pub mod config;
pub mod content;
pub mod documents;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use state::AppState;

/// Directory holding the markdown pages.
#[must_use]
pub fn content_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("content")
}

/// Directory holding CSS and images served under `/static`.
#[must_use]
pub fn static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Build the full application router with its middleware stack.
///
/// Sentry layers are added by the binary so tests run without a client.
pub fn router(state: AppState) -> Router {
    let limiter = state
        .config()
        .rate_limit_enabled
        .then(middleware::form_rate_limiter);
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(limiter.as_ref()))
        .nest_service("/static", ServeDir::new(static_dir()))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
