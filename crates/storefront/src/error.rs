//! Handler error type.
//!
//! Server-side failures go to Sentry and reach the visitor as a bare 500.
//! Client-side failures (an unknown product, a stale download link, a
//! checkout step taken out of order) keep their message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use takshashil_core::CheckoutError;
use thiserror::Error;

use crate::documents::DocumentError;

#[derive(Debug, Error)]
pub enum AppError {
    /// The checkout machine refused the action for its current state.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    #[error("document rendering failed: {0}")]
    Document(#[from] DocumentError),

    #[error("session store failed: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("page rendering failed: {0}")]
    Template(#[from] askama::Error),

    /// Nothing matches the requested product, page or download token.
    #[error("{0} not found")]
    NotFound(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Checkout(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Document(_) | Self::Session(_) | Self::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if !status.is_server_error() {
            tracing::debug!(error = %self, %status, "request rejected");
            return (status, self.to_string()).into_response();
        }

        let event_id = sentry::capture_error(&self);
        tracing::error!(error = %self, sentry_event_id = %event_id, "request failed");
        (status, "Something went wrong on our side").into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Record a visitor action as a Sentry breadcrumb.
///
/// Breadcrumbs only show up attached to a later error event, so this is
/// cheap to call on every cart change or form submission.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let data = data
        .iter()
        .map(|&(key, value)| (key.to_owned(), serde_json::Value::from(value)))
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::NotFound("certificate".to_owned());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "certificate not found");

        let err = AppError::from(CheckoutError::EmptyCart);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), CheckoutError::EmptyCart.to_string());
    }

    #[test]
    fn test_into_response_uses_status() {
        let response = AppError::NotFound("product 99".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::from(CheckoutError::EmptyCart).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
