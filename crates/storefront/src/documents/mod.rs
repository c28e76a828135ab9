//! Downloadable HTML documents.
//!
//! Donation certificates and library book catalogs are rendered as complete,
//! self-contained HTML files and served as attachments. Rendering is pure:
//! the caller supplies the date and (for certificates) the certificate ID.

mod book_catalog;
mod certificate;

use std::sync::LazyLock;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use regex::Regex;

pub use book_catalog::{BookCatalogDocument, render_book_catalog};
pub use certificate::{CertificateDocument, CertificateId, render_certificate};

/// MIME type of every generated document.
pub const DOCUMENT_MIME: &str = "text/html; charset=utf-8";

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("Invalid regex"));

/// Document generation errors.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to render document: {0}")]
    Render(#[from] askama::Error),
}

/// A rendered document ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub body: String,
}

impl Document {
    /// Build `<Org>_<Context>_<Identifier>.html` with every part sanitized.
    #[must_use]
    pub fn filename_for(organization: &str, context: &str, identifier: &str) -> String {
        format!(
            "{}_{}_{}.html",
            sanitize_filename_part(organization),
            sanitize_filename_part(context),
            sanitize_filename_part(identifier)
        )
    }
}

impl IntoResponse for Document {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        (
            [
                (header::CONTENT_TYPE, DOCUMENT_MIME.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.body,
        )
            .into_response()
    }
}

/// Collapse every run of characters outside `[A-Za-z0-9_-]` to one `_`.
#[must_use]
pub fn sanitize_filename_part(value: &str) -> String {
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(value.trim(), "_");
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "Untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Long-form date printed on documents, e.g. `March 5, 2025`.
#[must_use]
pub fn format_document_date(date: chrono::NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
