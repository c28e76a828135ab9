//! Library book catalogs on the foundation letterhead.

use askama::Template;
use chrono::NaiveDate;
use takshashil_core::{Book, BookScope};

use super::{Document, DocumentError, format_document_date};
use crate::config::OrganizationConfig;

/// Library opening hours printed under the listing.
const LIBRARY_HOURS: &str = "Monday to Saturday, 9 AM to 6 PM";

/// Input for a catalog export.
#[derive(Debug, Clone)]
pub struct BookCatalogDocument<'a> {
    pub scope: &'a BookScope,
    pub books: Vec<&'a Book>,
    pub date: NaiveDate,
}

impl BookCatalogDocument<'_> {
    fn heading(&self) -> &str {
        self.scope.category().unwrap_or("All Categories")
    }

    fn section_heading(&self) -> String {
        self.scope.category().map_or_else(
            || "Complete Book Listing".to_string(),
            |category| format!("{category} Books"),
        )
    }
}

#[derive(Template)]
#[template(path = "documents/book_catalog.html")]
struct BookCatalogTemplate<'a> {
    org: &'a OrganizationConfig,
    heading: &'a str,
    section_heading: String,
    books: &'a [&'a Book],
    date: String,
    hours: &'static str,
}

/// Render the catalog of one library scope.
///
/// # Errors
///
/// Returns `DocumentError::Render` if the template fails to render.
pub fn render_book_catalog(
    org: &OrganizationConfig,
    catalog: &BookCatalogDocument<'_>,
) -> Result<Document, DocumentError> {
    let body = BookCatalogTemplate {
        org,
        heading: catalog.heading(),
        section_heading: catalog.section_heading(),
        books: &catalog.books,
        date: format_document_date(catalog.date),
        hours: LIBRARY_HOURS,
    }
    .render()?;

    Ok(Document {
        filename: Document::filename_for(&org.name, "Book Catalog", catalog.scope.label()),
        body,
    })
}
