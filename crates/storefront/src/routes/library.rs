//! Library route handlers.
//!
//! The library is browse-only: categories with their holdings, a filterable
//! book list, and a downloadable catalog per category.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use takshashil_core::{Book, BookScope, FilterState, LibraryCategory};
use tower_sessions::Session;
use tracing::instrument;

use super::{Layout, NavItem};
use crate::documents::{BookCatalogDocument, render_book_catalog};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Query string of the book list and catalog download.
#[derive(Debug, Default, Deserialize)]
pub struct LibraryQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub q: String,
}

impl LibraryQuery {
    fn scope(&self) -> BookScope {
        BookScope::from_query(self.category.as_deref())
    }
}

/// Library landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "library/index.html")]
pub struct LibraryTemplate {
    pub layout: Layout,
    pub categories: Vec<LibraryCategory>,
    pub total_books: usize,
}

/// Book list template.
#[derive(Template, WebTemplate)]
#[template(path = "library/books.html")]
pub struct BooksTemplate {
    pub layout: Layout,
    /// Category heading, `All` when unrestricted.
    pub scope_label: String,
    /// Category query value (empty for `All`).
    pub category_param: String,
    pub search_query: String,
    pub category_names: Vec<String>,
    pub books: Vec<Book>,
    pub catalog_url: String,
}

/// Display library categories.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let library = &state.datasets().library;
    Ok(LibraryTemplate {
        layout: Layout::load(&state, &session, "Library", NavItem::Library).await?,
        categories: library.categories().to_vec(),
        total_books: library.books().len(),
    })
}

/// Display books in a category, narrowed by a title/author search.
#[instrument(skip(state, session))]
pub async fn books(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LibraryQuery>,
) -> Result<impl IntoResponse> {
    let library = &state.datasets().library;
    let scope = query.scope();
    let search = FilterState::new(None, &query.q);

    let books = library
        .books_in(&scope)
        .into_iter()
        .filter(|book| search.matches(*book))
        .cloned()
        .collect();

    let category_param = scope.category().unwrap_or_default().to_string();
    Ok(BooksTemplate {
        layout: Layout::load(
            &state,
            &session,
            format!("{} Books", scope.label()),
            NavItem::Library,
        )
        .await?,
        scope_label: scope.label().to_string(),
        catalog_url: catalog_url(scope.category()),
        category_param,
        search_query: search.search_query,
        category_names: library
            .categories()
            .iter()
            .map(|c| c.name.clone())
            .collect(),
        books,
    })
}

/// Download the catalog of a category (every book in it, ignoring search).
#[instrument(skip(state))]
pub async fn download_catalog(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> Result<impl IntoResponse> {
    let scope = query.scope();
    let catalog = BookCatalogDocument {
        books: state.datasets().library.books_in(&scope),
        scope: &scope,
        date: Utc::now().date_naive(),
    };
    let document = render_book_catalog(&state.config().organization, &catalog)?;
    tracing::info!(scope = scope.label(), books = catalog.books.len(), "Catalog generated");
    Ok(document)
}

/// Link to the catalog download of a scope.
fn catalog_url(category: Option<&str>) -> String {
    category.map_or_else(
        || "/library/catalog.html".to_string(),
        |c| format!("/library/catalog.html?category={}", urlencoding::encode(c)),
    )
}
