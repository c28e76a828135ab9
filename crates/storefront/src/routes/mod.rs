//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//! GET  /about                  - Content pages (also /education, /volunteer)
//!
//! # Forms
//! GET  /contact                - Contact form
//! POST /contact                - Submit contact form
//! GET  /donate                 - Donation form (or receipt after donating)
//! POST /donate                 - Submit donation, issue certificate
//! POST /volunteer              - Submit volunteer application
//! GET  /downloads/{token}      - One-shot certificate download
//!
//! # Library
//! GET  /library                - Categories with resource counts
//! GET  /library/books          - Book list (?category=&q=)
//! GET  /library/catalog.html   - Catalog document (?category=)
//!
//! # Shops (mounted at /shop and /merchandise)
//! GET  /                       - Product grid, cart panel, checkout
//! POST /cart/open              - Show cart panel
//! POST /cart/close             - Hide cart panel
//! POST /cart/add               - Add one unit
//! POST /cart/update            - Change quantity by a delta
//! POST /cart/remove            - Remove a line
//! POST /checkout               - Open checkout form
//! POST /checkout/cancel        - Back to browsing
//! POST /checkout/complete      - Place order
//! POST /checkout/dismiss       - Leave the order-complete screen
//! ```
//!
//! Every POST route follows Post/Redirect/Get and sits behind the form rate
//! limiter when it is enabled.

pub mod contact;
pub mod donate;
pub mod downloads;
pub mod home;
pub mod library;
pub mod pages;
pub mod shop;
pub mod volunteer;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::catalog::ShopKind;
use crate::config::OrganizationConfig;
use crate::error::Result;
use crate::middleware::RateLimiterLayer;
use crate::models::{Notice, take_notices};
use crate::state::AppState;

// =============================================================================
// Page Layout
// =============================================================================

/// Navigation entry highlighted in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Home,
    About,
    Education,
    Library,
    Volunteer,
    Shop,
    Merchandise,
    Contact,
    Donate,
}

impl NavItem {
    /// Identifier compared in the base template.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Education => "education",
            Self::Library => "library",
            Self::Volunteer => "volunteer",
            Self::Shop => "shop",
            Self::Merchandise => "merchandise",
            Self::Contact => "contact",
            Self::Donate => "donate",
        }
    }
}

impl From<ShopKind> for NavItem {
    fn from(kind: ShopKind) -> Self {
        match kind {
            ShopKind::Shop => Self::Shop,
            ShopKind::Merchandise => Self::Merchandise,
        }
    }
}

/// Data every page passes to `base.html`.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub active: &'static str,
    pub notices: Vec<Notice>,
    pub org: OrganizationConfig,
}

impl Layout {
    /// Build the layout, taking any pending notices out of the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(
        state: &AppState,
        session: &Session,
        title: impl Into<String>,
        nav: NavItem,
    ) -> Result<Self> {
        Ok(Self {
            title: title.into(),
            active: nav.key(),
            notices: take_notices(session).await?,
            org: state.config().organization.clone(),
        })
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Apply the form rate limiter when one is configured.
pub(crate) fn limited(
    router: Router<AppState>,
    limiter: Option<&RateLimiterLayer>,
) -> Router<AppState> {
    match limiter {
        Some(layer) => router.layer(layer.clone()),
        None => router,
    }
}

/// Create the library routes router.
pub fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(library::index))
        .route("/books", get(library::books))
        .route("/catalog.html", get(library::download_catalog))
}

/// Create all routes for the storefront.
pub fn routes(limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    let forms = Router::new()
        .route("/contact", post(contact::submit))
        .route("/donate", post(donate::submit))
        .route("/volunteer", post(volunteer::submit));

    Router::new()
        .route("/", get(home::home))
        .route("/about", pages::page(NavItem::About))
        .route("/education", pages::page(NavItem::Education))
        .route("/volunteer", pages::page(NavItem::Volunteer))
        .route("/contact", get(contact::show))
        .route("/donate", get(donate::show))
        .route("/downloads/{token}", get(downloads::download))
        .nest("/library", library_routes())
        .nest("/shop", shop::routes(ShopKind::Shop, limiter))
        .nest("/merchandise", shop::routes(ShopKind::Merchandise, limiter))
        .merge(limited(forms, limiter))
}
