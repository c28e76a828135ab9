//! Embedded product and library datasets.
//!
//! The site sells from two product lists that share one shop implementation:
//! the main shop and the merchandise page. Each list is compiled into the
//! binary and validated once at startup.

use takshashil_core::{Catalog, CatalogError, Library};

const SHOP_JSON: &str = include_str!("../content/catalog/shop.json");
const MERCHANDISE_JSON: &str = include_str!("../content/catalog/merchandise.json");
const LIBRARY_JSON: &str = include_str!("../content/catalog/library.json");

/// Which product dataset a shop router serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopKind {
    /// The main shop at `/shop`.
    Shop,
    /// The merchandise page at `/merchandise`.
    Merchandise,
}

impl ShopKind {
    /// URL prefix the shop is mounted under.
    #[must_use]
    pub const fn base_path(self) -> &'static str {
        match self {
            Self::Shop => "/shop",
            Self::Merchandise => "/merchandise",
        }
    }

    /// Page heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Shop => "Shop",
            Self::Merchandise => "Merchandise",
        }
    }

    #[must_use]
    pub const fn tagline(self) -> &'static str {
        match self {
            Self::Shop => {
                "Every purchase supports free education and library access for our community."
            }
            Self::Merchandise => "Wear and share the values of equality, liberty and fraternity.",
        }
    }

    /// Whether the page offers free-text search (merchandise filters by
    /// category only).
    #[must_use]
    pub const fn has_search(self) -> bool {
        matches!(self, Self::Shop)
    }

    /// Prefix for this shop's session keys, so each keeps its own cart.
    #[must_use]
    pub const fn session_prefix(self) -> &'static str {
        match self {
            Self::Shop => "shop",
            Self::Merchandise => "merchandise",
        }
    }
}

/// Every dataset the site serves.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub shop: Catalog,
    pub merchandise: Catalog,
    pub library: Library,
}

impl Datasets {
    /// Parse and validate the embedded datasets.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if any dataset is malformed or invalid.
    pub fn load() -> Result<Self, CatalogError> {
        let datasets = Self {
            shop: Catalog::from_json(SHOP_JSON)?,
            merchandise: Catalog::from_json(MERCHANDISE_JSON)?,
            library: Library::from_json(LIBRARY_JSON)?,
        };
        tracing::info!(
            shop = datasets.shop.len(),
            merchandise = datasets.merchandise.len(),
            books = datasets.library.books().len(),
            "Catalogs loaded"
        );
        Ok(datasets)
    }

    /// The product catalog behind a shop.
    #[must_use]
    pub const fn catalog(&self, kind: ShopKind) -> &Catalog {
        match kind {
            ShopKind::Shop => &self.shop,
            ShopKind::Merchandise => &self.merchandise,
        }
    }
}
