//! Read-only reference data: shop products and library books.
//!
//! Catalogs are built once at startup from embedded JSON and never mutated
//! afterwards. Construction validates the records so that handlers can rely
//! on unique, positive IDs and sane prices.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{BookId, Price, ProductId};

/// Highest rating a product may carry.
pub const MAX_RATING: f32 = 5.0;

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("product id must be positive")]
    InvalidProductId,
    #[error("duplicate product id {0}")]
    DuplicateProductId(ProductId),
    #[error("product {0} has a zero price")]
    ZeroPrice(ProductId),
    #[error("product {id} has rating {rating} outside 0.0-5.0")]
    RatingOutOfRange { id: ProductId, rating: f32 },
    #[error("book id must be positive")]
    InvalidBookId,
    #[error("duplicate book id {0}")]
    DuplicateBookId(BookId),
}

/// A shop item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Price per unit in the smallest currency unit.
    pub unit_price: Price,
    /// Opaque image reference, rendered as an `img` source.
    pub image_ref: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl Product {
    /// Whether the product is flagged as featured.
    #[must_use]
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}

/// An ordered, validated list of products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, validating every product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if an ID is zero or repeated, a price is zero,
    /// or a rating falls outside `0.0..=5.0`.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !product.id.is_valid() {
                return Err(CatalogError::InvalidProductId);
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateProductId(product.id));
            }
            if product.unit_price.is_zero() {
                return Err(CatalogError::ZeroPrice(product.id));
            }
            if let Some(rating) = product.rating
                && !(0.0..=MAX_RATING).contains(&rating)
            {
                return Err(CatalogError::RatingOutOfRange {
                    id: product.id,
                    rating,
                });
            }
        }
        Ok(Self { products })
    }

    /// Parse and validate a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or any validation
    /// error from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// A library book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub image_url: String,
    /// Whether a copy is currently on the shelf.
    pub available: bool,
}

/// A library section with its approximate holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryCategory {
    pub name: String,
    pub resource_count: u32,
}

/// The scope selected when browsing or exporting books.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BookScope {
    /// Every category.
    #[default]
    All,
    /// A single category, matched exactly.
    Category(String),
}

impl BookScope {
    /// Name used by the library UI for "every category".
    pub const ALL_LABEL: &'static str = "All";

    /// Parse a query value. Missing, empty and `All` select every book.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | Self::ALL_LABEL) => Self::All,
            Some(category) => Self::Category(category.to_string()),
        }
    }

    /// The category filter, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Category(name) => Some(name),
        }
    }

    /// Label for headings and filenames.
    #[must_use]
    pub fn label(&self) -> &str {
        self.category().unwrap_or(Self::ALL_LABEL)
    }
}

/// Library sections and book catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "LibraryData")]
pub struct Library {
    categories: Vec<LibraryCategory>,
    books: Vec<Book>,
}

#[derive(Deserialize)]
struct LibraryData {
    categories: Vec<LibraryCategory>,
    books: Vec<Book>,
}

impl TryFrom<LibraryData> for Library {
    type Error = CatalogError;

    fn try_from(data: LibraryData) -> Result<Self, Self::Error> {
        Self::new(data.categories, data.books)
    }
}

impl Library {
    /// Build a library, validating book IDs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if a book ID is zero or repeated.
    pub fn new(categories: Vec<LibraryCategory>, books: Vec<Book>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            if !book.id.is_valid() {
                return Err(CatalogError::InvalidBookId);
            }
            if !seen.insert(book.id) {
                return Err(CatalogError::DuplicateBookId(book.id));
            }
        }
        Ok(Self { categories, books })
    }

    /// Parse and validate a library from JSON (`{"categories": [...], "books": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON or invalid books.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: LibraryData = serde_json::from_str(json)?;
        Self::try_from(data)
    }

    /// Library sections in display order.
    #[must_use]
    pub fn categories(&self) -> &[LibraryCategory] {
        &self.categories
    }

    /// All books in catalog order.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Books within a scope, in catalog order.
    #[must_use]
    pub fn books_in(&self, scope: &BookScope) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| scope.category().is_none_or(|c| b.category == c))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: u32, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: "A thing".to_string(),
            unit_price: Price::new(price),
            image_ref: "/static/images/placeholder.svg".to_string(),
            category: "Clothing".to_string(),
            rating: None,
            featured: None,
        }
    }

    #[test]
    fn test_catalog_accepts_valid_products() {
        let catalog = Catalog::new(vec![product(1, 599), product(2, 349)]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(ProductId::new(2)).unwrap().unit_price, Price::new(349));
        assert!(catalog.get(ProductId::new(3)).is_none());
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let err = Catalog::new(vec![product(1, 599), product(1, 349)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProductId(id) if id == ProductId::new(1)));
    }

    #[test]
    fn test_catalog_rejects_zero_id_and_price() {
        assert!(matches!(
            Catalog::new(vec![product(0, 10)]),
            Err(CatalogError::InvalidProductId)
        ));
        assert!(matches!(
            Catalog::new(vec![product(1, 0)]),
            Err(CatalogError::ZeroPrice(_))
        ));
    }

    #[test]
    fn test_catalog_rejects_bad_rating() {
        let mut p = product(1, 10);
        p.rating = Some(5.5);
        assert!(matches!(
            Catalog::new(vec![p]),
            Err(CatalogError::RatingOutOfRange { .. })
        ));
    }

    #[test]
    fn test_catalog_from_json_optional_fields() {
        let json = r#"[{"id": 1, "name": "Mug", "description": "Ceramic", "unit_price": 349,
            "image_ref": "/x.svg", "category": "Mugs", "rating": 4.5, "featured": true}]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let mug = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(mug.rating, Some(4.5));
        assert!(mug.is_featured());
    }

    #[test]
    fn test_catalog_from_json_malformed() {
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_book_scope_from_query() {
        assert_eq!(BookScope::from_query(None), BookScope::All);
        assert_eq!(BookScope::from_query(Some("")), BookScope::All);
        assert_eq!(BookScope::from_query(Some("All")), BookScope::All);
        assert_eq!(
            BookScope::from_query(Some("Competitive Exams")),
            BookScope::Category("Competitive Exams".to_string())
        );
        assert_eq!(BookScope::All.label(), "All");
    }

    #[test]
    fn test_library_books_in_scope() {
        let book = |id: u32, category: &str| Book {
            id: BookId::new(id),
            title: format!("Book {id}"),
            author: "Author".to_string(),
            category: category.to_string(),
            image_url: String::new(),
            available: true,
        };
        let library = Library::new(
            Vec::new(),
            vec![book(1, "A"), book(2, "B"), book(3, "A")],
        )
        .unwrap();

        assert_eq!(library.books_in(&BookScope::All).len(), 3);
        let ids: Vec<u32> = library
            .books_in(&BookScope::Category("A".to_string()))
            .iter()
            .map(|b| b.id.as_u32())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_library_rejects_duplicate_books() {
        let json = r#"{"categories": [], "books": [
            {"id": 1, "title": "T", "author": "A", "category": "C", "image_url": "", "available": true},
            {"id": 1, "title": "T", "author": "A", "category": "C", "image_url": "", "available": false}
        ]}"#;
        assert!(matches!(
            Library::from_json(json),
            Err(CatalogError::DuplicateBookId(_))
        ));
    }
}
