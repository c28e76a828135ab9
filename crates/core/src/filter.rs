//! Category and free-text filtering over catalog items.

use serde::{Deserialize, Serialize};

use crate::catalog::{Book, Product};

/// An item that can be narrowed by category and searched by text.
pub trait Searchable {
    /// Exact-match category.
    fn category(&self) -> &str;

    /// Fields the free-text query is matched against.
    fn search_fields(&self) -> [&str; 2];
}

impl Searchable for Product {
    fn category(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> [&str; 2] {
        [&self.name, &self.description]
    }
}

impl Searchable for Book {
    fn category(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> [&str; 2] {
        [&self.title, &self.author]
    }
}

/// The shopper's current view of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// `None` shows every category.
    #[serde(default, rename = "category")]
    pub active_category: Option<String>,
    /// Empty means no text filter.
    #[serde(default, rename = "q")]
    pub search_query: String,
}

impl FilterState {
    /// Build a filter, treating blank inputs as unrestricted.
    #[must_use]
    pub fn new(category: Option<&str>, query: &str) -> Self {
        Self {
            active_category: category
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToString::to_string),
            search_query: query.trim().to_string(),
        }
    }

    /// Whether any restriction is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active_category.is_some() || !self.search_query.is_empty()
    }

    pub fn matches_category<T: Searchable>(&self, item: &T) -> bool {
        self.active_category
            .as_deref()
            .is_none_or(|c| item.category() == c)
    }

    /// Case-insensitive substring match against any search field.
    pub fn matches_query<T: Searchable>(&self, item: &T) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let needle = self.search_query.to_lowercase();
        item.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        self.matches_category(item) && self.matches_query(item)
    }

    /// Items passing both predicates, in catalog order.
    pub fn apply<'a, T: Searchable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

/// Distinct categories in first-seen order.
pub fn categories<T: Searchable>(items: &[T]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for item in items {
        let category = item.category();
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookId, Price, ProductId};

    fn product(id: u32, name: &str, description: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            unit_price: Price::new(100),
            image_ref: String::new(),
            category: category.to_string(),
            rating: None,
            featured: None,
        }
    }

    fn shop() -> Vec<Product> {
        vec![
            product(1, "Ambedkar Portrait T-Shirt", "Cotton tee", "Clothing"),
            product(2, "Constitution Mug", "Ceramic mug with the Preamble", "Mugs"),
            product(3, "Equality Tote Bag", "Inspired by Dr. Ambedkar", "Bags"),
            product(4, "Social Justice Hoodie", "Warm", "Clothing"),
        ]
    }

    fn ids(items: &[&Product]) -> Vec<u32> {
        items.iter().map(|p| p.id.as_u32()).collect()
    }

    #[test]
    fn test_query_is_case_insensitive_over_name_and_description() {
        let items = shop();
        let filter = FilterState::new(None, "AMBEDKAR");
        assert_eq!(ids(&filter.apply(&items)), vec![1, 3]);
    }

    #[test]
    fn test_category_and_query_are_anded() {
        let items = shop();
        let filter = FilterState::new(Some("Clothing"), "ambedkar");
        assert_eq!(ids(&filter.apply(&items)), vec![1]);
    }

    #[test]
    fn test_no_filter_returns_everything_in_order() {
        let items = shop();
        let filter = FilterState::default();
        assert!(!filter.is_active());
        assert_eq!(ids(&filter.apply(&items)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let items = shop();
        assert!(FilterState::new(None, "zzz").apply(&items).is_empty());
        assert!(FilterState::new(Some("Frames"), "").apply(&items).is_empty());
    }

    #[test]
    fn test_blank_inputs_are_unrestricted() {
        let filter = FilterState::new(Some("  "), "   ");
        assert_eq!(filter, FilterState::default());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let items = shop();
        assert_eq!(categories(&items), vec!["Clothing", "Mugs", "Bags"]);
    }

    #[test]
    fn test_books_search_title_and_author() {
        let books = vec![
            Book {
                id: BookId::new(1),
                title: "Indian Polity".to_string(),
                author: "M. Laxmikanth".to_string(),
                category: "Competitive Exams".to_string(),
                image_url: String::new(),
                available: false,
            },
            Book {
                id: BookId::new(2),
                title: "Annihilation of Caste".to_string(),
                author: "Dr. B.R. Ambedkar".to_string(),
                category: "Ambedkarite Literature".to_string(),
                image_url: String::new(),
                available: true,
            },
        ];

        let found = FilterState::new(None, "laxmi").apply(&books);
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|b| b.id), Some(BookId::new(1)));
    }
}
