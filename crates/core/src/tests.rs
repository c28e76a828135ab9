//! Property tests for cart, pricing and filtering.

use proptest::prelude::*;

use crate::cart::CartStore;
use crate::catalog::Product;
use crate::filter::FilterState;
use crate::pricing::PricingPolicy;
use crate::types::{Price, ProductId};

const CATEGORIES: [&str; 4] = ["Clothing", "Mugs", "Books", "Bags"];
const WORDS: [&str; 6] = ["Ambedkar", "Constitution", "Buddha", "Equality", "Mug", "Tote"];

fn arb_product() -> impl Strategy<Value = Product> {
    (
        1u32..20,
        1u64..5_000,
        0..CATEGORIES.len(),
        0..WORDS.len(),
        0..WORDS.len(),
    )
        .prop_map(|(id, price, cat, w1, w2)| Product {
            id: ProductId::new(id),
            name: format!("{} item", WORDS.get(w1).copied().unwrap_or_default()),
            description: format!("with {}", WORDS.get(w2).copied().unwrap_or_default()),
            unit_price: Price::new(price),
            image_ref: String::new(),
            category: CATEGORIES.get(cat).copied().unwrap_or_default().to_string(),
            rating: None,
            featured: None,
        })
}

/// Products with unique IDs, as a validated catalog would hold them.
fn arb_catalog() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec(arb_product(), 0..12).prop_map(|mut products| {
        products.sort_by_key(|p| p.id);
        products.dedup_by_key(|p| p.id);
        products
    })
}

/// A cart built from random adds over a random catalog.
fn arb_cart() -> impl Strategy<Value = CartStore> {
    (arb_catalog(), prop::collection::vec(any::<prop::sample::Index>(), 0..30)).prop_map(
        |(catalog, picks)| {
            let mut cart = CartStore::new();
            if catalog.is_empty() {
                return cart;
            }
            for pick in picks {
                if let Some(product) = catalog.get(pick.index(catalog.len())) {
                    cart.add_to_cart(product);
                }
            }
            cart
        },
    )
}

// ============================================================================
// Cart properties
// ============================================================================

proptest! {
    /// Property: n adds of one product leave a single entry with quantity n
    #[test]
    fn prop_add_merges_by_id(product in arb_product(), n in 1u32..50) {
        let mut cart = CartStore::new();
        for _ in 0..n {
            cart.add_to_cart(&product);
        }
        prop_assert_eq!(cart.entries().len(), 1);
        prop_assert_eq!(cart.quantity_of(product.id), n);
    }

    /// Property: decrementing by the full quantity removes the entry
    #[test]
    fn prop_decrement_to_zero_removes(cart in arb_cart()) {
        for entry in cart.entries() {
            let mut cart = cart.clone();
            cart.update_quantity(entry.product.id, -i64::from(entry.quantity));
            prop_assert_eq!(cart.quantity_of(entry.product.id), 0);
            prop_assert!(cart.entries().iter().all(|e| e.product.id != entry.product.id));
        }
    }

    /// Property: quantities never reach zero while the entry is present
    #[test]
    fn prop_quantities_stay_positive(cart in arb_cart(), delta in -5i64..5) {
        let mut cart = cart;
        let ids: Vec<ProductId> = cart.entries().iter().map(|e| e.product.id).collect();
        for id in ids {
            cart.update_quantity(id, delta);
        }
        prop_assert!(cart.entries().iter().all(|e| e.quantity >= 1));
    }
}

// ============================================================================
// Pricing properties
// ============================================================================

proptest! {
    /// Property: subtotal is the sum of unit price times quantity
    #[test]
    fn prop_subtotal_is_sum_of_lines(cart in arb_cart()) {
        let expected: u64 = cart
            .entries()
            .iter()
            .map(|e| e.product.unit_price.amount() * u64::from(e.quantity))
            .sum();
        prop_assert_eq!(PricingPolicy::default().subtotal(&cart).amount(), expected);
    }

    /// Property: removing an entry lowers the subtotal by exactly its line total
    #[test]
    fn prop_remove_decreases_subtotal_by_line(cart in arb_cart()) {
        let policy = PricingPolicy::default();
        let before = policy.subtotal(&cart);
        for entry in cart.entries() {
            let mut smaller = cart.clone();
            smaller.remove_from_cart(entry.product.id);
            let after = policy.subtotal(&smaller);
            prop_assert!(after < before);
            prop_assert_eq!(before.checked_sub(after), Some(entry.line_total()));
        }
    }

    /// Property: grand total minus shipping gives back the subtotal
    #[test]
    fn prop_total_round_trip(cart in arb_cart(), threshold in 0u64..3_000, fee in 0u64..200) {
        let policy = PricingPolicy {
            free_shipping_threshold: Price::new(threshold),
            flat_shipping_fee: Price::new(fee),
        };
        let subtotal = policy.subtotal(&cart);
        let total = policy.grand_total(&cart);
        prop_assert_eq!(total.checked_sub(policy.shipping_fee(subtotal)), Some(subtotal));
    }
}

// ============================================================================
// Filter properties
// ============================================================================

proptest! {
    /// Property: category-then-search equals search-then-category
    #[test]
    fn prop_filter_predicates_commute(
        catalog in arb_catalog(),
        cat in 0..CATEGORIES.len(),
        word in 0..WORDS.len(),
    ) {
        let category = CATEGORIES.get(cat).copied();
        let query = WORDS.get(word).copied().unwrap_or_default().to_lowercase();

        let by_category = FilterState::new(category, "");
        let by_query = FilterState::new(None, &query);
        let both = FilterState::new(category, &query);

        let cat_first: Vec<&Product> = by_category
            .apply(&catalog)
            .into_iter()
            .filter(|p| by_query.matches(*p))
            .collect();
        let query_first: Vec<&Product> = by_query
            .apply(&catalog)
            .into_iter()
            .filter(|p| by_category.matches(*p))
            .collect();

        prop_assert_eq!(&cat_first, &query_first);
        prop_assert_eq!(cat_first, both.apply(&catalog));
    }

    /// Property: every visible product contains the query, case-insensitively
    #[test]
    fn prop_search_results_contain_query(catalog in arb_catalog(), word in 0..WORDS.len()) {
        let query = WORDS.get(word).copied().unwrap_or_default().to_uppercase();
        let needle = query.to_lowercase();
        for product in FilterState::new(None, &query).apply(&catalog) {
            prop_assert!(
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            );
        }
    }
}
