//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use super::shop::ProductCard;
use super::{Layout, NavItem};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

// =============================================================================
// Static Content
// =============================================================================

/// An impact figure shown on the home page.
#[derive(Clone)]
pub struct Stat {
    pub value: u32,
    pub label: &'static str,
}

/// A pillar of the foundation's work.
#[derive(Clone)]
pub struct Feature {
    pub name: &'static str,
    pub description: &'static str,
    pub link: &'static str,
}

const STATS: [Stat; 4] = [
    Stat {
        value: 5000,
        label: "Books Available",
    },
    Stat {
        value: 1000,
        label: "Students Supported",
    },
    Stat {
        value: 50,
        label: "Volunteers",
    },
    Stat {
        value: 100,
        label: "Success Stories",
    },
];

const FEATURES: [Feature; 4] = [
    Feature {
        name: "Free Library Access",
        description: "Access to over 5,000 books including educational materials, novels, and \
                      specialized texts covering various subjects and interests.",
        link: "/library",
    },
    Feature {
        name: "Education Programs",
        description: "Comprehensive study centers equipped with learning resources for \
                      competitive exams like JEE, NEET, Law, and more.",
        link: "/education",
    },
    Feature {
        name: "Community Support",
        description: "Dedicated to supporting marginalized communities including SC, ST, and \
                      Dalit populations with educational resources.",
        link: "/volunteer",
    },
    Feature {
        name: "Ambedkarite Values",
        description: "Founded on the principles of Dr. B.R. Ambedkar, promoting education as \
                      the path to social equality and justice.",
        link: "/about",
    },
];

const QUOTE: &str = "Education is the most powerful weapon which you can use to change the world.";
const QUOTE_AUTHOR: &str = "Dr. B.R. Ambedkar";

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub stats: Vec<Stat>,
    pub features: Vec<Feature>,
    pub quote: &'static str,
    pub quote_author: &'static str,
    /// Featured shop products.
    pub featured: Vec<ProductCard>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let featured = state
        .datasets()
        .shop
        .products()
        .iter()
        .filter(|p| p.is_featured())
        .map(|p| ProductCard::new(p, 0))
        .collect();

    Ok(HomeTemplate {
        layout: Layout::load(&state, &session, "Home", NavItem::Home).await?,
        stats: STATS.to_vec(),
        features: FEATURES.to_vec(),
        quote: QUOTE,
        quote_author: QUOTE_AUTHOR,
        featured,
    })
}
