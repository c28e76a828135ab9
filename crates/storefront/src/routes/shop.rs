//! Shop route handlers, shared by the main shop and the merchandise page.
//!
//! The router is mounted once per [`ShopKind`]; handlers read the kind from a
//! request extension and keep a separate cart per kind in the session. Every
//! read first lets a completed order expire, so the order-complete screen
//! resets after the configured delay without any background timer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::{TimeDelta, Utc};
use serde::Deserialize;
use takshashil_core::{
    CartEvent, CartTotals, CheckoutError, FilterState, OrderSummary, Price, Product, ProductId,
    filter,
};
use tower_sessions::Session;
use tracing::instrument;

use super::{Layout, limited};
use crate::catalog::ShopKind;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::forms::{CheckoutForm, FieldErrors};
use crate::middleware::RateLimiterLayer;
use crate::models::{Notice, ShopSession, push_notice};
use crate::services::simulate_processing;
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// Product card in a grid.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    /// Rating with one decimal, e.g. `4.8`.
    pub rating: Option<String>,
    /// Units of this product already in the cart.
    pub in_cart: u32,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, in_cart: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.unit_price,
            image: product.image_ref.clone(),
            category: product.category.clone(),
            rating: product.rating.map(|r| format!("{r:.1}")),
            in_cart,
        }
    }
}

/// A line in the cart panel.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

/// Non-secret checkout fields echoed back after a failed submit.
#[derive(Debug, Clone, Default)]
pub struct CheckoutValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub pin_code: String,
    pub expiry: String,
}

impl From<&CheckoutForm> for CheckoutValues {
    fn from(form: &CheckoutForm) -> Self {
        Self {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            address: form.address.clone(),
            city: form.city.clone(),
            pin_code: form.pin_code.clone(),
            expiry: form.expiry.clone(),
        }
    }
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub layout: Layout,
    pub kind: ShopKind,
    pub filter: FilterState,
    /// Category value for hidden form fields (empty for all).
    pub category_param: String,
    /// Current filter as a query string, including the leading `?`.
    pub filter_query: String,
    pub categories: Vec<String>,
    pub products: Vec<ProductCard>,
    pub cart_lines: Vec<CartLineView>,
    pub totals: CartTotals,
    pub free_shipping_threshold: Price,
    pub cart_open: bool,
    pub checkout_open: bool,
    pub order: Option<OrderSummary>,
    /// Seconds until the order-complete screen resets.
    pub reset_seconds: i64,
    pub checkout: CheckoutValues,
    pub errors: FieldErrors,
}

// =============================================================================
// Forms
// =============================================================================

/// Filter carried by every shop form so redirects keep the view.
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub q: String,
}

/// Form naming one product.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub q: String,
}

/// Quantity change form.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub product_id: ProductId,
    pub delta: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub q: String,
}

// =============================================================================
// Helpers
// =============================================================================

fn filter_for(kind: ShopKind, category: Option<&str>, query: &str) -> FilterState {
    let query = if kind.has_search() { query } else { "" };
    FilterState::new(category, query)
}

/// Query string for a filter, empty when unrestricted.
fn filter_query(filter: &FilterState) -> String {
    let mut params = Vec::new();
    if let Some(category) = &filter.active_category {
        params.push(format!("category={}", urlencoding::encode(category)));
    }
    if !filter.search_query.is_empty() {
        params.push(format!("q={}", urlencoding::encode(&filter.search_query)));
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

fn back_to_shop(kind: ShopKind, filter: &FilterState) -> Redirect {
    Redirect::to(&format!("{}{}", kind.base_path(), filter_query(filter)))
}

fn order_reset(state: &AppState) -> TimeDelta {
    TimeDelta::from_std(state.config().order_reset).unwrap_or(TimeDelta::MAX)
}

/// Load a shop's session state, expiring a completed order that is due.
async fn load_shop(state: &AppState, session: &Session, kind: ShopKind) -> Result<ShopSession> {
    let mut shop = ShopSession::load(session, kind).await?;
    if shop
        .checkout
        .tick(&mut shop.cart, Utc::now(), order_reset(state))
    {
        tracing::debug!(shop = kind.session_prefix(), "Completed order reset");
        shop.save(session, kind).await?;
    }
    Ok(shop)
}

fn lookup(state: &AppState, kind: ShopKind, id: ProductId) -> Result<Product> {
    state
        .datasets()
        .catalog(kind)
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

async fn render_page(
    state: &AppState,
    session: &Session,
    kind: ShopKind,
    shop: &ShopSession,
    filter: FilterState,
    checkout: CheckoutValues,
    errors: FieldErrors,
) -> Result<ShopTemplate> {
    let catalog = state.datasets().catalog(kind);
    let policy = &state.config().pricing;

    let products = filter
        .apply(catalog.products())
        .into_iter()
        .map(|p| ProductCard::new(p, shop.cart.quantity_of(p.id)))
        .collect();

    let cart_lines = shop
        .cart
        .entries()
        .iter()
        .map(|entry| CartLineView {
            id: entry.product.id,
            name: entry.product.name.clone(),
            image: entry.product.image_ref.clone(),
            unit_price: entry.product.unit_price,
            quantity: entry.quantity,
            line_total: entry.line_total(),
        })
        .collect();

    let reset_after = order_reset(state);
    let reset_seconds = shop
        .checkout
        .reset_deadline(reset_after)
        .map_or(0, |deadline| (deadline - Utc::now()).num_seconds().max(1));

    Ok(ShopTemplate {
        layout: Layout::load(state, session, kind.title(), kind.into()).await?,
        kind,
        category_param: filter.active_category.clone().unwrap_or_default(),
        filter_query: filter_query(&filter),
        categories: filter::categories(catalog.products())
            .into_iter()
            .map(str::to_string)
            .collect(),
        products,
        cart_lines,
        totals: policy.totals(&shop.cart),
        free_shipping_threshold: policy.free_shipping_threshold,
        cart_open: shop.checkout.is_cart_open(),
        checkout_open: shop.checkout.is_checkout_open(),
        order: shop.checkout.order().cloned(),
        reset_seconds,
        filter,
        checkout,
        errors,
    })
}

fn cart_notice(event: &CartEvent) -> Option<Notice> {
    match event {
        CartEvent::Added { name, .. } => {
            Some(Notice::success(format!("{name} has been added to your cart.")))
        }
        CartEvent::Removed { name } => {
            Some(Notice::info(format!("{name} has been removed from your cart.")))
        }
        CartEvent::QuantityChanged { .. } | CartEvent::Cleared => None,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product grid with the cart panel or checkout overlay.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Query(query): Query<FilterState>,
) -> Result<impl IntoResponse> {
    let shop = load_shop(&state, &session, kind).await?;
    let filter = filter_for(kind, query.active_category.as_deref(), &query.search_query);
    render_page(
        &state,
        &session,
        kind,
        &shop,
        filter,
        CheckoutValues::default(),
        FieldErrors::new(),
    )
    .await
}

/// Show the cart panel.
#[instrument(skip(state, session))]
pub async fn open_cart(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Form(form): Form<FilterForm>,
) -> Result<Redirect> {
    let mut shop = load_shop(&state, &session, kind).await?;
    shop.checkout.open_cart()?;
    shop.save(&session, kind).await?;
    Ok(back_to_shop(kind, &filter_for(kind, form.category.as_deref(), &form.q)))
}

/// Hide the cart panel.
#[instrument(skip(state, session))]
pub async fn close_cart(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Form(form): Form<FilterForm>,
) -> Result<Redirect> {
    let mut shop = load_shop(&state, &session, kind).await?;
    shop.checkout.close_cart()?;
    shop.save(&session, kind).await?;
    Ok(back_to_shop(kind, &filter_for(kind, form.category.as_deref(), &form.q)))
}

/// Add one unit of a product.
#[instrument(skip(state, session))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Form(form): Form<CartItemForm>,
) -> Result<Redirect> {
    let product = lookup(&state, kind, form.product_id)?;
    let mut shop = load_shop(&state, &session, kind).await?;
    shop.checkout.settle_for_cart_change(&mut shop.cart);

    if let Some(event) = shop.cart.add_to_cart(&product) {
        let id = product.id.to_string();
        add_breadcrumb("cart", "Added to cart", &[("product_id", id.as_str())]);
        if let Some(notice) = cart_notice(&event) {
            push_notice(&session, notice).await?;
        }
    }
    shop.save(&session, kind).await?;
    Ok(back_to_shop(kind, &filter_for(kind, form.category.as_deref(), &form.q)))
}

/// Change a line's quantity by `delta`. Reaching zero removes the line.
#[instrument(skip(state, session))]
pub async fn update_quantity(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Form(form): Form<UpdateQuantityForm>,
) -> Result<Redirect> {
    let mut shop = load_shop(&state, &session, kind).await?;
    shop.checkout.settle_for_cart_change(&mut shop.cart);

    if let Some(event) = shop.cart.update_quantity(form.product_id, form.delta)
        && let Some(notice) = cart_notice(&event)
    {
        push_notice(&session, notice).await?;
    }
    shop.save(&session, kind).await?;
    Ok(back_to_shop(kind, &filter_for(kind, form.category.as_deref(), &form.q)))
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Form(form): Form<CartItemForm>,
) -> Result<Redirect> {
    let mut shop = load_shop(&state, &session, kind).await?;
    shop.checkout.settle_for_cart_change(&mut shop.cart);

    if let Some(event) = shop.cart.remove_from_cart(form.product_id)
        && let Some(notice) = cart_notice(&event)
    {
        push_notice(&session, notice).await?;
    }
    shop.save(&session, kind).await?;
    Ok(back_to_shop(kind, &filter_for(kind, form.category.as_deref(), &form.q)))
}

/// Move from the cart panel to the checkout form.
///
/// # Errors
///
/// Returns 409 if the cart is empty or not open.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Form(form): Form<FilterForm>,
) -> Result<Redirect> {
    let mut shop = load_shop(&state, &session, kind).await?;
    shop.checkout.proceed_to_checkout(&shop.cart)?;
    shop.save(&session, kind).await?;
    Ok(back_to_shop(kind, &filter_for(kind, form.category.as_deref(), &form.q)))
}

/// Abandon the checkout form.
#[instrument(skip(state, session))]
pub async fn cancel_checkout(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Form(form): Form<FilterForm>,
) -> Result<Redirect> {
    let mut shop = load_shop(&state, &session, kind).await?;
    shop.checkout.cancel_checkout()?;
    shop.save(&session, kind).await?;
    Ok(back_to_shop(kind, &filter_for(kind, form.category.as_deref(), &form.q)))
}

/// Place the order.
///
/// Invalid details re-render the shop with the checkout form open (422).
/// The session is only read after the simulated payment delay, so cart
/// changes made meanwhile from another tab end up in the order.
#[instrument(skip(state, session, form))]
pub async fn complete_checkout(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let filter = filter_for(kind, form.category.as_deref(), &form.q);

    let details = match form.validate() {
        Ok(details) => details,
        Err(errors) => {
            let shop = load_shop(&state, &session, kind).await?;
            ensure_checkout_open(&shop)?;
            let values = CheckoutValues::from(&form);
            let page = render_page(&state, &session, kind, &shop, filter, values, errors).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    simulate_processing(state.config().simulated_latency).await;

    let mut shop = load_shop(&state, &session, kind).await?;
    ensure_checkout_open(&shop)?;
    let summary =
        shop.checkout
            .submit(&shop.cart, details, &state.config().pricing, Utc::now())?;
    shop.save(&session, kind).await?;

    tracing::info!(
        shop = kind.session_prefix(),
        items = summary.totals.item_count,
        total = summary.totals.total.amount(),
        city = %summary.city,
        "Order placed"
    );
    add_breadcrumb("checkout", "Order placed", &[]);

    Ok(back_to_shop(kind, &filter).into_response())
}

fn ensure_checkout_open(shop: &ShopSession) -> Result<()> {
    if shop.checkout.is_checkout_open() {
        return Ok(());
    }
    Err(CheckoutError::InvalidTransition {
        from: shop.checkout.name(),
        action: "place an order",
    }
    .into())
}

/// Leave the order-complete screen before it resets on its own.
#[instrument(skip(state, session))]
pub async fn dismiss_order(
    State(state): State<AppState>,
    Extension(kind): Extension<ShopKind>,
    session: Session,
    Form(form): Form<FilterForm>,
) -> Result<Redirect> {
    let mut shop = load_shop(&state, &session, kind).await?;
    // An order that already expired on load has nothing left to dismiss.
    if shop.checkout.order().is_some() {
        shop.checkout.dismiss(&mut shop.cart)?;
        shop.save(&session, kind).await?;
    }
    Ok(back_to_shop(kind, &filter_for(kind, form.category.as_deref(), &form.q)))
}

// =============================================================================
// Router
// =============================================================================

/// Create the router of one shop.
pub fn routes(kind: ShopKind, limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    let actions = Router::new()
        .route("/cart/open", post(open_cart))
        .route("/cart/close", post(close_cart))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/update", post(update_quantity))
        .route("/cart/remove", post(remove_from_cart))
        .route("/checkout", post(checkout))
        .route("/checkout/cancel", post(cancel_checkout))
        .route("/checkout/complete", post(complete_checkout))
        .route("/checkout/dismiss", post(dismiss_order));

    Router::new()
        .route("/", get(index))
        .merge(limited(actions, limiter))
        .layer(Extension(kind))
}
