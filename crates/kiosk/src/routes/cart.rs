//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in application state (one kiosk device, one
//! cart) and is persisted to the local store after every mutation, so a
//! kiosk restart does not lose an in-progress order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use vitrine_core::cart::{Cart, CartNotice};
use vitrine_core::types::ProductId;

use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
    pub notice: Option<String>,
}

impl CartView {
    /// Project the cart into display data, with an optional notice.
    #[must_use]
    pub fn project(cart: &Cart, notice: Option<CartNotice>) -> Self {
        Self {
            items: cart
                .entries()
                .iter()
                .map(|entry| CartItemView {
                    product_id: entry.product.id.to_string(),
                    name: entry.product.name.clone(),
                    quantity: entry.quantity,
                    price: entry.product.price.to_string(),
                    line_price: entry.line_total().to_string(),
                })
                .collect(),
            subtotal: cart.total().to_string(),
            item_count: cart.item_count(),
            notice: notice.map(|n| n.to_string()),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
    pub notice: Option<String>,
}

/// Build the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(show))
        .route("/cart/add", post(add))
        .route("/cart/update", post(update))
        .route("/cart/remove", post(remove))
        .route("/cart/count", get(count))
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    /// +1 or -1 from the quantity stepper.
    pub delta: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Display the cart page.
#[instrument(skip(state))]
async fn show(State(state): State<AppState>) -> CartShowTemplate {
    let cart = state.cart().read().await;
    CartShowTemplate {
        cart: CartView::project(&cart, None),
    }
}

/// Add one unit of a product (HTMX).
///
/// Stock and the closed gate are checked against the current document.
/// Returns the cart count badge with an HTMX trigger to update other
/// fragments.
#[instrument(skip(state))]
async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Response {
    let Ok(document) = state.current_document().await else {
        let cart = state.cart().read().await;
        return CartCountTemplate {
            count: cart.item_count(),
            notice: Some("Loja indisponível no momento.".to_string()),
        }
        .into_response();
    };

    let product_id = ProductId::new(form.product_id);
    let Some(product) = document.find_product(&product_id).cloned() else {
        let cart = state.cart().read().await;
        return CartCountTemplate {
            count: cart.item_count(),
            notice: Some("Produto não encontrado.".to_string()),
        }
        .into_response();
    };

    let (count, notice) = {
        let mut cart = state.cart().write().await;
        let notice = cart
            .add_item(&product, product.stock, document.operations.status)
            .err();
        (cart.item_count(), notice)
    };
    state.persist_cart().await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count,
            notice: notice.map(|n| n.to_string()),
        },
    )
        .into_response()
}

/// Adjust an entry's quantity by ±1 (HTMX).
#[instrument(skip(state))]
async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    let product_id = ProductId::new(form.product_id);
    let available = available_stock(&state, &product_id).await;

    let view = {
        let mut cart = state.cart().write().await;
        let notice = cart.change_quantity(&product_id, form.delta, available);
        CartView::project(&cart, notice)
    };
    state.persist_cart().await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart: view },
    )
        .into_response()
}

/// Remove an entry unconditionally (HTMX).
#[instrument(skip(state))]
async fn remove(State(state): State<AppState>, Form(form): Form<RemoveFromCartForm>) -> Response {
    let product_id = ProductId::new(form.product_id);

    let view = {
        let mut cart = state.cart().write().await;
        cart.remove_item(&product_id);
        CartView::project(&cart, None)
    };
    state.persist_cart().await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart: view },
    )
        .into_response()
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state))]
async fn count(State(state): State<AppState>) -> CartCountTemplate {
    let cart = state.cart().read().await;
    CartCountTemplate {
        count: cart.item_count(),
        notice: None,
    }
}

/// Current stock for a product, falling back to the cart's snapshot when
/// the catalog is unreachable or the product was removed from it.
async fn available_stock(state: &AppState, product_id: &ProductId) -> u32 {
    if let Ok(document) = state.current_document().await
        && let Some(product) = document.find_product(product_id)
    {
        return product.stock;
    }

    let cart = state.cart().read().await;
    snapshot_stock(&cart, product_id)
}

fn snapshot_stock(cart: &Cart, product_id: &ProductId) -> u32 {
    cart.entries()
        .iter()
        .find(|e| &e.product.id == product_id)
        .map_or(0, |e| e.product.stock)
}
