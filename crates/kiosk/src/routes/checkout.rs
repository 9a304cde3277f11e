//! Checkout handlers.
//!
//! The checkout gate is re-evaluated on the submitted fields; a valid
//! order becomes a WhatsApp handoff URL and the cart is cleared
//! unconditionally right after the message is built - there is no backend
//! to await a confirmation from.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use vitrine_core::cart::{delivery_fee, validate_checkout};
use vitrine_core::order::{DeliverySelection, OrderMessage, PaymentChoice, handoff_url};
use vitrine_core::types::{CoverageAreaId, Money};

use super::cart::CartView;
use crate::state::AppState;

/// Coverage area option for the checkout form.
#[derive(Debug, Clone)]
pub struct AreaOption {
    pub id: String,
    pub name: String,
    pub fee: String,
    pub eta_minutes: u32,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub areas: Vec<AreaOption>,
    pub has_pix: bool,
    pub error_message: Option<String>,
}

/// Build the checkout router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(show))
        .route("/checkout", post(submit))
}

/// Query parameters for the checkout page.
#[derive(Debug, Deserialize)]
pub struct CheckoutParams {
    pub error: Option<String>,
}

/// Display the checkout form.
#[instrument(skip(state))]
async fn show(State(state): State<AppState>, Query(params): Query<CheckoutParams>) -> Response {
    let Ok(document) = state.current_document().await else {
        return Redirect::to("/").into_response();
    };

    let areas = document
        .coverage_areas
        .iter()
        .map(|a| AreaOption {
            id: a.id.to_string(),
            name: a.name.clone(),
            fee: a.fee.to_string(),
            eta_minutes: a.eta_minutes,
        })
        .collect();

    let cart = state.cart().read().await;

    CheckoutTemplate {
        cart: CartView::project(&cart, None),
        areas,
        has_pix: !document.payment.pix_key.trim().is_empty(),
        error_message: params.error,
    }
    .into_response()
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    /// Checkbox: present means delivery.
    pub is_delivery: Option<String>,
    pub address: Option<String>,
    pub area_id: Option<String>,
    /// `pix`, `cash`, or anything else for "to arrange".
    pub payment_method: String,
    /// Cash only: the bill the customer will pay with.
    pub change_for: Option<String>,
}

/// Validate the order and hand off to the messaging channel.
#[instrument(skip(state, form))]
async fn submit(State(state): State<AppState>, Form(form): Form<CheckoutForm>) -> Redirect {
    let Ok(document) = state.current_document().await else {
        return error_redirect("Loja indisponível no momento.");
    };

    if !document.operations.status.is_open() {
        return error_redirect("A loja está fechada no momento.");
    }

    let contact_number = document.operations.contact_number.trim().to_string();
    if contact_number.is_empty() {
        return error_redirect("A loja não configurou um número de WhatsApp.");
    }

    let is_delivery = form.is_delivery.is_some();
    let address = form.address.unwrap_or_default();
    let area_id = form
        .area_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(CoverageAreaId::new);

    let valid = {
        let cart = state.cart().read().await;
        validate_checkout(
            &cart,
            &form.customer_name,
            is_delivery,
            &address,
            area_id.as_ref(),
            &document.coverage_areas,
        )
    };
    if !valid {
        return error_redirect("Verifique o nome, o endereço e a área de entrega.");
    }

    // The gate already proved the area resolves when delivering
    let delivery = if is_delivery {
        let (_, notice) = delivery_fee(&document.coverage_areas, area_id.as_ref(), true);
        if notice.is_some() {
            return error_redirect("Selecione uma área de entrega.");
        }
        document
            .coverage_areas
            .iter()
            .find(|a| Some(&a.id) == area_id.as_ref())
            .map(|area| DeliverySelection {
                address: address.trim().to_string(),
                area: area.clone(),
            })
    } else {
        None
    };

    let payment = match form.payment_method.as_str() {
        "pix" => PaymentChoice::Pix,
        "cash" => PaymentChoice::Cash {
            change_for: form
                .change_for
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .and_then(|v| v.replace(',', ".").parse().ok())
                .map(Money::new),
        },
        _ => PaymentChoice::Other,
    };

    let handoff = {
        let cart = state.cart().read().await;
        let message = OrderMessage::build(&cart, &document, &form.customer_name, delivery, payment);
        handoff_url(&contact_number, &message.render())
    };

    let Ok(url) = handoff else {
        return error_redirect("Não foi possível montar o link do pedido.");
    };

    // Clear unconditionally: no confirmation round-trip exists
    state.cart().write().await.clear();
    state.persist_cart().await;

    tracing::info!("order handed off, cart cleared");
    Redirect::to(url.as_str())
}

fn error_redirect(message: &str) -> Redirect {
    Redirect::to(&format!("/checkout?error={}", urlencoding::encode(message)))
}
