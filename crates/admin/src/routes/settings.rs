//! Store settings routes.
//!
//! One dashboard page with a form per document group. Each form posts only
//! its own fields; absent fields leave the prior values untouched, except
//! for the store status, which falls back to `closed` whenever it cannot
//! be read - a deliberately fail-safe bias.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use vitrine_core::StoreStatus;
use vitrine_core::config::StoreConfig;

use super::{NoticeParams, persist_and_redirect, redirect_error};
use crate::state::AppState;

/// Settings dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub document: StoreConfig,
    pub status_open: bool,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings_page))
        .route("/settings/publication", post(update_publication))
        .route("/settings/operations", post(update_operations))
        .route("/settings/appearance", post(update_appearance))
        .route("/settings/payment", post(update_payment))
}

/// Display the settings dashboard.
#[instrument(skip(state))]
async fn settings_page(
    State(state): State<AppState>,
    Query(params): Query<NoticeParams>,
) -> SettingsTemplate {
    let document = state.document().read().await.clone();
    let status_open = document.operations.status.is_open();

    SettingsTemplate {
        document,
        status_open,
        success_message: params.success,
        error_message: params.error,
    }
}

/// Publication form fields.
#[derive(Debug, Deserialize)]
pub struct PublicationForm {
    pub remote_doc_id: Option<String>,
    pub write_secret: Option<String>,
}

/// Collect the publication fields.
#[instrument(skip(state, form))]
async fn update_publication(
    State(state): State<AppState>,
    Form(form): Form<PublicationForm>,
) -> Redirect {
    {
        let mut document = state.document().write().await;
        if let Some(value) = form.remote_doc_id {
            document.publication.remote_doc_id = value.trim().to_string();
        }
        if let Some(value) = form.write_secret {
            document.publication.write_secret = value.trim().to_string();
        }
    }
    persist_and_redirect(&state, "/", "Dados de publicação salvos.").await
}

/// Operations form fields.
#[derive(Debug, Deserialize)]
pub struct OperationsForm {
    pub status: Option<String>,
    pub contact_number: Option<String>,
    pub store_name: Option<String>,
    pub address: Option<String>,
    pub low_stock_threshold: Option<String>,
}

/// Collect the operations fields.
#[instrument(skip(state, form))]
async fn update_operations(
    State(state): State<AppState>,
    Form(form): Form<OperationsForm>,
) -> Redirect {
    {
        let mut document = state.document().write().await;

        // An unreadable status must never open the store
        document.operations.status = form
            .status
            .and_then(|s| s.parse::<StoreStatus>().ok())
            .unwrap_or(StoreStatus::Closed);

        if let Some(value) = form.contact_number {
            document.operations.contact_number = value.trim().to_string();
        }
        if let Some(value) = form.store_name {
            document.operations.store_name = value.trim().to_string();
        }
        if let Some(value) = form.address {
            document.operations.address = value.trim().to_string();
        }
        if let Some(value) = form.low_stock_threshold {
            match value.trim().parse::<u32>() {
                Ok(threshold) => document.operations.low_stock_threshold = threshold,
                Err(_) => {
                    drop(document);
                    return redirect_error("/", "Limite de estoque baixo inválido.");
                }
            }
        }
    }
    persist_and_redirect(&state, "/", "Dados da loja salvos.").await
}

/// Appearance form fields.
#[derive(Debug, Deserialize)]
pub struct AppearanceForm {
    pub primary_color: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub background_image_url: Option<String>,
    pub logo_url: Option<String>,
    pub music_url: Option<String>,
    pub music_volume: Option<String>,
}

/// Collect the appearance fields.
#[instrument(skip(state, form))]
async fn update_appearance(
    State(state): State<AppState>,
    Form(form): Form<AppearanceForm>,
) -> Redirect {
    {
        let mut document = state.document().write().await;
        let appearance = &mut document.appearance;

        if let Some(value) = form.primary_color {
            appearance.primary_color = value.trim().to_string();
        }
        if let Some(value) = form.text_color {
            appearance.text_color = value.trim().to_string();
        }
        if let Some(value) = form.background_color {
            appearance.background_color = value.trim().to_string();
        }
        if let Some(value) = form.background_image_url {
            appearance.background_image_url = value.trim().to_string();
        }
        if let Some(value) = form.logo_url {
            appearance.logo_url = value.trim().to_string();
        }
        if let Some(value) = form.music_url {
            appearance.music_url = value.trim().to_string();
        }
        if let Some(value) = form.music_volume {
            match value.trim().parse::<u8>() {
                Ok(volume) => appearance.music_volume = volume.min(100),
                Err(_) => {
                    drop(document);
                    return redirect_error("/", "Volume da música inválido (0 a 100).");
                }
            }
        }
    }
    persist_and_redirect(&state, "/", "Aparência salva.").await
}

/// Payment form fields.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub pix_key: Option<String>,
    pub bank_details: Option<String>,
    pub lightning_address: Option<String>,
}

/// Collect the payment fields.
#[instrument(skip(state, form))]
async fn update_payment(
    State(state): State<AppState>,
    Form(form): Form<PaymentForm>,
) -> Redirect {
    {
        let mut document = state.document().write().await;
        if let Some(value) = form.pix_key {
            document.payment.pix_key = value.trim().to_string();
        }
        if let Some(value) = form.bank_details {
            document.payment.bank_details = value.trim().to_string();
        }
        if let Some(value) = form.lightning_address {
            document.payment.lightning_address = value.trim().to_string();
        }
    }
    persist_and_redirect(&state, "/", "Dados de pagamento salvos.").await
}
