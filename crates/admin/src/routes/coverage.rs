//! Delivery coverage routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use vitrine_core::types::CoverageAreaId;

use super::{NoticeParams, persist_and_redirect, redirect_error};
use crate::routes::catalog::ConfirmForm;
use crate::state::AppState;

/// Coverage area row for the management table.
#[derive(Debug, Clone)]
pub struct AreaRow {
    pub id: String,
    pub name: String,
    pub fee: String,
    pub eta_minutes: u32,
}

/// Coverage management page template.
#[derive(Template, WebTemplate)]
#[template(path = "coverage/index.html")]
pub struct CoverageTemplate {
    pub areas: Vec<AreaRow>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// Build the coverage router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/coverage", get(coverage_page))
        .route("/coverage", post(add_area))
        .route("/coverage/{id}/delete", post(delete_area))
}

/// Display the coverage management page.
#[instrument(skip(state))]
async fn coverage_page(
    State(state): State<AppState>,
    Query(params): Query<NoticeParams>,
) -> CoverageTemplate {
    let document = state.document().read().await;

    let areas = document
        .coverage_areas
        .iter()
        .map(|a| AreaRow {
            id: a.id.to_string(),
            name: a.name.clone(),
            fee: a.fee.to_string(),
            eta_minutes: a.eta_minutes,
        })
        .collect();

    CoverageTemplate {
        areas,
        success_message: params.success,
        error_message: params.error,
    }
}

/// Add-area form data.
#[derive(Debug, Deserialize)]
pub struct AreaForm {
    pub name: String,
    pub fee: String,
    pub eta_minutes: String,
}

/// Add a coverage area.
#[instrument(skip(state, form))]
async fn add_area(State(state): State<AppState>, Form(form): Form<AreaForm>) -> Redirect {
    let Ok(fee) = form.fee.trim().replace(',', ".").parse() else {
        return redirect_error("/coverage", "Taxa de entrega inválida.");
    };
    let Ok(eta_minutes) = form.eta_minutes.trim().parse::<u32>() else {
        return redirect_error("/coverage", "Tempo de entrega inválido.");
    };

    {
        let mut document = state.document().write().await;
        if let Err(e) = document.add_coverage_area(&form.name, fee, eta_minutes) {
            drop(document);
            tracing::debug!("refused coverage area: {e}");
            return redirect_error("/coverage", "Dados da área de entrega inválidos.");
        }
    }
    persist_and_redirect(&state, "/coverage", "Área de entrega adicionada.").await
}

/// Delete a coverage area.
#[instrument(skip(state, form))]
async fn delete_area(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Redirect {
    if !form.confirmed() {
        return redirect_error("/coverage", "Confirme a exclusão da área.");
    }
    {
        let mut document = state.document().write().await;
        if !document.remove_coverage_area(&CoverageAreaId::new(id)) {
            drop(document);
            return redirect_error("/coverage", "Área não encontrada.");
        }
    }
    persist_and_redirect(&state, "/coverage", "Área de entrega excluída.").await
}
