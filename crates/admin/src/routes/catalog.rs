//! Catalog management routes: categories and products.
//!
//! Deleting a category cascades by orphaning its products, never deleting
//! them. Destructive actions require the confirmation checkbox; a request
//! without it is refused with a notice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::Redirect,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use vitrine_core::catalog::is_low_stock;
use vitrine_core::config::{Product, StoreConfig};
use vitrine_core::types::{CategoryId, Money, ProductId};

use super::{persist_and_redirect, redirect_error};
use crate::state::AppState;

/// Category row for the management list.
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
}

/// Product row for the management table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: u32,
    pub low_stock: bool,
}

/// Category option for the product form select.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// The product form, either blank or prefilled for editing.
#[derive(Debug, Clone, Default)]
pub struct ProductFormView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub stock: String,
    pub image_url: String,
}

/// Catalog management page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub categories: Vec<CategoryRow>,
    pub products: Vec<ProductRow>,
    pub category_options: Vec<CategoryOption>,
    pub form: ProductFormView,
    pub editing: bool,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog_page))
        .route("/catalog/categories", post(add_category))
        .route("/catalog/categories/{id}/delete", post(delete_category))
        .route("/catalog/products", post(save_product))
        .route("/catalog/products/{id}/delete", post(delete_product))
}

/// Query parameters for the catalog page.
#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    pub success: Option<String>,
    pub error: Option<String>,
    /// Product id to prefill the form with.
    pub edit: Option<String>,
}

/// Display the catalog management page.
#[instrument(skip(state))]
async fn catalog_page(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> CatalogTemplate {
    let document = state.document().read().await.clone();

    let categories = document
        .categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.to_string(),
            name: c.name.clone(),
        })
        .collect();

    let threshold = document.operations.low_stock_threshold;
    let products = document
        .products
        .iter()
        .map(|p| ProductRow {
            id: p.id.to_string(),
            name: p.name.clone(),
            category: document
                .category_name(p.category_id.as_ref())
                .unwrap_or("Sem categoria")
                .to_string(),
            price: p.price.to_string(),
            stock: p.stock,
            low_stock: is_low_stock(p, threshold),
        })
        .collect();

    let editing_product = params
        .edit
        .as_deref()
        .and_then(|id| document.find_product(&ProductId::new(id)).cloned());
    let editing = editing_product.is_some();

    let category_options = category_options(&document, editing_product.as_ref());
    let form = editing_product.map_or_else(ProductFormView::default, |p| ProductFormView {
        id: p.id.to_string(),
        name: p.name,
        price: p.price.amount().to_string(),
        stock: p.stock.to_string(),
        image_url: p.image_url,
    });

    CatalogTemplate {
        categories,
        products,
        category_options,
        form,
        editing,
        success_message: params.success,
        error_message: params.error,
    }
}

fn category_options(document: &StoreConfig, editing: Option<&Product>) -> Vec<CategoryOption> {
    let selected_id = editing.and_then(|p| p.category_id.clone());
    document
        .categories
        .iter()
        .map(|c| CategoryOption {
            id: c.id.to_string(),
            name: c.name.clone(),
            selected: selected_id.as_ref() == Some(&c.id),
        })
        .collect()
}

/// Add-category form data.
#[derive(Debug, Deserialize)]
pub struct AddCategoryForm {
    pub name: String,
}

/// Confirmation form data for destructive actions.
#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    pub confirm: Option<String>,
}

impl ConfirmForm {
    pub(crate) fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("on")
    }
}

/// Add a category.
#[instrument(skip(state, form))]
async fn add_category(
    State(state): State<AppState>,
    Form(form): Form<AddCategoryForm>,
) -> Redirect {
    {
        let mut document = state.document().write().await;
        if let Err(e) = document.add_category(&form.name) {
            drop(document);
            tracing::debug!("refused category: {e}");
            return redirect_error("/catalog", "Nome da categoria é obrigatório.");
        }
    }
    persist_and_redirect(&state, "/catalog", "Categoria adicionada.").await
}

/// Delete a category, orphaning its products.
#[instrument(skip(state, form))]
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Redirect {
    if !form.confirmed() {
        return redirect_error("/catalog", "Confirme a exclusão da categoria.");
    }
    {
        let mut document = state.document().write().await;
        if !document.remove_category(&CategoryId::new(id)) {
            drop(document);
            return redirect_error("/catalog", "Categoria não encontrada.");
        }
    }
    persist_and_redirect(
        &state,
        "/catalog",
        "Categoria excluída. Produtos movidos para Sem Categoria.",
    )
    .await
}

/// Product form data; an empty id means a new product.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub id: Option<String>,
    pub name: String,
    pub price: String,
    pub stock: String,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
}

/// Create or update a product.
#[instrument(skip(state, form))]
async fn save_product(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Redirect {
    let Ok(price) = parse_brl_decimal(&form.price) else {
        return redirect_error("/catalog", "Preço inválido.");
    };
    let Ok(stock) = form.stock.trim().parse::<u32>() else {
        return redirect_error("/catalog", "Estoque inválido.");
    };

    let id = match form.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => ProductId::new(id),
        _ => ProductId::generate(),
    };
    let category_id = form
        .category_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(CategoryId::new);

    let product = Product {
        id,
        name: form.name.trim().to_string(),
        price: Money::new(price),
        stock,
        category_id,
        image_url: form.image_url.unwrap_or_default().trim().to_string(),
    };

    {
        let mut document = state.document().write().await;
        if let Err(e) = document.save_product(product) {
            drop(document);
            tracing::debug!("refused product: {e}");
            return redirect_error("/catalog", "Dados do produto inválidos.");
        }
    }
    persist_and_redirect(&state, "/catalog", "Produto salvo.").await
}

/// Delete a product.
#[instrument(skip(state, form))]
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Redirect {
    if !form.confirmed() {
        return redirect_error("/catalog", "Confirme a exclusão do produto.");
    }
    {
        let mut document = state.document().write().await;
        if !document.remove_product(&ProductId::new(id)) {
            drop(document);
            return redirect_error("/catalog", "Produto não encontrado.");
        }
    }
    persist_and_redirect(&state, "/catalog", "Produto excluído.").await
}

/// Parse a decimal accepting both `18.50` and the BR-locale `18,50`.
fn parse_brl_decimal(input: &str) -> Result<Decimal, rust_decimal::Error> {
    input.trim().replace(',', ".").parse::<Decimal>()
}
