//! Menu page handlers.
//!
//! The menu is a pure projection of the fetched store document: category
//! sections in insertion order, empty categories skipped, theme variables
//! applied as CSS custom properties. A closed store renders the closed
//! notice with every purchase affordance disabled.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tracing::instrument;

use vitrine_core::catalog::{MenuProjection, Theme, is_available, is_low_stock, project_menu};
use vitrine_core::config::StoreConfig;

use crate::state::AppState;

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub stock: u32,
    pub available: bool,
    pub low_stock: bool,
    pub image_url: String,
}

/// Category section display data for templates.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub id: String,
    pub name: String,
    pub products: Vec<ProductCardView>,
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/index.html")]
pub struct MenuTemplate {
    pub store_name: String,
    pub theme_css: String,
    pub logo_url: String,
    pub background_image_url: String,
    pub sections: Vec<SectionView>,
    pub cart_count: u32,
}

/// Closed store template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/closed.html")]
pub struct ClosedTemplate {
    pub store_name: String,
    pub theme_css: String,
    pub logo_url: String,
}

/// Store-unavailable template (fetch failed with a cold cache).
#[derive(Template, WebTemplate)]
#[template(path = "menu/unavailable.html")]
pub struct UnavailableTemplate;

/// Build the menu router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(menu_page))
        .route("/refresh", post(refresh))
}

/// Display the menu page.
#[instrument(skip(state))]
async fn menu_page(State(state): State<AppState>) -> Response {
    let Ok(document) = state.current_document().await else {
        return UnavailableTemplate.into_response();
    };

    let theme = Theme::from_appearance(&document.appearance);

    match project_menu(&document) {
        MenuProjection::Closed => ClosedTemplate {
            store_name: document.operations.store_name.clone(),
            theme_css: theme.css_variables(),
            logo_url: theme.logo_url,
        }
        .into_response(),
        MenuProjection::Open(sections) => {
            let threshold = document.operations.low_stock_threshold;
            let sections = sections
                .into_iter()
                .map(|section| SectionView {
                    id: section.category.id.to_string(),
                    name: section.category.name,
                    products: section
                        .products
                        .iter()
                        .map(|p| ProductCardView {
                            id: p.id.to_string(),
                            name: p.name.clone(),
                            price: p.price.to_string(),
                            stock: p.stock,
                            available: is_available(p),
                            low_stock: is_low_stock(p, threshold),
                            image_url: p.image_url.clone(),
                        })
                        .collect(),
                })
                .collect();

            let cart_count = state.cart().read().await.item_count();

            MenuTemplate {
                store_name: display_name(&document),
                theme_css: theme.css_variables(),
                logo_url: theme.logo_url,
                background_image_url: theme.background_image_url,
                sections,
                cart_count,
            }
            .into_response()
        }
    }
}

/// Force a refetch of the store document, bypassing the TTL cache.
#[instrument(skip(state))]
async fn refresh(State(state): State<AppState>) -> Redirect {
    state
        .docstore()
        .invalidate(&state.config().remote_doc_id)
        .await;
    Redirect::to("/")
}

fn display_name(document: &StoreConfig) -> String {
    if document.operations.store_name.trim().is_empty() {
        "Vitrine".to_string()
    } else {
        document.operations.store_name.clone()
    }
}
