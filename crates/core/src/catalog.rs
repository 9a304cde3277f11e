//! Pure projection of the store document into a browsable menu.
//!
//! Nothing here mutates the document or touches I/O; the only state a
//! caller might keep is its currently selected category, and that lives
//! with the caller.

use serde::Serialize;

use crate::config::{Appearance, Category, Product, StoreConfig};
use crate::types::CategoryId;

/// Categories in insertion order, as stored.
#[must_use]
pub fn categories(config: &StoreConfig) -> &[Category] {
    &config.categories
}

/// Products filtered by category.
///
/// `None` returns the whole catalog. `Some(id)` returns exact matches
/// only - uncategorized products never leak into a category listing; ask
/// for them explicitly via [`uncategorized_products`].
#[must_use]
pub fn products_in<'a>(
    config: &'a StoreConfig,
    category_id: Option<&CategoryId>,
) -> Vec<&'a Product> {
    match category_id {
        None => config.products.iter().collect(),
        Some(id) => config
            .products
            .iter()
            .filter(|p| p.category_id.as_ref() == Some(id))
            .collect(),
    }
}

/// Products whose category no longer exists (or was never set).
#[must_use]
pub fn uncategorized_products(config: &StoreConfig) -> Vec<&Product> {
    let known: Vec<&CategoryId> = config.categories.iter().map(|c| &c.id).collect();
    config
        .products
        .iter()
        .filter(|p| {
            p.category_id
                .as_ref()
                .is_none_or(|id| !known.contains(&id))
        })
        .collect()
}

/// Whether a product can currently be sold.
#[must_use]
pub const fn is_available(product: &Product) -> bool {
    product.stock > 0
}

/// Whether a product is running low (in stock, but at or under the
/// configured threshold).
#[must_use]
pub const fn is_low_stock(product: &Product, threshold: u32) -> bool {
    product.stock > 0 && product.stock <= threshold
}

/// Named presentation variables projected from the appearance group.
///
/// The UI layer consumes these as CSS custom properties; this struct is
/// the complete list of style variables the document exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary_color: String,
    pub text_color: String,
    pub background_color: String,
    pub background_image_url: String,
    pub logo_url: String,
}

impl Theme {
    /// Project the appearance group into named style variables.
    #[must_use]
    pub fn from_appearance(appearance: &Appearance) -> Self {
        Self {
            primary_color: appearance.primary_color.clone(),
            text_color: appearance.text_color.clone(),
            background_color: appearance.background_color.clone(),
            background_image_url: appearance.background_image_url.clone(),
            logo_url: appearance.logo_url.clone(),
        }
    }

    /// Render the variables as a CSS custom-property block.
    #[must_use]
    pub fn css_variables(&self) -> String {
        format!(
            "--primary-color: {}; --text-color: {}; --background-color: {};",
            self.primary_color, self.text_color, self.background_color
        )
    }
}

/// One category section of the rendered menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSection {
    pub category: Category,
    pub products: Vec<Product>,
}

/// The kiosk menu projection.
///
/// A closed store never yields a purchasable product list: callers must
/// render the closed notice and disable every cart-mutating affordance.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuProjection {
    /// The store is not accepting orders.
    Closed,
    /// Category sections in insertion order; empty categories are skipped.
    Open(Vec<MenuSection>),
}

/// Project the document into the kiosk menu, honoring the closed gate.
#[must_use]
pub fn project_menu(config: &StoreConfig) -> MenuProjection {
    if !config.operations.status.is_open() {
        return MenuProjection::Closed;
    }

    let sections = config
        .categories
        .iter()
        .filter_map(|category| {
            let products: Vec<Product> = products_in(config, Some(&category.id))
                .into_iter()
                .cloned()
                .collect();
            if products.is_empty() {
                None
            } else {
                Some(MenuSection {
                    category: category.clone(),
                    products,
                })
            }
        })
        .collect();

    MenuProjection::Open(sections)
}
