//! The store document.
//!
//! One `StoreConfig` describes everything a store publishes: branding,
//! catalog, payment details, and delivery coverage. The admin owns the
//! document; the kiosk only reads it. On the wire it is camelCase JSON.
//!
//! Unknown keys - at the top level and inside the known groups - are
//! captured in flattened maps so a newer document round-trips through an
//! older binary without losing fields.

pub mod migrate;
pub mod reconcile;

pub use reconcile::{load_or_default, reconcile};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{CategoryId, CoverageAreaId, Money, ProductId, StoreStatus};

/// Current schema version of the store document.
///
/// Documents without a `schemaVersion` field are version 1 and are upgraded
/// by [`migrate::migrate_to_current`] before reconciliation.
pub const SCHEMA_VERSION: u32 = 2;

const fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

const fn default_low_stock_threshold() -> u32 {
    5
}

const fn default_music_volume() -> u8 {
    50
}

/// Validation failures for admin-entered fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("price must not be negative")]
    NegativePrice,
    #[error("delivery fee must not be negative")]
    NegativeFee,
    #[error("delivery time must be greater than zero")]
    ZeroEta,
}

/// Failures when importing a snapshot file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file is not a valid store document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("document is missing the `{0}` section")]
    MissingSection(&'static str),
}

/// Remote publication settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(default)]
    pub remote_doc_id: String,
    #[serde(default)]
    pub write_secret: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Operational settings: status, contact, and stock alerting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operations {
    #[serde(default)]
    pub status: StoreStatus,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Operations {
    fn default() -> Self {
        Self {
            status: StoreStatus::default(),
            contact_number: String::new(),
            store_name: String::new(),
            address: String::new(),
            low_stock_threshold: default_low_stock_threshold(),
            extra: Map::new(),
        }
    }
}

/// Branding and presentation settings.
///
/// `primaryColor` is the canonical color field; older documents using the
/// drifted `colorPrimary`/`headerFooterColor` names are normalized by the
/// v1 -> v2 migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub text_color: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub background_image_url: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub music_url: String,
    #[serde(default = "default_music_volume")]
    pub music_volume: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            primary_color: String::new(),
            text_color: String::new(),
            background_color: String::new(),
            background_image_url: String::new(),
            logo_url: String::new(),
            music_url: String::new(),
            music_volume: default_music_volume(),
            extra: Map::new(),
        }
    }
}

/// Payment details, all optional free text echoed into order messages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub pix_key: String,
    #[serde(default)]
    pub bank_details: String,
    #[serde(default)]
    pub lightning_address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A menu category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A product in the catalog.
///
/// A `category_id` pointing at a deleted category means "uncategorized",
/// never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub stock: u32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub image_url: String,
}

/// A delivery coverage area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageArea {
    pub id: CoverageAreaId,
    pub name: String,
    pub fee: Money,
    pub eta_minutes: u32,
}

/// The store document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub publication: Publication,
    #[serde(default)]
    pub operations: Operations,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub payment: Payment,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub coverage_areas: Vec<CoverageArea>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            publication: Publication::default(),
            operations: Operations::default(),
            appearance: Appearance::default(),
            payment: Payment::default(),
            categories: Vec::new(),
            products: Vec::new(),
            coverage_areas: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl StoreConfig {
    /// The built-in default template: a small demo catalog with open status
    /// and placeholder branding. Used whenever nothing is cached locally.
    #[must_use]
    pub fn template() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            publication: Publication::default(),
            operations: Operations {
                status: StoreStatus::Open,
                contact_number: "5511999998888".to_string(),
                store_name: "Vitrine".to_string(),
                address: String::new(),
                low_stock_threshold: 5,
                extra: Map::new(),
            },
            appearance: Appearance {
                primary_color: "#10B981".to_string(),
                text_color: "#1F2937".to_string(),
                background_color: "#f9f9f9".to_string(),
                background_image_url: String::new(),
                logo_url: "https://via.placeholder.com/150x50/10B981/ffffff?text=Vitrine"
                    .to_string(),
                music_url: String::new(),
                music_volume: 50,
                extra: Map::new(),
            },
            payment: Payment::default(),
            categories: vec![
                Category {
                    id: CategoryId::new("cat-1"),
                    name: "Combos Especiais".to_string(),
                },
                Category {
                    id: CategoryId::new("cat-2"),
                    name: "Lanches".to_string(),
                },
            ],
            products: vec![
                Product {
                    id: ProductId::new("prod-1"),
                    name: "X-Salada Clássico".to_string(),
                    price: Money::from_cents(1850),
                    stock: 50,
                    category_id: Some(CategoryId::new("cat-2")),
                    image_url: String::new(),
                },
                Product {
                    id: ProductId::new("prod-2"),
                    name: "Batata Média".to_string(),
                    price: Money::from_cents(800),
                    stock: 100,
                    category_id: Some(CategoryId::new("cat-2")),
                    image_url: String::new(),
                },
            ],
            coverage_areas: vec![CoverageArea {
                id: CoverageAreaId::new("area-1"),
                name: "Centro".to_string(),
                fee: Money::from_cents(500),
                eta_minutes: 30,
            }],
            extra: Map::new(),
        }
    }

    /// Serialize the document for export or publication.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse an imported snapshot, requiring the minimal document shape.
    ///
    /// The check is deliberately shallow: the file must be a JSON object
    /// with `operations` and `products` sections. Anything less is refused
    /// outright - import never performs a partial merge.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when the text is not valid JSON or the
    /// required sections are missing.
    pub fn import_snapshot(text: &str) -> Result<Self, ImportError> {
        let raw: Value = serde_json::from_str(text)?;
        for section in ["operations", "products"] {
            if raw.get(section).is_none() {
                return Err(ImportError::MissingSection(section));
            }
        }
        Ok(serde_json::from_value(raw)?)
    }

    /// Add a new category with a fresh timestamp-derived id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] when the name is empty.
    pub fn add_category(&mut self, name: &str) -> Result<CategoryId, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required("category name"));
        }
        let id = CategoryId::generate();
        self.categories.push(Category {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    /// Delete a category, orphaning its products.
    ///
    /// Products referencing the deleted category become uncategorized;
    /// no product is ever deleted by this cascade. Returns whether a
    /// category was removed.
    pub fn remove_category(&mut self, id: &CategoryId) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| &c.id != id);
        if self.categories.len() == before {
            return false;
        }
        for product in &mut self.products {
            if product.category_id.as_ref() == Some(id) {
                product.category_id = None;
            }
        }
        true
    }

    /// Create or update a product (matched by id).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the name is empty or the price is
    /// negative.
    pub fn save_product(&mut self, product: Product) -> Result<(), ValidationError> {
        if product.name.trim().is_empty() {
            return Err(ValidationError::Required("product name"));
        }
        if product.price.is_negative() {
            return Err(ValidationError::NegativePrice);
        }
        if let Some(existing) = self.products.iter_mut().find(|p| p.id == product.id) {
            *existing = product;
        } else {
            self.products.push(product);
        }
        Ok(())
    }

    /// Delete a product. Returns whether a product was removed.
    pub fn remove_product(&mut self, id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| &p.id != id);
        self.products.len() != before
    }

    /// Add a delivery coverage area.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the name is empty, the fee is
    /// negative, or the ETA is zero.
    pub fn add_coverage_area(
        &mut self,
        name: &str,
        fee: Decimal,
        eta_minutes: u32,
    ) -> Result<CoverageAreaId, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required("area name"));
        }
        if fee < Decimal::ZERO {
            return Err(ValidationError::NegativeFee);
        }
        if eta_minutes == 0 {
            return Err(ValidationError::ZeroEta);
        }
        let id = CoverageAreaId::generate();
        self.coverage_areas.push(CoverageArea {
            id: id.clone(),
            name: name.to_string(),
            fee: Money::new(fee),
            eta_minutes,
        });
        Ok(id)
    }

    /// Delete a coverage area. Returns whether an area was removed.
    pub fn remove_coverage_area(&mut self, id: &CoverageAreaId) -> bool {
        let before = self.coverage_areas.len();
        self.coverage_areas.retain(|a| &a.id != id);
        self.coverage_areas.len() != before
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find_product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Resolve a category name, `None` for uncategorized products.
    #[must_use]
    pub fn category_name(&self, id: Option<&CategoryId>) -> Option<&str> {
        let id = id?;
        self.categories
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.name.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_template_is_current_version() {
        let template = StoreConfig::template();
        assert_eq!(template.schema_version, SCHEMA_VERSION);
        assert!(template.operations.status.is_open());
        assert!(!template.products.is_empty());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(StoreConfig::template()).unwrap();
        assert!(json.get("coverageAreas").is_some());
        assert!(json["operations"].get("lowStockThreshold").is_some());
        assert!(json["products"][0].get("categoryId").is_some());
        assert_eq!(json["operations"]["status"], "open");
    }

    #[test]
    fn test_export_import_round_trip() {
        let config = StoreConfig::template();
        let text = config.export_snapshot().unwrap();
        let back = StoreConfig::import_snapshot(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_import_requires_minimal_shape() {
        let err = StoreConfig::import_snapshot("{\"products\": []}").unwrap_err();
        assert!(matches!(err, ImportError::MissingSection("operations")));

        let err = StoreConfig::import_snapshot("{\"operations\": {}}").unwrap_err();
        assert!(matches!(err, ImportError::MissingSection("products")));

        assert!(StoreConfig::import_snapshot("not json").is_err());
    }

    #[test]
    fn test_import_never_partially_merges() {
        // A malformed file leaves nothing usable behind - the error carries
        // no partially-built document.
        let result = StoreConfig::import_snapshot("{\"operations\": 3, \"products\": []}");
        assert!(result.is_err());
    }

    #[test]
    fn test_remove_category_orphans_products() {
        let mut config = StoreConfig::template();
        let target = CategoryId::new("cat-2");
        let product_count = config.products.len();

        assert!(config.remove_category(&target));

        assert_eq!(config.products.len(), product_count);
        assert!(
            config
                .products
                .iter()
                .all(|p| p.category_id.as_ref() != Some(&target))
        );
        // Orphaned products resolve to no category name
        assert_eq!(config.category_name(Some(&target)), None);
    }

    #[test]
    fn test_remove_missing_category_is_noop() {
        let mut config = StoreConfig::template();
        assert!(!config.remove_category(&CategoryId::new("cat-unknown")));
    }

    #[test]
    fn test_add_category_requires_name() {
        let mut config = StoreConfig::template();
        assert_eq!(
            config.add_category("  "),
            Err(ValidationError::Required("category name"))
        );

        let id = config.add_category("Bebidas").unwrap();
        assert!(id.as_str().starts_with("cat-"));
        assert!(config.categories.iter().any(|c| c.name == "Bebidas"));
    }

    #[test]
    fn test_save_product_updates_by_id() {
        let mut config = StoreConfig::template();
        let mut updated = config.products[0].clone();
        updated.price = Money::from_cents(1999);

        config.save_product(updated).unwrap();

        assert_eq!(
            config.find_product(&ProductId::new("prod-1")).unwrap().price,
            Money::from_cents(1999)
        );
    }

    #[test]
    fn test_save_product_rejects_invalid_fields() {
        let mut config = StoreConfig::template();
        let mut bad = config.products[0].clone();
        bad.name = String::new();
        assert_eq!(
            config.save_product(bad),
            Err(ValidationError::Required("product name"))
        );

        let mut negative = config.products[0].clone();
        negative.price = Money::from_cents(-100);
        assert_eq!(
            config.save_product(negative),
            Err(ValidationError::NegativePrice)
        );
    }

    #[test]
    fn test_coverage_area_validation() {
        let mut config = StoreConfig::template();
        assert_eq!(
            config.add_coverage_area("Zona Sul", Decimal::new(-100, 2), 30),
            Err(ValidationError::NegativeFee)
        );
        assert_eq!(
            config.add_coverage_area("Zona Sul", Decimal::new(700, 2), 0),
            Err(ValidationError::ZeroEta)
        );

        let id = config
            .add_coverage_area("Zona Sul", Decimal::new(700, 2), 45)
            .unwrap();
        assert!(config.remove_coverage_area(&id));
        assert!(!config.remove_coverage_area(&id));
    }

    #[test]
    fn test_unknown_keys_round_trip() {
        let text = r#"{
            "schemaVersion": 2,
            "operations": {"status": "open", "futureFlag": true},
            "products": [],
            "loyaltyProgram": {"enabled": true}
        }"#;
        let config: StoreConfig = serde_json::from_str(text).unwrap();
        assert!(config.extra.contains_key("loyaltyProgram"));
        assert_eq!(config.operations.extra["futureFlag"], true);

        let out = serde_json::to_value(&config).unwrap();
        assert_eq!(out["loyaltyProgram"]["enabled"], true);
        assert_eq!(out["operations"]["futureFlag"], true);
    }
}
