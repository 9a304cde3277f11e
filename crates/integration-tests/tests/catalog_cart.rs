//! Integration tests for catalog projection and the cart state machine.

use vitrine_core::cart::{Cart, CartNotice};
use vitrine_core::catalog::{MenuProjection, products_in, project_menu, uncategorized_products};
use vitrine_core::config::StoreConfig;
use vitrine_core::types::{CategoryId, Money, StoreStatus};

// =============================================================================
// Category Deletion Cascade
// =============================================================================

#[test]
fn test_deleting_a_category_orphans_but_keeps_its_products() {
    let mut config = StoreConfig::template();
    let deleted = CategoryId::new("cat-2");
    let product_count = config.products.len();

    assert!(config.remove_category(&deleted));

    // No product was deleted and none still references the category
    assert_eq!(config.products.len(), product_count);
    assert!(
        config
            .products
            .iter()
            .all(|p| p.category_id.as_ref() != Some(&deleted))
    );

    // The orphans are invisible to category listings but reachable
    // through the explicit uncategorized projection
    assert!(products_in(&config, Some(&deleted)).is_empty());
    assert_eq!(uncategorized_products(&config).len(), product_count);

    // The menu now has no sections, but the store itself is still open
    match project_menu(&config) {
        MenuProjection::Open(sections) => assert!(sections.is_empty()),
        MenuProjection::Closed => panic!("store should still be open"),
    }
}

// =============================================================================
// Closed-Store Gate
// =============================================================================

#[test]
fn test_closed_store_rejects_every_add_regardless_of_stock() {
    let mut config = StoreConfig::template();
    config.operations.status = StoreStatus::Closed;

    assert_eq!(project_menu(&config), MenuProjection::Closed);

    let mut cart = Cart::new();
    for product in &config.products {
        assert!(product.stock > 0, "template products are in stock");
        assert_eq!(
            cart.add_item(product, product.stock, config.operations.status),
            Err(CartNotice::StoreClosed)
        );
    }
    assert!(cart.is_empty());
}

// =============================================================================
// Stock Clamping
// =============================================================================

#[test]
fn test_quantity_never_exceeds_stock_through_any_path() {
    let config = StoreConfig::template();
    let product = config.products[0].clone();
    let stock = product.stock;

    let mut cart = Cart::new();

    // Adds clamp at stock
    for _ in 0..stock {
        cart.add_item(&product, stock, StoreStatus::Open)
            .expect("within stock");
    }
    assert_eq!(
        cart.add_item(&product, stock, StoreStatus::Open),
        Err(CartNotice::StockLimitReached)
    );
    assert_eq!(cart.item_count(), stock);

    // A large positive delta clamps too, with a notice
    let notice = cart.change_quantity(&product.id, 100, stock);
    assert_eq!(notice, Some(CartNotice::StockLimitReached));
    assert_eq!(cart.item_count(), stock);
}

#[test]
fn test_repeated_decrement_empties_the_cart_then_noops() {
    let config = StoreConfig::template();
    let product = config.products[1].clone();

    let mut cart = Cart::new();
    cart.add_item(&product, product.stock, StoreStatus::Open)
        .expect("in stock");
    cart.add_item(&product, product.stock, StoreStatus::Open)
        .expect("in stock");

    while !cart.is_empty() {
        assert_eq!(cart.change_quantity(&product.id, -1, product.stock), None);
    }

    // Decrementing a missing entry stays a silent no-op
    assert_eq!(cart.change_quantity(&product.id, -1, product.stock), None);
    assert!(cart.is_empty());
    assert_eq!(cart.total(), Money::ZERO);
}

// =============================================================================
// Totals
// =============================================================================

#[test]
fn test_total_is_the_exact_sum_of_lines() {
    let config = StoreConfig::template();
    let a = config.products[0].clone(); // R$ 18,50
    let b = config.products[1].clone(); // R$ 8,00

    let mut cart = Cart::new();
    cart.add_item(&a, a.stock, StoreStatus::Open).expect("ok");
    cart.add_item(&a, a.stock, StoreStatus::Open).expect("ok");
    cart.add_item(&b, b.stock, StoreStatus::Open).expect("ok");

    let expected = Money::from_cents(2 * 1850 + 800);
    assert_eq!(cart.total(), expected);
    assert_eq!(cart.total(), expected, "total is recomputed, never cached");
    assert_eq!(cart.total().to_string(), "R$ 45,00");
}
