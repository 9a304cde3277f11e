//! Kiosk route handlers.

pub mod cart;
pub mod checkout;
pub mod menu;

use axum::Router;

use crate::state::AppState;

/// Build the kiosk router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(menu::router())
        .merge(cart::router())
        .merge(checkout::router())
}
