//! Cart state machine, totals, and checkout validation.
//!
//! The cart keys entries by product id and stores a snapshot of the
//! product taken when the line was added: later catalog edits never
//! retroactively change a line that is already in the cart. Refused
//! mutations produce a [`CartNotice`] for the UI, not an error - there is
//! nothing exceptional about bumping into a stock limit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{CoverageArea, Product};
use crate::types::{CoverageAreaId, Money, ProductId, StoreStatus};

/// A user-visible notice emitted by a refused or adjusted cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartNotice {
    #[error("A loja está fechada no momento.")]
    StoreClosed,
    #[error("Produto esgotado.")]
    OutOfStock,
    #[error("Estoque máximo atingido para este item.")]
    StockLimitReached,
    #[error("Selecione uma área de entrega.")]
    SelectArea,
}

/// One line of an in-progress order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Snapshot of the product at add time.
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

/// An in-progress order: entries keyed by product id, insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Whether the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of items across all entries.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Add one unit of a product.
    ///
    /// An existing entry is incremented but never past `available_stock`;
    /// hitting the limit leaves the quantity unchanged. A new entry starts
    /// at quantity 1. Refused outright when the store is closed or the
    /// product has no stock.
    ///
    /// # Errors
    ///
    /// Returns the [`CartNotice`] to surface when the add is refused.
    pub fn add_item(
        &mut self,
        product: &Product,
        available_stock: u32,
        status: StoreStatus,
    ) -> Result<(), CartNotice> {
        if !status.is_open() {
            return Err(CartNotice::StoreClosed);
        }
        if available_stock == 0 {
            return Err(CartNotice::OutOfStock);
        }

        match self.entry_mut(&product.id) {
            Some(entry) => {
                if entry.quantity >= available_stock {
                    return Err(CartNotice::StockLimitReached);
                }
                entry.quantity += 1;
            }
            None => self.entries.push(CartEntry {
                product: product.clone(),
                quantity: 1,
            }),
        }
        Ok(())
    }

    /// Adjust an entry's quantity by `delta`, clamped to
    /// `[0, available_stock]`.
    ///
    /// A resulting quantity of zero removes the entry; adjusting a missing
    /// entry is a no-op. Returns a notice when the request had to be
    /// clamped at the stock limit.
    pub fn change_quantity(
        &mut self,
        product_id: &ProductId,
        delta: i32,
        available_stock: u32,
    ) -> Option<CartNotice> {
        let Some(entry) = self.entry_mut(product_id) else {
            return None;
        };

        let requested = i64::from(entry.quantity) + i64::from(delta);
        let clamped = requested.clamp(0, i64::from(available_stock));
        let notice = (requested > i64::from(available_stock))
            .then_some(CartNotice::StockLimitReached);

        // Clamp result fits u32 by construction
        entry.quantity = u32::try_from(clamped).unwrap_or(0);
        if entry.quantity == 0 {
            self.remove_item(product_id);
        }
        notice
    }

    /// Remove an entry unconditionally.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.entries.retain(|e| &e.product.id != product_id);
    }

    /// Clear the whole cart.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of price times quantity over all entries, computed fresh on
    /// every call - there is no cached running total to go stale.
    #[must_use]
    pub fn total(&self) -> Money {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    fn entry_mut(&mut self, product_id: &ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| &e.product.id == product_id)
    }
}

/// Resolve the delivery fee for the selected coverage area.
///
/// Zero when not delivering or nothing is selected; the matched area's fee
/// otherwise. An id that matches no area yields zero plus a notice asking
/// the customer to pick an area.
#[must_use]
pub fn delivery_fee(
    areas: &[CoverageArea],
    selected: Option<&CoverageAreaId>,
    is_delivery: bool,
) -> (Money, Option<CartNotice>) {
    if !is_delivery {
        return (Money::ZERO, None);
    }
    let Some(id) = selected else {
        return (Money::ZERO, None);
    };
    areas.iter().find(|a| &a.id == id).map_or(
        (Money::ZERO, Some(CartNotice::SelectArea)),
        |area| (area.fee, None),
    )
}

/// The checkout gate, re-evaluated on every relevant input change.
///
/// True iff the customer name is non-empty, the cart total is positive,
/// and - when delivering - the address is non-empty and the selected area
/// resolves to a known [`CoverageArea`] with a nonzero fee.
#[must_use]
pub fn validate_checkout(
    cart: &Cart,
    customer_name: &str,
    is_delivery: bool,
    address: &str,
    area_id: Option<&CoverageAreaId>,
    areas: &[CoverageArea],
) -> bool {
    if customer_name.trim().is_empty() || !cart.total().is_positive() {
        return false;
    }
    if !is_delivery {
        return true;
    }
    if address.trim().is_empty() {
        return false;
    }
    area_id
        .and_then(|id| areas.iter().find(|a| &a.id == id))
        .is_some_and(|area| area.fee.is_positive())
}
