//! # Cart Engine
//!
//! The in-progress order: line items with quantity and optional note,
//! snapshotted from catalog products, plus the monetary totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                               │
//! │                                                                     │
//! │  Cashier Action            Engine Method         Cart Change        │
//! │  ──────────────            ─────────────         ───────────        │
//! │  Tap product ────────────► add_product() ──────► merge or new line  │
//! │  +/- quantity ───────────► update_qty() ───────► qty, or removal    │
//! │  Remove line ────────────► remove_line() ──────► line deleted       │
//! │  Edit note ──────────────► set_note() ─────────► note replaced      │
//! │  Apply discount ─────────► apply_discount() ───► replaces previous  │
//! │                                                                     │
//! │  INVARIANT: Σ qty of all lines for product P ≤ P.stock              │
//! │  Every mutation invalidates any pending payment confirmation        │
//! │  (enforced by the engine, which owns both cart and checkout).       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartLine, Discount, Product, TaxMode, TaxSettings};
use crate::validation;

// =============================================================================
// Cart
// =============================================================================

/// The active order.
///
/// ## Invariants
/// - Every line has `qty > 0`
/// - For each product, the summed quantity across its lines never
///   exceeds that product's stock at the time of the check
/// - At most one discount is applied at a time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    discount: Option<Discount>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of a product to the cart.
    ///
    /// ## Behavior
    /// - Product with zero stock: rejected outright
    /// - An existing line for the same product **without a note** absorbs
    ///   the unit (lines with notes stay distinct)
    /// - Otherwise a new line with `qty = 1` is created
    ///
    /// Either way the per-product capacity invariant is checked against
    /// the product's current stock.
    pub fn add_product(&mut self, product: &Product, cart_id: i64) -> CoreResult<()> {
        if product.stock <= 0 {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        let reserved = self.quantity_for(product.id);
        if reserved + 1 > product.stock {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
                requested: reserved + 1,
            });
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id && l.note.is_none())
        {
            line.qty += 1;
            return Ok(());
        }

        self.lines.push(CartLine {
            cart_id,
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            qty: 1,
            note: None,
        });

        Ok(())
    }

    /// Adjusts a line's quantity by a delta.
    ///
    /// ## Behavior
    /// - Resulting quantity ≤ 0: the line is removed
    /// - Otherwise the per-product sum (with this line at its new
    ///   quantity) is validated against the product's stock
    pub fn update_qty(&mut self, cart_id: i64, delta: i64, product: &Product) -> CoreResult<()> {
        let index = self
            .lines
            .iter()
            .position(|l| l.cart_id == cart_id)
            .ok_or(CoreError::LineNotFound(cart_id))?;

        let new_qty = self.lines[index].qty + delta;
        if new_qty <= 0 {
            self.lines.remove(index);
            return Ok(());
        }

        let others: i64 = self
            .lines
            .iter()
            .filter(|l| l.product_id == product.id && l.cart_id != cart_id)
            .map(|l| l.qty)
            .sum();
        if others + new_qty > product.stock {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
                requested: others + new_qty,
            });
        }

        self.lines[index].qty = new_qty;
        Ok(())
    }

    /// Deletes a line unconditionally.
    pub fn remove_line(&mut self, cart_id: i64) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.cart_id != cart_id);

        if self.lines.len() == before {
            Err(CoreError::LineNotFound(cart_id))
        } else {
            Ok(())
        }
    }

    /// Replaces a line's note (trimmed; blank clears it).
    pub fn set_note(&mut self, cart_id: i64, note: &str) -> CoreResult<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.cart_id == cart_id)
            .ok_or(CoreError::LineNotFound(cart_id))?;

        line.note = validation::normalize_optional(note);
        Ok(())
    }

    /// Applies a discount, replacing any existing one.
    pub fn apply_discount(&mut self, discount: Discount) -> CoreResult<()> {
        validation::validate_reason(&discount.reason)?;
        self.discount = Some(discount);
        Ok(())
    }

    /// Removes the active discount, if any.
    pub fn remove_discount(&mut self) {
        self.discount = None;
    }

    /// Clears all lines and the discount.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = None;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn discount(&self) -> Option<&Discount> {
        self.discount.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity currently reserved for a product across all of
    /// its lines.
    pub fn quantity_for(&self, product_id: i64) -> i64 {
        self.lines
            .iter()
            .filter(|l| l.product_id == product_id)
            .map(|l| l.qty)
            .sum()
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Subtotal: Σ(price × qty) over all lines.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum::<Money>()
    }

    /// Discount amount against the current subtotal.
    pub fn discount_amount(&self) -> Money {
        match &self.discount {
            Some(d) => d.amount_for(self.subtotal()),
            None => Money::zero(),
        }
    }

    /// Tax for the current subtotal under the given settings.
    ///
    /// Inclusive tax is the share already embedded in displayed prices;
    /// exclusive tax is added on top at checkout.
    pub fn tax(&self, settings: &TaxSettings) -> Money {
        if !settings.enabled || settings.rate.is_zero() {
            return Money::zero();
        }

        let subtotal = self.subtotal();
        match settings.mode {
            TaxMode::Inclusive => subtotal.inclusive_tax(settings.rate),
            TaxMode::Exclusive => subtotal.exclusive_tax(settings.rate),
        }
    }

    /// Grand total: `subtotal − discount + exclusive tax`.
    ///
    /// Inclusive tax is informational and never added - it is already
    /// inside the subtotal.
    pub fn total(&self, settings: &TaxSettings) -> Money {
        let mut total = self.subtotal() - self.discount_amount();
        if settings.enabled && settings.mode == TaxMode::Exclusive {
            total += self.tax(settings);
        }
        total
    }

    /// All monetary figures in one struct, for display consumers.
    pub fn totals(&self, settings: &TaxSettings) -> CartTotals {
        CartTotals {
            subtotal: self.subtotal(),
            discount: self.discount_amount(),
            tax: self.tax(settings),
            total: self.total(settings),
        }
    }
}

/// Cart totals summary for display/event consumers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
