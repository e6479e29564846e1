//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌───────────────┐   ┌────────────────┐   ┌────────────────────┐   │
//! │  │   Product     │   │   CartLine     │   │    Transaction     │   │
//! │  │ ───────────── │   │ ────────────── │   │ ────────────────── │   │
//! │  │ id (i64 ts)   │──►│ product_id     │──►│ items[] (snapshot) │   │
//! │  │ price, stock  │   │ price snapshot │   │ total, method      │   │
//! │  │ category      │   │ qty, note      │   │ status, refunds[]  │   │
//! │  └───────────────┘   └────────────────┘   └────────────────────┘   │
//! │                                                                     │
//! │  PaymentMethod: Cash | Qris | GoPay | Ovo | Dana | ShopeePay |      │
//! │                 Debit | Credit   (closed enum, never a string id)   │
//! │  TransactionKind: Sale | Refund  (refunds live in the same ledger)  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity id is a timestamp-based i64 (milliseconds, monotonic per
//! process; see [`crate::ids`]). Ids are immutable once assigned.
//!
//! ## Serde
//! Wire-facing structs rename to camelCase so the persisted JSON keeps the
//! `refundedQty` / `paymentMethod` / `tableNumber` shape external consumers
//! (customer display, export files) rely on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1100 bps = 11% (Indonesian PPN)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Tax Settings
// =============================================================================

/// Whether the configured tax is embedded in displayed prices or added on
/// top at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Price already includes tax; the tax line on a receipt is
    /// informational and never changes the total.
    Inclusive,
    /// Tax is added on top of the subtotal at checkout.
    Exclusive,
}

impl Default for TaxMode {
    fn default() -> Self {
        TaxMode::Inclusive
    }
}

/// Store-wide tax configuration, persisted under the `taxSettings` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxSettings {
    pub enabled: bool,
    pub rate: TaxRate,
    pub mode: TaxMode,
    /// Receipt label, e.g. "PPN 11%".
    pub label: String,
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            enabled: false,
            rate: TaxRate::zero(),
            mode: TaxMode::Inclusive,
            label: "PPN".to_string(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Product category - a fixed enumerated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Food,
    Beverage,
    Snack,
    Dessert,
    Other,
}

impl Default for ProductCategory {
    fn default() -> Self {
        ProductCategory::Other
    }
}

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (timestamp-based), immutable.
    pub id: i64,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    pub category: ProductCategory,

    /// Unit price in whole rupiah. Non-negative.
    pub price: Money,

    /// Current stock level.
    ///
    /// Invariant: `stock >= 0` after any operation. Decremented by
    /// checkout, incremented by refund/void, set directly by a stock
    /// update with a required reason.
    pub stock: i64,

    /// Optional inline image (data URI, at most 1 MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Optional barcode. Unique by convention, not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cart Line
// =============================================================================

/// One entry in the in-progress order.
///
/// ## Snapshot Pattern
/// `name` and `price` are copied from the product at add time, not
/// live-linked: editing the product later must not change an order in
/// progress.
///
/// Two lines may reference the same product when their notes differ
/// (e.g. "tanpa gula"); `cart_id` tells them apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Unique per line (timestamp-based).
    pub cart_id: i64,

    /// The product this line was created from.
    pub product_id: i64,

    /// Product name at add time (frozen).
    pub name: String,

    /// Unit price at add time (frozen).
    pub price: Money,

    /// Quantity. Always positive; a quantity driven to zero removes
    /// the line.
    pub qty: i64,

    /// Free-text note for the kitchen/barista.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CartLine {
    /// Line total (price × qty).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.qty)
    }
}

// =============================================================================
// Discount
// =============================================================================

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is whole percent points of the subtotal.
    Percentage,
    /// `value` is a fixed rupiah amount, capped at the subtotal.
    Fixed,
}

/// A discount applied to the whole cart. Only one may be active at a
/// time; applying a new one replaces any existing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub kind: DiscountKind,
    pub value: i64,
    pub reason: String,
}

impl Discount {
    /// The rupiah amount this discount takes off the given subtotal.
    /// Never negative and never more than the subtotal itself.
    pub fn amount_for(&self, subtotal: Money) -> Money {
        let raw = match self.kind {
            DiscountKind::Percentage => subtotal.percentage_of(self.value),
            DiscountKind::Fixed => Money::new(self.value),
        };
        raw.clamp(Money::zero(), subtotal)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// The closed set of accepted payment methods.
///
/// Cash requires an amount tendered; every other method is a digital
/// payment confirmed manually within the payment window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Qris,
    GoPay,
    Ovo,
    Dana,
    ShopeePay,
    Debit,
    Credit,
}

impl PaymentMethod {
    /// Whether this method goes through the cash-entry step.
    #[inline]
    pub const fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }

    /// Receipt/report label.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Qris => "QRIS",
            PaymentMethod::GoPay => "GoPay",
            PaymentMethod::Ovo => "OVO",
            PaymentMethod::Dana => "Dana",
            PaymentMethod::ShopeePay => "ShopeePay",
            PaymentMethod::Debit => "Debit",
            PaymentMethod::Credit => "Credit",
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// The status of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Paid and finalized.
    Completed,
    /// Cancelled after completion. The record stays in the ledger.
    Voided,
}

/// Whether a ledger record is a sale or a refund. Refund records are
/// Transaction-shaped and live in the same ledger array as sales,
/// distinguished by this marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Refund,
}

impl TransactionKind {
    /// Used to keep the marker out of serialized sale records, matching
    /// the historical "optional type field" blob shape.
    pub fn is_sale(&self) -> bool {
        matches!(self, TransactionKind::Sale)
    }
}

impl Default for TransactionKind {
    fn default() -> Self {
        TransactionKind::Sale
    }
}

/// A line item inside a recorded transaction.
///
/// Snapshot of the cart line at checkout; immutable afterwards except
/// for the refund counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub product_id: i64,
    pub name: String,
    pub price: Money,
    pub qty: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// True once the item is fully refunded (`refunded_qty >= qty`).
    #[serde(default)]
    pub refunded: bool,

    /// How many units of this item have been refunded so far.
    /// Invariant: `refunded_qty <= qty`.
    #[serde(default)]
    pub refunded_qty: i64,
}

impl TransactionItem {
    /// Units still eligible for refund.
    #[inline]
    pub fn remaining_refundable(&self) -> i64 {
        self.qty - self.refunded_qty
    }

    /// Line total (price × qty).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.qty)
    }
}

/// Who voided a transaction, when, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidData {
    pub voided_by: String,
    pub voided_at: DateTime<Utc>,
    pub reason: String,
}

/// A recorded transaction: either a completed sale or a refund record.
///
/// ## Lifecycle
/// - Created at checkout completion (sale) or by a refund operation
/// - Mutated in place when refunded (item counters + embedded refunds)
///   or voided (status flip + void data)
/// - Moved to the archive after the 30-day retention window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier (timestamp-based).
    pub id: i64,

    /// Sale or refund marker. Absent in serialized form for sales.
    #[serde(rename = "type", default, skip_serializing_if = "TransactionKind::is_sale")]
    pub kind: TransactionKind,

    pub date: DateTime<Utc>,

    pub items: Vec<TransactionItem>,

    /// Grand total charged (sale) or returned (refund, stored positive;
    /// refunds contribute negatively to aggregates by kind).
    pub total: Money,

    pub payment_method: PaymentMethod,

    /// Cash tendered (cash payments only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_paid: Option<Money>,

    /// Change returned (cash payments only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Money>,

    pub customer_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,

    pub status: TransactionStatus,

    /// Refund records applied against this sale, embedded for receipt
    /// reprints. Each also appears in the ledger itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refunds: Vec<Transaction>,

    /// For refund records: the sale this refund reverses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_transaction_id: Option<i64>,

    /// For refund records: why the items came back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,

    /// Attached when the transaction is voided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub void_data: Option<VoidData>,
}

impl Transaction {
    /// Whether this record is a refund rather than a sale.
    #[inline]
    pub fn is_refund(&self) -> bool {
        self.kind == TransactionKind::Refund
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1100);
        assert_eq!(rate.bps(), 1100);
        assert!((rate.percentage() - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(11.0);
        assert_eq!(rate.bps(), 1100);
    }

    #[test]
    fn test_discount_amount() {
        let pct = Discount {
            kind: DiscountKind::Percentage,
            value: 10,
            reason: "member".to_string(),
        };
        assert_eq!(pct.amount_for(Money::new(30_000)).amount(), 3_000);

        // Fixed discounts never exceed the subtotal
        let fixed = Discount {
            kind: DiscountKind::Fixed,
            value: 50_000,
            reason: "voucher".to_string(),
        };
        assert_eq!(fixed.amount_for(Money::new(20_000)).amount(), 20_000);
    }

    #[test]
    fn test_payment_method_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::ShopeePay).unwrap(),
            "\"shopeepay\""
        );
        let method: PaymentMethod = serde_json::from_str("\"qris\"").unwrap();
        assert_eq!(method, PaymentMethod::Qris);
        assert!(PaymentMethod::Cash.is_cash());
        assert!(!PaymentMethod::Dana.is_cash());
    }

    #[test]
    fn test_transaction_kind_marker_is_optional_in_json() {
        let sale_json = r#"{
            "id": 1, "date": "2026-08-01T10:00:00Z", "items": [],
            "total": 1000, "paymentMethod": "cash",
            "customerName": "Budi", "status": "completed"
        }"#;
        let tx: Transaction = serde_json::from_str(sale_json).unwrap();
        assert_eq!(tx.kind, TransactionKind::Sale);
        assert!(!tx.is_refund());

        // And the marker is written back only for refunds
        let out = serde_json::to_string(&tx).unwrap();
        assert!(!out.contains("\"type\""));
    }

    #[test]
    fn test_transaction_item_refund_counters() {
        let item = TransactionItem {
            product_id: 1,
            name: "Kopi".to_string(),
            price: Money::new(10_000),
            qty: 3,
            note: None,
            refunded: false,
            refunded_qty: 1,
        };
        assert_eq!(item.remaining_refundable(), 2);
        assert_eq!(item.line_total().amount(), 30_000);
    }
}
