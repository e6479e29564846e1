//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  kasir-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  kasir-store errors (separate crate)                                │
//! │  └── StoreError       - Persistence failures                        │
//! │                                                                     │
//! │  kasir-engine errors                                                │
//! │  └── EngineError      - What the caller/UI sees                     │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → EngineError → caller           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, id, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every variant here is a recoverable user error: the operation is
//!    rejected and no state changes

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. None of them is fatal;
/// they surface to the cashier as a blocking notice and the operation is
/// aborted with no state change.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Product has no stock left at all.
    #[error("'{name}' is out of stock")]
    OutOfStock { name: String },

    /// Requested quantity exceeds remaining stock.
    ///
    /// ## When This Occurs
    /// - Adding a product whose cart lines already reserve all stock
    /// - Increasing a line quantity past what the product has left
    #[error("Insufficient stock for '{name}': available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Cart line cannot be found.
    #[error("Cart line not found: {0}")]
    LineNotFound(i64),

    /// Checkout was requested on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// An operation was attempted in the wrong checkout stage.
    ///
    /// ## When This Occurs
    /// - Confirming cash while still selecting a method
    /// - Submitting order info twice
    #[error("Checkout is in stage '{found}', expected '{expected}'")]
    InvalidCheckoutStage {
        expected: &'static str,
        found: &'static str,
    },

    /// Cash tendered is less than the amount due.
    #[error("Insufficient cash: total {total}, paid {paid}")]
    InsufficientCash { total: Money, paid: Money },

    /// The digital payment window ran out before confirmation.
    /// Surfaced as "waktu pembayaran habis"; checkout returns to
    /// method selection.
    #[error("Payment window expired")]
    PaymentWindowExpired,

    /// Transaction cannot be found in the ledger (active or archive).
    #[error("Transaction not found: {0}")]
    TransactionNotFound(i64),

    /// Transaction is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Refunding or voiding an already voided transaction
    /// - Voiding a refund record
    #[error("Transaction {id} is {status}, cannot perform operation")]
    InvalidTransactionStatus { id: i64, status: String },

    /// Refund requests more of an item than is left un-refunded.
    #[error("Refund for '{name}' exceeds remaining quantity: remaining {remaining}, requested {requested}")]
    RefundExceedsRemaining {
        name: String,
        remaining: i64,
        requested: i64,
    },

    /// Refund was submitted with no item quantity above zero.
    #[error("Nothing selected to refund")]
    NothingToRefund,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Attached data is too large (product image).
    #[error("{field} exceeds maximum size of {max} bytes")]
    TooLarge { field: &'static str, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
