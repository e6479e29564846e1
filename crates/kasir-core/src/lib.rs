//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate is the **heart** of Kasir POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Kasir POS Architecture                        │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │              UI / customer display (out of scope)             │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │ method calls + events             │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                  kasir-engine (PosService)                    │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │              ★ kasir-core (THIS CRATE) ★                      │ │
//! │  │                                                               │ │
//! │  │  ┌────────┐ ┌───────┐ ┌──────────┐ ┌─────────┐ ┌─────────┐  │ │
//! │  │  │ money  │ │ cart  │ │ checkout │ │ ledger  │ │ report  │  │ │
//! │  │  │ Money  │ │ Cart  │ │ Checkout │ │ Ledger  │ │ Period  │  │ │
//! │  │  │ TaxCalc│ │ Lines │ │ Stages   │ │ Refunds │ │ Summary │  │ │
//! │  │  └────────┘ └───────┘ └──────────┘ └─────────┘ └─────────┘  │ │
//! │  │                                                               │ │
//! │  │  NO I/O • NO DATABASE • NO TIMERS • PURE FUNCTIONS           │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │            kasir-store (key-value persistence)                │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartLine, Transaction, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ids`] - Timestamp-based monotonic id generation
//! - [`cart`] - The in-progress order and its totals
//! - [`checkout`] - The payment state machine
//! - [`catalog`] - Product CRUD and the guarded stock mutation point
//! - [`ledger`] - Transaction log: sales, refunds, voids, archival
//! - [`report`] - Period predicates and aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: state transitions take explicit `now` timestamps;
//!    nothing in this crate reads a timer or spawns a task
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are whole rupiah (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use catalog::{NewProduct, ProductCatalog};
pub use checkout::{Checkout, CheckoutCompletion, CheckoutStage};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ids::IdGen;
pub use ledger::{RefundItem, ResetOutcome, ResetPolicy, TransactionLedger};
pub use money::Money;
pub use report::{ReportPeriod, SalesReport};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// How long a digital payment confirmation may stay pending, in seconds.
///
/// After this window expires the checkout drops back to method selection
/// and the cashier is told "waktu pembayaran habis".
pub const DIGITAL_PAYMENT_WINDOW_SECS: i64 = 300;

/// Transactions older than this many days are moved from the active
/// ledger into the archive on load.
pub const LEDGER_RETENTION_DAYS: i64 = 30;

/// Maximum size of a product image data-URI, in bytes (1 MiB).
///
/// ## Business Reason
/// Images are persisted inline in the products blob; an oversized image
/// would bloat every read and write of the whole catalog.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;
