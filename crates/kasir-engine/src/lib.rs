//! # kasir-engine: Service Layer for Kasir POS
//!
//! Wires the pure core ([`kasir_core`]) to persistence
//! ([`kasir_store`]) and broadcasts events to display consumers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Kasir POS Architecture                        │
//! │                                                                     │
//! │  UI / customer display (out of scope)                               │
//! │       │ method calls                    ▲ broadcast events          │
//! │       ▼                                 │                           │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │              ★ kasir-engine (THIS CRATE) ★                    │ │
//! │  │                                                               │ │
//! │  │  ┌─────────┐ ┌────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐ │ │
//! │  │  │ service │ │ events │ │ settings │ │ receipt │ │ backup │ │ │
//! │  │  └─────────┘ └────────┘ └──────────┘ └─────────┘ └────────┘ │ │
//! │  └──────┬──────────────────────────────────────────┬───────────┘ │
//! │         ▼                                          ▼               │
//! │   kasir-core (business rules)          kasir-store (persistence)   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Typical Session
//! ```rust,ignore
//! let store = SqliteStore::open(StoreConfig::new("./kasir.db")).await?;
//! let mut pos = PosService::new(store);
//! pos.load(Utc::now()).await?;
//!
//! pos.add_to_cart(product_id)?;
//! pos.begin_checkout()?;
//! pos.submit_order_info("Budi", "4")?;
//! pos.select_payment_method(PaymentMethod::Cash, Utc::now())?;
//! let sale = pos.confirm_cash_payment(Money::new(50_000), Utc::now()).await?;
//! println!("{}", pos.receipt(sale.id)?);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod error;
pub mod events;
pub mod receipt;
pub mod service;
pub mod settings;

// =============================================================================
// Re-exports
// =============================================================================

pub use backup::{ExportBundle, EXPORT_VERSION};
pub use error::{EngineError, EngineResult};
pub use events::{EventBus, PaymentStatus, PosEvent};
pub use receipt::render_receipt;
pub use service::PosService;
pub use settings::{PaymentSettings, StoreSettings};
