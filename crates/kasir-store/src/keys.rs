//! # Storage Keys
//!
//! Every blob the engine persists lives under one well-known key. The
//! key strings are part of the on-disk format: data written by earlier
//! releases (and by export/import bundles) is addressed by these exact
//! names, so they are never renamed.

/// Product catalog: JSON array of products.
pub const PRODUCTS: &str = "products";

/// Active transaction ledger: JSON array, most recent first.
pub const TRANSACTIONS: &str = "transactions";

/// Archived transactions (older than the retention window).
pub const TRANSACTION_ARCHIVE: &str = "transactionArchive";

/// Store identity shown on receipts (name, address, phone, footer).
pub const STORE_SETTINGS: &str = "storeSettings";

/// Which payment methods are enabled.
pub const PAYMENT_SETTINGS: &str = "paymentSettings";

/// Tax configuration (enabled, rate, inclusive/exclusive, label).
pub const TAX_SETTINGS: &str = "taxSettings";

/// Promotions list. Opaque to the engine; owned by outer layers.
pub const PROMOTIONS: &str = "promotions";

/// Per-product cost prices. Opaque to the engine.
pub const PRODUCT_COSTS: &str = "productCosts";

/// Auth records. Opaque to the engine; owned by the auth collaborator.
pub const USERS: &str = "users";

/// The signed-in user. Opaque to the engine.
pub const CURRENT_USER: &str = "currentUser";

/// Marker date of the last startup daily-reset sweep (YYYY-MM-DD).
pub const LAST_RESET_DATE: &str = "lastResetDate";

/// Marker date of the last data export (YYYY-MM-DD).
pub const LAST_BACKUP_DATE: &str = "lastBackupDate";

/// Date the installation was first loaded (YYYY-MM-DD). Written once;
/// its absence means a fresh install, which skips the reset sweep.
pub const FIRST_LOGIN_DATE: &str = "firstLoginDate";
