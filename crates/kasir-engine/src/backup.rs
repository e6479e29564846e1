//! # Backup Bundles
//!
//! Full-state export/import. A bundle is a single JSON document holding
//! every persisted blob; import is a full replace, not a merge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use kasir_core::{Product, TaxSettings, Transaction};

use crate::settings::{PaymentSettings, StoreSettings};

/// Bumped when the bundle layout changes shape.
pub const EXPORT_VERSION: u32 = 1;

/// The complete persisted state of one install.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub version: u32,
    pub export_date: NaiveDate,
    pub products: Vec<Product>,
    pub transactions: Vec<Transaction>,
    pub transaction_archive: Vec<Transaction>,
    pub store_settings: StoreSettings,
    pub payment_settings: PaymentSettings,
    pub tax_settings: TaxSettings,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_wire_shape() {
        let bundle = ExportBundle {
            version: EXPORT_VERSION,
            export_date: "2026-08-10".parse().unwrap(),
            products: Vec::new(),
            transactions: Vec::new(),
            transaction_archive: Vec::new(),
            store_settings: StoreSettings::default(),
            payment_settings: PaymentSettings::default(),
            tax_settings: TaxSettings::default(),
        };

        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["exportDate"], "2026-08-10");
        assert!(json["transactionArchive"].is_array());
        assert!(json["storeSettings"].is_object());

        let back: ExportBundle = serde_json::from_value(json).unwrap();
        assert_eq!(back.version, EXPORT_VERSION);
    }
}
