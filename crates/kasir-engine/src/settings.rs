//! # Store & Payment Settings
//!
//! Operator-editable configuration persisted as JSON blobs. Field names
//! are part of the on-disk format (camelCase, matching historic data).

use serde::{Deserialize, Serialize};

use kasir_core::PaymentMethod;

/// Store identity printed on receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    pub store_name: String,
    pub address: String,
    pub phone: String,
    /// Closing line on the receipt.
    pub footer_text: String,
    /// Receipt width in characters (thermal printers are 32 or 48).
    pub paper_width: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            store_name: "Kasir POS".to_string(),
            address: String::new(),
            phone: String::new(),
            footer_text: "Terima kasih atas kunjungan Anda".to_string(),
            paper_width: 32,
        }
    }
}

/// Which payment methods the register offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentSettings {
    pub enabled_methods: Vec<PaymentMethod>,
}

impl PaymentSettings {
    pub fn is_enabled(&self, method: PaymentMethod) -> bool {
        self.enabled_methods.contains(&method)
    }
}

impl Default for PaymentSettings {
    fn default() -> Self {
        PaymentSettings {
            enabled_methods: vec![
                PaymentMethod::Cash,
                PaymentMethod::Qris,
                PaymentMethod::GoPay,
                PaymentMethod::Ovo,
                PaymentMethod::Dana,
                PaymentMethod::ShopeePay,
                PaymentMethod::Debit,
                PaymentMethod::Credit,
            ],
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
