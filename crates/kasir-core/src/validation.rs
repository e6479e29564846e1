//! # Validation Module
//!
//! Input validation utilities for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: UI (out of scope)                                         │
//! │  └── Basic format checks, immediate feedback                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - field-level rules                           │
//! │  └── empty names, negative prices, blank reasons                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Business rules (cart/checkout/ledger modules)             │
//! │  └── stock capacity, refund bounds, stage transitions               │
//! │                                                                     │
//! │  A validation failure aborts the operation with no state change.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_IMAGE_BYTES;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name",
            max: 200,
        });
    }

    Ok(())
}

/// Validates and trims a customer name (required before method selection).
///
/// ## Returns
/// The trimmed name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name",
        });
    }

    Ok(name.to_string())
}

/// Validates a required free-text reason (refunds, voids, stock updates).
///
/// ## Returns
/// The trimmed reason.
pub fn validate_reason(reason: &str) -> ValidationResult<String> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required { field: "reason" });
    }

    Ok(reason.to_string())
}

/// Normalizes an optional free-text field: trims, and maps blank to None.
pub fn normalize_optional(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Validates an optional product image data-URI.
///
/// ## Rules
/// - At most [`MAX_IMAGE_BYTES`] (1 MiB)
pub fn validate_image(image: Option<&str>) -> ValidationResult<()> {
    if let Some(data) = image {
        if data.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::TooLarge {
                field: "image",
                max: MAX_IMAGE_BYTES,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free items)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative { field: "price" });
    }

    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Must be zero or greater
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative { field: "stock" });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
