//! # Checkout State Machine
//!
//! Drives an order from the populated cart to a persisted transaction.
//!
//! ## States and Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Checkout State Machine                         │
//! │                                                                     │
//! │            begin()            submit_order_info()                   │
//! │  Idle ───────────────► OrderInfo ───────────────► MethodSelect      │
//! │   ▲  (rejected if            (requires non-empty      │             │
//! │   │   cart empty)             customer name)          │             │
//! │   │                                     select_method │             │
//! │   │                        ┌──────────────────────────┤             │
//! │   │                        ▼ cash                     ▼ digital     │
//! │   │                    CashEntry                 DigitalWait        │
//! │   │                        │                          │  (300 s     │
//! │   │   confirm_cash(paid ≥  │                          │   window)   │
//! │   │   total, else stays)   │      confirm_digital     │             │
//! │   │                        ▼      (before deadline)   ▼             │
//! │   │                     [CheckoutCompletion returned, state         │
//! │   │                      resets - engine records the sale]          │
//! │   │                                                                 │
//! │   └──── cancel() from any stage, no side effects                    │
//! │                                                                     │
//! │   DigitalWait deadline passed → back to MethodSelect with the       │
//! │   "waktu pembayaran habis" notice (poll_timeout / confirm_digital)  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All transitions take explicit `now` timestamps; the actual countdown
//! timer belongs to the engine. Every failure here is a recoverable user
//! error - nothing mutates catalog or ledger state until the engine
//! consumes the returned [`CheckoutCompletion`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentMethod;
use crate::validation;
use crate::DIGITAL_PAYMENT_WINDOW_SECS;

// =============================================================================
// Stages
// =============================================================================

/// Where in the checkout flow the current attempt is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    /// No checkout in progress (cart may or may not be populated).
    Idle,
    /// Collecting customer name and table number.
    OrderInfo,
    /// Choosing a payment method.
    MethodSelect,
    /// Cash chosen; waiting for the tendered amount.
    CashEntry,
    /// Digital method chosen; waiting for manual confirmation within
    /// the payment window.
    DigitalWait,
}

impl CheckoutStage {
    pub const fn name(&self) -> &'static str {
        match self {
            CheckoutStage::Idle => "idle",
            CheckoutStage::OrderInfo => "order_info",
            CheckoutStage::MethodSelect => "method_select",
            CheckoutStage::CashEntry => "cash_entry",
            CheckoutStage::DigitalWait => "digital_wait",
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// The state of the current checkout attempt.
#[derive(Debug, Clone)]
pub struct Checkout {
    stage: CheckoutStage,
    customer_name: String,
    table_number: Option<String>,
    method: Option<PaymentMethod>,
    deadline: Option<DateTime<Utc>>,
}

impl Default for Checkout {
    fn default() -> Self {
        Checkout {
            stage: CheckoutStage::Idle,
            customer_name: String::new(),
            table_number: None,
            method: None,
            deadline: None,
        }
    }
}

/// Everything the engine needs to turn the cart into a transaction once
/// payment is confirmed. Returning this resets the state machine, so a
/// completion can only be produced once per attempt.
#[derive(Debug, Clone)]
pub struct CheckoutCompletion {
    pub customer_name: String,
    pub table_number: Option<String>,
    pub method: PaymentMethod,
    pub cash_paid: Option<Money>,
    pub change: Option<Money>,
}

impl Checkout {
    pub fn new() -> Self {
        Checkout::default()
    }

    /// `Idle → OrderInfo`. Rejected if the cart is empty.
    pub fn begin(&mut self, cart_is_empty: bool) -> CoreResult<()> {
        self.require(CheckoutStage::Idle)?;

        if cart_is_empty {
            return Err(CoreError::EmptyCart);
        }

        self.stage = CheckoutStage::OrderInfo;
        Ok(())
    }

    /// `OrderInfo → MethodSelect`. Requires a non-empty trimmed customer
    /// name; table number is optional.
    pub fn submit_order_info(&mut self, customer_name: &str, table_number: &str) -> CoreResult<()> {
        self.require(CheckoutStage::OrderInfo)?;

        self.customer_name = validation::validate_customer_name(customer_name)?;
        self.table_number = validation::normalize_optional(table_number);
        self.stage = CheckoutStage::MethodSelect;
        Ok(())
    }

    /// `MethodSelect → CashEntry` (cash) or `→ DigitalWait` (anything
    /// else, starting the payment window).
    pub fn select_method(&mut self, method: PaymentMethod, now: DateTime<Utc>) -> CoreResult<()> {
        self.require(CheckoutStage::MethodSelect)?;

        self.method = Some(method);
        if method.is_cash() {
            self.stage = CheckoutStage::CashEntry;
            self.deadline = None;
        } else {
            self.stage = CheckoutStage::DigitalWait;
            self.deadline = Some(now + Duration::seconds(DIGITAL_PAYMENT_WINDOW_SECS));
        }
        Ok(())
    }

    /// Checks the digital payment window. If it has expired the attempt
    /// drops back to `MethodSelect` and `true` is returned so the caller
    /// can surface "waktu pembayaran habis".
    pub fn poll_timeout(&mut self, now: DateTime<Utc>) -> bool {
        if self.stage != CheckoutStage::DigitalWait {
            return false;
        }
        match self.deadline {
            Some(deadline) if now > deadline => {
                self.stage = CheckoutStage::MethodSelect;
                self.method = None;
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// `CashEntry → Completed`. Requires `cash_paid >= total`; otherwise
    /// the attempt stays in `CashEntry` and the cashier retries.
    pub fn confirm_cash(&mut self, cash_paid: Money, total: Money) -> CoreResult<CheckoutCompletion> {
        self.require(CheckoutStage::CashEntry)?;

        if cash_paid < total {
            return Err(CoreError::InsufficientCash {
                total,
                paid: cash_paid,
            });
        }

        let change = cash_paid - total;
        Ok(self.complete(Some(cash_paid), Some(change)))
    }

    /// `DigitalWait → Completed`, requiring explicit confirmation before
    /// the window expires. An expired window drops back to
    /// `MethodSelect` and reports [`CoreError::PaymentWindowExpired`].
    pub fn confirm_digital(&mut self, now: DateTime<Utc>) -> CoreResult<CheckoutCompletion> {
        self.require(CheckoutStage::DigitalWait)?;

        if self.poll_timeout(now) {
            return Err(CoreError::PaymentWindowExpired);
        }

        Ok(self.complete(None, None))
    }

    /// Explicit back/close: returns to `Idle` from any stage with no
    /// side effects. Also used by the engine when a cart mutation
    /// invalidates a pending payment.
    pub fn cancel(&mut self) {
        *self = Checkout::default();
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn table_number(&self) -> Option<&str> {
        self.table_number.as_deref()
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    /// When the current digital payment window closes, if one is open.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn require(&self, expected: CheckoutStage) -> CoreResult<()> {
        if self.stage != expected {
            return Err(CoreError::InvalidCheckoutStage {
                expected: expected.name(),
                found: self.stage.name(),
            });
        }
        Ok(())
    }

    fn complete(&mut self, cash_paid: Option<Money>, change: Option<Money>) -> CheckoutCompletion {
        let completion = CheckoutCompletion {
            customer_name: std::mem::take(&mut self.customer_name),
            table_number: self.table_number.take(),
            // method is always set on the paths that reach here
            method: self.method.unwrap_or(PaymentMethod::Cash),
            cash_paid,
            change,
        };
        *self = Checkout::default();
        completion
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
