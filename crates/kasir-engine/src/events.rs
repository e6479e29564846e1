//! # Engine Events
//!
//! Broadcast notifications for display consumers (cashier screen,
//! customer-facing display, receipt printer daemon).
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Event Fan-Out                                │
//! │                                                                     │
//! │  PosService mutation                                                │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  EventBus::publish ──► tokio broadcast channel                      │
//! │                              │                                      │
//! │                              ├──► cashier UI subscriber             │
//! │                              ├──► customer display subscriber       │
//! │                              └──► (none? message is dropped, fine)  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events are fire-and-forget: the engine never blocks on or fails
//! because of a subscriber.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use kasir_core::{CartLine, CartTotals, Money, PaymentMethod};

/// Where a payment confirmation currently stands, for the customer
/// display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Digital method selected, waiting for confirmation.
    Pending,
    /// Payment confirmed, transaction recorded.
    Completed,
    /// Digital payment window ran out ("waktu pembayaran habis").
    Expired,
    /// Checkout cancelled or invalidated by a cart change.
    Cleared,
}

/// Notifications published by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PosEvent {
    /// The cart contents or totals changed.
    #[serde(rename_all = "camelCase")]
    CartChanged {
        lines: Vec<CartLine>,
        totals: CartTotals,
    },
    /// The payment confirmation state changed.
    #[serde(rename_all = "camelCase")]
    PaymentStateChanged {
        method: Option<PaymentMethod>,
        total: Money,
        cash_paid: Option<Money>,
        change: Option<Money>,
        status: PaymentStatus,
    },
}

/// Broadcast wrapper. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PosEvent>,
}

impl EventBus {
    /// A slow subscriber lags rather than blocking the register.
    const CAPACITY: usize = 64;

    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CAPACITY);
        EventBus { sender }
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PosEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event. No subscribers is not an error.
    pub fn publish(&self, event: PosEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        EventBus::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
