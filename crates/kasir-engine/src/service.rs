//! # PosService
//!
//! The service controller: owns the catalog, cart, checkout and ledger,
//! talks to the key-value store, and broadcasts events. This is the
//! only place where core state, the clock-adjacent id generator, and
//! persistence meet.
//!
//! ## Orchestration Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      PosService Orchestration                       │
//! │                                                                     │
//! │  • Core decides, service applies: every business rule lives in      │
//! │    kasir-core; this layer sequences calls and persists results      │
//! │  • Explicit time: callers pass `now`, so flows (and tests) control  │
//! │    the clock; only id minting reads the wall clock internally       │
//! │  • Cart mutations invalidate a pending payment confirmation         │
//! │  • Reads degrade to defaults on failure (the register must start);  │
//! │    writes surface their errors (a sale must not vanish silently)    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use kasir_core::report::build_report;
use kasir_core::{
    Cart, CartTotals, Checkout, CheckoutCompletion, CheckoutStage, CoreError, Discount, IdGen,
    Money, NewProduct, PaymentMethod, Product, ProductCatalog, RefundItem, ReportPeriod,
    ResetPolicy, SalesReport, TaxSettings, Transaction, TransactionItem, TransactionKind,
    TransactionLedger, TransactionStatus, VoidData,
};
use kasir_store::{codec, keys, KeyValueStore};

use crate::backup::{ExportBundle, EXPORT_VERSION};
use crate::error::{EngineError, EngineResult};
use crate::events::{EventBus, PaymentStatus, PosEvent};
use crate::receipt::render_receipt;
use crate::settings::{PaymentSettings, StoreSettings};

/// The POS engine: one instance per register.
pub struct PosService<S: KeyValueStore> {
    store: S,
    catalog: ProductCatalog,
    cart: Cart,
    checkout: Checkout,
    ledger: TransactionLedger,
    tax: TaxSettings,
    store_settings: StoreSettings,
    payment_settings: PaymentSettings,
    reset_policy: ResetPolicy,
    ids: IdGen,
    events: EventBus,
}

impl<S: KeyValueStore> PosService<S> {
    /// Creates an empty service over the given store. Call
    /// [`PosService::load`] before use.
    pub fn new(store: S) -> Self {
        PosService {
            store,
            catalog: ProductCatalog::new(),
            cart: Cart::new(),
            checkout: Checkout::new(),
            ledger: TransactionLedger::new(),
            tax: TaxSettings::default(),
            store_settings: StoreSettings::default(),
            payment_settings: PaymentSettings::default(),
            reset_policy: ResetPolicy::default(),
            ids: IdGen::new(),
            events: EventBus::new(),
        }
    }

    /// Switches the startup sweep to the legacy behavior.
    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Hydrates all state from the store and runs the startup sweeps
    /// (archival of old records, the daily reset marker).
    ///
    /// Missing or corrupt blobs fall back to defaults; the register
    /// must come up even over torn data.
    pub async fn load(&mut self, now: DateTime<Utc>) -> EngineResult<()> {
        let products: Vec<Product> = codec::read_or_default(&self.store, keys::PRODUCTS).await;
        self.catalog.replace_all(products);

        let active: Vec<Transaction> =
            codec::read_or_default(&self.store, keys::TRANSACTIONS).await;
        let archive: Vec<Transaction> =
            codec::read_or_default(&self.store, keys::TRANSACTION_ARCHIVE).await;
        self.ledger.replace(active, archive);

        self.tax = codec::read_or_default(&self.store, keys::TAX_SETTINGS).await;
        self.store_settings = codec::read_or_default(&self.store, keys::STORE_SETTINGS).await;
        self.payment_settings = codec::read_or_default(&self.store, keys::PAYMENT_SETTINGS).await;

        let today = now.date_naive();

        // Fresh install: stamp the first-load date and skip the sweep
        let first_login = self.read_marker(keys::FIRST_LOGIN_DATE).await;
        if first_login.is_none() {
            self.write_marker(keys::FIRST_LOGIN_DATE, today).await?;
        } else {
            let last_reset = self.read_marker(keys::LAST_RESET_DATE).await;
            let outcome = self.ledger.daily_reset(today, last_reset, self.reset_policy);
            if outcome.removed > 0 {
                warn!(
                    removed = outcome.removed,
                    "Legacy daily reset dropped today's transactions"
                );
                self.persist_transactions().await?;
            }
            if outcome.marker_updated {
                self.write_marker(keys::LAST_RESET_DATE, today).await?;
            }
        }

        let archived = self.ledger.archive_old(now);
        if archived > 0 {
            info!(archived, "Moved old transactions to the archive");
            self.persist_transactions().await?;
        }

        info!(
            products = self.catalog.all().len(),
            transactions = self.ledger.active().len(),
            "Engine loaded"
        );
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn products(&self) -> &[Product] {
        self.catalog.all()
    }

    pub fn product(&self, id: i64) -> Option<&Product> {
        self.catalog.get(id)
    }

    /// Products at or below the restock threshold.
    pub fn low_stock(&self, threshold: i64) -> Vec<&Product> {
        self.catalog.low_stock(threshold)
    }

    pub async fn create_product(
        &mut self,
        new: NewProduct,
        now: DateTime<Utc>,
    ) -> EngineResult<Product> {
        let id = self.ids.next();
        let product = self.catalog.create(new, id, now)?.clone();
        self.persist_products().await?;
        info!(id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn update_product(
        &mut self,
        id: i64,
        fields: NewProduct,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        self.catalog.update(id, fields, now)?;
        self.persist_products().await?;
        Ok(())
    }

    pub async fn delete_product(&mut self, id: i64) -> EngineResult<()> {
        self.catalog.delete(id)?;
        self.persist_products().await?;
        info!(id, "Product deleted");
        Ok(())
    }

    /// Manual stock override; requires a reason for the audit trail.
    pub async fn set_stock(&mut self, id: i64, new_stock: i64, reason: &str) -> EngineResult<()> {
        self.catalog.set_stock(id, new_stock, reason)?;
        self.persist_products().await?;
        info!(id, new_stock, reason, "Stock adjusted manually");
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals(&self.tax)
    }

    pub fn add_to_cart(&mut self, product_id: i64) -> EngineResult<()> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        let cart_id = self.ids.next();
        self.cart.add_product(product, cart_id)?;
        self.after_cart_mutation();
        Ok(())
    }

    /// Scanner path: `false` means the barcode matched nothing, which
    /// is routine (misreads, unlisted items), not an error.
    pub fn add_by_barcode(&mut self, barcode: &str) -> EngineResult<bool> {
        let Some(product_id) = self.catalog.find_by_barcode(barcode).map(|p| p.id) else {
            return Ok(false);
        };
        self.add_to_cart(product_id)?;
        Ok(true)
    }

    pub fn update_cart_qty(&mut self, cart_id: i64, delta: i64) -> EngineResult<()> {
        let product_id = self
            .cart
            .lines()
            .iter()
            .find(|l| l.cart_id == cart_id)
            .map(|l| l.product_id)
            .ok_or(CoreError::LineNotFound(cart_id))?;
        let product = self
            .catalog
            .get(product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        self.cart.update_qty(cart_id, delta, product)?;
        self.after_cart_mutation();
        Ok(())
    }

    pub fn remove_cart_line(&mut self, cart_id: i64) -> EngineResult<()> {
        self.cart.remove_line(cart_id)?;
        self.after_cart_mutation();
        Ok(())
    }

    pub fn set_line_note(&mut self, cart_id: i64, note: &str) -> EngineResult<()> {
        self.cart.set_note(cart_id, note)?;
        self.after_cart_mutation();
        Ok(())
    }

    pub fn apply_discount(&mut self, discount: Discount) -> EngineResult<()> {
        self.cart.apply_discount(discount)?;
        self.after_cart_mutation();
        Ok(())
    }

    pub fn remove_discount(&mut self) {
        self.cart.remove_discount();
        self.after_cart_mutation();
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.after_cart_mutation();
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    pub fn checkout_stage(&self) -> CheckoutStage {
        self.checkout.stage()
    }

    pub fn begin_checkout(&mut self) -> EngineResult<()> {
        self.checkout.begin(self.cart.is_empty())?;
        Ok(())
    }

    pub fn submit_order_info(&mut self, customer_name: &str, table_number: &str) -> EngineResult<()> {
        self.checkout.submit_order_info(customer_name, table_number)?;
        Ok(())
    }

    pub fn select_payment_method(
        &mut self,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        if !self.payment_settings.is_enabled(method) {
            return Err(EngineError::MethodDisabled(method.label().to_string()));
        }
        self.checkout.select_method(method, now)?;
        if !method.is_cash() {
            self.publish_payment(Some(method), None, None, PaymentStatus::Pending);
        }
        Ok(())
    }

    /// Drives the digital payment countdown; the caller ticks this from
    /// its timer. Returns `true` when the window just expired.
    pub fn poll_payment_timeout(&mut self, now: DateTime<Utc>) -> bool {
        let method = self.checkout.method();
        if self.checkout.poll_timeout(now) {
            warn!("Digital payment window expired, waktu pembayaran habis");
            self.publish_payment(method, None, None, PaymentStatus::Expired);
            return true;
        }
        false
    }

    pub async fn confirm_cash_payment(
        &mut self,
        cash_paid: Money,
        now: DateTime<Utc>,
    ) -> EngineResult<Transaction> {
        let total = self.cart.total(&self.tax);
        let completion = self.checkout.confirm_cash(cash_paid, total)?;
        self.finalize_sale(completion, now).await
    }

    pub async fn confirm_digital_payment(
        &mut self,
        now: DateTime<Utc>,
    ) -> EngineResult<Transaction> {
        let method = self.checkout.method();
        match self.checkout.confirm_digital(now) {
            Ok(completion) => self.finalize_sale(completion, now).await,
            Err(err @ CoreError::PaymentWindowExpired) => {
                warn!("Digital payment window expired, waktu pembayaran habis");
                self.publish_payment(method, None, None, PaymentStatus::Expired);
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn cancel_checkout(&mut self) {
        if self.checkout.stage() != CheckoutStage::Idle {
            self.checkout.cancel();
            self.publish_payment(None, None, None, PaymentStatus::Cleared);
        }
    }

    /// Turns a confirmed checkout into a recorded sale: snapshot the
    /// cart, decrement stock, append to the ledger, persist, notify.
    async fn finalize_sale(
        &mut self,
        completion: CheckoutCompletion,
        now: DateTime<Utc>,
    ) -> EngineResult<Transaction> {
        let total = self.cart.total(&self.tax);
        let items: Vec<TransactionItem> = self
            .cart
            .lines()
            .iter()
            .map(|line| TransactionItem {
                product_id: line.product_id,
                name: line.name.clone(),
                price: line.price,
                qty: line.qty,
                note: line.note.clone(),
                refunded: false,
                refunded_qty: 0,
            })
            .collect();

        let transaction = Transaction {
            id: self.ids.next(),
            kind: TransactionKind::Sale,
            date: now,
            items,
            total,
            payment_method: completion.method,
            cash_paid: completion.cash_paid,
            change: completion.change,
            customer_name: completion.customer_name,
            table_number: completion.table_number,
            status: TransactionStatus::Completed,
            refunds: Vec::new(),
            original_transaction_id: None,
            refund_reason: None,
            void_data: None,
        };

        for item in &transaction.items {
            self.catalog.adjust_stock(item.product_id, -item.qty);
        }
        self.ledger.record_sale(transaction.clone());
        self.cart.clear();

        self.persist_products().await?;
        self.persist_transactions().await?;

        info!(
            id = transaction.id,
            total = %transaction.total,
            method = transaction.payment_method.label(),
            "Sale recorded"
        );
        self.events.publish(PosEvent::PaymentStateChanged {
            method: Some(transaction.payment_method),
            total: transaction.total,
            cash_paid: transaction.cash_paid,
            change: transaction.change,
            status: PaymentStatus::Completed,
        });
        self.publish_cart_changed();

        Ok(transaction)
    }

    // =========================================================================
    // Ledger: refunds & voids
    // =========================================================================

    pub fn transaction(&self, id: i64) -> Option<&Transaction> {
        self.ledger.find(id)
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.active()
    }

    /// Refunds selected items of a completed sale and restores their
    /// stock. Returns the refund record.
    pub async fn refund(
        &mut self,
        original_id: i64,
        selections: &[RefundItem],
        reason: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<Transaction> {
        let refund_id = self.ids.next();
        let refund = self
            .ledger
            .record_refund(original_id, selections, reason, refund_id, now)?;

        for item in &refund.items {
            self.catalog.adjust_stock(item.product_id, item.qty);
        }

        self.persist_products().await?;
        self.persist_transactions().await?;
        info!(
            id = refund.id,
            original = original_id,
            total = %refund.total,
            "Refund recorded"
        );
        Ok(refund)
    }

    /// Voids a completed sale and restores the full original stock.
    pub async fn void_sale(
        &mut self,
        id: i64,
        voided_by: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let restorations = self.ledger.void_transaction(
            id,
            VoidData {
                voided_by: voided_by.to_string(),
                voided_at: now,
                reason: reason.to_string(),
            },
        )?;

        for (product_id, qty) in restorations {
            self.catalog.adjust_stock(product_id, qty);
        }

        self.persist_products().await?;
        self.persist_transactions().await?;
        info!(id, voided_by, "Transaction voided");
        Ok(())
    }

    // =========================================================================
    // Reporting & receipts
    // =========================================================================

    /// Builds a sales report over the whole ledger (active + archive).
    pub fn report(&self, period: ReportPeriod) -> SalesReport {
        build_report(period, self.ledger.all())
    }

    /// Renders the printable receipt for a recorded transaction.
    pub fn receipt(&self, transaction_id: i64) -> EngineResult<String> {
        let transaction = self
            .ledger
            .find(transaction_id)
            .ok_or(CoreError::TransactionNotFound(transaction_id))?;
        Ok(render_receipt(transaction, &self.store_settings))
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn tax_settings(&self) -> &TaxSettings {
        &self.tax
    }

    pub fn store_settings(&self) -> &StoreSettings {
        &self.store_settings
    }

    pub fn payment_settings(&self) -> &PaymentSettings {
        &self.payment_settings
    }

    pub async fn set_tax_settings(&mut self, settings: TaxSettings) -> EngineResult<()> {
        self.tax = settings;
        codec::write_json(&self.store, keys::TAX_SETTINGS, &self.tax).await?;
        // Totals shift with the tax mode
        self.publish_cart_changed();
        Ok(())
    }

    pub async fn set_store_settings(&mut self, settings: StoreSettings) -> EngineResult<()> {
        self.store_settings = settings;
        codec::write_json(&self.store, keys::STORE_SETTINGS, &self.store_settings).await?;
        Ok(())
    }

    pub async fn set_payment_settings(&mut self, settings: PaymentSettings) -> EngineResult<()> {
        self.payment_settings = settings;
        codec::write_json(&self.store, keys::PAYMENT_SETTINGS, &self.payment_settings).await?;
        Ok(())
    }

    // =========================================================================
    // Backup
    // =========================================================================

    /// Snapshots the whole install into one bundle and stamps the
    /// backup marker.
    pub async fn export_data(&mut self, today: NaiveDate) -> EngineResult<ExportBundle> {
        let bundle = ExportBundle {
            version: EXPORT_VERSION,
            export_date: today,
            products: self.catalog.all().to_vec(),
            transactions: self.ledger.active().to_vec(),
            transaction_archive: self.ledger.archive().to_vec(),
            store_settings: self.store_settings.clone(),
            payment_settings: self.payment_settings.clone(),
            tax_settings: self.tax.clone(),
        };
        self.write_marker(keys::LAST_BACKUP_DATE, today).await?;
        info!(date = %today, "Data exported");
        Ok(bundle)
    }

    /// Full replace of the install's state from a bundle. The cart and
    /// any checkout in progress are discarded.
    pub async fn import_data(&mut self, bundle: ExportBundle) -> EngineResult<()> {
        self.catalog.replace_all(bundle.products);
        self.ledger
            .replace(bundle.transactions, bundle.transaction_archive);
        self.store_settings = bundle.store_settings;
        self.payment_settings = bundle.payment_settings;
        self.tax = bundle.tax_settings;
        self.cart.clear();
        self.checkout.cancel();

        self.persist_products().await?;
        self.persist_transactions().await?;
        codec::write_json(&self.store, keys::STORE_SETTINGS, &self.store_settings).await?;
        codec::write_json(&self.store, keys::PAYMENT_SETTINGS, &self.payment_settings).await?;
        codec::write_json(&self.store, keys::TAX_SETTINGS, &self.tax).await?;

        info!(version = bundle.version, "Data imported");
        self.publish_cart_changed();
        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribes to engine notifications.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<PosEvent> {
        self.events.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Every cart mutation invalidates a pending payment confirmation
    /// and notifies subscribers of the new totals.
    fn after_cart_mutation(&mut self) {
        if self.checkout.stage() != CheckoutStage::Idle {
            self.checkout.cancel();
            self.publish_payment(None, None, None, PaymentStatus::Cleared);
        }
        self.publish_cart_changed();
    }

    fn publish_cart_changed(&self) {
        self.events.publish(PosEvent::CartChanged {
            lines: self.cart.lines().to_vec(),
            totals: self.cart.totals(&self.tax),
        });
    }

    fn publish_payment(
        &self,
        method: Option<PaymentMethod>,
        cash_paid: Option<Money>,
        change: Option<Money>,
        status: PaymentStatus,
    ) {
        self.events.publish(PosEvent::PaymentStateChanged {
            method,
            total: self.cart.total(&self.tax),
            cash_paid,
            change,
            status,
        });
    }

    async fn persist_products(&self) -> EngineResult<()> {
        codec::write_json(&self.store, keys::PRODUCTS, &self.catalog.all()).await?;
        Ok(())
    }

    async fn persist_transactions(&self) -> EngineResult<()> {
        codec::write_json(&self.store, keys::TRANSACTIONS, &self.ledger.active()).await?;
        codec::write_json(&self.store, keys::TRANSACTION_ARCHIVE, &self.ledger.archive()).await?;
        Ok(())
    }

    async fn read_marker(&self, key: &str) -> Option<NaiveDate> {
        self.store
            .get(key)
            .await
            .ok()
            .flatten()
            .and_then(|raw| raw.parse().ok())
    }

    async fn write_marker(&self, key: &str, date: NaiveDate) -> EngineResult<()> {
        self.store.set(key, &date.to_string()).await?;
        Ok(())
    }
}
