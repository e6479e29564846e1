//! End-to-end register flows over an in-memory store: cart to payment
//! to ledger, refunds, voids, and the digital payment window.

use chrono::{DateTime, Duration, Utc};

use kasir_core::{
    CheckoutStage, Discount, DiscountKind, Money, NewProduct, PaymentMethod, ProductCategory,
    RefundItem, ReportPeriod, TaxMode, TaxRate, TaxSettings, TransactionStatus,
    DIGITAL_PAYMENT_WINDOW_SECS,
};
use kasir_engine::{EngineError, PaymentSettings, PaymentStatus, PosEvent, PosService};
use kasir_store::MemoryStore;

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn t0() -> DateTime<Utc> {
    at("2026-08-10T09:00:00Z")
}

fn kopi(stock: i64) -> NewProduct {
    NewProduct {
        name: "Kopi Susu".to_string(),
        category: ProductCategory::Beverage,
        price: Money::new(10_000),
        stock,
        image: None,
        barcode: Some("8991234567890".to_string()),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn service_with_kopi(stock: i64) -> (PosService<MemoryStore>, i64) {
    init_tracing();
    let mut pos = PosService::new(MemoryStore::new());
    pos.load(t0()).await.unwrap();
    let product = pos.create_product(kopi(stock), t0()).await.unwrap();
    (pos, product.id)
}

fn add_units(pos: &mut PosService<MemoryStore>, product_id: i64, units: usize) {
    for _ in 0..units {
        pos.add_to_cart(product_id).unwrap();
    }
}

fn to_cash_entry(pos: &mut PosService<MemoryStore>) {
    pos.begin_checkout().unwrap();
    pos.submit_order_info("Budi", "4").unwrap();
    pos.select_payment_method(PaymentMethod::Cash, t0()).unwrap();
}

#[tokio::test]
async fn cash_sale_end_to_end() {
    let (mut pos, product_id) = service_with_kopi(5).await;

    add_units(&mut pos, product_id, 3);
    assert_eq!(pos.totals().total.amount(), 30_000);

    to_cash_entry(&mut pos);
    let sale = pos
        .confirm_cash_payment(Money::new(50_000), t0())
        .await
        .unwrap();

    assert_eq!(sale.total.amount(), 30_000);
    assert_eq!(sale.cash_paid, Some(Money::new(50_000)));
    assert_eq!(sale.change, Some(Money::new(20_000)));
    assert_eq!(sale.customer_name, "Budi");
    assert_eq!(sale.table_number.as_deref(), Some("4"));
    assert_eq!(sale.status, TransactionStatus::Completed);

    // Stock decremented, cart cleared, checkout reset
    assert_eq!(pos.product(product_id).unwrap().stock, 2);
    assert!(pos.cart().is_empty());
    assert_eq!(pos.checkout_stage(), CheckoutStage::Idle);

    // Ledger holds the sale, most recent first
    assert_eq!(pos.transactions().len(), 1);
    assert_eq!(pos.transactions()[0].id, sale.id);

    // And a receipt can be printed for it
    let receipt = pos.receipt(sale.id).unwrap();
    assert!(receipt.contains("Kopi Susu"));
    assert!(receipt.contains("Rp30.000"));
    assert!(receipt.contains("Budi"));
}

#[tokio::test]
async fn insufficient_cash_keeps_the_attempt_alive() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    add_units(&mut pos, product_id, 3);
    to_cash_entry(&mut pos);

    let err = pos
        .confirm_cash_payment(Money::new(20_000), t0())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Core(_)));
    assert_eq!(pos.checkout_stage(), CheckoutStage::CashEntry);

    // Nothing was recorded or decremented
    assert!(pos.transactions().is_empty());
    assert_eq!(pos.product(product_id).unwrap().stock, 5);

    // The cashier retries with enough cash
    let sale = pos
        .confirm_cash_payment(Money::new(30_000), t0())
        .await
        .unwrap();
    assert_eq!(sale.change, Some(Money::zero()));
}

#[tokio::test]
async fn empty_cart_cannot_enter_checkout() {
    let (mut pos, _) = service_with_kopi(5).await;
    assert!(pos.begin_checkout().is_err());
    assert_eq!(pos.checkout_stage(), CheckoutStage::Idle);
}

#[tokio::test]
async fn partial_then_full_refund() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    add_units(&mut pos, product_id, 3);
    to_cash_entry(&mut pos);
    let sale = pos
        .confirm_cash_payment(Money::new(50_000), t0())
        .await
        .unwrap();
    assert_eq!(pos.product(product_id).unwrap().stock, 2);

    // Refund one unit: stock comes back, counters advance
    let refund = pos
        .refund(
            sale.id,
            &[RefundItem { item_index: 0, qty: 1 }],
            "salah pesanan",
            t0() + Duration::minutes(5),
        )
        .await
        .unwrap();
    assert_eq!(refund.total.amount(), 10_000);
    assert_eq!(refund.original_transaction_id, Some(sale.id));
    assert_eq!(pos.product(product_id).unwrap().stock, 3);

    let original = pos.transaction(sale.id).unwrap();
    assert_eq!(original.items[0].refunded_qty, 1);
    assert!(!original.items[0].refunded);
    assert_eq!(original.refunds.len(), 1);

    // Refund the remaining two
    pos.refund(
        sale.id,
        &[RefundItem { item_index: 0, qty: 2 }],
        "batal semua",
        t0() + Duration::minutes(6),
    )
    .await
    .unwrap();
    assert_eq!(pos.product(product_id).unwrap().stock, 5);
    assert!(pos.transaction(sale.id).unwrap().items[0].refunded);

    // Nothing left to refund
    assert!(pos
        .refund(
            sale.id,
            &[RefundItem { item_index: 0, qty: 1 }],
            "lagi",
            t0() + Duration::minutes(7),
        )
        .await
        .is_err());
}

#[tokio::test]
async fn void_restores_full_stock() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    add_units(&mut pos, product_id, 3);
    to_cash_entry(&mut pos);
    let sale = pos
        .confirm_cash_payment(Money::new(30_000), t0())
        .await
        .unwrap();

    pos.void_sale(sale.id, "admin", "input salah", t0() + Duration::minutes(1))
        .await
        .unwrap();

    assert_eq!(pos.product(product_id).unwrap().stock, 5);
    let voided = pos.transaction(sale.id).unwrap();
    assert_eq!(voided.status, TransactionStatus::Voided);
    assert_eq!(
        voided.void_data.as_ref().unwrap().voided_by,
        "admin"
    );

    // A voided sale cannot be refunded
    assert!(pos
        .refund(
            sale.id,
            &[RefundItem { item_index: 0, qty: 1 }],
            "no",
            t0() + Duration::minutes(2),
        )
        .await
        .is_err());
}

#[tokio::test]
async fn digital_payment_flow() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    add_units(&mut pos, product_id, 2);
    pos.begin_checkout().unwrap();
    pos.submit_order_info("Sari", "").unwrap();

    let mut rx = pos.subscribe();
    pos.select_payment_method(PaymentMethod::Qris, t0()).unwrap();
    assert_eq!(pos.checkout_stage(), CheckoutStage::DigitalWait);

    match rx.try_recv().unwrap() {
        PosEvent::PaymentStateChanged {
            method,
            total,
            status,
            ..
        } => {
            assert_eq!(method, Some(PaymentMethod::Qris));
            assert_eq!(total.amount(), 20_000);
            assert_eq!(status, PaymentStatus::Pending);
        }
        other => panic!("unexpected event: {:?}", other),
    }

    let sale = pos
        .confirm_digital_payment(t0() + Duration::seconds(30))
        .await
        .unwrap();
    assert_eq!(sale.payment_method, PaymentMethod::Qris);
    assert_eq!(sale.cash_paid, None);
    assert_eq!(sale.change, None);
    assert_eq!(sale.table_number, None);
}

#[tokio::test]
async fn digital_window_expiry_falls_back_to_method_select() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    add_units(&mut pos, product_id, 1);
    pos.begin_checkout().unwrap();
    pos.submit_order_info("Sari", "").unwrap();
    pos.select_payment_method(PaymentMethod::GoPay, t0()).unwrap();

    let mut rx = pos.subscribe();
    let late = t0() + Duration::seconds(DIGITAL_PAYMENT_WINDOW_SECS + 1);
    assert!(pos.poll_payment_timeout(late));
    assert_eq!(pos.checkout_stage(), CheckoutStage::MethodSelect);

    match rx.try_recv().unwrap() {
        PosEvent::PaymentStateChanged { status, method, .. } => {
            assert_eq!(status, PaymentStatus::Expired);
            assert_eq!(method, Some(PaymentMethod::GoPay));
        }
        other => panic!("unexpected event: {:?}", other),
    }

    // The order is not lost: pick another method and finish
    pos.select_payment_method(PaymentMethod::Dana, late).unwrap();
    let sale = pos
        .confirm_digital_payment(late + Duration::seconds(10))
        .await
        .unwrap();
    assert_eq!(sale.payment_method, PaymentMethod::Dana);
}

#[tokio::test]
async fn confirming_after_expiry_fails_and_reports() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    add_units(&mut pos, product_id, 1);
    pos.begin_checkout().unwrap();
    pos.submit_order_info("Sari", "").unwrap();
    pos.select_payment_method(PaymentMethod::Ovo, t0()).unwrap();

    let late = t0() + Duration::seconds(DIGITAL_PAYMENT_WINDOW_SECS + 5);
    let err = pos.confirm_digital_payment(late).await.unwrap_err();
    assert!(matches!(err, EngineError::Core(_)));
    assert_eq!(pos.checkout_stage(), CheckoutStage::MethodSelect);
    assert!(pos.transactions().is_empty());
}

#[tokio::test]
async fn cart_mutation_clears_pending_payment() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    add_units(&mut pos, product_id, 1);
    pos.begin_checkout().unwrap();
    pos.submit_order_info("Sari", "").unwrap();
    pos.select_payment_method(PaymentMethod::Qris, t0()).unwrap();

    let mut rx = pos.subscribe();
    pos.add_to_cart(product_id).unwrap();

    // The pending confirmation is invalidated, then the cart update lands
    assert_eq!(pos.checkout_stage(), CheckoutStage::Idle);
    match rx.try_recv().unwrap() {
        PosEvent::PaymentStateChanged { status, .. } => {
            assert_eq!(status, PaymentStatus::Cleared)
        }
        other => panic!("unexpected event: {:?}", other),
    }
    match rx.try_recv().unwrap() {
        PosEvent::CartChanged { lines, totals } => {
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].qty, 2);
            assert_eq!(totals.total.amount(), 20_000);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn disabled_payment_method_is_rejected() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    pos.set_payment_settings(PaymentSettings {
        enabled_methods: vec![PaymentMethod::Cash],
    })
    .await
    .unwrap();

    add_units(&mut pos, product_id, 1);
    pos.begin_checkout().unwrap();
    pos.submit_order_info("Budi", "").unwrap();

    let err = pos
        .select_payment_method(PaymentMethod::Qris, t0())
        .unwrap_err();
    assert!(matches!(err, EngineError::MethodDisabled(_)));
    assert_eq!(pos.checkout_stage(), CheckoutStage::MethodSelect);

    pos.select_payment_method(PaymentMethod::Cash, t0()).unwrap();
}

#[tokio::test]
async fn barcode_scan_adds_to_cart() {
    let (mut pos, product_id) = service_with_kopi(5).await;

    assert!(pos.add_by_barcode("8991234567890").unwrap());
    assert_eq!(pos.cart().quantity_for(product_id), 1);

    // Unknown barcode is not an error, just a miss
    assert!(!pos.add_by_barcode("000000").unwrap());
    assert_eq!(pos.cart().lines().len(), 1);
}

#[tokio::test]
async fn discount_and_exclusive_tax_flow_into_the_sale() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    pos.set_tax_settings(TaxSettings {
        enabled: true,
        rate: TaxRate::from_bps(1000),
        mode: TaxMode::Exclusive,
        label: "PPN 10%".to_string(),
    })
    .await
    .unwrap();

    add_units(&mut pos, product_id, 3);
    pos.apply_discount(Discount {
        kind: DiscountKind::Fixed,
        value: 5_000,
        reason: "voucher".to_string(),
    })
    .unwrap();

    // 30000 − 5000 discount + 3000 exclusive tax on the subtotal
    let totals = pos.totals();
    assert_eq!(totals.subtotal.amount(), 30_000);
    assert_eq!(totals.discount.amount(), 5_000);
    assert_eq!(totals.tax.amount(), 3_000);
    assert_eq!(totals.total.amount(), 28_000);

    to_cash_entry(&mut pos);
    let sale = pos
        .confirm_cash_payment(Money::new(30_000), t0())
        .await
        .unwrap();
    assert_eq!(sale.total.amount(), 28_000);
    assert_eq!(sale.change, Some(Money::new(2_000)));
}

#[tokio::test]
async fn daily_report_reconciles_after_refund() {
    let (mut pos, product_id) = service_with_kopi(5).await;
    add_units(&mut pos, product_id, 3);
    to_cash_entry(&mut pos);
    let sale = pos
        .confirm_cash_payment(Money::new(30_000), t0())
        .await
        .unwrap();
    pos.refund(
        sale.id,
        &[RefundItem { item_index: 0, qty: 3 }],
        "batal semua",
        t0() + Duration::minutes(10),
    )
    .await
    .unwrap();

    let report = pos.report(ReportPeriod::Daily("2026-08-10".parse().unwrap()));
    assert_eq!(report.transactions.len(), 2);
    assert_eq!(report.total_sales.amount(), 0);
    assert_eq!(report.total_transactions, 1);
    assert_eq!(report.total_refunds, 1);
    assert_eq!(report.refund_amount.amount(), 30_000);

    // Product nets to zero units sold
    assert_eq!(report.product_summary[0].qty, 0);
}
