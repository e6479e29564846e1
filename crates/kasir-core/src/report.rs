//! # Sales Reporting
//!
//! Aggregates the ledger into per-period reports: revenue, refunds,
//! payment-method and product breakdowns, and for multi-day periods a
//! day-by-day series.
//!
//! Reporting is a pure fold over transaction records. Voided sales are
//! listed (so staff can see them) but excluded from every total.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{PaymentMethod, Transaction, TransactionStatus};

// =============================================================================
// Periods
// =============================================================================

/// The date window a report covers. All boundaries are inclusive and
/// compared on the calendar date of the record (local convention:
/// whatever zone the timestamps were minted in).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// One calendar day.
    Daily(NaiveDate),
    /// Seven days starting at the given date.
    Weekly(NaiveDate),
    /// One calendar month.
    Monthly { year: i32, month: u32 },
    /// One calendar year.
    Yearly(i32),
    /// Arbitrary inclusive range.
    Custom { start: NaiveDate, end: NaiveDate },
}

impl ReportPeriod {
    /// Whether the record timestamp falls inside the period.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let date = at.date_naive();
        match *self {
            ReportPeriod::Daily(day) => date == day,
            ReportPeriod::Weekly(start) => date >= start && date <= start + Duration::days(6),
            ReportPeriod::Monthly { year, month } => {
                date.year() == year && date.month() == month
            }
            ReportPeriod::Yearly(year) => date.year() == year,
            ReportPeriod::Custom { start, end } => date >= start && date <= end,
        }
    }

    /// Multi-day periods get the day-by-day series in the report.
    pub fn is_multi_day(&self) -> bool {
        match *self {
            ReportPeriod::Daily(_) => false,
            ReportPeriod::Custom { start, end } => start != end,
            _ => true,
        }
    }
}

// =============================================================================
// Report Shapes
// =============================================================================

/// Count and amount of sales paid with one method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub count: usize,
    pub amount: Money,
}

/// Net units and revenue of one product over the period. Refunds
/// subtract, so a fully refunded product nets to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub qty: i64,
    pub revenue: Money,
}

/// One day of a multi-day report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBreakdown {
    pub date: NaiveDate,
    pub sales: Money,
    pub transactions: usize,
    pub refunds: Money,
}

/// Everything the reporting screens show for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    /// All records in the period, voided included, ledger order.
    pub transactions: Vec<Transaction>,
    /// Sales minus refunds. Voided sales contribute nothing.
    pub total_sales: Money,
    /// Completed (non-voided) sale count.
    pub total_transactions: usize,
    pub total_refunds: usize,
    pub refund_amount: Money,
    pub payment_summary: BTreeMap<PaymentMethod, PaymentSummary>,
    pub product_summary: Vec<ProductSummary>,
    /// Present only for multi-day periods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_analysis: Option<Vec<DailyBreakdown>>,
}

// =============================================================================
// Builder
// =============================================================================

/// Folds the given records (active + archive) into a report for the
/// period.
pub fn build_report<'a, I>(period: ReportPeriod, records: I) -> SalesReport
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let transactions: Vec<Transaction> = records
        .into_iter()
        .filter(|t| period.contains(t.date))
        .cloned()
        .collect();

    let mut total_sales = Money::zero();
    let mut total_transactions = 0;
    let mut total_refunds = 0;
    let mut refund_amount = Money::zero();
    let mut payment_summary: BTreeMap<PaymentMethod, PaymentSummary> = BTreeMap::new();
    let mut products: BTreeMap<String, ProductSummary> = BTreeMap::new();
    let mut days: BTreeMap<NaiveDate, DailyBreakdown> = BTreeMap::new();

    for transaction in &transactions {
        let day = days
            .entry(transaction.date.date_naive())
            .or_insert_with(|| DailyBreakdown {
                date: transaction.date.date_naive(),
                sales: Money::zero(),
                transactions: 0,
                refunds: Money::zero(),
            });

        if transaction.is_refund() {
            total_sales -= transaction.total;
            total_refunds += 1;
            refund_amount += transaction.total;
            day.refunds += transaction.total;

            for item in &transaction.items {
                let entry = products
                    .entry(item.name.clone())
                    .or_insert_with(|| ProductSummary {
                        name: item.name.clone(),
                        qty: 0,
                        revenue: Money::zero(),
                    });
                entry.qty -= item.qty;
                entry.revenue -= item.line_total();
            }
            continue;
        }

        if transaction.status == TransactionStatus::Voided {
            continue;
        }

        total_sales += transaction.total;
        total_transactions += 1;
        day.sales += transaction.total;
        day.transactions += 1;

        let by_method = payment_summary.entry(transaction.payment_method).or_default();
        by_method.count += 1;
        by_method.amount += transaction.total;

        for item in &transaction.items {
            let entry = products
                .entry(item.name.clone())
                .or_insert_with(|| ProductSummary {
                    name: item.name.clone(),
                    qty: 0,
                    revenue: Money::zero(),
                });
            entry.qty += item.qty;
            entry.revenue += item.line_total();
        }
    }

    let mut product_summary: Vec<ProductSummary> = products.into_values().collect();
    product_summary.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));

    let daily_analysis = if period.is_multi_day() {
        Some(days.into_values().collect())
    } else {
        None
    };

    SalesReport {
        transactions,
        total_sales,
        total_transactions,
        total_refunds,
        refund_amount,
        payment_summary,
        product_summary,
        daily_analysis,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
