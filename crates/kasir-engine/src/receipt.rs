//! # Receipt Rendering
//!
//! Plain-text receipts for thermal printers. Layout is fixed-width
//! monospace; the width comes from the store settings (32 or 48 chars
//! for common printers).

use kasir_core::{Transaction, TransactionStatus};

use crate::settings::StoreSettings;

/// Renders a transaction as printable receipt text.
pub fn render_receipt(transaction: &Transaction, settings: &StoreSettings) -> String {
    let width = settings.paper_width.max(20);
    let mut out = String::new();

    push_centered(&mut out, &settings.store_name, width);
    if !settings.address.is_empty() {
        push_centered(&mut out, &settings.address, width);
    }
    if !settings.phone.is_empty() {
        push_centered(&mut out, &settings.phone, width);
    }
    push_rule(&mut out, '=', width);

    if transaction.is_refund() {
        push_centered(&mut out, "* REFUND *", width);
        if let Some(original) = transaction.original_transaction_id {
            push_cols(&mut out, "Ref transaksi", &format!("#{}", original), width);
        }
    }
    if transaction.status == TransactionStatus::Voided {
        push_centered(&mut out, "* DIBATALKAN *", width);
    }

    push_cols(&mut out, "No", &format!("#{}", transaction.id), width);
    push_cols(
        &mut out,
        "Tanggal",
        &transaction.date.format("%d/%m/%Y %H:%M").to_string(),
        width,
    );
    push_cols(&mut out, "Pelanggan", &transaction.customer_name, width);
    if let Some(table) = &transaction.table_number {
        push_cols(&mut out, "Meja", table, width);
    }
    push_rule(&mut out, '-', width);

    for item in &transaction.items {
        out.push_str(&item.name);
        out.push('\n');
        push_cols(
            &mut out,
            &format!("  {} x {}", item.qty, item.price),
            &item.line_total().to_string(),
            width,
        );
        if let Some(note) = &item.note {
            out.push_str(&format!("  ({})\n", note));
        }
    }
    push_rule(&mut out, '-', width);

    push_cols(&mut out, "TOTAL", &transaction.total.to_string(), width);
    push_cols(
        &mut out,
        "Pembayaran",
        transaction.payment_method.label(),
        width,
    );
    if let Some(cash_paid) = transaction.cash_paid {
        push_cols(&mut out, "Tunai", &cash_paid.to_string(), width);
    }
    if let Some(change) = transaction.change {
        push_cols(&mut out, "Kembalian", &change.to_string(), width);
    }
    if let Some(reason) = &transaction.refund_reason {
        push_cols(&mut out, "Alasan", reason, width);
    }

    push_rule(&mut out, '=', width);
    if !settings.footer_text.is_empty() {
        push_centered(&mut out, &settings.footer_text, width);
    }

    out
}

fn push_rule(out: &mut String, ch: char, width: usize) {
    out.extend(std::iter::repeat(ch).take(width));
    out.push('\n');
}

fn push_centered(out: &mut String, text: &str, width: usize) {
    let len = text.chars().count();
    if len >= width {
        out.push_str(text);
    } else {
        let pad = (width - len) / 2;
        out.extend(std::iter::repeat(' ').take(pad));
        out.push_str(text);
    }
    out.push('\n');
}

fn push_cols(out: &mut String, left: &str, right: &str, width: usize) {
    let used = left.chars().count() + right.chars().count();
    out.push_str(left);
    if used < width {
        out.extend(std::iter::repeat(' ').take(width - used));
    } else if used > width {
        // Overflow fallback: keep a separator so the columns stay readable
        out.push(' ');
    }
    out.push_str(right);
    out.push('\n');
}

// =============================================================================
// Unit Tests
// =============================================================================
