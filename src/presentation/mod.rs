//! Values shown on a rendered receipt.

pub mod text;

use num_format::{Locale, ToFormattedString as _};

use crate::core::utils::decode_image;
use crate::core::{Payment, PaymentHistoryEntry, Receipt, cumulative_paid, remaining, to_words};

pub use text::TextRenderer;

/// Currency suffix used next to figures.
pub const CURRENCY_SUFFIX: &str = "dh";
/// Closing phrase after an amount written in words.
pub const WORDS_SUFFIX: &str = "درهم مغربي فقط لا غير";

/// Everything a renderer needs to lay out one receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptView {
    pub company_name: String,
    pub receipt_number: String,
    pub receipt_date: String,
    pub client_name: String,
    /// Amount on this receipt written in words, when one was paid.
    pub amount_in_words: Option<String>,
    pub method_label: &'static str,
    /// Method specific lines such as cheque number or transfer reference.
    pub method_details: Vec<(&'static str, String)>,
    pub total_price: Option<f64>,
    pub paid_amount: Option<f64>,
    pub cumulative_paid: f64,
    /// Shown only when the receipt has a total.
    pub remaining: Option<f64>,
    pub previous_payments: Vec<PaymentHistoryEntry>,
    pub purpose: String,
    /// Image flags are set only for payloads that decode.
    pub has_logo: bool,
    pub has_signature: bool,
    pub has_stamp: bool,
}

impl ReceiptView {
    pub fn new(receipt: &Receipt) -> Self {
        Self {
            company_name: receipt.company_name.clone(),
            receipt_number: receipt.receipt_number.clone(),
            receipt_date: receipt.receipt_date.format("%Y-%m-%d").to_string(),
            client_name: receipt.client_name.clone(),
            amount_in_words: amount_in_words(receipt.paid_amount),
            method_label: receipt.method().label(),
            method_details: method_details(&receipt.payment),
            total_price: receipt.total_price,
            paid_amount: receipt.paid_amount,
            cumulative_paid: cumulative_paid(receipt),
            remaining: remaining(receipt),
            previous_payments: receipt.previous_payments().to_vec(),
            purpose: receipt.purpose.clone(),
            has_logo: has_image(&receipt.company_logo),
            has_signature: has_image(&receipt.signature),
            has_stamp: has_image(&receipt.stamp),
        }
    }
}

fn has_image(data_url: &Option<String>) -> bool {
    data_url
        .as_deref()
        .and_then(decode_image)
        .is_some_and(|bytes| !bytes.is_empty())
}

/// Whole part of a positive amount in words, followed by the currency phrase.
pub fn amount_in_words(paid: Option<f64>) -> Option<String> {
    let paid = paid.filter(|p| *p > 0.0)?;
    let words = to_words(paid.floor() as i64).ok()?;
    Some(format!("{words} {WORDS_SUFFIX}"))
}

/// Formats an amount with thousands separators; decimals only when present.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_formatted_string(&Locale::en);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    match cents % 100 {
        0 => format!("{sign}{whole} {CURRENCY_SUFFIX}"),
        frac => format!("{sign}{whole}.{frac:02} {CURRENCY_SUFFIX}"),
    }
}

fn method_details(payment: &Payment) -> Vec<(&'static str, String)> {
    let mut lines = Vec::new();
    match payment {
        Payment::Cash => {}
        Payment::Cheque {
            cheque_number,
            bank_name,
            due_date,
        } => {
            if let Some(n) = cheque_number {
                lines.push(("شيك رقم", n.clone()));
            }
            if let Some(b) = bank_name {
                lines.push(("البنك", b.clone()));
            }
            if let Some(d) = due_date {
                lines.push(("تاريخ الاستحقاق", d.format("%Y-%m-%d").to_string()));
            }
        }
        Payment::Transfer {
            reference,
            transfer_date,
        } => {
            if let Some(r) = reference {
                lines.push(("مرجع التحويل", r.clone()));
            }
            if let Some(d) = transfer_date {
                lines.push(("تاريخ التحويل", d.format("%Y-%m-%d").to_string()));
            }
        }
    }
    lines
}
