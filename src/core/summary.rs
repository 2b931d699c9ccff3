use std::collections::HashSet;

use super::{PaymentMethod, Receipt};

/// Figures shown on the dashboard.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Summary {
    pub total_collected: f64,
    pub receipt_count: usize,
    pub distinct_clients: usize,
    pub cash_total: f64,
    /// Cheque and transfer payments.
    pub bank_total: f64,
}

impl Summary {
    pub fn from_receipts(receipts: &[Receipt]) -> Self {
        let clients: HashSet<&str> = receipts.iter().map(|r| r.client_name.as_str()).collect();
        receipts.iter().fold(
            Summary {
                receipt_count: receipts.len(),
                distinct_clients: clients.len(),
                ..Summary::default()
            },
            |mut acc, r| {
                let paid = r.paid_amount.unwrap_or(0.0);
                acc.total_collected += paid;
                if r.method() == PaymentMethod::Cash {
                    acc.cash_total += paid;
                } else {
                    acc.bank_total += paid;
                }
                acc
            },
        )
    }

    pub fn cash_share(&self) -> f64 {
        self.cash_total / self.share_denominator() * 100.0
    }

    pub fn bank_share(&self) -> f64 {
        self.bank_total / self.share_denominator() * 100.0
    }

    pub fn average_per_receipt(&self) -> f64 {
        self.total_collected / self.receipt_count.max(1) as f64
    }

    fn share_denominator(&self) -> f64 {
        if self.total_collected == 0.0 {
            1.0
        } else {
            self.total_collected
        }
    }
}

/// The `n` most recently saved receipts.
pub fn recent(receipts: &[Receipt], n: usize) -> &[Receipt] {
    &receipts[..n.min(receipts.len())]
}
