//! Installment chains.
//!
//! A root receipt opens an obligation; every installment points back at that
//! root through its `parent_id`. Chains are exactly one level deep. All
//! functions here are pure over the collection they are handed.

use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use super::{
    Branding, ChainPosition, Payment, PaymentHistoryEntry, Receipt, generate_receipt_number,
};

/// Ordering applied to the members of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOrder {
    /// Most recent installment first, as shown in lists.
    NewestFirst,
    /// Oldest first, as used for payment ledgers.
    Chronological,
}

/// Returns the root of the chain `receipt` belongs to.
///
/// A receipt whose root is no longer in the collection is treated as its own
/// root.
pub fn resolve_root<'a>(receipt: &'a Receipt, collection: &'a [Receipt]) -> &'a Receipt {
    let Some(parent_id) = receipt.parent_id() else {
        return receipt;
    };
    match collection.iter().find(|r| r.id == parent_id) {
        Some(root) => root,
        None => {
            debug!(
                receipt_id = %receipt.id,
                %parent_id,
                "Root receipt missing, using receipt itself"
            );
            receipt
        }
    }
}

/// Installments whose parent is `root_id`.
pub fn chain_of(root_id: Uuid, collection: &[Receipt], order: ChainOrder) -> Vec<&Receipt> {
    let mut chain: Vec<&Receipt> = collection
        .iter()
        .filter(|r| r.parent_id() == Some(root_id))
        .collect();
    match order {
        ChainOrder::NewestFirst => chain.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ChainOrder::Chronological => chain.sort_by_key(|r| r.created_at),
    }
    chain
}

/// Ledger rows for the receipt `chain_id` and its installments, oldest first.
pub fn ledger_snapshot(chain_id: Uuid, collection: &[Receipt]) -> Vec<PaymentHistoryEntry> {
    let mut members: Vec<&Receipt> = collection
        .iter()
        .filter(|r| r.id == chain_id || r.parent_id() == Some(chain_id))
        .collect();
    members.sort_by_key(|r| r.created_at);
    members
        .into_iter()
        .map(PaymentHistoryEntry::from_receipt)
        .collect()
}

/// Prepares a new installment receipt against the chain `source` belongs to.
///
/// The client, total and purpose come from the root; company details come
/// from the current `branding`. The ledger of earlier payments is copied
/// now and never recomputed.
///
/// When the root is missing the source stands in for it, and the draft joins
/// the chain the source already belongs to.
pub fn build_installment_draft(
    source: &Receipt,
    collection: &[Receipt],
    branding: &Branding,
    today: NaiveDate,
) -> Receipt {
    let root = resolve_root(source, collection);
    // An orphan keeps the id of its deleted root so its siblings stay one chain.
    let chain_id = source.parent_id().unwrap_or(source.id);
    let previous_payments = ledger_snapshot(chain_id, collection);
    debug!(
        %chain_id,
        prior_payments = previous_payments.len(),
        "Building installment draft"
    );

    Receipt {
        id: Uuid::new_v4(),
        receipt_number: generate_receipt_number(),
        receipt_date: today,
        company_name: branding.company_name.clone(),
        company_logo: branding.company_logo.clone(),
        client_name: root.client_name.clone(),
        total_price: root.total_price,
        paid_amount: None,
        purpose: root.purpose.clone(),
        payment: Payment::Cash,
        signature: None,
        stamp: branding.stamp.clone(),
        created_at: Utc::now(),
        position: ChainPosition::Installment {
            parent_id: chain_id,
            previous_payments,
        },
    }
}

/// Earlier payments in the ledger plus the amount on this receipt.
pub fn cumulative_paid(receipt: &Receipt) -> f64 {
    let previous: f64 = receipt.previous_payments().iter().map(|p| p.amount).sum();
    previous + receipt.paid_amount.unwrap_or(0.0)
}

/// Amount still owed, known only when the receipt carries a total.
pub fn remaining(receipt: &Receipt) -> Option<f64> {
    receipt
        .total_price
        .map(|total| total - cumulative_paid(receipt))
}
