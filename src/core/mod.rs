//! Core data model for receipts and installment chains.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod chain;
pub mod query;
pub mod summary;
pub mod utils;
pub mod words;

pub use chain::{
    ChainOrder, build_installment_draft, chain_of, cumulative_paid, ledger_snapshot, remaining,
    resolve_root,
};
pub use query::{ChainGroup, MethodFilter, ReceiptFilter};
pub use summary::Summary;
pub use words::{WordsError, to_words};

/// Errors raised when a receipt fails validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptError {
    /// An amount is below zero.
    NegativeAmount(f64),
    /// An amount is NaN or infinite.
    InvalidAmount,
}

impl fmt::Display for ReceiptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiptError::NegativeAmount(v) => write!(f, "amount must not be negative: {v}"),
            ReceiptError::InvalidAmount => write!(f, "amount must be a finite number"),
        }
    }
}

impl std::error::Error for ReceiptError {}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Cheque,
    Transfer,
}

impl PaymentMethod {
    /// Label printed on receipts and in payment ledgers.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "نقداً",
            PaymentMethod::Cheque => "شيك",
            PaymentMethod::Transfer => "تحويل",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::Transfer => "transfer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown payment method: {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for PaymentMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "cheque" | "check" => Ok(PaymentMethod::Cheque),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// Payment details, carrying only the fields that make sense for the method.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Payment {
    #[default]
    Cash,
    Cheque {
        cheque_number: Option<String>,
        bank_name: Option<String>,
        due_date: Option<NaiveDate>,
    },
    Transfer {
        reference: Option<String>,
        transfer_date: Option<NaiveDate>,
    },
}

impl Payment {
    pub fn method(&self) -> PaymentMethod {
        match self {
            Payment::Cash => PaymentMethod::Cash,
            Payment::Cheque { .. } => PaymentMethod::Cheque,
            Payment::Transfer { .. } => PaymentMethod::Transfer,
        }
    }

    /// Empty details for the given method.
    pub fn blank(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Payment::Cash,
            PaymentMethod::Cheque => Payment::Cheque {
                cheque_number: None,
                bank_name: None,
                due_date: None,
            },
            PaymentMethod::Transfer => Payment::Transfer {
                reference: None,
                transfer_date: None,
            },
        }
    }
}

/// A frozen ledger row describing an earlier payment in a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentHistoryEntry {
    pub receipt_number: String,
    pub date: NaiveDate,
    pub amount: f64,
    /// Display label of the payment method at the time of the snapshot.
    pub method: String,
}

impl PaymentHistoryEntry {
    pub fn from_receipt(receipt: &Receipt) -> Self {
        Self {
            receipt_number: receipt.receipt_number.clone(),
            date: receipt.receipt_date,
            amount: receipt.paid_amount.unwrap_or(0.0),
            method: receipt.payment.method().label().to_string(),
        }
    }
}

/// Where a receipt sits in its installment chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainPosition {
    /// Opens an obligation; holds the agreed total and purpose.
    #[default]
    Root,
    /// A later partial payment against the root `parent_id`.
    Installment {
        parent_id: Uuid,
        previous_payments: Vec<PaymentHistoryEntry>,
    },
}

/// Reusable company details applied to new receipts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub stamp: Option<String>,
}

impl Branding {
    /// Branding fields as currently set on a receipt.
    pub fn from_receipt(receipt: &Receipt) -> Self {
        Self {
            company_name: receipt.company_name.clone(),
            company_logo: receipt.company_logo.clone(),
            stamp: receipt.stamp.clone(),
        }
    }
}

/// A single payment receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub receipt_number: String,
    pub receipt_date: NaiveDate,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub client_name: String,
    /// Agreed total for the obligation, when one exists.
    pub total_price: Option<f64>,
    /// Amount collected on this receipt alone.
    pub paid_amount: Option<f64>,
    pub purpose: String,
    pub payment: Payment,
    pub signature: Option<String>,
    pub stamp: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub position: ChainPosition,
}

impl Receipt {
    /// Creates an empty root receipt dated `date` carrying the given branding.
    pub fn new(branding: &Branding, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            receipt_number: generate_receipt_number(),
            receipt_date: date,
            company_name: branding.company_name.clone(),
            company_logo: branding.company_logo.clone(),
            client_name: String::new(),
            total_price: None,
            paid_amount: None,
            purpose: String::new(),
            payment: Payment::Cash,
            signature: None,
            stamp: branding.stamp.clone(),
            created_at: Utc::now(),
            position: ChainPosition::Root,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.position, ChainPosition::Root)
    }

    pub fn parent_id(&self) -> Option<Uuid> {
        match &self.position {
            ChainPosition::Root => None,
            ChainPosition::Installment { parent_id, .. } => Some(*parent_id),
        }
    }

    /// Frozen ledger of earlier payments; empty for roots.
    pub fn previous_payments(&self) -> &[PaymentHistoryEntry] {
        match &self.position {
            ChainPosition::Root => &[],
            ChainPosition::Installment {
                previous_payments, ..
            } => previous_payments,
        }
    }

    pub fn method(&self) -> PaymentMethod {
        self.payment.method()
    }

    /// Checks that both amounts are finite and not negative.
    pub fn validate(&self) -> Result<(), ReceiptError> {
        for amount in [self.total_price, self.paid_amount].into_iter().flatten() {
            if !amount.is_finite() {
                return Err(ReceiptError::InvalidAmount);
            }
            if amount < 0.0 {
                return Err(ReceiptError::NegativeAmount(amount));
            }
        }
        Ok(())
    }
}

/// Short human-facing code such as `R-482913`. Not guaranteed unique.
pub fn generate_receipt_number() -> String {
    let n: u32 = rand::rng().random_range(100_000..1_000_000);
    format!("R-{n}")
}

/// Whether a receipt was added or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// In-memory receipt collection, newest first.
#[derive(Debug, Default, Clone)]
pub struct ReceiptBook {
    receipts: Vec<Receipt>,
}

impl ReceiptBook {
    pub fn from_receipts(receipts: Vec<Receipt>) -> Self {
        Self { receipts }
    }

    /// Replaces the receipt with the same id, or prepends it when new.
    pub fn save(&mut self, receipt: Receipt) -> Result<SaveOutcome, ReceiptError> {
        receipt.validate()?;
        match self.receipts.iter_mut().find(|r| r.id == receipt.id) {
            Some(existing) => {
                *existing = receipt;
                Ok(SaveOutcome::Updated)
            }
            None => {
                self.receipts.insert(0, receipt);
                Ok(SaveOutcome::Created)
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&Receipt> {
        self.receipts.iter().find(|r| r.id == id)
    }

    /// Finds a receipt by id or by receipt number.
    pub fn find(&self, key: &str) -> Option<&Receipt> {
        if let Ok(id) = Uuid::parse_str(key) {
            if let Some(r) = self.get(id) {
                return Some(r);
            }
        }
        self.receipts.iter().find(|r| r.receipt_number == key)
    }

    /// Removes a receipt. Installments of a removed root are left in place.
    pub fn remove(&mut self, id: Uuid) -> Option<Receipt> {
        let idx = self.receipts.iter().position(|r| r.id == id)?;
        Some(self.receipts.remove(idx))
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}
