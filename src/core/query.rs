use std::str::FromStr;

use super::chain::{ChainOrder, chain_of};
use super::{PaymentMethod, Receipt, UnknownMethod};

/// Restricts receipts to a single payment method.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MethodFilter {
    #[default]
    All,
    Only(PaymentMethod),
}

impl FromStr for MethodFilter {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(MethodFilter::All)
        } else {
            s.parse().map(MethodFilter::Only)
        }
    }
}

/// Search used by receipt lists.
#[derive(Debug, Default, Clone)]
pub struct ReceiptFilter {
    pub text: String,
    pub method: MethodFilter,
}

/// A root receipt together with its installments, newest first.
#[derive(Debug, Clone)]
pub struct ChainGroup<'a> {
    pub root: &'a Receipt,
    pub chain: Vec<&'a Receipt>,
}

impl ReceiptFilter {
    pub fn new(text: impl Into<String>, method: MethodFilter) -> Self {
        Self {
            text: text.into(),
            method,
        }
    }

    /// Client name matches ignoring case; receipt number matches literally.
    pub fn matches(&self, receipt: &Receipt) -> bool {
        let text_matches = receipt
            .client_name
            .to_lowercase()
            .contains(&self.text.to_lowercase())
            || receipt.receipt_number.contains(&self.text);
        let method_matches = match self.method {
            MethodFilter::All => true,
            MethodFilter::Only(m) => receipt.method() == m,
        };
        text_matches && method_matches
    }

    /// Root receipts to display, each with its chain.
    ///
    /// A root is shown when it or any of its installments matches.
    pub fn visible_groups<'a>(&self, collection: &'a [Receipt]) -> Vec<ChainGroup<'a>> {
        collection
            .iter()
            .filter(|r| r.is_root())
            .filter_map(|root| {
                let chain = chain_of(root.id, collection, ChainOrder::NewestFirst);
                if self.matches(root) || chain.iter().any(|c| self.matches(c)) {
                    Some(ChainGroup { root, chain })
                } else {
                    None
                }
            })
            .collect()
    }
}
