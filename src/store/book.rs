use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{BRANDING_KEY, HISTORY_KEY, KeyValueStore, StoreError};
use crate::core::{Branding, Receipt, ReceiptBook, SaveOutcome, build_installment_draft};

/// Receipt book bound to a key/value store.
///
/// Every mutation is written through before it becomes visible in memory;
/// a failed write leaves the store as it was.
pub struct ReceiptStore<S: KeyValueStore> {
    book: ReceiptBook,
    branding: Branding,
    service: S,
}

impl<S: KeyValueStore> ReceiptStore<S> {
    /// Loads the receipt history and branding from `service`.
    ///
    /// Missing keys start empty. A value that does not parse is an error.
    pub fn open(service: S) -> Result<Self, StoreError> {
        let receipts: Vec<Receipt> = Self::load_json(&service, HISTORY_KEY)?.unwrap_or_default();
        let branding: Branding = Self::load_json(&service, BRANDING_KEY)?.unwrap_or_default();
        info!(receipts = receipts.len(), "Opened receipt store");
        Ok(Self {
            book: ReceiptBook::from_receipts(receipts),
            branding,
            service,
        })
    }

    fn load_json<T: serde::de::DeserializeOwned>(
        service: &S,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        match service.load(key)? {
            None => Ok(None),
            Some(data) => serde_json::from_str(&data)
                .map(Some)
                .map_err(|e| StoreError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    fn persist_history(&mut self, book: &ReceiptBook) -> Result<(), StoreError> {
        let data = serde_json::to_string(book.receipts())
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        self.service.save(HISTORY_KEY, &data)
    }

    fn persist_branding(&mut self, branding: &Branding) -> Result<(), StoreError> {
        let data =
            serde_json::to_string(branding).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.service.save(BRANDING_KEY, &data)
    }

    pub fn receipts(&self) -> &[Receipt] {
        self.book.receipts()
    }

    pub fn book(&self) -> &ReceiptBook {
        &self.book
    }

    pub fn get(&self, id: Uuid) -> Option<&Receipt> {
        self.book.get(id)
    }

    /// Looks a receipt up by id or receipt number.
    pub fn find(&self, key: &str) -> Result<&Receipt, StoreError> {
        self.book
            .find(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    pub fn set_branding(&mut self, branding: Branding) -> Result<(), StoreError> {
        if branding == self.branding {
            return Ok(());
        }
        self.persist_branding(&branding)?;
        debug!(company = %branding.company_name, "Branding updated");
        self.branding = branding;
        Ok(())
    }

    pub fn clear_branding(&mut self) -> Result<(), StoreError> {
        self.service.clear(BRANDING_KEY)?;
        self.branding = Branding::default();
        Ok(())
    }

    /// An unsaved root receipt carrying the current branding.
    pub fn new_receipt(&self, today: NaiveDate) -> Receipt {
        Receipt::new(&self.branding, today)
    }

    /// An unsaved installment against the chain of the receipt `source_id`.
    pub fn collect_installment(
        &self,
        source_id: Uuid,
        today: NaiveDate,
    ) -> Result<Receipt, StoreError> {
        let source = self
            .book
            .get(source_id)
            .ok_or_else(|| StoreError::NotFound(source_id.to_string()))?;
        Ok(build_installment_draft(
            source,
            self.book.receipts(),
            &self.branding,
            today,
        ))
    }

    /// Validates and saves a receipt, then remembers its branding fields.
    ///
    /// The receipt counts as saved once the history is written. Failing to
    /// remember the branding afterwards is logged and does not undo it.
    pub fn save_receipt(&mut self, receipt: Receipt) -> Result<SaveOutcome, StoreError> {
        let branding = Branding::from_receipt(&receipt);
        let id = receipt.id;
        let number = receipt.receipt_number.clone();
        let mut next = self.book.clone();
        let outcome = next.save(receipt)?;
        self.persist_history(&next)?;
        self.book = next;
        info!(%id, receipt_number = %number, ?outcome, "Saved receipt");
        if let Err(e) = self.set_branding(branding) {
            warn!(error = %e, "Could not remember branding");
        }
        Ok(outcome)
    }

    /// Deletes a receipt after `confirm` approves it.
    ///
    /// Returns `Ok(None)` when the receipt is unknown or the deletion was
    /// declined. Installments of a deleted root are kept.
    pub fn delete<F>(&mut self, id: Uuid, confirm: F) -> Result<Option<Receipt>, StoreError>
    where
        F: FnOnce(&Receipt) -> bool,
    {
        let Some(receipt) = self.book.get(id) else {
            return Ok(None);
        };
        if !confirm(receipt) {
            debug!(%id, "Deletion declined");
            return Ok(None);
        }
        let mut next = self.book.clone();
        let removed = next.remove(id);
        self.persist_history(&next)?;
        self.book = next;
        info!(%id, "Deleted receipt");
        Ok(removed)
    }

    /// Return the underlying key/value store.
    pub fn into_inner(self) -> S {
        self.service
    }
}
