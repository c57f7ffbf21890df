//! The single authoritative ledger document and its load/save lifecycle

use khata_store::{Credentials, LedgerDocument, StoreError, StoreRef};

/// Owns the backend holding the ledger document
pub struct LedgerStore {
    store: StoreRef,
    defaults: Credentials,
}

impl LedgerStore {
    /// `defaults` are the credentials a brand new document starts with
    pub fn new(store: StoreRef, defaults: Credentials) -> Self {
        Self { store, defaults }
    }

    /// Read the current document.
    ///
    /// A missing document is initialized with the default credentials and
    /// persisted. An existing one is never overwritten, except to give
    /// legacy transactions their identifiers.
    pub async fn load(&self) -> Result<LedgerDocument, StoreError> {
        match self.store.read().await? {
            Some(mut doc) => {
                let assigned = doc.assign_missing_ids();
                if assigned > 0 {
                    log::info!(
                        "Assigned identifiers to {} legacy transactions in {}",
                        assigned,
                        self.store.location()
                    );
                    self.store.write(&doc).await?;
                }
                log::debug!(
                    "Loaded ledger from {}: {} customers, {} transactions",
                    self.store.location(),
                    doc.customers.len(),
                    doc.transaction_count()
                );
                Ok(doc)
            }
            None => {
                let doc = LedgerDocument::new(self.defaults.clone());
                self.store.write(&doc).await?;
                log::info!("Initialized new ledger at {}", self.store.location());
                Ok(doc)
            }
        }
    }

    /// Replace the stored document with `doc`
    pub async fn save(&self, doc: &LedgerDocument) -> Result<(), StoreError> {
        self.store.write(doc).await?;
        log::debug!("Saved ledger to {}", self.store.location());
        Ok(())
    }

    pub fn location(&self) -> String {
        self.store.location()
    }
}
