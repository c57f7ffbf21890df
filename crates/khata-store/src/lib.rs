//! Ledger document persistence
//!
//! The whole ledger lives in one JSON document that is read and written
//! wholesale. Backends implement [`DocumentStore`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod document;
pub mod error;

pub use document::{Credentials, Customer, LedgerDocument, Transaction, TransactionType};
pub use error::StoreError;

// ==================== Encoding ====================

/// Decode a stored document
pub fn decode(content: &str) -> Result<LedgerDocument, StoreError> {
    serde_json::from_str(content).map_err(|e| StoreError::CorruptDocument {
        message: e.to_string(),
    })
}

/// Encode a document for storage
pub fn encode(doc: &LedgerDocument) -> Result<String, StoreError> {
    serde_json::to_string_pretty(doc).map_err(|e| StoreError::EncodeError {
        message: e.to_string(),
    })
}

// ==================== Store Trait ====================

/// Store reference type
pub type StoreRef = Arc<dyn DocumentStore>;

/// Trait for ledger document backends
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the stored document, `None` when nothing has been stored yet
    async fn read(&self) -> Result<Option<LedgerDocument>, StoreError>;

    /// Replace the stored document with `doc`
    async fn write(&self, doc: &LedgerDocument) -> Result<(), StoreError>;

    /// Human-readable location for log output
    fn location(&self) -> String;
}

/// JSON file backend
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    backup: bool,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, backup: bool) -> Self {
        Self {
            path: path.into(),
            backup,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Path of the previous document copy
    pub fn backup_path(&self) -> PathBuf {
        self.sibling(".bak")
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn read(&self) -> Result<Option<LedgerDocument>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => decode(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::IoError(e)),
        }
    }

    async fn write(&self, doc: &LedgerDocument) -> Result<(), StoreError> {
        let content = encode(doc)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        if self.backup && tokio::fs::try_exists(&self.path).await? {
            tokio::fs::copy(&self.path, self.backup_path()).await?;
        }

        // write beside the target, then swap it in
        let tmp = self.sibling(".tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        log::debug!("Ledger document written to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// In-memory backend, keeps the encoded text so corrupt content can be simulated
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: RwLock<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw stored text
    pub fn with_raw(content: impl Into<String>) -> Self {
        Self {
            content: RwLock::new(Some(content.into())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Current stored text
    pub async fn raw(&self) -> Option<String> {
        self.content.read().await.clone()
    }

    /// Number of completed writes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self) -> Result<Option<LedgerDocument>, StoreError> {
        match self.content.read().await.as_deref() {
            Some(content) => decode(content).map(Some),
            None => Ok(None),
        }
    }

    async fn write(&self, doc: &LedgerDocument) -> Result<(), StoreError> {
        let content = encode(doc)?;
        *self.content.write().await = Some(content);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_document() -> LedgerDocument {
        let mut doc = LedgerDocument::new(Credentials {
            id: "KINGG".to_string(),
            password: "KINGG123".to_string(),
        });
        let mut customer = Customer::new("0420".to_string());
        customer.transactions.push(Transaction {
            id: "t-1".to_string(),
            kind: TransactionType::Credit,
            amount: dec!(250.50),
            date: "2024-03-10".to_string(),
            time: "19:30".to_string(),
            notes: Some("2x Biryani".to_string()),
        });
        doc.customers.insert("Raj".to_string(), customer);
        doc
    }

    #[tokio::test]
    async fn test_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("ledger.json"), true);
        assert!(store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("ledger.json"), false);
        let doc = sample_document();

        store.write(&doc).await.unwrap();
        let loaded = store.read().await.unwrap().unwrap();
        assert_eq!(loaded, doc);
        assert!(!store.backup_path().exists());
    }

    #[tokio::test]
    async fn test_file_store_keeps_backup() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("ledger.json"), true);
        let mut doc = sample_document();

        store.write(&doc).await.unwrap();
        doc.credentials.password = "changed".to_string();
        store.write(&doc).await.unwrap();

        let backup = std::fs::read_to_string(store.backup_path()).unwrap();
        assert_eq!(decode(&backup).unwrap().credentials.password, "KINGG123");
        assert_eq!(store.read().await.unwrap().unwrap().credentials.password, "changed");
    }

    #[tokio::test]
    async fn test_file_store_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(path, true);
        let err = store.read().await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptDocument { .. }));
    }

    #[tokio::test]
    async fn test_memory_store_counts_writes() {
        let store = MemoryStore::new();
        assert!(store.read().await.unwrap().is_none());

        store.write(&sample_document()).await.unwrap();
        store.write(&sample_document()).await.unwrap();
        assert_eq!(store.write_count(), 2);
        assert!(store.raw().await.unwrap().contains("\"Raj\""));
    }

    #[test]
    fn test_decode_legacy_document() {
        let legacy = r#"{
            "credentials": { "id": "KINGG", "password": "KINGG123" },
            "customers": {
                "Raj": {
                    "pin": "4821",
                    "transactions": [
                        { "type": "credit", "amount": 250, "date": "2024-03-10", "time": "19:30", "notes": "2x Biryani" },
                        { "type": "payment", "amount": 99.5, "date": "2024-03-15", "time": "10:00" }
                    ]
                }
            }
        }"#;

        let doc = decode(legacy).unwrap();
        let raj = doc.customer("Raj").unwrap();
        assert_eq!(raj.transactions.len(), 2);
        assert_eq!(raj.transactions[0].amount, dec!(250));
        assert_eq!(raj.transactions[1].amount, dec!(99.5));
        assert!(raj.transactions[1].notes.is_none());
        assert!(raj.transactions[0].id.is_empty());
    }

    #[test]
    fn test_customer_order_survives_round_trip() {
        let stored = r#"{
            "credentials": { "id": "KINGG", "password": "KINGG123" },
            "customers": {
                "Zed": { "pin": "1111", "transactions": [] },
                "Asha": { "pin": "2222", "transactions": [] }
            }
        }"#;

        let doc = decode(stored).unwrap();
        let names: Vec<&str> = doc.customers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zed", "Asha"]);

        let encoded = encode(&doc).unwrap();
        let zed = encoded.find("\"Zed\"").unwrap();
        let asha = encoded.find("\"Asha\"").unwrap();
        assert!(zed < asha);
    }

    #[test]
    fn test_encode_amounts_as_text() {
        let encoded = encode(&sample_document()).unwrap();
        assert!(encoded.contains("\"amount\": \"250.50\""));
        assert!(encoded.contains("\"type\": \"credit\""));
    }
}
