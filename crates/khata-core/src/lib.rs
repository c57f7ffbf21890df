//! Core ledger processing and business logic

pub mod access;
pub mod error;
pub mod ledger;
pub mod month;
pub mod pin;
pub mod reports;
pub mod store;
pub mod types;

use chrono::{Local, NaiveDate, NaiveDateTime};
use khata_config::Config;
use khata_store::{Credentials, Customer, LedgerDocument, StoreRef, Transaction};
use indexmap::IndexMap;
use tokio::sync::Mutex;

pub use access::AccessControl;
pub use error::{
    AuthError, CoreError, CoreResult, DefaultErrorLogger, DuplicateError, ErrorCode, ErrorContext,
    ErrorLogger, ErrorSeverity, NotFoundError, PinError, ValidationError,
};
pub use ledger::{Totals, TransactionLedger};
pub use month::{MonthFilter, MonthFilterable, YearMonth};
pub use pin::PinAllocator;
pub use reports::{CustomerBalance, CustomerLedger, LedgerEntry, LedgerSummary};
pub use store::LedgerStore;
pub use types::{BalanceStatus, Notice, NoticeKind, PinMode, TransactionInput};

/// The ledger service.
///
/// Every operation loads the document, works on that fresh copy and saves it
/// back before the next operation may start.
pub struct Ledger {
    config: Config,
    store: LedgerStore,
    gate: Mutex<()>,
    logger: Box<dyn ErrorLogger>,
}

impl Ledger {
    pub fn new(config: Config, store: StoreRef) -> Self {
        let defaults = Credentials {
            id: config.credentials.id.clone(),
            password: config.credentials.password.clone(),
        };
        Self {
            config,
            store: LedgerStore::new(store, defaults),
            gate: Mutex::new(()),
            logger: Box::new(DefaultErrorLogger),
        }
    }

    /// Replace the logger failed operations are reported to
    pub fn with_error_logger(mut self, logger: Box<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Location of the stored document
    pub fn location(&self) -> String {
        self.store.location()
    }

    fn finish<T>(&self, result: CoreResult<T>, context: ErrorContext) -> CoreResult<T> {
        if let Err(ref e) = result {
            self.logger.log_error(e, &context);
        }
        result
    }

    // ==================== Session ====================

    /// Load the document, creating it on first use
    pub async fn initialize(&self) -> CoreResult<()> {
        let _guard = self.gate.lock().await;
        let result = self.store.load().await.map(|_| ()).map_err(CoreError::from);
        self.finish(result, ErrorContext::new("initialize"))
    }

    /// Check the operator id and shared password
    pub async fn login(&self, id: &str, password: &str) -> CoreResult<bool> {
        let _guard = self.gate.lock().await;
        let result = async {
            let doc = self.store.load().await?;
            let ok = AccessControl::verify_login(id, password, &doc);
            if ok {
                log::info!("Operator logged in");
            } else {
                log::warn!("Rejected login attempt");
            }
            Ok::<_, CoreError>(ok)
        }
        .await;
        self.finish(result, ErrorContext::new("login"))
    }

    // ==================== Reads ====================

    /// Every customer with their stored transactions
    pub async fn list_customers(&self) -> CoreResult<IndexMap<String, Customer>> {
        let _guard = self.gate.lock().await;
        let result = self.store.load().await.map(|doc| doc.customers).map_err(CoreError::from);
        self.finish(result, ErrorContext::new("list_customers"))
    }

    /// Balance per customer within `filter`, in the order customers were added
    pub async fn customer_balances(&self, filter: &MonthFilter) -> CoreResult<Vec<CustomerBalance>> {
        let _guard = self.gate.lock().await;
        let result = async {
            let doc = self.store.load().await?;
            let rows = doc
                .customers
                .iter()
                .map(|(name, customer)| {
                    let totals = TransactionLedger::customer_totals(customer, filter)?;
                    Ok(CustomerBalance {
                        name: name.clone(),
                        balance: totals.balance(),
                        status: totals.status(),
                        transaction_count: TransactionLedger::filter_by_month(&customer.transactions, filter).len(),
                    })
                })
                .collect::<Result<Vec<_>, ValidationError>>()?;
            Ok::<_, CoreError>(rows)
        }
        .await;
        self.finish(result, ErrorContext::new("customer_balances"))
    }

    /// Whole-ledger credit, paid and outstanding figures within `filter`
    pub async fn summary(&self, filter: &MonthFilter) -> CoreResult<LedgerSummary> {
        let _guard = self.gate.lock().await;
        let result = async {
            let doc = self.store.load().await?;
            let totals = TransactionLedger::aggregate_totals(doc.customers.values(), filter)?;
            Ok::<_, CoreError>(LedgerSummary::new(filter, totals, doc.customers.len()))
        }
        .await;
        self.finish(result, ErrorContext::new("summary"))
    }

    /// Months with at least one transaction across all customers, most recent first
    pub async fn available_months(&self) -> CoreResult<Vec<YearMonth>> {
        let _guard = self.gate.lock().await;
        let result = self
            .store
            .load()
            .await
            .map(|doc| TransactionLedger::list_available_months(doc.customers.values()))
            .map_err(CoreError::from);
        self.finish(result, ErrorContext::new("available_months"))
    }

    /// Open a customer's ledger with their PIN
    pub async fn open_customer(&self, name: &str, pin: &str) -> CoreResult<Customer> {
        let _guard = self.gate.lock().await;
        let result = async {
            let doc = self.store.load().await?;
            let customer = Self::find(&doc, name)?;
            AccessControl::require_pin(pin, customer)?;
            log::debug!("Opened ledger for {}", name);
            Ok::<_, CoreError>(customer.clone())
        }
        .await;
        self.finish(result, ErrorContext::new("open_customer").with_customer(name))
    }

    /// PIN-gated ledger view with entries, totals and months
    pub async fn customer_ledger(&self, name: &str, pin: &str, filter: &MonthFilter) -> CoreResult<CustomerLedger> {
        let _guard = self.gate.lock().await;
        let result = async {
            let doc = self.store.load().await?;
            let customer = Self::find(&doc, name)?;
            AccessControl::require_pin(pin, customer)?;

            let totals = TransactionLedger::customer_totals(customer, filter)?;
            let entries = TransactionLedger::filter_entries(&customer.transactions, filter)
                .into_iter()
                .map(|(index, transaction)| LedgerEntry {
                    index,
                    transaction: transaction.clone(),
                })
                .collect();

            Ok::<_, CoreError>(CustomerLedger {
                name: name.to_string(),
                filter: filter.to_string(),
                totals,
                balance: totals.balance(),
                status: totals.status(),
                entries,
                months: TransactionLedger::list_available_months([customer]),
            })
        }
        .await;
        self.finish(result, ErrorContext::new("customer_ledger").with_customer(name))
    }

    // ==================== Customers ====================

    /// Register a customer.
    ///
    /// Checks run in order: password, name, duplicate name, then PIN.
    pub async fn add_customer(&self, name: &str, password: &str, pin_mode: PinMode) -> CoreResult<Customer> {
        let _guard = self.gate.lock().await;
        let name = name.trim();
        let result = async {
            let mut doc = self.store.load().await?;
            AccessControl::require_password(password, &doc)?;

            if name.is_empty() {
                return Err(CoreError::from(ValidationError::MissingName));
            }
            if doc.customers.contains_key(name) {
                return Err(CoreError::from(DuplicateError::CustomerExists { name: name.to_string() }));
            }

            let existing = doc.pins();
            let pin = match pin_mode {
                PinMode::Custom(pin) => {
                    PinAllocator::validate_custom(&pin, &existing)?;
                    pin
                }
                PinMode::Auto => PinAllocator::generate(&existing)?,
            };

            let customer = Customer::new(pin);
            doc.customers.insert(name.to_string(), customer.clone());
            self.store.save(&doc).await?;
            log::info!("Customer added: {}", name);
            Ok::<_, CoreError>(customer)
        }
        .await;
        self.finish(result, ErrorContext::new("add_customer").with_customer(name))
    }

    /// Remove a customer and all their transactions
    pub async fn delete_customer(&self, name: &str, password: &str) -> CoreResult<Customer> {
        let _guard = self.gate.lock().await;
        let result = async {
            let mut doc = self.store.load().await?;
            AccessControl::require_password(password, &doc)?;

            let removed = doc
                .customers
                .shift_remove(name)
                .ok_or_else(|| NotFoundError::UnknownCustomer { name: name.to_string() })?;
            self.store.save(&doc).await?;
            log::info!("Customer deleted: {} ({} transactions)", name, removed.transactions.len());
            Ok::<_, CoreError>(removed)
        }
        .await;
        self.finish(result, ErrorContext::new("delete_customer").with_customer(name))
    }

    // ==================== Transactions ====================

    /// Record a credit or payment on an opened customer ledger
    pub async fn add_transaction(&self, name: &str, pin: &str, input: TransactionInput) -> CoreResult<Transaction> {
        let _guard = self.gate.lock().await;
        let kind = input.kind;
        let result = async {
            let mut doc = self.store.load().await?;
            let customer = Self::find_mut(&mut doc, name)?;
            AccessControl::require_pin(pin, customer)?;

            let transaction = TransactionLedger::add_transaction(customer, input)?;
            self.store.save(&doc).await?;
            log::info!(
                "{} of {} recorded for {} on {}",
                transaction.kind.label(),
                transaction.amount,
                name,
                transaction.date
            );
            Ok::<_, CoreError>(transaction)
        }
        .await;
        let context = ErrorContext::new("add_transaction")
            .with_customer(name)
            .with_data("type", serde_json::json!(kind.to_string()));
        self.finish(result, context)
    }

    /// Delete by position in the customer's full, unfiltered list
    pub async fn delete_transaction(&self, name: &str, password: &str, index: usize) -> CoreResult<Transaction> {
        let _guard = self.gate.lock().await;
        let result = async {
            let mut doc = self.store.load().await?;
            AccessControl::require_password(password, &doc)?;

            let customer = Self::find_mut(&mut doc, name)?;
            let removed = TransactionLedger::delete_transaction(customer, index)?;
            self.store.save(&doc).await?;
            log::info!("Transaction {} deleted for {}", removed.id, name);
            Ok::<_, CoreError>(removed)
        }
        .await;
        let context = ErrorContext::new("delete_transaction")
            .with_customer(name)
            .with_data("index", serde_json::json!(index));
        self.finish(result, context)
    }

    /// Delete by stable transaction identifier
    pub async fn delete_transaction_by_id(&self, name: &str, password: &str, id: &str) -> CoreResult<Transaction> {
        let _guard = self.gate.lock().await;
        let result = async {
            let mut doc = self.store.load().await?;
            AccessControl::require_password(password, &doc)?;

            let customer = Self::find_mut(&mut doc, name)?;
            let removed = TransactionLedger::delete_by_id(customer, id)?;
            self.store.save(&doc).await?;
            log::info!("Transaction {} deleted for {}", removed.id, name);
            Ok::<_, CoreError>(removed)
        }
        .await;
        let context = ErrorContext::new("delete_transaction_by_id")
            .with_customer(name)
            .with_data("id", serde_json::json!(id));
        self.finish(result, context)
    }

    // ==================== Credentials ====================

    pub async fn change_password(&self, current: &str, next: &str, confirm: Option<&str>) -> CoreResult<()> {
        let _guard = self.gate.lock().await;
        let result = async {
            let mut doc = self.store.load().await?;
            AccessControl::change_password(current, next, confirm, &mut doc, self.config.security.min_password_length)?;
            self.store.save(&doc).await?;
            log::info!("Shared password changed");
            Ok::<_, CoreError>(())
        }
        .await;
        self.finish(result, ErrorContext::new("change_password"))
    }

    pub async fn change_pin(&self, password: &str, name: &str, new_pin: &str) -> CoreResult<()> {
        let _guard = self.gate.lock().await;
        let result = async {
            let mut doc = self.store.load().await?;
            AccessControl::change_pin(password, name, new_pin, &mut doc)?;
            self.store.save(&doc).await?;
            log::info!("PIN changed for {}", name);
            Ok::<_, CoreError>(())
        }
        .await;
        self.finish(result, ErrorContext::new("change_pin").with_customer(name))
    }

    // ==================== Export ====================

    /// Plain-text backup report stamped with the current local time
    pub async fn export_report(&self) -> CoreResult<String> {
        self.export_report_at(Local::now().naive_local()).await
    }

    pub async fn export_report_at(&self, generated_at: NaiveDateTime) -> CoreResult<String> {
        let _guard = self.gate.lock().await;
        let result = async {
            let doc = self.store.load().await?;
            let report = reports::export_report(&doc, &generated_at, &self.config.report)?;
            log::info!("Exported report for {} customers", doc.customers.len());
            Ok::<_, CoreError>(report)
        }
        .await;
        self.finish(result, ErrorContext::new("export_report"))
    }

    /// File name for a report exported on `date`
    pub fn export_file_name(&self, date: &NaiveDate) -> String {
        reports::export_file_name(&self.config.report.file_prefix, date)
    }

    // ==================== Notices ====================

    pub fn success_notice(&self, message: impl Into<String>) -> Notice {
        Notice::success(message, self.config.notice_duration())
    }

    pub fn error_notice(&self, error: &CoreError) -> Notice {
        Notice::from_error(error, self.config.notice_duration())
    }

    fn find<'a>(doc: &'a LedgerDocument, name: &str) -> Result<&'a Customer, NotFoundError> {
        doc.customer(name)
            .ok_or_else(|| NotFoundError::UnknownCustomer { name: name.to_string() })
    }

    fn find_mut<'a>(doc: &'a mut LedgerDocument, name: &str) -> Result<&'a mut Customer, NotFoundError> {
        doc.customer_mut(name)
            .ok_or_else(|| NotFoundError::UnknownCustomer { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_store::{DocumentStore, MemoryStore, TransactionType};
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex as StdMutex};

    const PASSWORD: &str = "KINGG123";

    #[derive(Clone, Default)]
    struct RecordingLogger {
        entries: Arc<StdMutex<Vec<(ErrorCode, String, Option<String>)>>>,
    }

    impl ErrorLogger for RecordingLogger {
        fn log_error(&self, error: &CoreError, context: &ErrorContext) {
            self.entries.lock().unwrap().push((
                error.code(),
                context.operation.clone(),
                context.customer.clone(),
            ));
        }
    }

    fn ledger() -> (Ledger, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        (Ledger::new(Config::default(), backend.clone()), backend)
    }

    async fn with_raj(ledger: &Ledger) -> String {
        ledger
            .add_customer("Raj", PASSWORD, PinMode::Custom("4821".to_string()))
            .await
            .unwrap()
            .pin
    }

    #[tokio::test]
    async fn test_login() {
        let (ledger, _) = ledger();
        assert!(ledger.login("KINGG", PASSWORD).await.unwrap());
        assert!(!ledger.login("KINGG", "wrong").await.unwrap());
        assert!(!ledger.login("kingg", PASSWORD).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_customer_checks_in_order() {
        let (ledger, _) = ledger();
        with_raj(&ledger).await;

        let err = ledger.add_customer("", "wrong", PinMode::Auto).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::WrongPassword);

        let err = ledger.add_customer("   ", PASSWORD, PinMode::Auto).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingName);

        let err = ledger
            .add_customer(" Raj ", PASSWORD, PinMode::Custom("12a4".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CustomerExists);

        let err = ledger
            .add_customer("Asha", PASSWORD, PinMode::Custom("4821".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicatePin);

        let err = ledger
            .add_customer("Asha", PASSWORD, PinMode::Custom(String::new()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPinFormat);

        let customers = ledger.list_customers().await.unwrap();
        assert_eq!(customers.len(), 1);
    }

    #[tokio::test]
    async fn test_add_customer_trims_name() {
        let (ledger, _) = ledger();
        let customer = ledger.add_customer("  Asha  ", PASSWORD, PinMode::Auto).await.unwrap();
        assert!(PinAllocator::is_valid_format(&customer.pin));

        let customers = ledger.list_customers().await.unwrap();
        assert!(customers.contains_key("Asha"));
        assert!(customers["Asha"].transactions.is_empty());
    }

    #[tokio::test]
    async fn test_open_customer() {
        let (ledger, _) = ledger();
        let pin = with_raj(&ledger).await;

        assert_eq!(ledger.open_customer("Raj", &pin).await.unwrap().pin, pin);

        let err = ledger.open_customer("Raj", "0000").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::WrongPin);

        let err = ledger.open_customer("Nobody", &pin).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownCustomer);
    }

    #[tokio::test]
    async fn test_failed_validation_does_not_save() {
        let (ledger, backend) = ledger();
        let pin = with_raj(&ledger).await;
        let writes = backend.write_count();

        let err = ledger
            .add_transaction("Raj", &pin, TransactionInput::credit("abc", "2024-03-10", "19:30"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidAmount);
        assert_eq!(backend.write_count(), writes);

        let err = ledger
            .add_transaction("Raj", "0000", TransactionInput::credit("10", "2024-03-10", "19:30"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::WrongPin);
        assert_eq!(backend.write_count(), writes);
    }

    #[tokio::test]
    async fn test_mutation_keeps_other_customers() {
        let (ledger, backend) = ledger();
        let raj_pin = with_raj(&ledger).await;
        let asha = ledger.add_customer("Asha", PASSWORD, PinMode::Auto).await.unwrap();

        ledger
            .add_transaction("Asha", &asha.pin, TransactionInput::credit("80", "2024-03-01", "12:00"))
            .await
            .unwrap();
        ledger
            .add_transaction("Raj", &raj_pin, TransactionInput::credit("20", "2024-03-02", "12:00"))
            .await
            .unwrap();
        ledger.change_password(PASSWORD, "secret", Some("secret")).await.unwrap();

        let stored = backend.read().await.unwrap().unwrap();
        assert_eq!(stored.credentials.password, "secret");
        assert_eq!(stored.customer("Asha").unwrap().transactions.len(), 1);
        assert_eq!(stored.customer("Raj").unwrap().transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_customer_ledger_entries_keep_absolute_index() {
        let (ledger, _) = ledger();
        let pin = with_raj(&ledger).await;
        for (amount, date) in [("10", "2024-03-01"), ("20", "2024-04-01"), ("30", "2024-03-20")] {
            ledger
                .add_transaction("Raj", &pin, TransactionInput::credit(amount, date, "12:00"))
                .await
                .unwrap();
        }

        let march: MonthFilter = "2024-03".parse().unwrap();
        let view = ledger.customer_ledger("Raj", &pin, &march).await.unwrap();
        let indexes: Vec<usize> = view.entries.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![0, 2]);
        assert_eq!(view.balance, dec!(40));
        assert_eq!(view.status, BalanceStatus::Due);
        assert_eq!(view.months.len(), 2);

        // delete the second entry of the filtered view through its absolute index
        let removed = ledger.delete_transaction("Raj", PASSWORD, view.entries[1].index).await.unwrap();
        assert_eq!(removed.amount, dec!(30));

        let view = ledger.customer_ledger("Raj", &pin, &MonthFilter::All).await.unwrap();
        assert_eq!(view.balance, dec!(30));
    }

    #[tokio::test]
    async fn test_delete_transaction_by_id() {
        let (ledger, _) = ledger();
        let pin = with_raj(&ledger).await;
        let first = ledger
            .add_transaction("Raj", &pin, TransactionInput::credit("50", "2024-03-10", "19:30"))
            .await
            .unwrap();
        let second = ledger
            .add_transaction("Raj", &pin, TransactionInput::credit("50", "2024-03-10", "19:30"))
            .await
            .unwrap();

        let err = ledger.delete_transaction_by_id("Raj", "wrong", &second.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::WrongPassword);

        ledger.delete_transaction_by_id("Raj", PASSWORD, &second.id).await.unwrap();
        let raj = ledger.open_customer("Raj", &pin).await.unwrap();
        assert_eq!(raj.transactions.len(), 1);
        assert_eq!(raj.transactions[0].id, first.id);

        let err = ledger.delete_transaction_by_id("Raj", PASSWORD, &second.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownTransaction);
    }

    #[tokio::test]
    async fn test_summary_and_balances() {
        let (ledger, _) = ledger();
        let raj_pin = with_raj(&ledger).await;
        let asha = ledger.add_customer("Asha", PASSWORD, PinMode::Auto).await.unwrap();

        ledger
            .add_transaction("Raj", &raj_pin, TransactionInput::credit("250", "2024-03-10", "19:30"))
            .await
            .unwrap();
        ledger
            .add_transaction("Asha", &asha.pin, TransactionInput::payment("40", "2024-04-02", "09:00"))
            .await
            .unwrap();

        let summary = ledger.summary(&MonthFilter::All).await.unwrap();
        assert_eq!(summary.total_credit, dec!(250));
        assert_eq!(summary.total_paid, dec!(40));
        assert_eq!(summary.outstanding, dec!(210));
        assert_eq!(summary.customer_count, 2);

        let april: MonthFilter = "2024-04".parse().unwrap();
        let rows = ledger.customer_balances(&april).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Raj", "Asha"]);
        assert_eq!(rows[0].balance, dec!(0));
        assert_eq!(rows[0].status, BalanceStatus::Balanced);
        assert_eq!(rows[0].transaction_count, 0);
        assert_eq!(rows[1].balance, dec!(-40));
        assert_eq!(rows[1].status, BalanceStatus::Advance);

        let months: Vec<String> = ledger.available_months().await.unwrap().iter().map(|m| m.key()).collect();
        assert_eq!(months, vec!["2024-04", "2024-03"]);
    }

    #[tokio::test]
    async fn test_change_pin_via_service() {
        let (ledger, _) = ledger();
        let raj_pin = with_raj(&ledger).await;
        let asha = ledger
            .add_customer("Asha", PASSWORD, PinMode::Custom("1111".to_string()))
            .await
            .unwrap();

        let err = ledger.change_pin(PASSWORD, "Raj", &asha.pin).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicatePin);

        ledger.change_pin(PASSWORD, "Raj", &raj_pin).await.unwrap();
        ledger.change_pin(PASSWORD, "Raj", "0007").await.unwrap();
        assert!(ledger.open_customer("Raj", "0007").await.is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let backend = Arc::new(MemoryStore::with_raw("not json"));
        let logger = RecordingLogger::default();
        let ledger = Ledger::new(Config::default(), backend.clone()).with_error_logger(Box::new(logger.clone()));

        let err = ledger.list_customers().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CorruptDocument);
        assert!(!err.is_recoverable());
        assert_eq!(backend.write_count(), 0);

        let entries = logger.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1, "list_customers");
    }

    #[tokio::test]
    async fn test_failures_reach_error_logger() {
        let backend = Arc::new(MemoryStore::new());
        let logger = RecordingLogger::default();
        let ledger = Ledger::new(Config::default(), backend).with_error_logger(Box::new(logger.clone()));

        ledger.delete_customer("Ghost", PASSWORD).await.unwrap_err();
        ledger.delete_transaction("Ghost", "nope", 0).await.unwrap_err();

        let entries = logger.entries.lock().unwrap();
        assert_eq!(entries[0], (ErrorCode::UnknownCustomer, "delete_customer".to_string(), Some("Ghost".to_string())));
        assert_eq!(entries[1].0, ErrorCode::WrongPassword);
    }

    #[tokio::test]
    async fn test_export_report_and_notices() {
        let (ledger, _) = ledger();
        let pin = with_raj(&ledger).await;
        ledger
            .add_transaction("Raj", &pin, TransactionInput::payment("100", "2024-03-15", "10:00").with_notes("cash"))
            .await
            .unwrap();

        let at = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let report = ledger.export_report_at(at).await.unwrap();
        assert!(report.contains("1. CUSTOMER: Raj\n"));
        assert!(report.contains("   Balance: ₹100 (ADVANCE)\n"));
        assert!(report.contains("   1. 2024-03-15 10:00 | PAYMENT | ₹100\n"));

        assert_eq!(
            ledger.export_file_name(&at.date()),
            "KINGG-Ledger-Backup-2024-03-16.txt"
        );

        let notice = ledger.success_notice("Credit added successfully!");
        assert_eq!(notice.duration.as_millis(), 3000);
        assert_eq!(notice.to_string(), "✓ Credit added successfully!");
    }

    #[tokio::test]
    async fn test_add_transaction_returns_stored_value() {
        let (ledger, backend) = ledger();
        let pin = with_raj(&ledger).await;
        let stored = ledger
            .add_transaction("Raj", &pin, TransactionInput::credit("250", "2024-03-10", "19:30").with_notes("2x Biryani"))
            .await
            .unwrap();

        assert_eq!(stored.kind, TransactionType::Credit);
        let doc = backend.read().await.unwrap().unwrap();
        assert_eq!(doc.customer("Raj").unwrap().transactions[0], stored);
    }
}
