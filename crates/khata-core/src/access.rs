//! Password and PIN checks
//!
//! Comparisons are plain string equality. The shared password gates every
//! privileged mutation; a customer's PIN gates opening that customer's ledger.

use khata_store::{Customer, LedgerDocument};

use crate::error::{AuthError, CoreResult, NotFoundError};
use crate::pin::PinAllocator;

/// Credential verification and credential changes
pub struct AccessControl;

impl AccessControl {
    pub fn verify_password(candidate: &str, doc: &LedgerDocument) -> bool {
        candidate == doc.credentials.password
    }

    pub fn verify_pin(candidate: &str, customer: &Customer) -> bool {
        candidate == customer.pin
    }

    /// Operator login: both the id and the password must match
    pub fn verify_login(id: &str, password: &str, doc: &LedgerDocument) -> bool {
        id == doc.credentials.id && Self::verify_password(password, doc)
    }

    /// Gate for privileged operations
    pub fn require_password(candidate: &str, doc: &LedgerDocument) -> Result<(), AuthError> {
        if Self::verify_password(candidate, doc) {
            Ok(())
        } else {
            Err(AuthError::WrongPassword)
        }
    }

    /// Gate for opening a customer's ledger
    pub fn require_pin(candidate: &str, customer: &Customer) -> Result<(), AuthError> {
        if Self::verify_pin(candidate, customer) {
            Ok(())
        } else {
            Err(AuthError::WrongPin)
        }
    }

    /// Replace the shared password.
    ///
    /// Checks run in order: current password, minimum length, then the
    /// confirmation when one is given. The caller persists the document.
    pub fn change_password(
        current: &str,
        next: &str,
        confirm: Option<&str>,
        doc: &mut LedgerDocument,
        min_length: usize,
    ) -> Result<(), AuthError> {
        Self::require_password(current, doc)?;

        if next.chars().count() < min_length {
            return Err(AuthError::WeakPassword { min: min_length });
        }

        if let Some(confirm) = confirm {
            if confirm != next {
                return Err(AuthError::PasswordMismatch);
            }
        }

        doc.credentials.password = next.to_string();
        Ok(())
    }

    /// Replace a customer's PIN.
    ///
    /// The customer's own current PIN does not count as a collision, so
    /// re-submitting it succeeds.
    pub fn change_pin(
        password: &str,
        name: &str,
        new_pin: &str,
        doc: &mut LedgerDocument,
    ) -> CoreResult<()> {
        Self::require_password(password, doc)?;

        if doc.customer(name).is_none() {
            return Err(NotFoundError::UnknownCustomer { name: name.to_string() }.into());
        }

        let others = doc.pins_except(name);
        PinAllocator::validate_custom(new_pin, &others)?;

        if let Some(customer) = doc.customer_mut(name) {
            customer.pin = new_pin.to_string();
        }
        Ok(())
    }
}
