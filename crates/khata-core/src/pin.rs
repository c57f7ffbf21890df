//! Customer PIN allocation
//!
//! PINs are four decimal digits, leading zeros allowed, and unique across all
//! current customers. They gate casual access to one customer's ledger and are
//! not treated as secrets.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use std::collections::HashSet;

use crate::error::PinError;

/// Number of digits in a PIN
pub const PIN_LENGTH: usize = 4;

/// Number of distinct PINs
pub const PIN_SPACE: usize = 10_000;

/// Random draws before falling back to a scan
const RANDOM_ATTEMPTS: usize = 256;

static PIN_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

/// Generates and validates customer PINs
pub struct PinAllocator;

impl PinAllocator {
    /// Whether `pin` is exactly four ASCII digits
    pub fn is_valid_format(pin: &str) -> bool {
        PIN_FORMAT.is_match(pin)
    }

    /// Return a PIN not present in `existing`
    pub fn generate(existing: &HashSet<String>) -> Result<String, PinError> {
        Self::generate_with(existing, &mut rand::thread_rng())
    }

    /// Same as [`PinAllocator::generate`] with a caller-supplied RNG
    pub fn generate_with<R: Rng + ?Sized>(
        existing: &HashSet<String>,
        rng: &mut R,
    ) -> Result<String, PinError> {
        let taken = existing.iter().filter(|pin| Self::is_valid_format(pin)).count();
        if taken >= PIN_SPACE {
            return Err(PinError::Exhausted { capacity: PIN_SPACE });
        }

        for _ in 0..RANDOM_ATTEMPTS {
            let pin = format!("{:04}", rng.gen_range(0..PIN_SPACE));
            if !existing.contains(&pin) {
                return Ok(pin);
            }
        }

        // nearly full: walk the space from a random start
        let start = rng.gen_range(0..PIN_SPACE);
        (0..PIN_SPACE)
            .map(|offset| format!("{:04}", (start + offset) % PIN_SPACE))
            .find(|pin| !existing.contains(pin))
            .ok_or(PinError::Exhausted { capacity: PIN_SPACE })
    }

    /// Check an operator-chosen PIN against the format and the PINs in use
    pub fn validate_custom(pin: &str, existing: &HashSet<String>) -> Result<(), PinError> {
        if !Self::is_valid_format(pin) {
            return Err(PinError::InvalidFormat);
        }
        if existing.contains(pin) {
            return Err(PinError::Duplicate);
        }
        Ok(())
    }
}
