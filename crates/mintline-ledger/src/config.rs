use std::time::Duration;

use mintline_types::Lamports;
use serde::{Deserialize, Serialize};

/// Bytes charged on top of an account's own size when computing rent.
pub const ACCOUNT_STORAGE_OVERHEAD: usize = 128;

/// Largest data size a single account may be created with.
pub const MAX_ACCOUNT_SIZE: usize = 10 * 1024 * 1024;

/// Rent parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rent {
    pub lamports_per_byte_year: Lamports,
    /// Years of rent an account must hold to be exempt.
    pub exemption_threshold_years: u64,
}

impl Default for Rent {
    fn default() -> Self {
        Self {
            lamports_per_byte_year: 3_480,
            exemption_threshold_years: 2,
        }
    }
}

impl Rent {
    /// Minimum lamports that make an account of `space` bytes rent-exempt.
    ///
    /// Returns `None` when the amount does not fit in [`Lamports`].
    pub fn minimum_balance(&self, space: usize) -> Option<Lamports> {
        let bytes = u64::try_from(ACCOUNT_STORAGE_OVERHEAD.checked_add(space)?).ok()?;
        bytes
            .checked_mul(self.lamports_per_byte_year)?
            .checked_mul(self.exemption_threshold_years)
    }
}

/// Parameters of an [`InMemoryLedger`](crate::InMemoryLedger).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub rent: Rent,
    /// Lamports charged to the fee payer per signature on a confirmed bundle.
    pub fee_per_signature: Lamports,
    /// How many recent blockhashes a bundle may reference.
    pub max_blockhash_age: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rent: Rent::default(),
            fee_per_signature: 5_000,
            max_blockhash_age: 150,
        }
    }
}

/// How a connection waits for a submitted bundle to be confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(60),
        }
    }
}
