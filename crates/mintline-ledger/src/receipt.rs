use std::fmt;

use mintline_crypto::Signature;
use serde::{Deserialize, Serialize};

use crate::error::RejectReason;

/// Proof that a bundle reached confirmed status.
///
/// Wraps the fee payer's signature. Used for reporting only; nothing
/// branches on its value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationReceipt(Signature);

impl ConfirmationReceipt {
    pub fn new(signature: Signature) -> Self {
        Self(signature)
    }

    pub fn signature(&self) -> &Signature {
        &self.0
    }
}

impl fmt::Debug for ConfirmationReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfirmationReceipt({:?})", self.0)
    }
}

impl fmt::Display for ConfirmationReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final status of a processed bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BundleStatus {
    Confirmed { slot: u64 },
    Rejected { slot: u64, reason: RejectReason },
}

impl BundleStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}
