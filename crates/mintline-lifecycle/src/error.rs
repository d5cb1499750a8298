use std::fmt;
use std::time::Duration;

use mintline_ledger::{LedgerError, RejectReason};
use thiserror::Error;

/// A step of the token lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    CreateToken,
    Mint,
    Transfer,
    Burn,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateToken => "create-token",
            Self::Mint => "mint",
            Self::Transfer => "transfer",
            Self::Burn => "burn",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{step} rejected by ledger: {reason}")]
    RejectedOperation { step: Step, reason: RejectReason },

    #[error("{step} failed, ledger unavailable: {detail}")]
    NetworkUnavailable { step: Step, detail: String },

    #[error("{step} not confirmed after {waited:?} (bundle {signature})")]
    ConfirmationTimeout {
        step: Step,
        signature: String,
        waited: Duration,
    },

    #[error("{step} could not be signed: {detail}")]
    Signing { step: Step, detail: String },

    #[error("{operation} is not supported")]
    Unsupported { operation: String },

    #[error("{step} failed: {detail}")]
    Internal { step: Step, detail: String },
}

impl LifecycleError {
    /// Attach the failing step to a ledger error.
    pub fn from_ledger(step: Step, err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected(reason) => Self::RejectedOperation { step, reason },
            LedgerError::NetworkUnavailable(detail) => Self::NetworkUnavailable { step, detail },
            LedgerError::ConfirmationTimeout { signature, waited } => Self::ConfirmationTimeout {
                step,
                signature,
                waited,
            },
            LedgerError::MissingSigner(address) => Self::Signing {
                step,
                detail: format!("no keypair for required signer {address}"),
            },
            LedgerError::Serialization(detail) | LedgerError::Internal(detail) => {
                Self::Internal { step, detail }
            }
        }
    }

    /// Closure form of [`from_ledger`](Self::from_ledger) for `map_err`.
    pub fn at(step: Step) -> impl Fn(LedgerError) -> Self {
        move |err| Self::from_ledger(step, err)
    }

    /// Whether the failed step might succeed if run again later.
    /// Rejections and configuration errors never do.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkUnavailable { .. } | Self::ConfirmationTimeout { .. }
        )
    }

    pub fn step(&self) -> Option<Step> {
        match self {
            Self::RejectedOperation { step, .. }
            | Self::NetworkUnavailable { step, .. }
            | Self::ConfirmationTimeout { step, .. }
            | Self::Signing { step, .. }
            | Self::Internal { step, .. } => Some(*step),
            Self::Configuration(_) | Self::Unsupported { .. } => None,
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
