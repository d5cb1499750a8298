use std::time::Duration;

use mintline_types::{Address, Amount, Lamports};
use serde::{Deserialize, Serialize};

/// Why a ledger declined a bundle.
///
/// Rejection is all-or-nothing: when any instruction fails, no instruction
/// in the bundle takes effect and no fee is charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectReason {
    #[error("account {account} holds {available} lamports, needs {needed}")]
    InsufficientFunds {
        account: Address,
        needed: Lamports,
        available: Lamports,
    },

    #[error("holding {holding} has {available} units, needs {needed}")]
    InsufficientTokenBalance {
        holding: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("account {0} already exists")]
    AccountAlreadyInUse(Address),

    #[error("account {0} does not exist")]
    AccountNotFound(Address),

    #[error("mint {0} does not exist")]
    MintNotFound(Address),

    #[error("account {0} does not hold the expected data")]
    InvalidAccountData(Address),

    #[error("{lamports} lamports cannot make {space} bytes rent-exempt (minimum {minimum})")]
    NotRentExempt {
        lamports: Lamports,
        space: usize,
        minimum: Lamports,
    },

    #[error("{space} bytes exceeds the account size limit of {max}")]
    AccountTooLarge { space: usize, max: usize },

    #[error("holding {holding} is not the derived address for its mint and owner")]
    InvalidHoldingAddress { holding: Address },

    #[error("{authority} is not the mint authority of {mint}")]
    InvalidMintAuthority { mint: Address, authority: Address },

    #[error("mint {0} has a fixed supply")]
    FixedSupply(Address),

    #[error("{authority} does not own holding {holding}")]
    OwnerMismatch { holding: Address, authority: Address },

    #[error("holding {holding} does not belong to mint {mint}")]
    MintMismatch { holding: Address, mint: Address },

    #[error("expected {expected} decimals, mint records {actual}")]
    DecimalsMismatch { expected: u8, actual: u8 },

    #[error("unexpected signature from {0}")]
    UnexpectedSignature(Address),

    #[error("duplicate signature from {0}")]
    DuplicateSignature(Address),

    #[error("missing signature from {0}")]
    MissingSignature(Address),

    #[error("invalid signature from {0}")]
    InvalidSignature(Address),

    #[error("bundle contains no instructions")]
    EmptyBundle,

    #[error("blockhash is unknown or has expired")]
    BlockhashNotFound,

    #[error("bundle was already processed")]
    AlreadyProcessed,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("rejected by ledger: {0}")]
    Rejected(RejectReason),

    #[error("ledger unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("bundle {signature} not confirmed after {waited:?}")]
    ConfirmationTimeout { signature: String, waited: Duration },

    #[error("no keypair supplied for required signer {0}")]
    MissingSigner(Address),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Whether the same bundle might succeed if tried again later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkUnavailable(_) | Self::ConfirmationTimeout { .. }
        )
    }
}

impl From<RejectReason> for LedgerError {
    fn from(reason: RejectReason) -> Self {
        Self::Rejected(reason)
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_serializes_with_kind_tag() {
        let reason = RejectReason::DecimalsMismatch {
            expected: 2,
            actual: 0,
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["kind"], "decimals_mismatch");
        let parsed: RejectReason = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, reason);
    }

    #[test]
    fn newtype_reasons_serialize() {
        let reason = RejectReason::MintNotFound(Address::new([3; 32]));
        let json = serde_json::to_string(&reason).unwrap();
        let parsed: RejectReason = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reason);
    }

    #[test]
    fn transient_classification() {
        assert!(LedgerError::NetworkUnavailable("refused".into()).is_transient());
        assert!(LedgerError::ConfirmationTimeout {
            signature: "ab".into(),
            waited: Duration::from_secs(1),
        }
        .is_transient());
        assert!(!LedgerError::Rejected(RejectReason::EmptyBundle).is_transient());
    }
}
