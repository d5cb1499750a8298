use mintline_ledger::{LedgerError, RejectReason};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("remote error: code={code}, message={message}")]
    Remote {
        code: u16,
        message: String,
        reason: Option<RejectReason>,
    },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("http client error: {0}")]
    Client(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

impl From<reqwest::Error> for ProtocolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::Unreachable(err.to_string())
        } else if err.is_decode() {
            Self::Deserialization(err.to_string())
        } else {
            Self::Client(err.to_string())
        }
    }
}

impl From<ProtocolError> for LedgerError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Unreachable(detail) => Self::NetworkUnavailable(detail),
            ProtocolError::Remote {
                reason: Some(reason),
                ..
            } => Self::Rejected(reason),
            ProtocolError::Remote { code, message, .. } if code == 503 || code == 504 => {
                Self::NetworkUnavailable(message)
            }
            ProtocolError::Deserialization(detail) => Self::Serialization(detail),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintline_types::Address;

    #[test]
    fn remote_rejection_becomes_ledger_rejection() {
        let err = ProtocolError::Remote {
            code: 422,
            message: "rejected".into(),
            reason: Some(RejectReason::MintNotFound(Address::new([1; 32]))),
        };
        assert_eq!(
            LedgerError::from(err),
            LedgerError::Rejected(RejectReason::MintNotFound(Address::new([1; 32])))
        );
    }

    #[test]
    fn unreachable_is_transient() {
        let err = LedgerError::from(ProtocolError::Unreachable("refused".into()));
        assert!(err.is_transient());

        let err = LedgerError::from(ProtocolError::Remote {
            code: 503,
            message: "busy".into(),
            reason: None,
        });
        assert!(err.is_transient());
    }

    #[test]
    fn other_remote_errors_are_internal() {
        let err = LedgerError::from(ProtocolError::Remote {
            code: 400,
            message: "bad address".into(),
            reason: None,
        });
        assert!(matches!(err, LedgerError::Internal(_)));
        assert!(!err.is_transient());
    }
}
