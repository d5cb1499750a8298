//! Process configuration: flags and environment, validated before any
//! ledger interaction.

use std::fmt;
use std::sync::Arc;

use mintline_crypto::Keypair;
use mintline_ledger::{InMemoryLedger, LedgerConnection};
use mintline_lifecycle::{LifecycleError, LifecycleResult};
use mintline_protocol::HttpConnection;
use mintline_types::{Address, Lamports};

/// Lamports credited to the authority on a `memory://` ledger.
pub const MEMORY_LEDGER_FUNDING: Lamports = 100_000_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Memory,
    Http(String),
}

impl Endpoint {
    pub fn parse(value: Option<&str>) -> LifecycleResult<Self> {
        let value = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                LifecycleError::Configuration(
                    "no ledger endpoint: pass --endpoint or set MINTLINE_ENDPOINT".into(),
                )
            })?;
        if value == "memory://" || value == "memory" {
            return Ok(Self::Memory);
        }
        if value.starts_with("http://") || value.starts_with("https://") {
            return Ok(Self::Http(value.to_string()));
        }
        Err(LifecycleError::Configuration(format!(
            "unsupported endpoint {value:?}: expected http://, https://, or memory://"
        )))
    }

    /// Open a connection. A `memory://` ledger starts empty, so `fund` is
    /// credited there to pay for the run.
    pub fn connect(&self, fund: Option<&Address>) -> LifecycleResult<Arc<dyn LedgerConnection>> {
        match self {
            Self::Memory => {
                let ledger = InMemoryLedger::default();
                if let Some(address) = fund {
                    ledger
                        .airdrop(address, MEMORY_LEDGER_FUNDING)
                        .map_err(|e| {
                            LifecycleError::Configuration(format!(
                                "cannot fund {address} on the memory ledger: {e}"
                            ))
                        })?;
                }
                Ok(Arc::new(ledger))
            }
            Self::Http(url) => {
                let connection = HttpConnection::new(url)
                    .map_err(|e| LifecycleError::Configuration(e.to_string()))?;
                Ok(Arc::new(connection))
            }
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory://"),
            Self::Http(url) => f.write_str(url),
        }
    }
}

/// Load the authority keypair from its JSON byte-array form.
pub fn authority(secret: Option<&str>) -> LifecycleResult<Keypair> {
    let secret = secret.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
        LifecycleError::Configuration(
            "no authority keypair: pass --secret-key or set MINTLINE_SECRET_KEY".into(),
        )
    })?;
    Keypair::from_json_array(secret)
        .map_err(|e| LifecycleError::Configuration(format!("malformed authority keypair: {e}")))
}

/// Parse a hex address supplied through `source` (a flag or variable name).
pub fn address(source: &str, value: &str) -> LifecycleResult<Address> {
    Address::from_hex(value)
        .map_err(|e| LifecycleError::Configuration(format!("invalid address in {source}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_forms() {
        assert_eq!(Endpoint::parse(Some("memory://")).unwrap(), Endpoint::Memory);
        assert_eq!(
            Endpoint::parse(Some(" https://node.example.com ")).unwrap(),
            Endpoint::Http("https://node.example.com".into())
        );
        assert!(matches!(
            Endpoint::parse(Some("ws://node")),
            Err(LifecycleError::Configuration(_))
        ));
        assert!(matches!(
            Endpoint::parse(None),
            Err(LifecycleError::Configuration(_))
        ));
        assert!(Endpoint::parse(Some("  ")).is_err());
    }

    #[test]
    fn authority_round_trips_through_json() {
        let keypair = Keypair::generate();
        let loaded = authority(Some(&keypair.to_json_array())).unwrap();
        assert_eq!(loaded.address(), keypair.address());
    }

    #[test]
    fn malformed_authority_is_configuration_error() {
        for bad in [None, Some(""), Some("not json"), Some("[1,2,3]")] {
            assert!(matches!(authority(bad), Err(LifecycleError::Configuration(_))));
        }
    }

    #[test]
    fn invalid_address_names_its_source() {
        let err = address("MINTLINE_MINT_ADDRESS", "xyz").unwrap_err();
        assert!(err.to_string().contains("MINTLINE_MINT_ADDRESS"));
    }

    #[tokio::test]
    async fn memory_endpoint_funds_authority() {
        let addr = Keypair::generate().address();
        let connection = Endpoint::Memory.connect(Some(&addr)).unwrap();
        assert_eq!(
            connection.lamports(&addr).await.unwrap(),
            MEMORY_LEDGER_FUNDING
        );
    }
}
