use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use mintline_ledger::{ConfirmationPolicy, LedgerConfig, Rent};
use mintline_types::Lamports;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Node configuration, read from TOML. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub fee_per_signature: Lamports,
    pub lamports_per_byte_year: Lamports,
    pub max_blockhash_age: usize,
    /// Confirmation poll interval for in-process clients of the ledger.
    pub poll_interval_ms: u64,
    /// Largest single airdrop the faucet grants; 0 disables it.
    pub faucet_limit: Lamports,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8899)),
            fee_per_signature: 5_000,
            lamports_per_byte_year: 3_480,
            max_blockhash_age: 150,
            poll_interval_ms: 500,
            faucet_limit: 100_000_000_000,
        }
    }
}

impl NodeConfig {
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.max_blockhash_age == 0 {
            return Err(ServerError::Config("max_blockhash_age must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ServerError::Config("poll_interval_ms must be at least 1".into()));
        }
        Ok(())
    }

    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            rent: Rent {
                lamports_per_byte_year: self.lamports_per_byte_year,
                ..Rent::default()
            },
            fee_per_signature: self.fee_per_signature,
            max_blockhash_age: self.max_blockhash_age,
        }
    }

    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            ..ConfirmationPolicy::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = NodeConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8899".parse::<SocketAddr>().unwrap());
        assert_eq!(c.ledger_config(), LedgerConfig::default());
        assert_eq!(c.confirmation_policy(), ConfirmationPolicy::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = NodeConfig::from_toml(
            r#"
            bind_addr = "0.0.0.0:9000"
            fee_per_signature = 10
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.fee_per_signature, 10);
        assert_eq!(c.max_blockhash_age, 150);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "faucet_limit = 0\npoll_interval_ms = 20").unwrap();
        let c = NodeConfig::load(file.path()).unwrap();
        assert_eq!(c.faucet_limit, 0);
        assert_eq!(c.confirmation_policy().poll_interval, Duration::from_millis(20));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            NodeConfig::from_toml("max_blockhash_age = 0"),
            Err(ServerError::Config(_))
        ));
        assert!(matches!(
            NodeConfig::from_toml("bind_addr = 12"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = NodeConfig::load(Path::new("/nonexistent/node.toml")).unwrap_err();
        assert!(matches!(err, ServerError::Io(_)));
    }
}
