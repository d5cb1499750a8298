/// HTTP endpoint paths for the Mintline node.
///
/// The constants are route patterns; the functions build concrete request
/// paths for clients.
pub mod endpoints {
    use mintline_crypto::Signature;
    use mintline_types::Address;

    pub const HEALTH: &str = "/v1/health";
    pub const BLOCKHASH: &str = "/v1/blockhash";
    pub const RENT: &str = "/v1/rent/:size";
    pub const ACCOUNT: &str = "/v1/accounts/:address";
    pub const BUNDLES: &str = "/v1/bundles";
    pub const BUNDLE_STATUS: &str = "/v1/bundles/:signature";
    pub const AIRDROP: &str = "/v1/airdrop";

    pub fn rent(space: usize) -> String {
        format!("/v1/rent/{space}")
    }

    pub fn account(address: &Address) -> String {
        format!("/v1/accounts/{}", address.to_hex())
    }

    pub fn bundle_status(signature: &Signature) -> String {
        format!("/v1/bundles/{}", signature.to_hex())
    }
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintline_crypto::Keypair;
    use mintline_types::Address;

    #[test]
    fn health_response_defaults() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert_eq!(h.protocol_version, 1);
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(endpoints::HEALTH, "/v1/health");
        assert_eq!(endpoints::BUNDLES, "/v1/bundles");
        assert_eq!(endpoints::rent(82), "/v1/rent/82");

        let addr = Address::new([0xab; 32]);
        assert_eq!(endpoints::account(&addr), format!("/v1/accounts/{}", "ab".repeat(32)));

        let sig = Keypair::generate().sign(b"x");
        assert!(endpoints::bundle_status(&sig).ends_with(&sig.to_hex()));
    }
}
