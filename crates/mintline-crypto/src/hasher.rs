/// Domain-separated BLAKE3 hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so a bundle message and a holding seed with identical bytes
/// never collide.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for bundle messages before signing.
    pub const BUNDLE: Self = Self {
        domain: "mintline-bundle-v1",
    };
    /// Hasher for holding-account address derivation.
    pub const HOLDING: Self = Self {
        domain: "mintline-holding-v1",
    };
    /// Hasher for the ledger's blockhash chain.
    pub const BLOCKHASH: Self = Self {
        domain: "mintline-blockhash-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        self.hash_parts(&[data])
    }

    /// Hash a sequence of byte slices as one domain-separated input.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for part in parts {
            hasher.update(part);
        }
        *hasher.finalize().as_bytes()
    }

    /// Hash a serializable value as JSON with domain separation.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<[u8; 32], HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(
            ContentHasher::BUNDLE.hash(b"payload"),
            ContentHasher::BUNDLE.hash(b"payload")
        );
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        let bundle = ContentHasher::BUNDLE.hash(data);
        let holding = ContentHasher::HOLDING.hash(data);
        let blockhash = ContentHasher::BLOCKHASH.hash(data);
        assert_ne!(bundle, holding);
        assert_ne!(bundle, blockhash);
        assert_ne!(holding, blockhash);
    }

    #[test]
    fn parts_hash_like_concatenation() {
        let joined = ContentHasher::HOLDING.hash(b"abcdef");
        let parts = ContentHasher::HOLDING.hash_parts(&[b"abc", b"def"]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn hash_json_works() {
        let value = serde_json::json!({"amount": 100, "decimals": 0});
        let digest = ContentHasher::BUNDLE.hash_json(&value).unwrap();
        assert_ne!(digest, [0u8; 32]);
    }

    #[test]
    fn custom_domain() {
        let hasher = ContentHasher::new("my-domain-v1");
        assert_eq!(hasher.domain(), "my-domain-v1");
        assert_ne!(hasher.hash(b"data"), ContentHasher::BUNDLE.hash(b"data"));
    }
}
