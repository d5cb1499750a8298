use std::fmt;

use mintline_types::Address;
use serde::{Deserialize, Serialize};

/// Ed25519 keypair acting as a ledger authority.
///
/// The public half is the keypair's [`Address`]. Keypairs are loaded once and
/// passed by reference; nothing mutates them after construction.
pub struct Keypair(ed25519_dalek::SigningKey);

/// Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "signature_serde")] [u8; 64]);

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Create from a raw 32-byte secret.
    pub fn from_secret(bytes: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    /// Create from key bytes.
    ///
    /// Accepts either 64 bytes (secret followed by public key, which must
    /// match) or a bare 32-byte secret.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            64 => {
                let mut arr = [0u8; 64];
                arr.copy_from_slice(bytes);
                ed25519_dalek::SigningKey::from_keypair_bytes(&arr)
                    .map(Self)
                    .map_err(|_| CryptoError::PublicKeyMismatch)
            }
            32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(bytes);
                Ok(Self::from_secret(arr))
            }
            actual => Err(CryptoError::InvalidKeyLength { actual }),
        }
    }

    /// Parse a JSON array of byte values, e.g. `[12, 250, ...]`.
    pub fn from_json_array(text: &str) -> Result<Self, CryptoError> {
        let bytes: Vec<u8> = serde_json::from_str(text.trim())
            .map_err(|e| CryptoError::Malformed(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Secret followed by public key, 64 bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_keypair_bytes()
    }

    /// Render as a JSON array of byte values.
    pub fn to_json_array(&self) -> String {
        let bytes = self.to_bytes();
        let parts: Vec<String> = bytes.iter().map(u8::to_string).collect();
        format!("[{}]", parts.join(","))
    }

    /// The public address of this keypair.
    pub fn address(&self) -> Address {
        Address::new(self.0.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer;
        Signature(self.0.sign(message).to_bytes())
    }
}

/// Verify `signature` over `message` against the public key at `address`.
pub fn verify(address: &Address, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
    use ed25519_dalek::Verifier;
    let key = ed25519_dalek::VerifyingKey::from_bytes(address.as_bytes())
        .map_err(|_| CryptoError::InvalidKey)?;
    key.verify(message, &ed25519_dalek::Signature::from_bytes(&signature.0))
        .map_err(|_| CryptoError::InvalidSignature)
}

impl Signature {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Full hex-encoded string (128 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from 128 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s.trim()).map_err(|e| CryptoError::Malformed(e.to_string()))?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CryptoError::Malformed("expected 64-byte signature".into()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({}, <redacted>)", self.address().short_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Errors from key handling and signing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid key")]
    InvalidKey,
    #[error("key material must be 32 or 64 bytes, got {actual}")]
    InvalidKeyLength { actual: usize },
    #[error("public key does not match secret key")]
    PublicKeyMismatch,
    #[error("malformed key material: {0}")]
    Malformed(String),
}

mod signature_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(sig: &[u8; 64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(sig))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 64], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 64-byte signature"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"bundle");
        assert!(verify(&kp.address(), b"bundle", &sig).is_ok());
    }

    #[test]
    fn verify_fails_on_wrong_message() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"correct");
        assert_eq!(
            verify(&kp.address(), b"tampered", &sig),
            Err(CryptoError::InvalidSignature)
        );
    }

    #[test]
    fn verify_fails_with_wrong_key() {
        let a = Keypair::generate();
        let b = Keypair::generate();
        let sig = a.sign(b"message");
        assert!(verify(&b.address(), b"message", &sig).is_err());
    }

    #[test]
    fn keypair_bytes_reload_same_address() {
        let kp = Keypair::generate();
        let reloaded = Keypair::from_bytes(&kp.to_bytes()).unwrap();
        assert_eq!(kp.address(), reloaded.address());
    }

    #[test]
    fn secret_only_is_accepted() {
        let kp = Keypair::generate();
        let reloaded = Keypair::from_bytes(&kp.to_bytes()[..32]).unwrap();
        assert_eq!(kp.address(), reloaded.address());
    }

    #[test]
    fn mismatched_public_half_is_rejected() {
        let kp = Keypair::generate();
        let other = Keypair::generate();
        let mut bytes = kp.to_bytes();
        bytes[32..].copy_from_slice(other.address().as_bytes());
        assert_eq!(
            Keypair::from_bytes(&bytes).unwrap_err(),
            CryptoError::PublicKeyMismatch
        );
    }

    #[test]
    fn json_array_loads() {
        let kp = Keypair::generate();
        let reloaded = Keypair::from_json_array(&kp.to_json_array()).unwrap();
        assert_eq!(kp.address(), reloaded.address());
    }

    #[test]
    fn json_array_rejects_garbage() {
        assert!(matches!(
            Keypair::from_json_array("not json"),
            Err(CryptoError::Malformed(_))
        ));
        assert_eq!(
            Keypair::from_json_array("[1,2,3]").unwrap_err(),
            CryptoError::InvalidKeyLength { actual: 3 }
        );
        assert!(matches!(
            Keypair::from_json_array("[1,2,300]"),
            Err(CryptoError::Malformed(_))
        ));
    }

    #[test]
    fn signature_serializes_as_hex() {
        let sig = Keypair::generate().sign(b"x");
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json.len(), 128 + 2);
        let parsed: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, parsed);
        assert_eq!(Signature::from_hex(&sig.to_hex()).unwrap(), sig);
    }

    #[test]
    fn debug_redacts_secret() {
        let kp = Keypair::generate();
        let debug = format!("{kp:?}");
        assert!(debug.contains("redacted"));
        assert!(!debug.contains(&hex::encode(&kp.to_bytes()[..32])));
    }
}
