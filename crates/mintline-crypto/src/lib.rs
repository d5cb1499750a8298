//! Cryptographic primitives for Mintline.
//!
//! Provides domain-separated BLAKE3 hashing, Ed25519 keypairs and signatures,
//! and the deterministic derivation of holding-account addresses.
//!
//! All crypto operations wrap established libraries; no custom cryptography.

pub mod derivation;
pub mod hasher;
pub mod signer;

pub use derivation::derive_holding_address;
pub use hasher::ContentHasher;
pub use signer::{verify, CryptoError, Keypair, Signature};
