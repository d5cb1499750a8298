//! Foundation types for Mintline.
//!
//! Every other Mintline crate depends on `mintline-types`.
//!
//! # Key Types
//!
//! - [`Address`]: 32-byte ledger address (mints, holdings, keypairs)
//! - [`Blockhash`]: Recent ledger reference a bundle is bound to
//! - [`Amount`]: Raw token units, already scaled by decimal precision
//! - [`Lamports`]: Native ledger units used for rent and fees

pub mod address;
pub mod error;

pub use address::{Address, Blockhash};
pub use error::TypeError;

/// Raw token units. Never implicitly scaled by decimal precision.
pub type Amount = u64;

/// Native ledger units used to fund rent and fees.
pub type Lamports = u64;
