//! Ledger model for Mintline.
//!
//! This crate defines what gets submitted to a ledger and how a ledger
//! answers. It provides:
//! - The six instruction primitives and their signer requirements
//! - Atomic `OperationBundle`s and their signed form
//! - Mint and holding account records, rent and fee rules
//! - The `LedgerConnection` boundary with submit-and-confirm polling
//! - `InMemoryLedger`, the authoritative state machine used by the node and tests

pub mod account;
pub mod bundle;
pub mod config;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod processor;
pub mod receipt;
pub mod traits;

pub use account::{AccountData, AccountRecord, HoldingState, MintState, HOLDING_SIZE, MINT_SIZE};
pub use bundle::{BundleMessage, OperationBundle, SignatureEntry, SignedBundle};
pub use config::{ConfirmationPolicy, LedgerConfig, Rent, MAX_ACCOUNT_SIZE};
pub use error::{LedgerError, LedgerResult, RejectReason};
pub use instruction::Instruction;
pub use memory::InMemoryLedger;
pub use receipt::{BundleStatus, ConfirmationReceipt};
pub use traits::LedgerConnection;
