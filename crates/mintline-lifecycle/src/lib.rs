//! Token lifecycle for Mintline.
//!
//! Every operation here builds one atomic bundle from ledger primitives,
//! submits it through a [`LedgerConnection`](mintline_ledger::LedgerConnection),
//! and returns only once the ledger has confirmed it. Holding accounts are
//! provisioned idempotently inside the same bundle that uses them, so no
//! caller ever checks whether one exists.
//!
//! - [`provisioner`]: holding address derivation and idempotent provisioning
//! - [`creator`], [`minter`], [`transferor`], [`burner`]: one operation each
//! - [`orchestrator`]: create-or-reuse, mint, transfer, burn in strict order

pub mod burner;
pub mod creator;
pub mod error;
pub mod minter;
pub mod orchestrator;
pub mod provisioner;
pub mod transferor;

pub use burner::burn;
pub use creator::create_token;
pub use error::{LifecycleError, LifecycleResult, Step};
pub use minter::mint;
pub use orchestrator::{
    LifecycleConfig, LifecycleReport, NullObserver, OrchestrationError, Orchestrator, StepObserver,
    StepReport,
};
pub use provisioner::{derive_address, ensure_provisioned};
pub use transferor::transfer;

/// Address of a mint record.
pub type TokenIdentity = mintline_types::Address;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use mintline_crypto::Keypair;
    use mintline_ledger::InMemoryLedger;

    pub const FUNDS: u64 = 10_000_000_000;

    /// A fresh ledger with `authority` funded for a full lifecycle.
    pub fn funded_ledger(authority: &Keypair) -> Arc<InMemoryLedger> {
        let ledger = Arc::new(InMemoryLedger::default());
        ledger
            .airdrop(&authority.address(), FUNDS)
            .expect("airdrop into fresh ledger");
        ledger
    }

    pub fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build test runtime")
    }
}
