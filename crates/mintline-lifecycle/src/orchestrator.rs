//! The token lifecycle sequence.
//!
//! An [`Orchestrator`] is built once at startup from its configuration, the
//! authority keypair, and a shared connection, and is immutable afterwards.
//! [`Orchestrator::run`] executes create-or-reuse, mint, transfer, and burn,
//! each waiting for ledger confirmation before the next is submitted.
//!
//! A failed step aborts the sequence. Steps already confirmed stay on the
//! ledger; the failure reports them so the caller knows where it stopped.

use std::sync::Arc;

use mintline_crypto::Keypair;
use mintline_ledger::{ConfirmationReceipt, LedgerConnection};
use mintline_types::{Address, Amount};
use thiserror::Error;

use crate::error::{LifecycleError, Step};
use crate::provisioner::derive_address;
use crate::{burner, creator, minter, transferor, TokenIdentity};

/// Parameters of one lifecycle run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Decimal precision of a newly created token, and the precision the
    /// burn step asserts.
    pub decimals: u8,
    /// Raw units minted to the authority.
    pub initial_supply: Amount,
    /// Raw units sent to the fresh recipient.
    pub transfer_amount: Amount,
    /// Raw units burned from the authority's holding.
    pub burn_amount: Amount,
    /// Reuse this token instead of creating one.
    pub existing_token: Option<TokenIdentity>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            decimals: 0,
            initial_supply: 100,
            transfer_amount: 1,
            burn_amount: 10,
            existing_token: None,
        }
    }
}

/// A confirmed lifecycle step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepReport {
    TokenCreated {
        token: TokenIdentity,
        decimals: u8,
        receipt: ConfirmationReceipt,
    },
    Minted {
        token: TokenIdentity,
        holding: Address,
        amount: Amount,
        receipt: ConfirmationReceipt,
    },
    Transferred {
        token: TokenIdentity,
        recipient: Address,
        holding: Address,
        amount: Amount,
        receipt: ConfirmationReceipt,
    },
    Burned {
        token: TokenIdentity,
        holding: Address,
        amount: Amount,
        receipt: ConfirmationReceipt,
    },
}

impl StepReport {
    pub fn step(&self) -> Step {
        match self {
            Self::TokenCreated { .. } => Step::CreateToken,
            Self::Minted { .. } => Step::Mint,
            Self::Transferred { .. } => Step::Transfer,
            Self::Burned { .. } => Step::Burn,
        }
    }

    pub fn receipt(&self) -> &ConfirmationReceipt {
        match self {
            Self::TokenCreated { receipt, .. }
            | Self::Minted { receipt, .. }
            | Self::Transferred { receipt, .. }
            | Self::Burned { receipt, .. } => receipt,
        }
    }
}

/// Receives each step as soon as it is confirmed, before the next starts.
pub trait StepObserver: Send + Sync {
    /// A pre-existing token was supplied and creation was skipped.
    fn token_reused(&self, _token: &TokenIdentity) {}

    fn step_confirmed(&self, report: &StepReport);
}

/// Observer that ignores everything.
pub struct NullObserver;

impl StepObserver for NullObserver {
    fn step_confirmed(&self, _report: &StepReport) {}
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifecycleReport {
    pub token: TokenIdentity,
    /// Whether this run created the token.
    pub token_created: bool,
    pub recipient: Address,
    pub steps: Vec<StepReport>,
}

/// A run that stopped at a failed step.
#[derive(Debug, Error)]
#[error("lifecycle aborted after {} confirmed step(s)", .completed.len())]
pub struct OrchestrationError {
    /// Token in use when the failure happened, if one was known.
    pub token: Option<TokenIdentity>,
    /// Steps confirmed before the failure. They are not rolled back.
    pub completed: Vec<StepReport>,
    #[source]
    pub source: LifecycleError,
}

impl OrchestrationError {
    pub fn failed_step(&self) -> Option<Step> {
        self.source.step()
    }
}

pub struct Orchestrator {
    connection: Arc<dyn LedgerConnection>,
    authority: Keypair,
    config: LifecycleConfig,
}

impl Orchestrator {
    pub fn new(
        connection: Arc<dyn LedgerConnection>,
        authority: Keypair,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            connection,
            authority,
            config,
        }
    }

    pub fn authority(&self) -> Address {
        self.authority.address()
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn connection(&self) -> &Arc<dyn LedgerConnection> {
        &self.connection
    }

    /// Run the full lifecycle, reporting each confirmed step to `observer`.
    pub async fn run(
        &self,
        observer: &dyn StepObserver,
    ) -> Result<LifecycleReport, OrchestrationError> {
        let connection = self.connection.as_ref();
        let authority = &self.authority;
        let owner = authority.address();
        let mut completed = Vec::new();

        let (token, token_created) = match self.config.existing_token {
            Some(token) => {
                tracing::info!(mint = %token, "reusing existing token, skipping creation");
                observer.token_reused(&token);
                (token, false)
            }
            None => {
                let (token, receipt) =
                    creator::create_token(connection, authority, self.config.decimals)
                        .await
                        .map_err(|source| abort(None, &completed, source))?;
                record(
                    observer,
                    &mut completed,
                    StepReport::TokenCreated {
                        token,
                        decimals: self.config.decimals,
                        receipt,
                    },
                );
                (token, true)
            }
        };
        let holding = derive_address(&token, &owner);

        let receipt = minter::mint(connection, &token, authority, self.config.initial_supply)
            .await
            .map_err(|source| abort(Some(token), &completed, source))?;
        record(
            observer,
            &mut completed,
            StepReport::Minted {
                token,
                holding,
                amount: self.config.initial_supply,
                receipt,
            },
        );

        let recipient = Keypair::generate().address();
        let receipt = transferor::transfer(
            connection,
            &token,
            authority,
            &recipient,
            self.config.transfer_amount,
        )
        .await
        .map_err(|source| abort(Some(token), &completed, source))?;
        record(
            observer,
            &mut completed,
            StepReport::Transferred {
                token,
                recipient,
                holding: derive_address(&token, &recipient),
                amount: self.config.transfer_amount,
                receipt,
            },
        );

        let receipt = burner::burn(
            connection,
            &token,
            authority,
            self.config.burn_amount,
            self.config.decimals,
        )
        .await
        .map_err(|source| abort(Some(token), &completed, source))?;
        record(
            observer,
            &mut completed,
            StepReport::Burned {
                token,
                holding,
                amount: self.config.burn_amount,
                receipt,
            },
        );

        tracing::info!(mint = %token, steps = completed.len(), "lifecycle complete");
        Ok(LifecycleReport {
            token,
            token_created,
            recipient,
            steps: completed,
        })
    }
}

fn record(observer: &dyn StepObserver, completed: &mut Vec<StepReport>, report: StepReport) {
    tracing::debug!(step = %report.step(), signature = %report.receipt(), "step confirmed");
    observer.step_confirmed(&report);
    completed.push(report);
}

fn abort(
    token: Option<TokenIdentity>,
    completed: &[StepReport],
    source: LifecycleError,
) -> OrchestrationError {
    tracing::error!(
        step = ?source.step(),
        confirmed = completed.len(),
        transient = source.is_transient(),
        error = %source,
        "lifecycle aborted"
    );
    OrchestrationError {
        token,
        completed: completed.to_vec(),
        source,
    }
}
