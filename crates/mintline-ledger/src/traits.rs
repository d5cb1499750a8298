use std::time::Instant;

use async_trait::async_trait;
use mintline_crypto::{derive_holding_address, Keypair, Signature};
use mintline_types::{Address, Amount, Blockhash, Lamports};

use crate::account::{AccountRecord, HoldingState, MintState};
use crate::bundle::{OperationBundle, SignedBundle};
use crate::config::ConfirmationPolicy;
use crate::error::{LedgerError, LedgerResult};
use crate::receipt::{BundleStatus, ConfirmationReceipt};

/// Handle to a ledger: submit signed bundles, await confirmation, query state.
///
/// Implementations hold no per-call state, so one connection is shared for
/// the whole process. No method retries on its own.
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// The blockhash new bundles should be bound to.
    async fn latest_blockhash(&self) -> LedgerResult<Blockhash>;

    /// Hand a signed bundle to the ledger. Returns the bundle's signature
    /// without waiting for it to be processed.
    async fn send_bundle(&self, bundle: &SignedBundle) -> LedgerResult<Signature>;

    /// Final status of a bundle, or `None` while it is still pending.
    async fn bundle_status(&self, signature: &Signature) -> LedgerResult<Option<BundleStatus>>;

    /// Lamports an account of `space` bytes must hold to be rent-exempt.
    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> LedgerResult<Lamports>;

    async fn account(&self, address: &Address) -> LedgerResult<Option<AccountRecord>>;

    fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy::default()
    }

    /// Sign `bundle` against a fresh blockhash, send it, and suspend until
    /// the ledger confirms or rejects it.
    async fn submit(
        &self,
        bundle: OperationBundle,
        signers: &[&Keypair],
    ) -> LedgerResult<ConfirmationReceipt> {
        let blockhash = self.latest_blockhash().await?;
        let signed = bundle.sign(blockhash, signers)?;
        let signature = self.send_bundle(&signed).await?;
        tracing::debug!(signature = %signature, "bundle sent, awaiting confirmation");
        self.confirm(&signature).await
    }

    /// Poll [`bundle_status`](Self::bundle_status) until a final status
    /// arrives or the confirmation policy's timeout passes.
    async fn confirm(&self, signature: &Signature) -> LedgerResult<ConfirmationReceipt> {
        let policy = self.confirmation_policy();
        let started = Instant::now();
        loop {
            match self.bundle_status(signature).await? {
                Some(BundleStatus::Confirmed { .. }) => {
                    return Ok(ConfirmationReceipt::new(*signature));
                }
                Some(BundleStatus::Rejected { reason, .. }) => {
                    return Err(LedgerError::Rejected(reason));
                }
                None => {}
            }

            let waited = started.elapsed();
            if waited >= policy.timeout {
                return Err(LedgerError::ConfirmationTimeout {
                    signature: signature.to_hex(),
                    waited,
                });
            }
            tokio::time::sleep(policy.poll_interval).await;
        }
    }

    async fn mint_state(&self, mint: &Address) -> LedgerResult<Option<MintState>> {
        Ok(self
            .account(mint)
            .await?
            .and_then(|record| record.as_mint().cloned()))
    }

    async fn holding_state(&self, holding: &Address) -> LedgerResult<Option<HoldingState>> {
        Ok(self
            .account(holding)
            .await?
            .and_then(|record| record.as_holding().cloned()))
    }

    /// Balance of `owner`'s holding of `mint`, or `None` if not provisioned.
    async fn token_balance(&self, mint: &Address, owner: &Address) -> LedgerResult<Option<Amount>> {
        let holding = derive_holding_address(mint, owner);
        Ok(self.holding_state(&holding).await?.map(|h| h.amount))
    }

    async fn lamports(&self, address: &Address) -> LedgerResult<Lamports> {
        Ok(self
            .account(address)
            .await?
            .map(|record| record.lamports)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::instruction::Instruction;

    /// Accepts every bundle and never reports a final status.
    struct SilentLedger;

    #[async_trait]
    impl LedgerConnection for SilentLedger {
        async fn latest_blockhash(&self) -> LedgerResult<Blockhash> {
            Ok(Blockhash::new([0; 32]))
        }

        async fn send_bundle(&self, bundle: &SignedBundle) -> LedgerResult<Signature> {
            bundle
                .signature()
                .ok_or_else(|| LedgerError::Internal("unsigned".into()))
        }

        async fn bundle_status(&self, _: &Signature) -> LedgerResult<Option<BundleStatus>> {
            Ok(None)
        }

        async fn minimum_balance_for_rent_exemption(&self, _: usize) -> LedgerResult<Lamports> {
            Ok(0)
        }

        async fn account(&self, _: &Address) -> LedgerResult<Option<AccountRecord>> {
            Ok(None)
        }

        fn confirmation_policy(&self) -> ConfirmationPolicy {
            ConfirmationPolicy {
                poll_interval: Duration::from_millis(5),
                timeout: Duration::from_millis(30),
            }
        }
    }

    #[tokio::test]
    async fn submit_times_out_when_status_never_arrives() {
        let payer = Keypair::generate();
        let bundle = OperationBundle::new(payer.address()).with(Instruction::MintTo {
            mint: Address::new([1; 32]),
            destination: Address::new([2; 32]),
            authority: payer.address(),
            amount: 1,
        });

        let err = SilentLedger.submit(bundle, &[&payer]).await.unwrap_err();
        assert!(matches!(err, LedgerError::ConfirmationTimeout { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn missing_keypair_fails_before_sending() {
        let payer = Keypair::generate();
        let authority = Address::new([9; 32]);
        let bundle = OperationBundle::new(payer.address()).with(Instruction::MintTo {
            mint: Address::new([1; 32]),
            destination: Address::new([2; 32]),
            authority,
            amount: 1,
        });

        let err = SilentLedger.submit(bundle, &[&payer]).await.unwrap_err();
        assert_eq!(err, LedgerError::MissingSigner(authority));
    }

    #[tokio::test]
    async fn queries_default_to_empty() {
        let addr = Address::new([5; 32]);
        assert_eq!(SilentLedger.lamports(&addr).await.unwrap(), 0);
        assert!(SilentLedger.mint_state(&addr).await.unwrap().is_none());
        assert!(SilentLedger.token_balance(&addr, &addr).await.unwrap().is_none());
    }
}
