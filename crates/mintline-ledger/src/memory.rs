use std::collections::{HashMap, VecDeque};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use mintline_crypto::{ContentHasher, Signature};
use mintline_types::{Address, Blockhash, Lamports};

use crate::account::AccountRecord;
use crate::bundle::SignedBundle;
use crate::config::{ConfirmationPolicy, LedgerConfig, MAX_ACCOUNT_SIZE};
use crate::error::{LedgerError, LedgerResult, RejectReason};
use crate::processor::{execute_message, Accounts};
use crate::receipt::BundleStatus;
use crate::traits::LedgerConnection;

/// In-memory ledger for the node, tests, and local runs.
///
/// Bundles are processed one at a time under a write lock. Each bundle is
/// applied to a copy of the account map, which replaces the live map only if
/// every instruction succeeds. Every processed bundle advances the slot and
/// the blockhash chain, and leaves a final status behind. Statuses are kept
/// only as long as the blockhash a bundle could have referenced; past that
/// a replay fails on its expired blockhash instead.
pub struct InMemoryLedger {
    config: LedgerConfig,
    policy: ConfirmationPolicy,
    inner: RwLock<LedgerState>,
}

struct LedgerState {
    accounts: Accounts,
    statuses: HashMap<Signature, BundleStatus>,
    /// Signatures in the order their statuses were recorded, with the slot.
    status_log: VecDeque<(u64, Signature)>,
    recent_blockhashes: VecDeque<Blockhash>,
    slot: u64,
}

impl InMemoryLedger {
    pub fn new(config: LedgerConfig) -> Self {
        let genesis = Blockhash::new(ContentHasher::BLOCKHASH.hash(b"genesis"));
        Self {
            config,
            policy: ConfirmationPolicy::default(),
            inner: RwLock::new(LedgerState {
                accounts: Accounts::new(),
                statuses: HashMap::new(),
                status_log: VecDeque::new(),
                recent_blockhashes: VecDeque::from([genesis]),
                slot: 0,
            }),
        }
    }

    /// Override the policy used by [`LedgerConnection::confirm`].
    pub fn with_confirmation_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Credit `lamports` to `address`, creating a system account if needed.
    /// Returns the new balance.
    pub fn airdrop(&self, address: &Address, lamports: Lamports) -> LedgerResult<Lamports> {
        let mut state = self.write()?;
        let record = state
            .accounts
            .entry(*address)
            .or_insert_with(|| AccountRecord::system(0));
        record.lamports = record
            .lamports
            .checked_add(lamports)
            .ok_or(LedgerError::Rejected(RejectReason::ArithmeticOverflow))?;
        let balance = record.lamports;
        tracing::debug!(address = %address, lamports, balance, "airdrop");
        Ok(balance)
    }

    /// Process a signed bundle and record its final status.
    ///
    /// Returns the bundle's signature whether it was confirmed or rejected;
    /// the outcome is read back through [`LedgerConnection::bundle_status`].
    /// Bundles whose signatures do not verify, or that were already
    /// processed, fail here without consuming a slot.
    pub fn process(&self, bundle: &SignedBundle) -> LedgerResult<Signature> {
        let signature = bundle.signature().ok_or(LedgerError::Rejected(
            RejectReason::MissingSignature(bundle.message.fee_payer),
        ))?;
        bundle.verify().map_err(|reason| {
            tracing::warn!(signature = %signature, %reason, "bundle refused");
            LedgerError::Rejected(reason)
        })?;

        let mut state = self.write()?;
        if state.statuses.contains_key(&signature) {
            return Err(LedgerError::Rejected(RejectReason::AlreadyProcessed));
        }

        let outcome = Self::apply(&mut state, &self.config, bundle);
        let slot = Self::advance_slot(&mut state, self.config.max_blockhash_age);

        let status = match outcome {
            Ok(()) => {
                tracing::debug!(
                    signature = %signature,
                    slot,
                    instructions = bundle.message.instructions.len(),
                    "bundle confirmed"
                );
                BundleStatus::Confirmed { slot }
            }
            Err(reason) => {
                tracing::warn!(signature = %signature, slot, %reason, "bundle rejected");
                BundleStatus::Rejected { slot, reason }
            }
        };
        state.statuses.insert(signature, status);
        state.status_log.push_back((slot, signature));
        Self::prune_statuses(&mut state, self.config.max_blockhash_age);
        Ok(signature)
    }

    /// Current slot (number of bundles processed).
    pub fn slot(&self) -> LedgerResult<u64> {
        Ok(self.read()?.slot)
    }

    fn apply(
        state: &mut LedgerState,
        config: &LedgerConfig,
        bundle: &SignedBundle,
    ) -> Result<(), RejectReason> {
        if !state
            .recent_blockhashes
            .contains(&bundle.message.recent_blockhash)
        {
            return Err(RejectReason::BlockhashNotFound);
        }

        let mut staged = state.accounts.clone();
        execute_message(
            &mut staged,
            config,
            &bundle.message,
            bundle.message.required_signers().len(),
        )?;
        state.accounts = staged;
        Ok(())
    }

    fn advance_slot(state: &mut LedgerState, max_age: usize) -> u64 {
        state.slot += 1;
        let previous = state
            .recent_blockhashes
            .back()
            .copied()
            .unwrap_or(Blockhash::new([0; 32]));
        let next = ContentHasher::BLOCKHASH.hash_parts(&[
            previous.as_bytes(),
            &state.slot.to_le_bytes(),
        ]);
        state.recent_blockhashes.push_back(Blockhash::new(next));
        while state.recent_blockhashes.len() > max_age.max(1) {
            state.recent_blockhashes.pop_front();
        }
        state.slot
    }

    fn prune_statuses(state: &mut LedgerState, max_age: usize) {
        let horizon = state.slot.saturating_sub(max_age.max(1) as u64);
        while let Some(&(slot, signature)) = state.status_log.front() {
            if slot > horizon {
                break;
            }
            state.status_log.pop_front();
            state.statuses.remove(&signature);
        }
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerState>> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Internal("ledger read lock poisoned".into()))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerState>> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Internal("ledger write lock poisoned".into()))
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

#[async_trait]
impl LedgerConnection for InMemoryLedger {
    async fn latest_blockhash(&self) -> LedgerResult<Blockhash> {
        let state = self.read()?;
        state
            .recent_blockhashes
            .back()
            .copied()
            .ok_or_else(|| LedgerError::Internal("blockhash queue is empty".into()))
    }

    async fn send_bundle(&self, bundle: &SignedBundle) -> LedgerResult<Signature> {
        self.process(bundle)
    }

    async fn bundle_status(&self, signature: &Signature) -> LedgerResult<Option<BundleStatus>> {
        Ok(self.read()?.statuses.get(signature).cloned())
    }

    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> LedgerResult<Lamports> {
        if space > MAX_ACCOUNT_SIZE {
            return Err(LedgerError::Rejected(RejectReason::AccountTooLarge {
                space,
                max: MAX_ACCOUNT_SIZE,
            }));
        }
        self.config
            .rent
            .minimum_balance(space)
            .ok_or(LedgerError::Rejected(RejectReason::ArithmeticOverflow))
    }

    async fn account(&self, address: &Address) -> LedgerResult<Option<AccountRecord>> {
        Ok(self.read()?.accounts.get(address).cloned())
    }

    fn confirmation_policy(&self) -> ConfirmationPolicy {
        self.policy
    }
}
