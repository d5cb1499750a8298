//! Unit burning.

use mintline_crypto::Keypair;
use mintline_ledger::{ConfirmationReceipt, Instruction, LedgerConnection, OperationBundle};
use mintline_types::{Address, Amount};

use crate::error::{LifecycleError, LifecycleResult, Step};
use crate::provisioner::{derive_address, ensure_provisioned};

/// Bundle that provisions `authority`'s holding and burns `amount` raw units
/// from it. `decimals` is the caller's expectation of the token's precision;
/// the ledger rejects the burn if it differs from the recorded one.
pub fn burn_bundle(
    token: &Address,
    authority: &Address,
    amount: Amount,
    decimals: u8,
) -> OperationBundle {
    OperationBundle::new(*authority)
        .with(ensure_provisioned(authority, token, authority))
        .with(Instruction::BurnChecked {
            holding: derive_address(token, authority),
            mint: *token,
            authority: *authority,
            amount,
            decimals,
        })
}

pub async fn burn(
    connection: &dyn LedgerConnection,
    token: &Address,
    authority: &Keypair,
    amount: Amount,
    decimals: u8,
) -> LifecycleResult<ConfirmationReceipt> {
    let bundle = burn_bundle(token, &authority.address(), amount, decimals);
    let receipt = connection
        .submit(bundle, &[authority])
        .await
        .map_err(LifecycleError::at(Step::Burn))?;

    tracing::info!(mint = %token, amount, signature = %receipt, "units burned");
    Ok(receipt)
}
