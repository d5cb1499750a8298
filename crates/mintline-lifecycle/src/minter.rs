//! Supply minting.

use mintline_crypto::Keypair;
use mintline_ledger::{ConfirmationReceipt, Instruction, LedgerConnection, OperationBundle};
use mintline_types::{Address, Amount};

use crate::error::{LifecycleError, LifecycleResult, Step};
use crate::provisioner::{derive_address, ensure_provisioned};

/// Bundle that provisions `authority`'s holding of `token` and credits
/// `amount` raw units to it.
pub fn mint_bundle(token: &Address, authority: &Address, amount: Amount) -> OperationBundle {
    OperationBundle::new(*authority)
        .with(ensure_provisioned(authority, token, authority))
        .with(Instruction::MintTo {
            mint: *token,
            destination: derive_address(token, authority),
            authority: *authority,
            amount,
        })
}

/// Mint `amount` raw units of `token` into the authority's own holding.
/// No decimal scaling is applied.
pub async fn mint(
    connection: &dyn LedgerConnection,
    token: &Address,
    authority: &Keypair,
    amount: Amount,
) -> LifecycleResult<ConfirmationReceipt> {
    let bundle = mint_bundle(token, &authority.address(), amount);
    let receipt = connection
        .submit(bundle, &[authority])
        .await
        .map_err(LifecycleError::at(Step::Mint))?;

    tracing::info!(mint = %token, amount, signature = %receipt, "supply minted");
    Ok(receipt)
}
