//! Token creation.

use mintline_crypto::Keypair;
use mintline_ledger::{
    ConfirmationReceipt, Instruction, LedgerConnection, OperationBundle, MINT_SIZE,
};
use mintline_types::{Address, Lamports};

use crate::error::{LifecycleError, LifecycleResult, Step};
use crate::TokenIdentity;

/// Bundle that allocates a rent-exempt mint record at `mint` and initializes
/// it with `authority` as both mint and freeze authority.
pub fn create_token_bundle(
    authority: &Address,
    mint: &Address,
    decimals: u8,
    rent_exempt_lamports: Lamports,
) -> OperationBundle {
    OperationBundle::new(*authority)
        .with(Instruction::CreateAccount {
            funder: *authority,
            new_account: *mint,
            lamports: rent_exempt_lamports,
            space: MINT_SIZE,
        })
        .with(Instruction::InitializeMint {
            mint: *mint,
            decimals,
            mint_authority: *authority,
            freeze_authority: Some(*authority),
        })
}

/// Create a new token and wait for the ledger to confirm it.
///
/// The mint's address comes from a freshly generated keypair that co-signs
/// the bundle; its secret half is dropped once the bundle is confirmed.
pub async fn create_token(
    connection: &dyn LedgerConnection,
    authority: &Keypair,
    decimals: u8,
) -> LifecycleResult<(TokenIdentity, ConfirmationReceipt)> {
    let rent = connection
        .minimum_balance_for_rent_exemption(MINT_SIZE)
        .await
        .map_err(LifecycleError::at(Step::CreateToken))?;

    let mint = Keypair::generate();
    let token = mint.address();
    let bundle = create_token_bundle(&authority.address(), &token, decimals, rent);

    let receipt = connection
        .submit(bundle, &[authority, &mint])
        .await
        .map_err(LifecycleError::at(Step::CreateToken))?;
    drop(mint);

    tracing::info!(mint = %token, decimals, signature = %receipt, "token created");
    Ok((token, receipt))
}
