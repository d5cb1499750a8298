//! Unit transfers between holdings.

use mintline_crypto::Keypair;
use mintline_ledger::{ConfirmationReceipt, Instruction, LedgerConnection, OperationBundle};
use mintline_types::{Address, Amount};

use crate::error::{LifecycleError, LifecycleResult, Step};
use crate::provisioner::{derive_address, ensure_provisioned};

/// Bundle that provisions both holdings and moves `amount` raw units from
/// `authority`'s holding to `destination_owner`'s. The authority pays for
/// any holding it creates.
pub fn transfer_bundle(
    token: &Address,
    authority: &Address,
    destination_owner: &Address,
    amount: Amount,
) -> OperationBundle {
    OperationBundle::new(*authority)
        .with(ensure_provisioned(authority, token, authority))
        .with(ensure_provisioned(authority, token, destination_owner))
        .with(Instruction::Transfer {
            source: derive_address(token, authority),
            destination: derive_address(token, destination_owner),
            authority: *authority,
            amount,
        })
}

pub async fn transfer(
    connection: &dyn LedgerConnection,
    token: &Address,
    authority: &Keypair,
    destination_owner: &Address,
    amount: Amount,
) -> LifecycleResult<ConfirmationReceipt> {
    let bundle = transfer_bundle(token, &authority.address(), destination_owner, amount);
    let receipt = connection
        .submit(bundle, &[authority])
        .await
        .map_err(LifecycleError::at(Step::Transfer))?;

    tracing::info!(
        mint = %token,
        to = %destination_owner,
        amount,
        signature = %receipt,
        "units transferred"
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintline_ledger::RejectReason;

    use crate::creator::create_token;
    use crate::minter::mint;
    use crate::testing::funded_ledger;

    #[tokio::test]
    async fn transfer_moves_units_to_new_owner() {
        let authority = Keypair::generate();
        let ledger = funded_ledger(&authority);
        let (token, _) = create_token(ledger.as_ref(), &authority, 0).await.unwrap();
        mint(ledger.as_ref(), &token, &authority, 10).await.unwrap();
        let recipient = Keypair::generate().address();

        transfer(ledger.as_ref(), &token, &authority, &recipient, 3)
            .await
            .unwrap();

        assert_eq!(
            ledger.token_balance(&token, &authority.address()).await.unwrap(),
            Some(7)
        );
        assert_eq!(ledger.token_balance(&token, &recipient).await.unwrap(), Some(3));
        let state = ledger.mint_state(&token).await.unwrap().unwrap();
        assert_eq!(state.supply, 10);
    }

    #[tokio::test]
    async fn insufficient_balance_is_rejected_without_side_effects() {
        let authority = Keypair::generate();
        let ledger = funded_ledger(&authority);
        let (token, _) = create_token(ledger.as_ref(), &authority, 0).await.unwrap();
        mint(ledger.as_ref(), &token, &authority, 2).await.unwrap();
        let recipient = Keypair::generate().address();

        let err = transfer(ledger.as_ref(), &token, &authority, &recipient, 3)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::RejectedOperation {
                step: Step::Transfer,
                reason: RejectReason::InsufficientTokenBalance { needed: 3, available: 2, .. },
            }
        ));
        assert_eq!(ledger.token_balance(&token, &recipient).await.unwrap(), None);
    }

    #[tokio::test]
    async fn transfer_from_unprovisioned_holding_is_rejected() {
        let authority = Keypair::generate();
        let ledger = funded_ledger(&authority);
        let (token, _) = create_token(ledger.as_ref(), &authority, 0).await.unwrap();
        let recipient = Keypair::generate().address();

        // The source holding is provisioned in the bundle but starts empty.
        let err = transfer(ledger.as_ref(), &token, &authority, &recipient, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::RejectedOperation { .. }));
    }

    #[test]
    fn both_holdings_are_provisioned_first() {
        let bundle = transfer_bundle(
            &Address::new([1; 32]),
            &Address::new([2; 32]),
            &Address::new([3; 32]),
            1,
        );
        let names: Vec<_> = bundle.instructions().iter().map(Instruction::name).collect();
        assert_eq!(
            names,
            ["create_holding_idempotent", "create_holding_idempotent", "transfer"]
        );
        assert_eq!(bundle.required_signers(), vec![Address::new([2; 32])]);
    }
}
