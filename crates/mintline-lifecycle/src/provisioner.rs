//! Holding account provisioning.

use mintline_crypto::derive_holding_address;
use mintline_ledger::Instruction;
use mintline_types::Address;

/// Address of `owner`'s holding of `token`. Pure; never touches the ledger.
pub fn derive_address(token: &Address, owner: &Address) -> Address {
    derive_holding_address(token, owner)
}

/// Instruction that creates `owner`'s holding of `token`, funded by `payer`,
/// or does nothing if it already exists.
///
/// Bundles include this ahead of any instruction touching the holding.
pub fn ensure_provisioned(payer: &Address, token: &Address, owner: &Address) -> Instruction {
    Instruction::CreateHoldingIdempotent {
        payer: *payer,
        holding: derive_address(token, owner),
        owner: *owner,
        mint: *token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintline_crypto::Keypair;
    use mintline_ledger::{LedgerConnection, OperationBundle};
    use proptest::prelude::*;

    use crate::creator::create_token;
    use crate::testing::funded_ledger;

    proptest! {
        #[test]
        fn derive_address_is_pure(token in any::<[u8; 32]>(), owner in any::<[u8; 32]>()) {
            let token = Address::new(token);
            let owner = Address::new(owner);
            prop_assert_eq!(derive_address(&token, &owner), derive_address(&token, &owner));
        }
    }

    #[test]
    fn derive_address_is_stable_across_runs() {
        let token = Address::new([1; 32]);
        let owner = Address::new([2; 32]);
        let expected = derive_holding_address(&token, &owner);
        assert_eq!(derive_address(&token, &owner), expected);
        assert_ne!(derive_address(&owner, &token), expected);
    }

    #[test]
    fn instruction_targets_derived_holding() {
        let payer = Address::new([9; 32]);
        let token = Address::new([1; 32]);
        let owner = Address::new([2; 32]);
        match ensure_provisioned(&payer, &token, &owner) {
            Instruction::CreateHoldingIdempotent {
                payer: p,
                holding,
                owner: o,
                mint,
            } => {
                assert_eq!(p, payer);
                assert_eq!(holding, derive_address(&token, &owner));
                assert_eq!(o, owner);
                assert_eq!(mint, token);
            }
            other => panic!("unexpected instruction {other:?}"),
        }
    }

    #[tokio::test]
    async fn provisioning_twice_changes_nothing() {
        let authority = Keypair::generate();
        let ledger = funded_ledger(&authority);
        let (token, _) = create_token(ledger.as_ref(), &authority, 0).await.unwrap();
        let owner = Keypair::generate().address();
        let holding = derive_address(&token, &owner);

        let provision = || {
            OperationBundle::new(authority.address()).with(ensure_provisioned(
                &authority.address(),
                &token,
                &owner,
            ))
        };

        ledger.submit(provision(), &[&authority]).await.unwrap();
        let record = ledger.account(&holding).await.unwrap().unwrap();
        let lamports = ledger.lamports(&authority.address()).await.unwrap();

        ledger.submit(provision(), &[&authority]).await.unwrap();
        assert_eq!(ledger.account(&holding).await.unwrap().unwrap(), record);
        // Only the signature fee is charged the second time.
        assert_eq!(
            ledger.lamports(&authority.address()).await.unwrap(),
            lamports - ledger.config().fee_per_signature
        );
        assert_eq!(derive_address(&token, &owner), holding);
    }

    #[tokio::test]
    async fn provisioning_against_unknown_token_is_rejected() {
        let authority = Keypair::generate();
        let ledger = funded_ledger(&authority);
        let ghost = Address::random();
        let bundle = OperationBundle::new(authority.address()).with(ensure_provisioned(
            &authority.address(),
            &ghost,
            &authority.address(),
        ));
        assert!(ledger.submit(bundle, &[&authority]).await.is_err());
    }
}
