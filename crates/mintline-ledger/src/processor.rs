//! Instruction semantics.
//!
//! The processor mutates an account map in place. Callers that need
//! all-or-nothing application run it against a copy and commit the copy
//! only on success.

use std::collections::BTreeMap;

use mintline_crypto::derive_holding_address;
use mintline_types::{Address, Amount, Lamports};

use crate::account::{AccountData, AccountRecord, HoldingState, MintState, HOLDING_SIZE, MINT_SIZE};
use crate::bundle::BundleMessage;
use crate::config::{LedgerConfig, MAX_ACCOUNT_SIZE};
use crate::error::RejectReason;
use crate::instruction::Instruction;

pub type Accounts = BTreeMap<Address, AccountRecord>;

/// Charge the bundle fee, then apply every instruction in order.
pub fn execute_message(
    accounts: &mut Accounts,
    config: &LedgerConfig,
    message: &BundleMessage,
    signature_count: usize,
) -> Result<(), RejectReason> {
    let fee = config
        .fee_per_signature
        .checked_mul(signature_count as u64)
        .ok_or(RejectReason::ArithmeticOverflow)?;
    debit_lamports(accounts, &message.fee_payer, fee)?;

    for instruction in &message.instructions {
        execute(accounts, config, instruction)?;
    }
    Ok(())
}

/// Apply a single instruction.
pub fn execute(
    accounts: &mut Accounts,
    config: &LedgerConfig,
    instruction: &Instruction,
) -> Result<(), RejectReason> {
    match instruction {
        Instruction::CreateAccount {
            funder,
            new_account,
            lamports,
            space,
        } => create_account(accounts, config, funder, new_account, *lamports, *space),
        Instruction::InitializeMint {
            mint,
            decimals,
            mint_authority,
            freeze_authority,
        } => initialize_mint(accounts, mint, *decimals, mint_authority, freeze_authority),
        Instruction::CreateHoldingIdempotent {
            payer,
            holding,
            owner,
            mint,
        } => create_holding_idempotent(accounts, config, payer, holding, owner, mint),
        Instruction::MintTo {
            mint,
            destination,
            authority,
            amount,
        } => mint_to(accounts, mint, destination, authority, *amount),
        Instruction::Transfer {
            source,
            destination,
            authority,
            amount,
        } => transfer(accounts, source, destination, authority, *amount),
        Instruction::BurnChecked {
            holding,
            mint,
            authority,
            amount,
            decimals,
        } => burn_checked(accounts, holding, mint, authority, *amount, *decimals),
    }
}

fn create_account(
    accounts: &mut Accounts,
    config: &LedgerConfig,
    funder: &Address,
    new_account: &Address,
    lamports: Lamports,
    space: usize,
) -> Result<(), RejectReason> {
    if accounts.contains_key(new_account) {
        return Err(RejectReason::AccountAlreadyInUse(*new_account));
    }
    if space > MAX_ACCOUNT_SIZE {
        return Err(RejectReason::AccountTooLarge {
            space,
            max: MAX_ACCOUNT_SIZE,
        });
    }
    let minimum = config
        .rent
        .minimum_balance(space)
        .ok_or(RejectReason::ArithmeticOverflow)?;
    if lamports < minimum {
        return Err(RejectReason::NotRentExempt {
            lamports,
            space,
            minimum,
        });
    }
    debit_lamports(accounts, funder, lamports)?;
    accounts.insert(
        *new_account,
        AccountRecord {
            lamports,
            data: AccountData::Uninitialized { space },
        },
    );
    Ok(())
}

fn initialize_mint(
    accounts: &mut Accounts,
    mint: &Address,
    decimals: u8,
    mint_authority: &Address,
    freeze_authority: &Option<Address>,
) -> Result<(), RejectReason> {
    let record = accounts
        .get_mut(mint)
        .ok_or(RejectReason::AccountNotFound(*mint))?;
    let space = match &record.data {
        AccountData::Uninitialized { space } => *space,
        _ => return Err(RejectReason::InvalidAccountData(*mint)),
    };
    if space < MINT_SIZE {
        return Err(RejectReason::InvalidAccountData(*mint));
    }
    record.data = AccountData::Mint(MintState {
        decimals,
        supply: 0,
        mint_authority: Some(*mint_authority),
        freeze_authority: *freeze_authority,
    });
    Ok(())
}

fn create_holding_idempotent(
    accounts: &mut Accounts,
    config: &LedgerConfig,
    payer: &Address,
    holding: &Address,
    owner: &Address,
    mint: &Address,
) -> Result<(), RejectReason> {
    if derive_holding_address(mint, owner) != *holding {
        return Err(RejectReason::InvalidHoldingAddress { holding: *holding });
    }

    if let Some(existing) = accounts.get(holding) {
        return match existing.as_holding() {
            Some(state) if state.mint == *mint && state.owner == *owner => Ok(()),
            _ => Err(RejectReason::InvalidAccountData(*holding)),
        };
    }

    mint_state(accounts, mint)?;
    let lamports = config
        .rent
        .minimum_balance(HOLDING_SIZE)
        .ok_or(RejectReason::ArithmeticOverflow)?;
    debit_lamports(accounts, payer, lamports)?;
    accounts.insert(
        *holding,
        AccountRecord {
            lamports,
            data: AccountData::Holding(HoldingState {
                mint: *mint,
                owner: *owner,
                amount: 0,
            }),
        },
    );
    Ok(())
}

fn mint_to(
    accounts: &mut Accounts,
    mint: &Address,
    destination: &Address,
    authority: &Address,
    amount: Amount,
) -> Result<(), RejectReason> {
    let state = mint_state(accounts, mint)?;
    match state.mint_authority {
        None => return Err(RejectReason::FixedSupply(*mint)),
        Some(recorded) if recorded != *authority => {
            return Err(RejectReason::InvalidMintAuthority {
                mint: *mint,
                authority: *authority,
            });
        }
        Some(_) => {}
    }
    let supply = state
        .supply
        .checked_add(amount)
        .ok_or(RejectReason::ArithmeticOverflow)?;

    let target = holding_of_mint(accounts, destination, mint)?;
    let balance = target
        .amount
        .checked_add(amount)
        .ok_or(RejectReason::ArithmeticOverflow)?;

    set_holding_amount(accounts, destination, balance);
    set_mint_supply(accounts, mint, supply);
    Ok(())
}

fn transfer(
    accounts: &mut Accounts,
    source: &Address,
    destination: &Address,
    authority: &Address,
    amount: Amount,
) -> Result<(), RejectReason> {
    let from = holding(accounts, source)?;
    let mint = from.mint;
    if from.owner != *authority {
        return Err(RejectReason::OwnerMismatch {
            holding: *source,
            authority: *authority,
        });
    }
    let to = holding_of_mint(accounts, destination, &mint)?;
    if from.amount < amount {
        return Err(RejectReason::InsufficientTokenBalance {
            holding: *source,
            needed: amount,
            available: from.amount,
        });
    }
    if source == destination {
        return Ok(());
    }
    let credited = to
        .amount
        .checked_add(amount)
        .ok_or(RejectReason::ArithmeticOverflow)?;

    set_holding_amount(accounts, source, from.amount - amount);
    set_holding_amount(accounts, destination, credited);
    Ok(())
}

fn burn_checked(
    accounts: &mut Accounts,
    holding_address: &Address,
    mint: &Address,
    authority: &Address,
    amount: Amount,
    decimals: u8,
) -> Result<(), RejectReason> {
    let state = mint_state(accounts, mint)?;
    if state.decimals != decimals {
        return Err(RejectReason::DecimalsMismatch {
            expected: decimals,
            actual: state.decimals,
        });
    }
    let from = holding_of_mint(accounts, holding_address, mint)?;
    if from.owner != *authority {
        return Err(RejectReason::OwnerMismatch {
            holding: *holding_address,
            authority: *authority,
        });
    }
    if from.amount < amount {
        return Err(RejectReason::InsufficientTokenBalance {
            holding: *holding_address,
            needed: amount,
            available: from.amount,
        });
    }
    let supply = state
        .supply
        .checked_sub(amount)
        .ok_or(RejectReason::ArithmeticOverflow)?;

    set_holding_amount(accounts, holding_address, from.amount - amount);
    set_mint_supply(accounts, mint, supply);
    Ok(())
}

fn debit_lamports(
    accounts: &mut Accounts,
    address: &Address,
    lamports: Lamports,
) -> Result<(), RejectReason> {
    let available = accounts.get(address).map(|a| a.lamports).unwrap_or(0);
    if available < lamports {
        return Err(RejectReason::InsufficientFunds {
            account: *address,
            needed: lamports,
            available,
        });
    }
    if let Some(record) = accounts.get_mut(address) {
        record.lamports = available - lamports;
    }
    Ok(())
}

fn mint_state(accounts: &Accounts, mint: &Address) -> Result<MintState, RejectReason> {
    accounts
        .get(mint)
        .and_then(AccountRecord::as_mint)
        .cloned()
        .ok_or(RejectReason::MintNotFound(*mint))
}

fn holding(accounts: &Accounts, address: &Address) -> Result<HoldingState, RejectReason> {
    let record = accounts
        .get(address)
        .ok_or(RejectReason::AccountNotFound(*address))?;
    record
        .as_holding()
        .cloned()
        .ok_or(RejectReason::InvalidAccountData(*address))
}

fn holding_of_mint(
    accounts: &Accounts,
    address: &Address,
    mint: &Address,
) -> Result<HoldingState, RejectReason> {
    let state = holding(accounts, address)?;
    if state.mint != *mint {
        return Err(RejectReason::MintMismatch {
            holding: *address,
            mint: *mint,
        });
    }
    Ok(state)
}

fn set_holding_amount(accounts: &mut Accounts, address: &Address, amount: Amount) {
    if let Some(AccountRecord {
        data: AccountData::Holding(state),
        ..
    }) = accounts.get_mut(address)
    {
        state.amount = amount;
    }
}

fn set_mint_supply(accounts: &mut Accounts, mint: &Address, supply: Amount) {
    if let Some(AccountRecord {
        data: AccountData::Mint(state),
        ..
    }) = accounts.get_mut(mint)
    {
        state.supply = supply;
    }
}
