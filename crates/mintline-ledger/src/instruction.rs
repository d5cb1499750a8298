use mintline_types::{Address, Amount, Lamports};
use serde::{Deserialize, Serialize};

/// A primitive ledger instruction.
///
/// Instructions are plain data; the ledger's processor gives them meaning.
/// Each instruction knows which addresses must sign the bundle carrying it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Reserve `space` bytes at `new_account`, funded with `lamports` from `funder`.
    CreateAccount {
        funder: Address,
        new_account: Address,
        lamports: Lamports,
        space: usize,
    },
    /// Turn reserved storage into a mint record.
    InitializeMint {
        mint: Address,
        decimals: u8,
        mint_authority: Address,
        freeze_authority: Option<Address>,
    },
    /// Create the holding for `(mint, owner)` unless it already exists.
    CreateHoldingIdempotent {
        payer: Address,
        holding: Address,
        owner: Address,
        mint: Address,
    },
    /// Credit `amount` new units to `destination`.
    MintTo {
        mint: Address,
        destination: Address,
        authority: Address,
        amount: Amount,
    },
    /// Move `amount` units between two holdings of the same mint.
    Transfer {
        source: Address,
        destination: Address,
        authority: Address,
        amount: Amount,
    },
    /// Destroy `amount` units, checking the caller's view of the mint's decimals.
    BurnChecked {
        holding: Address,
        mint: Address,
        authority: Address,
        amount: Amount,
        decimals: u8,
    },
}

impl Instruction {
    /// Addresses whose signatures the bundle must carry.
    pub fn required_signers(&self) -> Vec<Address> {
        match self {
            Self::CreateAccount {
                funder,
                new_account,
                ..
            } => vec![*funder, *new_account],
            Self::InitializeMint { .. } => Vec::new(),
            Self::CreateHoldingIdempotent { payer, .. } => vec![*payer],
            Self::MintTo { authority, .. }
            | Self::Transfer { authority, .. }
            | Self::BurnChecked { authority, .. } => vec![*authority],
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAccount { .. } => "create_account",
            Self::InitializeMint { .. } => "initialize_mint",
            Self::CreateHoldingIdempotent { .. } => "create_holding_idempotent",
            Self::MintTo { .. } => "mint_to",
            Self::Transfer { .. } => "transfer",
            Self::BurnChecked { .. } => "burn_checked",
        }
    }
}
