use mintline_types::{Address, Amount, Lamports};
use serde::{Deserialize, Serialize};

/// Storage size of a mint record, in bytes.
pub const MINT_SIZE: usize = 82;

/// Storage size of a holding record, in bytes.
pub const HOLDING_SIZE: usize = 165;

/// A ledger-resident account: a lamport balance plus typed data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub lamports: Lamports,
    pub data: AccountData,
}

/// What an account stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountData {
    /// A plain lamport-holding account (e.g. a keypair funded by airdrop).
    System,
    /// Storage reserved by `CreateAccount` and not yet initialized.
    Uninitialized { space: usize },
    Mint(MintState),
    Holding(HoldingState),
}

/// Recorded state of a token mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintState {
    pub decimals: u8,
    pub supply: Amount,
    /// `None` once the supply has been fixed.
    pub mint_authority: Option<Address>,
    pub freeze_authority: Option<Address>,
}

/// One owner's balance of one token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingState {
    pub mint: Address,
    pub owner: Address,
    pub amount: Amount,
}

impl AccountRecord {
    pub fn system(lamports: Lamports) -> Self {
        Self {
            lamports,
            data: AccountData::System,
        }
    }

    pub fn as_mint(&self) -> Option<&MintState> {
        match &self.data {
            AccountData::Mint(mint) => Some(mint),
            _ => None,
        }
    }

    pub fn as_holding(&self) -> Option<&HoldingState> {
        match &self.data {
            AccountData::Holding(holding) => Some(holding),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_data() {
        let mint = AccountRecord {
            lamports: 1,
            data: AccountData::Mint(MintState {
                decimals: 0,
                supply: 0,
                mint_authority: None,
                freeze_authority: None,
            }),
        };
        assert!(mint.as_mint().is_some());
        assert!(mint.as_holding().is_none());
        assert!(AccountRecord::system(5).as_mint().is_none());
    }

    #[test]
    fn account_data_is_tagged() {
        let record = AccountRecord {
            lamports: 10,
            data: AccountData::Uninitialized { space: MINT_SIZE },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["data"]["type"], "uninitialized");
        assert_eq!(json["data"]["space"], 82);
    }
}
