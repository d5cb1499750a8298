use mintline_crypto::Signature;
use mintline_ledger::{AccountRecord, BundleStatus, RejectReason, SignedBundle};
use mintline_types::{Address, Blockhash, Lamports};
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockhashResponse {
    pub blockhash: Blockhash,
    pub slot: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentResponse {
    pub space: usize,
    pub lamports: Lamports,
}

/// An account lookup. `account` is `None` when nothing lives at `address`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub address: Address,
    pub account: Option<AccountRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBundleRequest {
    pub bundle: SignedBundle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBundleResponse {
    pub signature: Signature,
}

/// A status lookup. `status` is `None` while the bundle is unknown or pending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleStatusResponse {
    pub signature: Signature,
    pub status: Option<BundleStatus>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropRequest {
    pub address: Address,
    pub lamports: Lamports,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropResponse {
    pub address: Address,
    pub balance: Lamports,
}

/// Body of every non-2xx response.
///
/// `reason` is present when the ledger itself declined the request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}
