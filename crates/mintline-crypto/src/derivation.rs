use mintline_types::Address;

use crate::hasher::ContentHasher;

/// Derive the holding-account address for a `(mint, owner)` pair.
///
/// The address is a domain-separated hash of the mint and owner, so it is a
/// pure function of its inputs: any process, at any time, computes the same
/// address. No keypair exists for it; only instructions naming the owner as
/// authority can move its balance.
pub fn derive_holding_address(mint: &Address, owner: &Address) -> Address {
    Address::new(
        ContentHasher::HOLDING.hash_parts(&[mint.as_bytes(), b":", owner.as_bytes()]),
    )
}
