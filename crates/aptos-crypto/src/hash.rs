//! SHA3-256 hashing and domain separation

use aptos_primitives::HashValue;
use sha3::{Digest, Sha3_256};

/// Domain tag for signing a raw transaction
pub const RAW_TRANSACTION_SALT: &str = "APTOS::RawTransaction";

/// Domain tag for signing a multi-agent or fee-payer transaction
pub const RAW_TRANSACTION_WITH_DATA_SALT: &str = "APTOS::RawTransactionWithData";

/// Domain tag for the committed transaction hash
pub const TRANSACTION_SALT: &str = "APTOS::Transaction";

/// Compute SHA3-256 of the input data
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    Sha3_256::digest(data).into()
}

/// `sha3_256(tag)`, prepended to messages of that domain
pub fn domain_prefix(tag: &str) -> [u8; 32] {
    sha3_256(tag.as_bytes())
}

/// Compute `sha3_256(prefix || message)` without concatenating
pub fn hash_with_prefix(prefix: &[u8], message: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(prefix);
    hasher.update(message);
    hasher.finalize().into()
}

/// Signing message for BCS bytes in the domain named by `tag`
pub fn signing_message(tag: &str, bcs_bytes: &[u8]) -> [u8; 32] {
    hash_with_prefix(&domain_prefix(tag), bcs_bytes)
}

/// Hash of a committed user transaction: `sha3(prefix || 0x00 || bcs)`
///
/// The `0x00` byte selects the user-transaction variant of the node's
/// transaction enum.
pub fn transaction_hash(signed_bcs: &[u8]) -> HashValue {
    let mut hasher = Sha3_256::new();
    hasher.update(domain_prefix(TRANSACTION_SALT));
    hasher.update([0u8]);
    hasher.update(signed_bcs);
    HashValue::new(hasher.finalize().into())
}
