//! Signer recovery for operation envelopes.
//!
//! A signature authorizes an operation when the address recovered from it
//! equals the account owner. Recovery is a pure function: no state, no side
//! effects. Malformed input (wrong length, bad recovery id, invalid scalar)
//! recovers nobody and is indistinguishable from a mismatched signer
//! downstream.

use alloy_primitives::{keccak256, utils::eip191_hash_message, Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

/// Length of an `r || s || v` encoded signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Applies the network's standard personal-message prefix transform to a
/// canonical operation hash, producing the digest signatures are checked
/// against.
///
/// The wrapping (`\x19Ethereum Signed Message:\n32` followed by the 32-byte
/// hash) is a fixed interoperability contract with the verifying
/// intermediary, not a choice of this crate.
pub fn eth_signed_digest(canonical_hash: B256) -> B256 {
    eip191_hash_message(canonical_hash)
}

/// Recovers the signer address from a prefix-transformed digest and an
/// `r || s || v` signature.
///
/// Accepts `v` as 27/28 or as a raw recovery id of 0/1. Returns `None` for
/// any malformed signature.
pub fn recover_signer(digest: B256, signature: &[u8]) -> Option<Address> {
    if signature.len() != SIGNATURE_LENGTH {
        return None;
    }

    let recovery_id = match signature[64] {
        v @ (27 | 28) => RecoveryId::try_from(v - 27).ok()?,
        v @ (0 | 1) => RecoveryId::try_from(v).ok()?,
        _ => return None,
    };

    let signature = Signature::from_slice(&signature[..64]).ok()?;
    let recovered_key =
        VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id).ok()?;

    Some(address_from_verifying_key(&recovered_key))
}

/// Derives the ledger address of a public key: the last 20 bytes of the
/// keccak hash of the uncompressed point, prefix byte stripped.
pub(crate) fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}
