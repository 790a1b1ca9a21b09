//! Deterministic signer producing envelope signatures.

use alloy_primitives::{Address, Bytes, B256};
use k256::ecdsa::SigningKey;

use crate::{
    envelope::PackedOperation,
    signature::{address_from_verifying_key, eth_signed_digest},
};

/// A signer with a deterministic key, for building signed envelopes in
/// tests. Signatures are `r || s || v` with `v` in 27/28, over the
/// prefix-transformed digest, matching what the verifier expects.
#[derive(Debug, Clone)]
pub struct TestSigner {
    key: SigningKey,
}

impl TestSigner {
    /// Creates a signer whose private scalar is `seed`. Distinct seeds give
    /// distinct identities; zero is not a valid scalar.
    pub fn from_seed(seed: u8) -> Self {
        assert_ne!(seed, 0, "zero is not a valid key scalar");
        let mut bytes = [0u8; 32];
        bytes[31] = seed;
        Self { key: SigningKey::from_slice(&bytes).expect("nonzero scalar") }
    }

    /// The signer's ledger address.
    pub fn address(&self) -> Address {
        address_from_verifying_key(self.key.verifying_key())
    }

    /// Signs a canonical operation hash, applying the personal-message
    /// prefix transform first.
    pub fn sign_canonical_hash(&self, canonical_hash: B256) -> Bytes {
        let digest = eth_signed_digest(canonical_hash);
        let (signature, recovery_id) =
            self.key.sign_prehash_recoverable(digest.as_slice()).expect("prehash is 32 bytes");
        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&signature.to_bytes());
        out.push(27 + recovery_id.to_byte());
        out.into()
    }

    /// Signs an envelope in place over its own signing hash.
    pub fn sign_envelope(&self, envelope: &mut PackedOperation) {
        envelope.signature = self.sign_canonical_hash(envelope.signing_hash());
    }
}
