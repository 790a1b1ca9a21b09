//! The validation engine shared by both account variants.
//!
//! Validation maps an envelope and its canonical hash to exactly two
//! outcomes: the recovered signer is the owner, or it is not. A signature
//! that cannot be recovered at all lands in the second bucket; there is no
//! third outcome and no partial success.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{SIG_VALIDATION_FAILED, SIG_VALIDATION_SUCCESS},
    signature::{eth_signed_digest, recover_signer},
};

/// Result of checking an envelope signature against the owner. A business
/// result, not an error: the intermediary branches on it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum ValidationOutcome {
    /// The recovered signer is the current owner.
    #[display("success")]
    Success,
    /// The recovered signer is not the owner, or recovery failed.
    #[display("signature failure")]
    SignatureFailure,
}

impl ValidationOutcome {
    /// Whether the operation was accepted.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Encodes the outcome as the standard's packed validation word. The
    /// validity time-window bit ranges are reserved and always zero here.
    pub const fn as_validation_data(self) -> U256 {
        match self {
            Self::Success => SIG_VALIDATION_SUCCESS,
            Self::SignatureFailure => SIG_VALIDATION_FAILED,
        }
    }
}

/// Decides acceptance of an operation: applies the personal-message prefix
/// transform to the canonical hash, recovers the signer, and compares it to
/// the owner identity.
pub fn check_owner_signature(
    owner: Address,
    canonical_hash: B256,
    signature: &[u8],
) -> ValidationOutcome {
    let digest = eth_signed_digest(canonical_hash);
    match recover_signer(digest, signature) {
        Some(signer) if signer == owner => ValidationOutcome::Success,
        _ => ValidationOutcome::SignatureFailure,
    }
}
