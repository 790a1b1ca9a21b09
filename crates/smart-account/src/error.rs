//! Fatal error taxonomy of the account.
//!
//! Everything here aborts the whole call; the ledger runtime's atomicity
//! unwinds every effect of an aborted call. A rejected signature during
//! intermediary-driven validation is deliberately NOT an error: it is a
//! first-class [`ValidationOutcome`](crate::ValidationOutcome) the
//! intermediary branches on. There are no retries anywhere; recovery is the
//! submitter's responsibility.

use alloy_primitives::{Address, Bytes, U256};

use crate::ledger::{NonceMismatch, TransferError};

/// Fatal failures surfaced by the account's entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// A gate rejected a caller that is not the trusted intermediary.
    #[error("caller {caller} is not the trusted intermediary")]
    NotFromTrustedCaller {
        /// The rejected caller identity.
        caller: Address,
    },
    /// A gate rejected a caller that is neither the trusted intermediary nor
    /// the owner.
    #[error("caller {caller} is neither the trusted intermediary nor the owner")]
    NotFromTrustedCallerOrOwner {
        /// The rejected caller identity.
        caller: Address,
    },
    /// An ownership operation came from a caller other than the owner.
    #[error("caller {caller} is not the owner")]
    NotOwner {
        /// The rejected caller identity.
        caller: Address,
    },
    /// Ownership cannot be transferred to the zero address.
    #[error("new owner must not be the zero address")]
    InvalidNewOwner,
    /// The sequencer rejected the envelope's nonce.
    #[error("nonce rejected by sequencer: {0}")]
    NonceAlreadyUsed(#[source] NonceMismatch),
    /// The account balance cannot cover the operation's fee ceiling plus the
    /// value to transfer.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Fee ceiling times gas ceiling plus call value.
        required: U256,
        /// The account's balance.
        available: U256,
    },
    /// The prefund step was invoked with a zero amount.
    #[error("required prefund must be positive")]
    NonPositiveRequiredFunds,
    /// The prefund transfer to the intermediary did not complete.
    #[error("prefund transfer failed: {0}")]
    TransferFailed(#[source] TransferError),
    /// The outbound target call failed; no partial execution is observable.
    #[error("outbound call failed")]
    ExecutionFailed {
        /// Revert payload returned by the destination, possibly empty.
        output: Bytes,
    },
    /// Inline validation of an outside execution found a signer mismatch.
    /// Fatal here: there is no intermediary to interpret a soft status code.
    #[error("operation signature does not recover to the owner")]
    InvalidSignature,
    /// Envelope `callData` is not a well-formed execute encoding.
    #[error("call data is not a well-formed execute call")]
    MalformedCallData,
}
