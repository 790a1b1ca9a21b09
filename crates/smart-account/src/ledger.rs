//! Collaborator traits for the host ledger runtime.
//!
//! The account never manipulates balances or performs calls itself; it asks
//! the runtime through [`Ledger`] and enforces replay protection through
//! [`NonceSequencer`]. Snapshots expose the runtime's whole-call atomicity:
//! an entry point that fails reverts to the snapshot it took on entry, so no
//! partial effect of an aborted call is ever observable.

use alloy_primitives::{Address, Bytes, U256};
use auto_impl::auto_impl;

/// A native value transfer that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    /// The sender's balance cannot cover the transfer.
    #[error("insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        /// Balance of the sending account.
        available: U256,
        /// Amount the transfer needs.
        required: U256,
    },
    /// The destination refused the transfer.
    #[error("destination {destination} rejected the transfer")]
    Rejected {
        /// The refusing destination.
        destination: Address,
    },
}

/// An outbound call that reverted in the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("call reverted")]
pub struct CallReverted {
    /// Revert payload, possibly empty.
    pub output: Bytes,
}

/// The sequencer refused to advance a nonce that is not the next expected
/// value. A replayed envelope fails here independent of its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected nonce {expected}, provided {provided}")]
pub struct NonceMismatch {
    /// The counter value the sequencer expected.
    pub expected: U256,
    /// The value the envelope carried.
    pub provided: U256,
}

/// Native-value and call primitives of the host ledger runtime.
#[auto_impl(&mut, Box)]
pub trait Ledger {
    /// Opaque marker for the runtime's rollback point.
    type Snapshot;

    /// Native balance of an account.
    fn balance(&self, account: Address) -> U256;

    /// Moves native value between accounts.
    fn transfer(&mut self, from: Address, to: Address, value: U256)
        -> Result<(), TransferError>;

    /// Performs one outbound call carrying `value` and `payload`, forwarding
    /// all available resources. Returns the destination's output.
    fn call(
        &mut self,
        caller: Address,
        destination: Address,
        value: U256,
        payload: &[u8],
    ) -> Result<Bytes, CallReverted>;

    /// Performs a privileged system call, bypassing normal value and gas
    /// accounting. Only the deployer routing path uses this.
    fn system_call(
        &mut self,
        caller: Address,
        destination: Address,
        payload: &[u8],
    ) -> Result<Bytes, CallReverted>;

    /// Captures the current state for whole-call rollback.
    fn snapshot(&mut self) -> Self::Snapshot;

    /// Restores the state captured by `snapshot`, discarding every effect
    /// performed since.
    fn revert(&mut self, snapshot: Self::Snapshot);
}

/// The external per-account monotonic counter preventing replay.
#[auto_impl(&mut, Box)]
pub trait NonceSequencer {
    /// Advances the account's counter if `expected` equals its current
    /// value, otherwise refuses without advancing.
    fn increment_if_equals(&mut self, account: Address, expected: U256)
        -> Result<(), NonceMismatch>;
}
