//! The packed operation envelope and its wire codec.
//!
//! An envelope is the signed, fixed-layout description of one operation
//! awaiting authorization. Submitters construct it off-ledger, the owner
//! signs the canonical hash of every field except the signature itself, and
//! the trusted intermediary submits it for validation. The layout must match
//! the intermediary's expectation bit-for-bit: gas ceilings and fee caps are
//! two 128-bit halves packed big-endian into single words.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolCall, SolValue};
use serde::{Deserialize, Serialize};

use crate::error::AccountError;

sol! {
    /// Operation envelope submitted for validation.
    ///
    /// Field order and packing are fixed by the account-abstraction
    /// standard's wire layout.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct PackedOperation {
        /// The account this envelope targets.
        address sender;
        /// Sequencer-enforced replay counter, unique per sender.
        uint256 nonce;
        /// Deploy-time payload, empty for an already-deployed account.
        bytes initCode;
        /// ABI-encoded target call, see [`IAccountExecute`].
        bytes callData;
        /// Verification gas ceiling (high 128 bits) and call gas ceiling
        /// (low 128 bits).
        bytes32 accountGasLimits;
        /// Gas the intermediary burns before verification begins.
        uint256 preVerificationGas;
        /// Priority fee cap (high 128 bits) and max fee cap (low 128 bits).
        bytes32 gasFees;
        /// Sponsor data, unused in this minimal design.
        bytes paymasterAndData;
        /// Signature over the canonical hash of all preceding fields.
        bytes signature;
    }

    /// The target-call encoding carried in an envelope's `callData`.
    interface IAccountExecute {
        /// Performs one outbound call from the account.
        function execute(address dest, uint256 value, bytes calldata func) external;
    }
}

/// One outbound call: destination, native value, and function payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    /// Call destination.
    pub destination: Address,
    /// Native value carried by the call.
    pub value: U256,
    /// Function payload forwarded to the destination.
    pub payload: Bytes,
}

impl CallRequest {
    /// Creates a call request.
    pub const fn new(destination: Address, value: U256, payload: Bytes) -> Self {
        Self { destination, value, payload }
    }
}

/// Packs the verification and call gas ceilings into one 32-byte word,
/// verification half first, both big-endian.
pub fn pack_gas_limits(verification_gas_limit: u128, call_gas_limit: u128) -> B256 {
    let mut word = [0u8; 32];
    word[..16].copy_from_slice(&verification_gas_limit.to_be_bytes());
    word[16..].copy_from_slice(&call_gas_limit.to_be_bytes());
    B256::from(word)
}

/// Splits a packed gas-limit word into `(verification, call)` ceilings.
pub fn unpack_gas_limits(word: B256) -> (u128, u128) {
    split_word(word)
}

/// Packs the priority-fee and max-fee caps into one 32-byte word, priority
/// half first, both big-endian.
pub fn pack_gas_fees(max_priority_fee_per_gas: u128, max_fee_per_gas: u128) -> B256 {
    let mut word = [0u8; 32];
    word[..16].copy_from_slice(&max_priority_fee_per_gas.to_be_bytes());
    word[16..].copy_from_slice(&max_fee_per_gas.to_be_bytes());
    B256::from(word)
}

/// Splits a packed fee word into `(max_priority_fee, max_fee)` caps.
pub fn unpack_gas_fees(word: B256) -> (u128, u128) {
    split_word(word)
}

fn split_word(word: B256) -> (u128, u128) {
    let mut half = [0u8; 16];
    half.copy_from_slice(&word.0[..16]);
    let high = u128::from_be_bytes(half);
    half.copy_from_slice(&word.0[16..]);
    let low = u128::from_be_bytes(half);
    (high, low)
}

/// Encodes a call request into envelope `callData`.
pub fn encode_call_data(request: &CallRequest) -> Bytes {
    IAccountExecute::executeCall {
        dest: request.destination,
        value: request.value,
        func: request.payload.clone(),
    }
    .abi_encode()
    .into()
}

/// Decodes envelope `callData` back into a call request.
pub fn decode_call_data(data: &[u8]) -> Result<CallRequest, AccountError> {
    let call = IAccountExecute::executeCall::abi_decode(data, true)
        .map_err(|_| AccountError::MalformedCallData)?;
    Ok(CallRequest { destination: call.dest, value: call.value, payload: call.func })
}

impl PackedOperation {
    /// The canonical hash of the envelope: keccak over the ABI encoding of
    /// every field except the signature, with the variable-length fields
    /// pre-hashed. Signing must cover exactly this.
    ///
    /// Intermediary-driven validation receives its digest from the
    /// intermediary's own hash derivation; this method serves flows with no
    /// intermediary (outside execution) and envelope construction.
    pub fn signing_hash(&self) -> B256 {
        let encoded = (
            self.sender,
            self.nonce,
            keccak256(&self.initCode),
            keccak256(&self.callData),
            self.accountGasLimits,
            self.preVerificationGas,
            self.gasFees,
            keccak256(&self.paymasterAndData),
        )
            .abi_encode();
        keccak256(encoded)
    }

    /// Total gas ceiling of the envelope: verification, call, and
    /// pre-verification parts summed.
    pub fn total_gas_limit(&self) -> U256 {
        let (verification, call) = unpack_gas_limits(self.accountGasLimits);
        U256::from(verification) + U256::from(call) + self.preVerificationGas
    }

    /// The envelope's max fee cap per unit of gas.
    pub fn max_fee_per_gas(&self) -> u128 {
        unpack_gas_fees(self.gasFees).1
    }
}
