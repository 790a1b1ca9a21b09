//! End-to-end account flow tests against the in-memory runtime.

mod entry_point_flow_test;

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::SolCall;

use crate::{
    encode_call_data, pack_gas_fees, pack_gas_limits,
    test_utils::{IMintableToken, TestSigner},
    CallRequest, PackedOperation,
};

pub(crate) const ACCOUNT_ADDRESS: Address = address!("0x00000000000000000000000000000000000000a1");
pub(crate) const ENTRY_POINT: Address = address!("0x00000000000000000000000000000000000000e1");
pub(crate) const TOKEN: Address = address!("0x0000000000000000000000000000000000000070");
pub(crate) const STRANGER: Address = address!("0x00000000000000000000000000000000000000cc");

pub(crate) const ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// A request minting `amount` tokens to `to` at the test token.
pub(crate) fn mint_request(to: Address, amount: u64) -> CallRequest {
    let payload = IMintableToken::mintCall { to, amount: U256::from(amount) }.abi_encode();
    CallRequest::new(TOKEN, U256::ZERO, payload.into())
}

/// Builds an envelope for the test account carrying `request`, signed over
/// its own signing hash.
pub(crate) fn signed_envelope(
    signer: &TestSigner,
    nonce: u64,
    request: &CallRequest,
    max_fee_per_gas: u128,
) -> PackedOperation {
    let mut envelope = PackedOperation {
        sender: ACCOUNT_ADDRESS,
        nonce: U256::from(nonce),
        callData: encode_call_data(request),
        accountGasLimits: pack_gas_limits(100_000, 200_000),
        preVerificationGas: U256::from(21_000),
        gasFees: pack_gas_fees(max_fee_per_gas, max_fee_per_gas),
        ..Default::default()
    };
    signer.sign_envelope(&mut envelope);
    envelope
}
