//! Well-known identities and sentinel values for the authorization account.

use alloy_primitives::{address, fixed_bytes, Address, FixedBytes, U256};

/// The native runtime's bootloader address. In the bootloader variant this is
/// the trusted intermediary identity, fixed by the runtime rather than by
/// account configuration.
pub const BOOTLOADER_ADDRESS: Address = address!("0x0000000000000000000000000000000000008001");

/// The system contract deployer address. Outbound calls targeting it are
/// dispatched through the privileged system-call path instead of the generic
/// call path.
pub const CONTRACT_DEPLOYER_ADDRESS: Address =
    address!("0x0000000000000000000000000000000000008006");

/// Validation status communicating acceptance to the intermediary.
pub const SIG_VALIDATION_SUCCESS: U256 = U256::ZERO;

/// Validation status communicating a signer mismatch to the intermediary.
/// The value is fixed by the account-abstraction standard; the remaining bit
/// ranges of the word are reserved for a validity time window and stay zero.
pub const SIG_VALIDATION_FAILED: U256 = U256::from_limbs([1, 0, 0, 0]);

/// Success selector returned by the off-ledger signature check,
/// `bytes4(keccak256("isValidSignature(bytes32,bytes)"))`.
pub const ERC1271_MAGIC_VALUE: FixedBytes<4> = fixed_bytes!("0x1626ba7e");

/// Failure selector returned by the off-ledger signature check.
pub const ERC1271_INVALID_SIGNATURE: FixedBytes<4> = fixed_bytes!("0xffffffff");
