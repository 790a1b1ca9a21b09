//! Authorization backends: the polymorphic seam between host environments.
//!
//! The two account variants share the validation engine, signature verifier,
//! and gates; they differ only in who the trusted intermediary is, what runs
//! before the signature check, and how outbound calls are routed. Those
//! three points are this trait.

use alloy_primitives::{Address, Bytes, U256};

use crate::{
    constants::{BOOTLOADER_ADDRESS, CONTRACT_DEPLOYER_ADDRESS},
    envelope::{decode_call_data, CallRequest, PackedOperation},
    error::AccountError,
    ledger::{Ledger, NonceSequencer},
};

/// Host-environment specific behavior of an account.
pub trait AuthorizationBackend {
    /// Identity of the trusted intermediary driving validation and
    /// execution against this account.
    fn trusted_intermediary(&self) -> Address;

    /// Runs before any signature work during validation. The bootloader
    /// variant consumes the nonce and enforces the balance floor here; the
    /// entry-point variant has nothing to do (its intermediary handles both
    /// concerns itself).
    fn pre_validate<L>(
        &self,
        ledger: &mut L,
        account: Address,
        envelope: &PackedOperation,
    ) -> Result<(), AccountError>
    where
        L: Ledger + NonceSequencer;

    /// Routes one outbound call.
    fn dispatch<L>(
        &self,
        ledger: &mut L,
        account: Address,
        request: &CallRequest,
    ) -> Result<Bytes, AccountError>
    where
        L: Ledger;
}

/// Backend for the generic aggregator model: the intermediary is an
/// explicitly configured entry-point identity, injected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointBackend {
    entry_point: Address,
}

impl EntryPointBackend {
    /// Creates a backend trusting the given entry point.
    pub const fn new(entry_point: Address) -> Self {
        Self { entry_point }
    }
}

impl AuthorizationBackend for EntryPointBackend {
    fn trusted_intermediary(&self) -> Address {
        self.entry_point
    }

    fn pre_validate<L>(
        &self,
        _ledger: &mut L,
        _account: Address,
        _envelope: &PackedOperation,
    ) -> Result<(), AccountError>
    where
        L: Ledger + NonceSequencer,
    {
        Ok(())
    }

    fn dispatch<L>(
        &self,
        ledger: &mut L,
        account: Address,
        request: &CallRequest,
    ) -> Result<Bytes, AccountError>
    where
        L: Ledger,
    {
        generic_dispatch(ledger, account, request)
    }
}

/// Backend for the native runtime: the intermediary is the hardcoded
/// bootloader, the nonce is consumed at the head of validation, and calls
/// targeting the system deployer take the privileged path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootloaderBackend;

impl BootloaderBackend {
    /// Fee ceiling times gas ceiling plus the value the call transfers: what
    /// the account must hold for the operation to be fundable.
    fn required_balance(envelope: &PackedOperation) -> Result<U256, AccountError> {
        let value = if envelope.callData.is_empty() {
            U256::ZERO
        } else {
            decode_call_data(&envelope.callData)?.value
        };
        Ok(U256::from(envelope.max_fee_per_gas())
            .saturating_mul(envelope.total_gas_limit())
            .saturating_add(value))
    }
}

impl AuthorizationBackend for BootloaderBackend {
    fn trusted_intermediary(&self) -> Address {
        BOOTLOADER_ADDRESS
    }

    fn pre_validate<L>(
        &self,
        ledger: &mut L,
        account: Address,
        envelope: &PackedOperation,
    ) -> Result<(), AccountError>
    where
        L: Ledger + NonceSequencer,
    {
        // Nonce consumption comes first: a replay is rejected at the
        // sequencer independent of the signature outcome, and the counter
        // has advanced before anything externally-triggerable can run.
        ledger
            .increment_if_equals(account, envelope.nonce)
            .map_err(AccountError::NonceAlreadyUsed)?;

        let required = Self::required_balance(envelope)?;
        let available = ledger.balance(account);
        if available < required {
            return Err(AccountError::InsufficientBalance { required, available });
        }
        Ok(())
    }

    fn dispatch<L>(
        &self,
        ledger: &mut L,
        account: Address,
        request: &CallRequest,
    ) -> Result<Bytes, AccountError>
    where
        L: Ledger,
    {
        if request.destination == CONTRACT_DEPLOYER_ADDRESS {
            tracing::debug!(
                target: "smart_account",
                account = %account,
                "routing call through the system deployer path"
            );
            return ledger
                .system_call(account, request.destination, &request.payload)
                .map_err(|revert| AccountError::ExecutionFailed { output: revert.output });
        }
        generic_dispatch(ledger, account, request)
    }
}

/// The generic outbound-call path both backends share.
fn generic_dispatch<L: Ledger>(
    ledger: &mut L,
    account: Address,
    request: &CallRequest,
) -> Result<Bytes, AccountError> {
    ledger
        .call(account, request.destination, request.value, &request.payload)
        .map_err(|revert| AccountError::ExecutionFailed { output: revert.output })
}
