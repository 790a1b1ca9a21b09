//! The account entity: gates, entry points, and the ownership store.
//!
//! Every state-changing entry point takes a ledger snapshot on entry and
//! reverts to it on any fatal error, mirroring the host runtime's
//! whole-call atomicity. There is no path that reaches an outbound call
//! without passing a gate check first.

use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};

use crate::{
    backend::{AuthorizationBackend, BootloaderBackend},
    constants::{ERC1271_INVALID_SIGNATURE, ERC1271_MAGIC_VALUE},
    envelope::{decode_call_data, CallRequest, PackedOperation},
    error::AccountError,
    ledger::{Ledger, NonceSequencer},
    signature::{eth_signed_digest, recover_signer},
    validation::{check_owner_signature, ValidationOutcome},
};

/// A programmable authorization account.
///
/// Constructed once: the creator fixes the owner, and the backend fixes the
/// trusted intermediary for the account's lifetime. The owner slot is the
/// only mutable identity and only the current owner may reassign it.
#[derive(Debug, Clone)]
pub struct Account<B> {
    address: Address,
    owner: Address,
    backend: B,
}

impl<B> Account<B> {
    /// Creates an account at `address`, owned by `owner`.
    pub const fn new(address: Address, owner: Address, backend: B) -> Self {
        Self { address, owner, backend }
    }

    /// The account's own ledger address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The current owner identity.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Reassigns the owner slot. Only the current owner may do this, and
    /// never to the zero address.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), AccountError> {
        if caller != self.owner {
            return Err(AccountError::NotOwner { caller });
        }
        if new_owner.is_zero() {
            return Err(AccountError::InvalidNewOwner);
        }
        tracing::debug!(
            target: "smart_account",
            account = %self.address,
            previous = %self.owner,
            new = %new_owner,
            "ownership transferred"
        );
        self.owner = new_owner;
        Ok(())
    }

    /// Off-ledger signature check: returns the magic selector when
    /// `signature` over the prefix-transformed `hash` recovers to the owner.
    pub fn is_valid_signature(&self, hash: B256, signature: &[u8]) -> FixedBytes<4> {
        match recover_signer(eth_signed_digest(hash), signature) {
            Some(signer) if signer == self.owner => ERC1271_MAGIC_VALUE,
            _ => ERC1271_INVALID_SIGNATURE,
        }
    }
}

impl<B: AuthorizationBackend> Account<B> {
    /// The intermediary identity the gates trust.
    pub fn trusted_intermediary(&self) -> Address {
        self.backend.trusted_intermediary()
    }

    /// Gate: the immediate caller must be the trusted intermediary.
    fn ensure_trusted_intermediary(&self, caller: Address) -> Result<(), AccountError> {
        if caller != self.backend.trusted_intermediary() {
            return Err(AccountError::NotFromTrustedCaller { caller });
        }
        Ok(())
    }

    /// Gate: the immediate caller must be the trusted intermediary or the
    /// current owner.
    fn ensure_trusted_intermediary_or_owner(&self, caller: Address) -> Result<(), AccountError> {
        if caller != self.backend.trusted_intermediary() && caller != self.owner {
            return Err(AccountError::NotFromTrustedCallerOrOwner { caller });
        }
        Ok(())
    }

    /// Validates an operation envelope against its canonical hash and
    /// settles the intermediary's prefund.
    ///
    /// The caller must be the trusted intermediary. After the backend's
    /// pre-validation (nonce consumption and balance floor in the native
    /// variant), the signature check yields a soft two-valued outcome. The
    /// prefund settles regardless of that outcome: the intermediary is owed
    /// its processing cost for invalid operations as well.
    pub fn validate_operation<L>(
        &self,
        ledger: &mut L,
        caller: Address,
        envelope: &PackedOperation,
        canonical_hash: B256,
        required_prefund: U256,
    ) -> Result<ValidationOutcome, AccountError>
    where
        L: Ledger + NonceSequencer,
    {
        atomic(ledger, |ledger| {
            self.ensure_trusted_intermediary(caller)?;
            self.backend.pre_validate(ledger, self.address, envelope)?;

            let outcome = check_owner_signature(self.owner, canonical_hash, &envelope.signature);
            tracing::debug!(
                target: "smart_account",
                account = %self.address,
                nonce = %envelope.nonce,
                %outcome,
                "operation validated"
            );

            self.settle_prefund(ledger, caller, required_prefund)?;
            Ok(outcome)
        })
    }

    /// Pays the intermediary the fee it is owed for processing an
    /// operation, from the account's own balance.
    pub fn pay_prefund<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: Address,
        amount: U256,
    ) -> Result<(), AccountError> {
        atomic(ledger, |ledger| {
            self.ensure_trusted_intermediary(caller)?;
            self.settle_prefund(ledger, caller, amount)
        })
    }

    fn settle_prefund<L: Ledger>(
        &self,
        ledger: &mut L,
        to: Address,
        amount: U256,
    ) -> Result<(), AccountError> {
        if amount.is_zero() {
            return Err(AccountError::NonPositiveRequiredFunds);
        }
        ledger.transfer(self.address, to, amount).map_err(AccountError::TransferFailed)
    }

    /// Performs exactly one outbound call on behalf of the account.
    ///
    /// The caller must be the trusted intermediary or the owner. Failure of
    /// the inner call aborts the whole operation and unwinds every effect
    /// performed after entry.
    pub fn execute<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: Address,
        request: &CallRequest,
    ) -> Result<Bytes, AccountError> {
        atomic(ledger, |ledger| {
            self.ensure_trusted_intermediary_or_owner(caller)?;
            self.backend.dispatch(ledger, self.address, request)
        })
    }

    /// Performs a sequence of outbound calls in order. The first failure
    /// aborts and unwinds the whole batch.
    pub fn execute_batch<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: Address,
        requests: &[CallRequest],
    ) -> Result<Vec<Bytes>, AccountError> {
        atomic(ledger, |ledger| {
            self.ensure_trusted_intermediary_or_owner(caller)?;
            let mut outputs = Vec::with_capacity(requests.len());
            for request in requests {
                outputs.push(self.backend.dispatch(ledger, self.address, request)?);
            }
            Ok(outputs)
        })
    }
}

impl Account<BootloaderBackend> {
    /// Executes a signed envelope for a submitter that is neither the owner
    /// nor the bootloader.
    ///
    /// Unauthenticated: the envelope's signature is the sole authority.
    /// Full validation runs inline, nonce consumption and balance floor
    /// first, then the signature check against the envelope's own signing
    /// hash. A signer mismatch is fatal here, since no intermediary exists
    /// to branch on a soft status code. No prefund settles: there is no
    /// intermediary to reimburse.
    pub fn execute_from_outside<L>(
        &self,
        ledger: &mut L,
        envelope: &PackedOperation,
    ) -> Result<Bytes, AccountError>
    where
        L: Ledger + NonceSequencer,
    {
        atomic(ledger, |ledger| {
            self.backend.pre_validate(ledger, self.address, envelope)?;

            let canonical_hash = envelope.signing_hash();
            if !check_owner_signature(self.owner, canonical_hash, &envelope.signature).is_success()
            {
                return Err(AccountError::InvalidSignature);
            }

            let request = decode_call_data(&envelope.callData)?;
            self.backend.dispatch(ledger, self.address, &request)
        })
    }
}

/// Runs `f` against a snapshot of the ledger, reverting every effect if it
/// fails. This is the runtime's whole-call atomicity surfaced at the entry
/// points: an aborted call leaves no observable state change.
fn atomic<L: Ledger, T>(
    ledger: &mut L,
    f: impl FnOnce(&mut L) -> Result<T, AccountError>,
) -> Result<T, AccountError> {
    let snapshot = ledger.snapshot();
    match f(ledger) {
        Ok(value) => Ok(value),
        Err(error) => {
            ledger.revert(snapshot);
            Err(error)
        }
    }
}
