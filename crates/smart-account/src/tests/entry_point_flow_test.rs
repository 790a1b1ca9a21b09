//! Flows of the entry-point variant: intermediary-driven validation,
//! prefund settlement, and gated execution.

use alloy_primitives::{b256, Address, Bytes, U256};

use super::{mint_request, signed_envelope, ACCOUNT_ADDRESS, ENTRY_POINT, ETHER, STRANGER, TOKEN};
use crate::{
    constants::{ERC1271_INVALID_SIGNATURE, ERC1271_MAGIC_VALUE},
    decode_call_data,
    test_utils::{MemoryLedger, TestSigner},
    Account, AccountError, CallRequest, EntryPointBackend, Ledger, TransferError, ValidationOutcome,
};

fn entry_point_account(owner: &TestSigner) -> Account<EntryPointBackend> {
    Account::new(ACCOUNT_ADDRESS, owner.address(), EntryPointBackend::new(ENTRY_POINT))
}

fn funded_ledger() -> MemoryLedger {
    MemoryLedger::default()
        .with_token(TOKEN)
        .with_balance(ACCOUNT_ADDRESS, U256::from(100) * ETHER)
}

#[test]
fn test_owner_signed_envelope_validates_and_prefunds() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = funded_ledger();

    let envelope = signed_envelope(&owner, 0, &mint_request(ACCOUNT_ADDRESS, 42), 0);
    let hash = envelope.signing_hash();

    let outcome = account
        .validate_operation(&mut ledger, ENTRY_POINT, &envelope, hash, ETHER)
        .unwrap();

    assert_eq!(outcome, ValidationOutcome::Success);
    assert_eq!(ledger.balance(ENTRY_POINT), ETHER);
    assert_eq!(ledger.balance(ACCOUNT_ADDRESS), U256::from(99) * ETHER);
}

#[test]
fn test_foreign_signature_soft_fails_and_still_prefunds() {
    let owner = TestSigner::from_seed(1);
    let intruder = TestSigner::from_seed(2);
    let account = entry_point_account(&owner);
    let mut ledger = funded_ledger();

    let envelope = signed_envelope(&intruder, 0, &mint_request(ACCOUNT_ADDRESS, 42), 0);
    let hash = envelope.signing_hash();

    let outcome = account
        .validate_operation(&mut ledger, ENTRY_POINT, &envelope, hash, ETHER)
        .unwrap();

    // The rejection is a status code, not an error, and the intermediary
    // still recovers its processing cost.
    assert_eq!(outcome, ValidationOutcome::SignatureFailure);
    assert_eq!(outcome.as_validation_data(), U256::from(1));
    assert_eq!(ledger.balance(ENTRY_POINT), ETHER);
}

#[test]
fn test_validation_gate_rejects_stranger() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = funded_ledger();

    let envelope = signed_envelope(&owner, 0, &mint_request(ACCOUNT_ADDRESS, 42), 0);
    let hash = envelope.signing_hash();

    let err = account
        .validate_operation(&mut ledger, STRANGER, &envelope, hash, ETHER)
        .unwrap_err();

    assert_eq!(err, AccountError::NotFromTrustedCaller { caller: STRANGER });
    assert_eq!(ledger.balance(ACCOUNT_ADDRESS), U256::from(100) * ETHER);
    assert_eq!(ledger.balance(STRANGER), U256::ZERO);
}

#[test]
fn test_zero_prefund_is_fatal() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = funded_ledger();

    let envelope = signed_envelope(&owner, 0, &mint_request(ACCOUNT_ADDRESS, 42), 0);
    let hash = envelope.signing_hash();

    let err = account
        .validate_operation(&mut ledger, ENTRY_POINT, &envelope, hash, U256::ZERO)
        .unwrap_err();

    assert_eq!(err, AccountError::NonPositiveRequiredFunds);
}

#[test]
fn test_prefund_transfer_failure_unwinds_validation() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = funded_ledger().with_rejecting_destination(ENTRY_POINT);

    let envelope = signed_envelope(&owner, 0, &mint_request(ACCOUNT_ADDRESS, 42), 0);
    let hash = envelope.signing_hash();

    let err = account
        .validate_operation(&mut ledger, ENTRY_POINT, &envelope, hash, ETHER)
        .unwrap_err();

    assert_eq!(
        err,
        AccountError::TransferFailed(TransferError::Rejected { destination: ENTRY_POINT })
    );
    assert_eq!(ledger.balance(ACCOUNT_ADDRESS), U256::from(100) * ETHER);
}

#[test]
fn test_pay_prefund_requires_intermediary() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = funded_ledger();

    account.pay_prefund(&mut ledger, ENTRY_POINT, ETHER).unwrap();
    assert_eq!(ledger.balance(ENTRY_POINT), ETHER);

    let err = account.pay_prefund(&mut ledger, STRANGER, ETHER).unwrap_err();
    assert_eq!(err, AccountError::NotFromTrustedCaller { caller: STRANGER });
    assert_eq!(ledger.balance(STRANGER), U256::ZERO);
}

#[test]
fn test_owner_executes_mint_with_zero_balance() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = MemoryLedger::default().with_token(TOKEN);

    account
        .execute(&mut ledger, owner.address(), &mint_request(ACCOUNT_ADDRESS, 42))
        .unwrap();

    assert_eq!(ledger.token_balance(TOKEN, ACCOUNT_ADDRESS), U256::from(42));
}

#[test]
fn test_stranger_cannot_execute() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = MemoryLedger::default().with_token(TOKEN);

    let err = account
        .execute(&mut ledger, STRANGER, &mint_request(STRANGER, 42))
        .unwrap_err();

    assert_eq!(err, AccountError::NotFromTrustedCallerOrOwner { caller: STRANGER });
    assert_eq!(ledger.token_balance(TOKEN, STRANGER), U256::ZERO);
    assert!(ledger.calls().is_empty());
}

#[test]
fn test_entry_point_may_execute() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = MemoryLedger::default().with_token(TOKEN);

    account
        .execute(&mut ledger, ENTRY_POINT, &mint_request(ACCOUNT_ADDRESS, 7))
        .unwrap();

    assert_eq!(ledger.token_balance(TOKEN, ACCOUNT_ADDRESS), U256::from(7));
}

#[test]
fn test_failed_call_unwinds_whole_batch() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = MemoryLedger::default().with_token(TOKEN).with_reverting_destination(STRANGER);

    let requests = [
        mint_request(ACCOUNT_ADDRESS, 5),
        CallRequest::new(STRANGER, U256::ZERO, Bytes::new()),
    ];
    let err = account.execute_batch(&mut ledger, owner.address(), &requests).unwrap_err();

    assert!(matches!(err, AccountError::ExecutionFailed { .. }));
    // The mint that preceded the failing call is unwound with it.
    assert_eq!(ledger.token_balance(TOKEN, ACCOUNT_ADDRESS), U256::ZERO);
    assert!(ledger.calls().is_empty());
}

#[test]
fn test_full_intermediary_flow_mints_and_reimburses() {
    let owner = TestSigner::from_seed(1);
    let account = entry_point_account(&owner);
    let mut ledger = funded_ledger();

    let envelope = signed_envelope(&owner, 0, &mint_request(ACCOUNT_ADDRESS, 42), 0);
    let hash = envelope.signing_hash();

    let outcome = account
        .validate_operation(&mut ledger, ENTRY_POINT, &envelope, hash, ETHER)
        .unwrap();
    assert!(outcome.is_success());

    let request = decode_call_data(&envelope.callData).unwrap();
    account.execute(&mut ledger, ENTRY_POINT, &request).unwrap();

    assert_eq!(ledger.token_balance(TOKEN, ACCOUNT_ADDRESS), U256::from(42));
    assert_eq!(ledger.balance(ENTRY_POINT), ETHER);
}

#[test]
fn test_ownership_transfer_rotates_signing_authority() {
    let owner = TestSigner::from_seed(1);
    let successor = TestSigner::from_seed(2);
    let mut account = entry_point_account(&owner);
    let mut ledger = funded_ledger();

    let err = account.transfer_ownership(STRANGER, successor.address()).unwrap_err();
    assert_eq!(err, AccountError::NotOwner { caller: STRANGER });

    let err = account.transfer_ownership(owner.address(), Address::ZERO);
    assert_eq!(err, Err(AccountError::InvalidNewOwner));

    account.transfer_ownership(owner.address(), successor.address()).unwrap();
    assert_eq!(account.owner(), successor.address());

    // Envelopes signed by the previous owner no longer validate; the
    // successor's do.
    let stale = signed_envelope(&owner, 0, &mint_request(ACCOUNT_ADDRESS, 1), 0);
    let outcome = account
        .validate_operation(&mut ledger, ENTRY_POINT, &stale, stale.signing_hash(), ETHER)
        .unwrap();
    assert_eq!(outcome, ValidationOutcome::SignatureFailure);

    let fresh = signed_envelope(&successor, 0, &mint_request(ACCOUNT_ADDRESS, 1), 0);
    let outcome = account
        .validate_operation(&mut ledger, ENTRY_POINT, &fresh, fresh.signing_hash(), ETHER)
        .unwrap();
    assert_eq!(outcome, ValidationOutcome::Success);
}

#[test]
fn test_is_valid_signature_selector() {
    let owner = TestSigner::from_seed(1);
    let intruder = TestSigner::from_seed(2);
    let account = entry_point_account(&owner);

    let hash = b256!("00000000000000000000000000000000000000000000000000000000000000aa");
    assert_eq!(
        account.is_valid_signature(hash, &owner.sign_canonical_hash(hash)),
        ERC1271_MAGIC_VALUE
    );
    assert_eq!(
        account.is_valid_signature(hash, &intruder.sign_canonical_hash(hash)),
        ERC1271_INVALID_SIGNATURE
    );
}
