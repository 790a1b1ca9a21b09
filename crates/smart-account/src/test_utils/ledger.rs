//! An in-memory host runtime for testing account flows.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall, SolValue};

use crate::ledger::{CallReverted, Ledger, NonceMismatch, NonceSequencer, TransferError};

sol! {
    /// Minimal token the in-memory runtime hosts, so execution scenarios
    /// can observe real state effects.
    interface IMintableToken {
        /// Credits `amount` tokens to `to`.
        function mint(address to, uint256 amount) external;
        /// Token balance of `holder`.
        function balanceOf(address holder) external view returns (uint256);
    }
}

/// State the runtime rolls back on revert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LedgerState {
    balances: HashMap<Address, U256>,
    nonces: HashMap<Address, U256>,
    token_balances: HashMap<(Address, Address), U256>,
}

/// One outbound call the runtime performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// The account the call originated from.
    pub caller: Address,
    /// Call destination.
    pub destination: Address,
    /// Native value carried.
    pub value: U256,
    /// Function payload.
    pub payload: Bytes,
    /// Whether the call took the privileged system path.
    pub system: bool,
}

/// Rollback point of a [`MemoryLedger`].
#[derive(Debug)]
pub struct MemorySnapshot {
    state: LedgerState,
    calls: usize,
}

/// An in-memory ledger runtime: native balances, per-account nonces, a
/// journal of outbound calls, and programmable failure injection. Builder
/// methods configure initial state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: LedgerState,
    tokens: HashSet<Address>,
    reverting: HashSet<Address>,
    rejecting: HashSet<Address>,
    calls: Vec<CallRecord>,
}

impl MemoryLedger {
    /// Sets an account's native balance.
    pub fn with_balance(mut self, account: Address, balance: U256) -> Self {
        self.state.balances.insert(account, balance);
        self
    }

    /// Sets an account's nonce counter.
    pub fn with_nonce(mut self, account: Address, nonce: U256) -> Self {
        self.state.nonces.insert(account, nonce);
        self
    }

    /// Hosts a mintable token at `address`.
    pub fn with_token(mut self, address: Address) -> Self {
        self.tokens.insert(address);
        self
    }

    /// Makes every call to `destination` revert.
    pub fn with_reverting_destination(mut self, destination: Address) -> Self {
        self.reverting.insert(destination);
        self
    }

    /// Makes `destination` refuse plain value transfers.
    pub fn with_rejecting_destination(mut self, destination: Address) -> Self {
        self.rejecting.insert(destination);
        self
    }

    /// Current nonce counter of an account.
    pub fn nonce(&self, account: Address) -> U256 {
        self.state.nonces.get(&account).copied().unwrap_or_default()
    }

    /// Token balance of `holder` at the token hosted at `token`.
    pub fn token_balance(&self, token: Address, holder: Address) -> U256 {
        self.state.token_balances.get(&(token, holder)).copied().unwrap_or_default()
    }

    /// The journal of outbound calls performed so far.
    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    fn move_value(&mut self, from: Address, to: Address, value: U256) -> Result<(), U256> {
        if value.is_zero() {
            return Ok(());
        }
        let available = self.balance(from);
        if available < value {
            return Err(available);
        }
        self.state.balances.insert(from, available - value);
        *self.state.balances.entry(to).or_default() += value;
        Ok(())
    }

    fn call_token(&mut self, token: Address, payload: &[u8]) -> Result<Bytes, CallReverted> {
        if let Ok(mint) = IMintableToken::mintCall::abi_decode(payload, true) {
            *self.state.token_balances.entry((token, mint.to)).or_default() += mint.amount;
            return Ok(Bytes::new());
        }
        if let Ok(query) = IMintableToken::balanceOfCall::abi_decode(payload, true) {
            return Ok(self.token_balance(token, query.holder).abi_encode().into());
        }
        // Unknown selector.
        Err(CallReverted::default())
    }
}

impl Ledger for MemoryLedger {
    type Snapshot = MemorySnapshot;

    fn balance(&self, account: Address) -> U256 {
        self.state.balances.get(&account).copied().unwrap_or_default()
    }

    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), TransferError> {
        if self.rejecting.contains(&to) {
            return Err(TransferError::Rejected { destination: to });
        }
        self.move_value(from, to, value).map_err(|available| {
            TransferError::InsufficientBalance { available, required: value }
        })
    }

    fn call(
        &mut self,
        caller: Address,
        destination: Address,
        value: U256,
        payload: &[u8],
    ) -> Result<Bytes, CallReverted> {
        self.calls.push(CallRecord {
            caller,
            destination,
            value,
            payload: Bytes::copy_from_slice(payload),
            system: false,
        });

        if self.reverting.contains(&destination) {
            return Err(CallReverted::default());
        }

        // A reverted call undoes its own effects, value transfer included.
        let backup = self.state.clone();
        if self.move_value(caller, destination, value).is_err() {
            self.state = backup;
            return Err(CallReverted::default());
        }
        let result = if self.tokens.contains(&destination) && !payload.is_empty() {
            self.call_token(destination, payload)
        } else {
            Ok(Bytes::new())
        };
        if result.is_err() {
            self.state = backup;
        }
        result
    }

    fn system_call(
        &mut self,
        caller: Address,
        destination: Address,
        payload: &[u8],
    ) -> Result<Bytes, CallReverted> {
        self.calls.push(CallRecord {
            caller,
            destination,
            value: U256::ZERO,
            payload: Bytes::copy_from_slice(payload),
            system: true,
        });

        if self.reverting.contains(&destination) {
            return Err(CallReverted::default());
        }
        Ok(Bytes::new())
    }

    fn snapshot(&mut self) -> Self::Snapshot {
        MemorySnapshot { state: self.state.clone(), calls: self.calls.len() }
    }

    fn revert(&mut self, snapshot: Self::Snapshot) {
        self.state = snapshot.state;
        self.calls.truncate(snapshot.calls);
    }
}

impl NonceSequencer for MemoryLedger {
    fn increment_if_equals(
        &mut self,
        account: Address,
        expected: U256,
    ) -> Result<(), NonceMismatch> {
        let current = self.state.nonces.entry(account).or_default();
        if *current != expected {
            return Err(NonceMismatch { expected: *current, provided: expected });
        }
        *current += U256::from(1);
        Ok(())
    }
}
