//! Test utilities for the authorization account.

mod ledger;
mod signer;

pub use ledger::*;
pub use signer::*;
