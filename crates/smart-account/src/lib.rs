//! Programmable authorization account.
//!
//! The account is a ledger-resident entity that holds no submission key of its
//! own: a trusted intermediary (an entry-point aggregator, or the native
//! runtime's bootloader) drives a validate/fund/execute pipeline against it,
//! and every state-changing entry point is reachable only through an exact
//! caller-identity gate. Signed operation envelopes decide who is authorized;
//! the ledger runtime, nonce sequencer, and deployer are external
//! collaborators behind traits.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod account;
pub use account::*;

mod backend;
pub use backend::*;

mod envelope;
pub use envelope::*;

mod error;
pub use error::*;

mod ledger;
pub use ledger::*;

mod signature;
pub use signature::*;

mod validation;
pub use validation::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;
