//! confidential fungible token ledger
//!
//! per-account balances exist only as euint64 ciphertext handles. the ledger
//! never stores or reveals a plaintext amount: minting, transfers and
//! operator pulls all consume handles, and a holder reads their own balance
//! by asking the coprocessor to decrypt it after `authorize_self`.
//!
//! operator approvals are time-bounded: `set_operator(operator, expiry)` lets
//! a contract (the swap pool) pull the holder's tokens until the expiry unix
//! timestamp passes. encrypted subtraction underflow is impossible - every
//! debit is guarded by an encrypted requirement that fails the whole call,
//! so a balance can never go provably negative.

pub mod error;
pub mod ledger;

pub use error::{Result, TokenError};
pub use ledger::ConfidentialToken;
