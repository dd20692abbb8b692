//! error types for the confidential token ledger

use thiserror::Error;
use veilswap_fhe::{Address, FheError};

pub type Result<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("caller is not the token owner")]
    NotOwner,

    #[error("{operator} is not an approved operator for {holder}")]
    OperatorNotApproved { holder: Address, operator: Address },

    #[error("operator approval expired at {expiry}, now {now}")]
    OperatorExpired { expiry: u64, now: u64 },

    #[error("insufficient encrypted balance")]
    InsufficientBalance,

    #[error("handle is not the caller's balance")]
    NotHolder,

    #[error(transparent)]
    Fhe(#[from] FheError),
}
