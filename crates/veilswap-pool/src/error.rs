//! error types for the swap engine

use thiserror::Error;
use veilswap_fhe::{Address, FheError};
use veilswap_token::TokenError;

pub type Result<T> = std::result::Result<T, PoolError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("token {0} is not part of this pool")]
    InvalidToken(Address),

    #[error("ledger passed for {expected} has address {got}")]
    LedgerMismatch { expected: Address, got: Address },

    #[error("no quote scratch state for caller {0}")]
    QuoteMissing(Address),

    #[error("expected output is below the caller's minimum")]
    SlippageExceeded,

    #[error("expected output exceeds the available reserve")]
    InsufficientReserve,

    #[error("redemption claims more than the burned share's entitlement")]
    DisproportionateRedemption,

    #[error("insufficient encrypted balance")]
    InsufficientBalance,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Fhe(#[from] FheError),
}
