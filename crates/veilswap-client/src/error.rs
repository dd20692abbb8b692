//! error types for the off-chain client

use thiserror::Error;
use veilswap_fhe::FheError;
use veilswap_pool::PoolError;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("pool has no liquidity to quote against")]
    EmptyPool,

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Fhe(#[from] FheError),
}
