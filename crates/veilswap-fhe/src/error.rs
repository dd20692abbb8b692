//! error types for the simulated coprocessor

use thiserror::Error;

use crate::address::Address;
use crate::handle::Handle;

pub type Result<T> = std::result::Result<T, FheError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FheError {
    #[error("input proof does not match handle binding")]
    InvalidProof,

    #[error("unknown ciphertext handle {0}")]
    UnknownHandle(Handle),

    #[error("{reader} has no decrypt grant for handle {handle}")]
    AclDenied { handle: Handle, reader: Address },

    #[error("encrypted requirement not met")]
    RequirementNotMet,

    #[error("plaintext divisor must be non-zero")]
    DivisorMustBeNonZero,
}
