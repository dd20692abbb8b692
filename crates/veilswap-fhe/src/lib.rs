//! simulated fhe coprocessor for the veilswap confidential amm
//!
//! models the encrypt/compute/decrypt workflow of an fhe coprocessor at its
//! interface boundary: on-chain code only ever sees opaque ciphertext handles,
//! homomorphic evaluation happens inside the coprocessor, and decryption is
//! gated by an explicit capability table (handle, reader).
//!
//! # architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      COPROCESSOR                           │
//! ├────────────────────────────────────────────────────────────┤
//! │                                                            │
//! │  client side (off-chain)                                   │
//! │  ├─ create_encrypted_input(contract, sender)               │
//! │  │    .add64(v).encrypt() -> (handle, input proof)         │
//! │  └─ user_decrypt(handle, signer) -> plaintext (acl-gated)  │
//! │                                                            │
//! │  contract side (on-chain)                                  │
//! │  ├─ verify_input(handle, proof, contract, sender)          │
//! │  ├─ add / sub / mul / min / mul_scalar / div_scalar        │
//! │  ├─ le / ge / eq -> ebool, select(ebool, a, b)             │
//! │  └─ req(ebool) -> fails the call, reveals nothing          │
//! │                                                            │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! the op set mirrors what fhe backends actually support for euint64: there is
//! **no encrypted division and no encrypted square root**. division only
//! exists with a plaintext divisor (`div_scalar`). anything that needs an
//! encrypted/encrypted ratio has to go through the decrypt-offchain-and-rebind
//! pattern the pool crate implements.
//!
//! plaintexts live only inside [`Coprocessor`], behind the handle boundary.
//! callers of this crate never observe them except through `user_decrypt`.

pub mod acl;
pub mod address;
pub mod coprocessor;
pub mod error;
pub mod handle;
pub mod proof;

pub use acl::AclTable;
pub use address::{Address, CallContext};
pub use coprocessor::{Coprocessor, EncryptedInputBuilder};
pub use error::{FheError, Result};
pub use handle::{BoolHandle, Handle};
pub use proof::{ExternalCiphertext, InputProof};

/// domain separator for account/contract addresses
pub const ADDRESS_DOMAIN: &[u8] = b"veilswap.address.v1";
/// domain separator for euint64 ciphertext handles
pub const HANDLE_DOMAIN: &[u8] = b"veilswap.handle.euint64.v1";
/// domain separator for ebool ciphertext handles
pub const BOOL_HANDLE_DOMAIN: &[u8] = b"veilswap.handle.ebool.v1";
/// domain separator for input proofs
pub const INPUT_PROOF_DOMAIN: &[u8] = b"veilswap.input-proof.v1";
