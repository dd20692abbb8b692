//! zero-knowledge input proofs (simulated at the binding level)
//!
//! every externally supplied ciphertext arrives as a (handle, proof) pair.
//! the proof attests the handle was honestly encrypted by the claimed sender
//! for the claimed target contract; a handle with a missing or mismatched
//! proof is rejected before any homomorphic operation touches it.
//!
//! the simulation keeps exactly the binding property: the proof is a
//! domain-separated hash over (handle, contract, sender), so replaying a
//! ciphertext against a different contract or from a different sender fails
//! verification the same way a real proof would.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::handle::Handle;
use crate::INPUT_PROOF_DOMAIN;

/// input proof binding a handle to (target contract, sender)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(pub [u8; 32]);

impl InputProof {
    /// compute the binding for (handle, contract, sender)
    pub(crate) fn bind(handle: Handle, contract: Address, sender: Address) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(INPUT_PROOF_DOMAIN);
        hasher.update(&handle.0);
        hasher.update(&contract.0);
        hasher.update(&sender.0);
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

/// a caller-supplied encrypted value: ciphertext handle plus its input proof
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCiphertext {
    pub handle: Handle,
    pub proof: InputProof,
}

impl ExternalCiphertext {
    pub fn new(handle: Handle, proof: InputProof) -> Self {
        Self { handle, proof }
    }
}
