//! opaque ciphertext handles
//!
//! a handle is the only thing on-chain code ever holds for an encrypted value.
//! euint64 and ebool handles are distinct types so a comparison result can
//! never be spent as an amount.

use serde::{Deserialize, Serialize};

use crate::{BOOL_HANDLE_DOMAIN, HANDLE_DOMAIN};

/// handle to an encrypted 64-bit unsigned value (euint64)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(pub [u8; 32]);

impl Handle {
    /// derive a fresh handle from the coprocessor's monotonic counter
    pub(crate) fn derive(counter: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(HANDLE_DOMAIN);
        hasher.update(&counter.to_le_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl core::fmt::Display for Handle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// handle to an encrypted boolean (ebool)
///
/// only usable with `select` and `req`; never decryptable by users
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoolHandle(pub [u8; 32]);

impl BoolHandle {
    pub(crate) fn derive(counter: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(BOOL_HANDLE_DOMAIN);
        hasher.update(&counter.to_le_bytes());
        Self(*hasher.finalize().as_bytes())
    }
}

impl core::fmt::Display for BoolHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}
