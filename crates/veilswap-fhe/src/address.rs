//! account and contract identities
//!
//! addresses are 32-byte blake3 derivations so tests get stable named parties

use serde::{Deserialize, Serialize};

use crate::ADDRESS_DOMAIN;

/// account or contract identity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// derive a stable address from a label ("alice", "token-a", ...)
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ADDRESS_DOMAIN);
        hasher.update(label.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// per-call sender identity and timestamp
///
/// the msg.sender / block.timestamp pair of a simulated transaction; every
/// state-mutating entry point takes one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// who signed this call
    pub caller: Address,
    /// unix timestamp at inclusion
    pub now: u64,
}

impl CallContext {
    pub fn new(caller: Address, now: u64) -> Self {
        Self { caller, now }
    }
}
