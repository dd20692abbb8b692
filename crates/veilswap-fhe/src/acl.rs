//! decryption capability table
//!
//! ciphertexts are not decrypt-by-default: a party may decrypt a handle only
//! if an explicit (handle, reader) grant exists. grants are handed out by the
//! contracts that own the handles (a token ledger granting a holder access to
//! their balance, the pool granting a caller access to their quote).
//!
//! homomorphic evaluation is not gated here - only decryption is. that
//! matches the coprocessor model where contracts compute freely over handles
//! they hold but plaintext exits only through the acl.

use std::collections::HashSet;

use crate::address::Address;
use crate::handle::Handle;

/// capability table of (handle, authorized reader) pairs
#[derive(Clone, Debug, Default)]
pub struct AclTable {
    grants: HashSet<(Handle, Address)>,
}

impl AclTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// grant `reader` the right to decrypt `handle`
    pub fn allow(&mut self, handle: Handle, reader: Address) {
        self.grants.insert((handle, reader));
    }

    /// check whether `reader` may decrypt `handle`
    pub fn is_allowed(&self, handle: Handle, reader: Address) -> bool {
        self.grants.contains(&(handle, reader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants_are_per_reader() {
        let mut acl = AclTable::new();
        let h = Handle([9u8; 32]);
        let alice = Address::derive("alice");
        let bob = Address::derive("bob");

        assert!(!acl.is_allowed(h, alice));
        acl.allow(h, alice);
        assert!(acl.is_allowed(h, alice));
        assert!(!acl.is_allowed(h, bob));
    }
}
