//! the simulated coprocessor: ciphertext store + homomorphic op set
//!
//! plaintexts are stored behind opaque handles; every operation mints a fresh
//! handle for its result. arithmetic wraps at 2^64 like the tfhe euint64 ops
//! it models - callers that care about overflow or underflow guard with `req`
//! before mutating state, exactly as the on-chain contracts do.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::acl::AclTable;
use crate::address::Address;
use crate::error::{FheError, Result};
use crate::handle::{BoolHandle, Handle};
use crate::proof::{ExternalCiphertext, InputProof};

/// simulated fhe coprocessor
///
/// holds every live ciphertext, the decryption capability table, and the
/// counter that makes handles unique
#[derive(Clone, Debug, Default)]
pub struct Coprocessor {
    values: HashMap<Handle, u64>,
    bools: HashMap<BoolHandle, bool>,
    acl: AclTable,
    counter: u64,
}

impl Coprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh(&mut self, value: u64) -> Handle {
        let handle = Handle::derive(self.counter);
        self.counter += 1;
        self.values.insert(handle, value);
        handle
    }

    fn fresh_bool(&mut self, value: bool) -> BoolHandle {
        let handle = BoolHandle::derive(self.counter);
        self.counter += 1;
        self.bools.insert(handle, value);
        handle
    }

    fn value(&self, handle: Handle) -> Result<u64> {
        self.values
            .get(&handle)
            .copied()
            .ok_or(FheError::UnknownHandle(handle))
    }

    // --- client side -------------------------------------------------------

    /// start building an encrypted input bound to (contract, sender)
    pub fn create_encrypted_input(
        &mut self,
        contract: Address,
        sender: Address,
    ) -> EncryptedInputBuilder<'_> {
        EncryptedInputBuilder {
            fhe: self,
            contract,
            sender,
            values: Vec::new(),
        }
    }

    /// decrypt a handle as `signer`; refused unless the acl granted access
    pub fn user_decrypt(&self, handle: Handle, signer: Address) -> Result<u64> {
        let value = self.value(handle)?;
        if !self.acl.is_allowed(handle, signer) {
            return Err(FheError::AclDenied {
                handle,
                reader: signer,
            });
        }
        Ok(value)
    }

    // --- acl ---------------------------------------------------------------

    /// grant `reader` decrypt access to `handle`
    pub fn allow(&mut self, handle: Handle, reader: Address) {
        trace!(%handle, %reader, "acl grant");
        self.acl.allow(handle, reader);
    }

    pub fn is_allowed(&self, handle: Handle, reader: Address) -> bool {
        self.acl.is_allowed(handle, reader)
    }

    // --- contract side -----------------------------------------------------

    /// check an external ciphertext's proof against (contract, sender) and
    /// admit its handle for homomorphic use
    pub fn verify_input(
        &self,
        external: &ExternalCiphertext,
        contract: Address,
        sender: Address,
    ) -> Result<Handle> {
        if !self.values.contains_key(&external.handle) {
            return Err(FheError::UnknownHandle(external.handle));
        }
        if external.proof != InputProof::bind(external.handle, contract, sender) {
            return Err(FheError::InvalidProof);
        }
        Ok(external.handle)
    }

    /// encrypt a public constant (the zero reserves of a fresh pool, etc)
    pub fn trivial_encrypt(&mut self, value: u64) -> Handle {
        self.fresh(value)
    }

    pub fn add(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        let v = self.value(a)?.wrapping_add(self.value(b)?);
        Ok(self.fresh(v))
    }

    pub fn sub(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        let v = self.value(a)?.wrapping_sub(self.value(b)?);
        Ok(self.fresh(v))
    }

    pub fn mul(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        let v = self.value(a)?.wrapping_mul(self.value(b)?);
        Ok(self.fresh(v))
    }

    pub fn mul_scalar(&mut self, a: Handle, scalar: u64) -> Result<Handle> {
        let v = self.value(a)?.wrapping_mul(scalar);
        Ok(self.fresh(v))
    }

    /// division by a plaintext scalar - the only division fhe supports
    pub fn div_scalar(&mut self, a: Handle, scalar: u64) -> Result<Handle> {
        if scalar == 0 {
            return Err(FheError::DivisorMustBeNonZero);
        }
        let v = self.value(a)? / scalar;
        Ok(self.fresh(v))
    }

    pub fn min(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        let v = self.value(a)?.min(self.value(b)?);
        Ok(self.fresh(v))
    }

    pub fn le(&mut self, a: Handle, b: Handle) -> Result<BoolHandle> {
        let v = self.value(a)? <= self.value(b)?;
        Ok(self.fresh_bool(v))
    }

    pub fn ge(&mut self, a: Handle, b: Handle) -> Result<BoolHandle> {
        let v = self.value(a)? >= self.value(b)?;
        Ok(self.fresh_bool(v))
    }

    pub fn eq(&mut self, a: Handle, b: Handle) -> Result<BoolHandle> {
        let v = self.value(a)? == self.value(b)?;
        Ok(self.fresh_bool(v))
    }

    /// `if cond { a } else { b }` without revealing cond
    pub fn select(&mut self, cond: BoolHandle, a: Handle, b: Handle) -> Result<Handle> {
        let c = self
            .bools
            .get(&cond)
            .copied()
            .ok_or(FheError::RequirementNotMet)?;
        let v = if c { self.value(a)? } else { self.value(b)? };
        Ok(self.fresh(v))
    }

    /// encrypted requirement: fails the call if the predicate is false,
    /// revealing nothing about the operands
    pub fn req(&self, cond: BoolHandle) -> Result<()> {
        match self.bools.get(&cond) {
            Some(true) => Ok(()),
            Some(false) => {
                debug!(%cond, "encrypted requirement failed");
                Err(FheError::RequirementNotMet)
            }
            None => Err(FheError::RequirementNotMet),
        }
    }
}

/// builder for client-side encrypted inputs
///
/// mirrors `createEncryptedInput(contract, sender).add64(v).encrypt()`:
/// registers each value with the coprocessor and returns (handle, proof)
/// pairs bound to the target contract and sender
pub struct EncryptedInputBuilder<'a> {
    fhe: &'a mut Coprocessor,
    contract: Address,
    sender: Address,
    values: Vec<u64>,
}

impl EncryptedInputBuilder<'_> {
    pub fn add64(mut self, value: u64) -> Self {
        self.values.push(value);
        self
    }

    pub fn encrypt(self) -> Vec<ExternalCiphertext> {
        let Self {
            fhe,
            contract,
            sender,
            values,
        } = self;
        values
            .into_iter()
            .map(|v| {
                let handle = fhe.fresh(v);
                let proof = InputProof::bind(handle, contract, sender);
                ExternalCiphertext::new(handle, proof)
            })
            .collect()
    }
}
