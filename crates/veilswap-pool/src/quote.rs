//! quote engine
//!
//! fhe backends cannot divide two ciphertexts, so the constant-product quote
//! is split: the pool computes the encrypted numerator and denominator of
//!
//! ```text
//! amountOut = (amountIn * 997 * reserveOut) / (reserveIn * 1000 + amountIn * 997)
//! ```
//!
//! and parks them as per-caller scratch state. the caller decrypts both
//! off-chain (the acl grants exactly that caller, nobody else), floor-divides
//! in plaintext, and re-encrypts the quotient for the swap call.
//!
//! scratch state is overwritten by every call - quotes are not versioned, a
//! caller must quote immediately before swapping or accept staleness.
//!
//! the products wrap at 2^64 like the euint64 ops they run on. quotes are
//! exact while `amount_in * 997 * reserve_out` stays below 2^64; beyond that
//! the decrypted numerator is the wrapped residue, the same garbage a real
//! fhe backend would hand back.

use tracing::debug;
use veilswap_fhe::{Address, CallContext, Coprocessor, ExternalCiphertext, Handle};

use crate::error::{PoolError, Result};
use crate::pool::SwapPool;
use crate::{FEE_DENOMINATOR, FEE_NUMERATOR};

/// per-caller quote scratch: encrypted numerator and denominator
#[derive(Clone, Copy, Debug)]
pub struct Quote {
    pub numerator: Handle,
    pub denominator: Handle,
}

impl SwapPool {
    /// compute the encrypted quote for `amount_in` fed in as `token_in`
    ///
    /// side effect only: stores the caller's scratch numerator/denominator
    /// and grants the caller decrypt access to both. reserves are untouched;
    /// the call is idempotent for unchanged reserves.
    pub fn get_amount_out(
        &mut self,
        ctx: &CallContext,
        fhe: &mut Coprocessor,
        amount_in: &ExternalCiphertext,
        token_in: Address,
    ) -> Result<()> {
        let side = self.side_of(token_in)?;
        let amount_in = fhe.verify_input(amount_in, self.address(), ctx.caller)?;
        let (reserve_in, reserve_out) = self.oriented_reserves(side);

        let amount_in_with_fee = fhe.mul_scalar(amount_in, FEE_NUMERATOR)?;
        let numerator = fhe.mul(amount_in_with_fee, reserve_out)?;
        let scaled_reserve_in = fhe.mul_scalar(reserve_in, FEE_DENOMINATOR)?;
        let denominator = fhe.add(scaled_reserve_in, amount_in_with_fee)?;

        fhe.allow(numerator, ctx.caller);
        fhe.allow(denominator, ctx.caller);
        self.quotes.insert(
            ctx.caller,
            Quote {
                numerator,
                denominator,
            },
        );
        debug!(caller = %ctx.caller, %token_in, "quote scratch updated");
        Ok(())
    }

    /// the caller's scratch numerator handle
    pub fn encrypted_numerator(&self, caller: Address) -> Result<Handle> {
        self.quotes
            .get(&caller)
            .map(|q| q.numerator)
            .ok_or(PoolError::QuoteMissing(caller))
    }

    /// the caller's scratch denominator handle
    pub fn encrypted_denominator(&self, caller: Address) -> Result<Handle> {
        self.quotes
            .get(&caller)
            .map(|q| q.denominator)
            .ok_or(PoolError::QuoteMissing(caller))
    }
}
