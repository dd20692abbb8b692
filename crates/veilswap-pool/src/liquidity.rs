//! liquidity manager
//!
//! lp shares without encrypted division or square root. the mint formula is
//!
//! ```text
//! liquidity = 2 * min(amount0, amount1)
//! ```
//!
//! built from `min` and scalar multiplication only. for a balanced first
//! deposit it equals the classic `sqrt(a0*a1)` up to scale, and a later
//! deposit at the pool ratio mints shares exactly proportional to its size.
//! a lopsided deposit is priced at its smaller side - the excess of the
//! larger side is donated to the reserves rather than minting extra shares,
//! the same griefing resistance uniswap's min rule aims for.
//!
//! redemption reuses the off-chain division pattern of the quote engine: the
//! caller computes `amount_out = liquidity * reserve / total_supply` per side
//! off-chain and submits both amounts as proof-bound ciphertexts. the
//! contract cannot recompute the quotients, so it bounds each claim by
//! cross-multiplication instead:
//!
//! ```text
//! amount_out * total_supply <= liquidity * reserve
//! ```
//!
//! which holds exactly for the floor-divided payout and fails for anything
//! larger. a caller understating their payout only hurts themselves. the
//! products wrap at 2^64 like the euint64 ops they run on, so the bound is
//! exact while `liquidity * reserve` stays below 2^64.
//!
//! the sum of all lp balances equals the total supply at all times: mint and
//! burn touch a holder balance and the supply with the same ciphertext.

use tracing::{debug, info};
use veilswap_fhe::{CallContext, Coprocessor, ExternalCiphertext};
use veilswap_token::{ConfidentialToken, TokenError};

use crate::error::{PoolError, Result};
use crate::pool::SwapPool;

impl SwapPool {
    /// deposit `amount0` of token0 and `amount1` of token1, minting lp shares
    ///
    /// requires unexpired operator approvals on both ledgers; the first
    /// deposit needs no special case, the formula covers an empty pool
    pub fn add_liquidity(
        &mut self,
        ctx: &CallContext,
        fhe: &mut Coprocessor,
        amount0: &ExternalCiphertext,
        amount1: &ExternalCiphertext,
        token0: &mut ConfidentialToken,
        token1: &mut ConfidentialToken,
    ) -> Result<()> {
        self.check_ledgers(token0, token1)?;
        let amount0 = fhe.verify_input(amount0, self.address(), ctx.caller)?;
        let amount1 = fhe.verify_input(amount1, self.address(), ctx.caller)?;

        token0.ensure_operator(ctx.caller, self.address(), ctx.now)?;
        token1.ensure_operator(ctx.caller, self.address(), ctx.now)?;

        // both legs must be covered before either pull applies
        let map_balance = |e| match e {
            TokenError::InsufficientBalance => PoolError::InsufficientBalance,
            other => PoolError::Token(other),
        };
        token0
            .ensure_covers(fhe, ctx.caller, amount0)
            .map_err(map_balance)?;
        token1
            .ensure_covers(fhe, ctx.caller, amount1)
            .map_err(map_balance)?;

        let pool_ctx = CallContext::new(self.address(), ctx.now);
        token0.transfer_from(&pool_ctx, fhe, ctx.caller, self.address(), amount0)?;
        token1.transfer_from(&pool_ctx, fhe, ctx.caller, self.address(), amount1)?;

        let smaller = fhe.min(amount0, amount1)?;
        let liquidity = fhe.mul_scalar(smaller, 2)?;

        let lp_balance = match self.lp_balances.get(&ctx.caller) {
            Some(&handle) => handle,
            None => fhe.trivial_encrypt(0),
        };
        let new_lp_balance = fhe.add(lp_balance, liquidity)?;
        fhe.allow(new_lp_balance, ctx.caller);
        self.lp_balances.insert(ctx.caller, new_lp_balance);

        self.total_lp_supply = fhe.add(self.total_lp_supply, liquidity)?;
        self.reserve0 = fhe.add(self.reserve0, amount0)?;
        self.reserve1 = fhe.add(self.reserve1, amount1)?;
        self.grant_state_access(fhe);

        debug!(caller = %ctx.caller, "liquidity added");
        info!(pool = %self.address(), "lp shares minted");
        Ok(())
    }

    /// burn `liquidity` lp shares, paying out the caller-computed
    /// proportional amounts of each token
    ///
    /// each claim is bounded by `amount_out * total_supply <= liquidity *
    /// reserve`, the cross-multiplied form of the proportional payout, plus
    /// the per-side reserve bound
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity(
        &mut self,
        ctx: &CallContext,
        fhe: &mut Coprocessor,
        liquidity: &ExternalCiphertext,
        amount0_out: &ExternalCiphertext,
        amount1_out: &ExternalCiphertext,
        token0: &mut ConfidentialToken,
        token1: &mut ConfidentialToken,
    ) -> Result<()> {
        self.check_ledgers(token0, token1)?;
        let liquidity = fhe.verify_input(liquidity, self.address(), ctx.caller)?;
        let amount0_out = fhe.verify_input(amount0_out, self.address(), ctx.caller)?;
        let amount1_out = fhe.verify_input(amount1_out, self.address(), ctx.caller)?;

        let lp_balance = match self.lp_balances.get(&ctx.caller) {
            Some(&handle) => handle,
            None => fhe.trivial_encrypt(0),
        };
        let covered = fhe.le(liquidity, lp_balance)?;
        fhe.req(covered)
            .map_err(|_| PoolError::InsufficientBalance)?;

        // proportionality without division, per side
        let claimed0 = fhe.mul(amount0_out, self.total_lp_supply)?;
        let entitled0 = fhe.mul(liquidity, self.reserve0)?;
        let fair0 = fhe.le(claimed0, entitled0)?;
        fhe.req(fair0)
            .map_err(|_| PoolError::DisproportionateRedemption)?;
        let claimed1 = fhe.mul(amount1_out, self.total_lp_supply)?;
        let entitled1 = fhe.mul(liquidity, self.reserve1)?;
        let fair1 = fhe.le(claimed1, entitled1)?;
        fhe.req(fair1)
            .map_err(|_| PoolError::DisproportionateRedemption)?;

        let covers0 = fhe.le(amount0_out, self.reserve0)?;
        fhe.req(covers0)
            .map_err(|_| PoolError::InsufficientReserve)?;
        let covers1 = fhe.le(amount1_out, self.reserve1)?;
        fhe.req(covers1)
            .map_err(|_| PoolError::InsufficientReserve)?;

        // all checks passed; burn, shrink reserves, pay out
        let new_lp_balance = fhe.sub(lp_balance, liquidity)?;
        fhe.allow(new_lp_balance, ctx.caller);
        self.lp_balances.insert(ctx.caller, new_lp_balance);

        self.total_lp_supply = fhe.sub(self.total_lp_supply, liquidity)?;
        self.reserve0 = fhe.sub(self.reserve0, amount0_out)?;
        self.reserve1 = fhe.sub(self.reserve1, amount1_out)?;
        self.grant_state_access(fhe);

        let pool_ctx = CallContext::new(self.address(), ctx.now);
        token0.transfer(&pool_ctx, fhe, ctx.caller, amount0_out)?;
        token1.transfer(&pool_ctx, fhe, ctx.caller, amount1_out)?;

        debug!(caller = %ctx.caller, "liquidity removed");
        info!(pool = %self.address(), "lp shares burned");
        Ok(())
    }
}
