//! swap executor
//!
//! consumes the caller's off-chain division result. the contract cannot
//! recompute the quotient on-chain (no encrypted division), so it bounds it
//! instead: the expected output may not exceed the opposite reserve, and must
//! clear the caller's own minimum. a caller understating the quotient only
//! hurts themselves; overstating it is capped by the reserve bound and by the
//! ledger's refusal to move more than the pool's encrypted balance.
//!
//! ordering discipline: proofs, operator gate and both encrypted
//! requirements run before the first transfer. after the input pull the only
//! remaining fallible step would be the output push, and that cannot fail:
//! the pool's ledger balance equals its reserves and the reserve bound was
//! already required.

use tracing::{debug, info};
use veilswap_fhe::{Address, CallContext, Coprocessor, ExternalCiphertext};
use veilswap_token::{ConfidentialToken, TokenError};

use crate::error::{PoolError, Result};
use crate::pool::{Side, SwapPool};

impl SwapPool {
    /// execute a swap of `amount_in` of `token_in` for the opposite token
    ///
    /// `expected_out` is the caller's re-encrypted off-chain quotient and is
    /// the exact amount transferred to `recipient` on success; `min_out` is
    /// the caller's slippage floor
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        ctx: &CallContext,
        fhe: &mut Coprocessor,
        amount_in: &ExternalCiphertext,
        expected_out: &ExternalCiphertext,
        min_out: &ExternalCiphertext,
        token_in: Address,
        recipient: Address,
        token0: &mut ConfidentialToken,
        token1: &mut ConfidentialToken,
    ) -> Result<()> {
        self.check_ledgers(token0, token1)?;
        let side = self.side_of(token_in)?;

        let amount_in = fhe.verify_input(amount_in, self.address(), ctx.caller)?;
        let expected_out = fhe.verify_input(expected_out, self.address(), ctx.caller)?;
        let min_out = fhe.verify_input(min_out, self.address(), ctx.caller)?;

        let (ledger_in, ledger_out) = match side {
            Side::ZeroIn => (token0, token1),
            Side::OneIn => (token1, token0),
        };

        // the pool pulls the input as an operator; gate before any effect
        ledger_in.ensure_operator(ctx.caller, self.address(), ctx.now)?;

        let (reserve_in, reserve_out) = self.oriented_reserves(side);

        let within_reserve = fhe.le(expected_out, reserve_out)?;
        fhe.req(within_reserve)
            .map_err(|_| PoolError::InsufficientReserve)?;

        let clears_minimum = fhe.ge(expected_out, min_out)?;
        fhe.req(clears_minimum)
            .map_err(|_| PoolError::SlippageExceeded)?;

        // all checks passed; effects from here on
        let pool_ctx = CallContext::new(self.address(), ctx.now);
        ledger_in
            .transfer_from(&pool_ctx, fhe, ctx.caller, self.address(), amount_in)
            .map_err(|e| match e {
                TokenError::InsufficientBalance => PoolError::InsufficientBalance,
                other => PoolError::Token(other),
            })?;
        ledger_out.transfer(&pool_ctx, fhe, recipient, expected_out)?;

        let new_reserve_in = fhe.add(reserve_in, amount_in)?;
        let new_reserve_out = fhe.sub(reserve_out, expected_out)?;
        self.set_oriented_reserves(side, new_reserve_in, new_reserve_out);
        self.grant_state_access(fhe);

        debug!(caller = %ctx.caller, %token_in, %recipient, "swap executed");
        info!(pool = %self.address(), "reserves updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bench {
        fhe: Coprocessor,
        token0: ConfidentialToken,
        token1: ConfidentialToken,
        pool: SwapPool,
        owner: Address,
        alice: Address,
    }

    const NOW: u64 = 1_000;
    const EXPIRY: u64 = 10_000;

    fn ctx(caller: Address) -> CallContext {
        CallContext::new(caller, NOW)
    }

    /// owner seeds the pool with (1000, 1000); alice holds 100 of token0
    /// and has approved the pool as operator
    fn bench() -> Bench {
        let mut fhe = Coprocessor::new();
        let owner = Address::derive("owner");
        let alice = Address::derive("alice");
        let mut token0 = ConfidentialToken::new(owner, "TokenA", "TKA");
        let mut token1 = ConfidentialToken::new(owner, "TokenB", "TKB");
        let mut pool = SwapPool::new(&mut fhe, owner, token0.address(), token1.address());

        let mint = |fhe: &mut Coprocessor, token: &mut ConfidentialToken, to, amount| {
            let inputs = fhe
                .create_encrypted_input(token.address(), owner)
                .add64(amount)
                .encrypt();
            token.mint(&ctx(owner), fhe, to, &inputs[0]).unwrap();
        };
        mint(&mut fhe, &mut token0, owner, 1000);
        mint(&mut fhe, &mut token1, owner, 1000);
        mint(&mut fhe, &mut token0, alice, 100);

        token0.set_operator(&ctx(owner), pool.address(), EXPIRY);
        token1.set_operator(&ctx(owner), pool.address(), EXPIRY);
        token0.set_operator(&ctx(alice), pool.address(), EXPIRY);

        let enc0 = fhe
            .create_encrypted_input(pool.address(), owner)
            .add64(1000)
            .encrypt();
        let enc1 = fhe
            .create_encrypted_input(pool.address(), owner)
            .add64(1000)
            .encrypt();
        pool.add_liquidity(&ctx(owner), &mut fhe, &enc0[0], &enc1[0], &mut token0, &mut token1)
            .unwrap();

        Bench {
            fhe,
            token0,
            token1,
            pool,
            owner,
            alice,
        }
    }

    fn encrypt3(
        fhe: &mut Coprocessor,
        pool: &SwapPool,
        sender: Address,
        amount_in: u64,
        expected_out: u64,
        min_out: u64,
    ) -> Vec<ExternalCiphertext> {
        fhe.create_encrypted_input(pool.address(), sender)
            .add64(amount_in)
            .add64(expected_out)
            .add64(min_out)
            .encrypt()
    }

    fn reserves(b: &Bench) -> (u64, u64) {
        (
            b.fhe
                .user_decrypt(b.pool.encrypted_reserve0(), b.owner)
                .unwrap(),
            b.fhe
                .user_decrypt(b.pool.encrypted_reserve1(), b.owner)
                .unwrap(),
        )
    }

    #[test]
    fn test_swap_updates_reserves_exactly() {
        let mut b = bench();
        // quote for 100 in on (1000, 1000) floor-divides to 90
        let enc = encrypt3(&mut b.fhe, &b.pool, b.alice, 100, 90, 89);
        b.pool
            .swap(
                &ctx(b.alice),
                &mut b.fhe,
                &enc[0],
                &enc[1],
                &enc[2],
                b.token0.address(),
                b.alice,
                &mut b.token0,
                &mut b.token1,
            )
            .unwrap();

        assert_eq!(reserves(&b), (1100, 910));
        // fee keeps the product growing
        assert!(1100u128 * 910 >= 1000u128 * 1000);
    }

    #[test]
    fn test_swap_slippage_reverts_without_effects() {
        let mut b = bench();
        // min above the honest quotient of 90
        let enc = encrypt3(&mut b.fhe, &b.pool, b.alice, 100, 90, 95);
        let result = b.pool.swap(
            &ctx(b.alice),
            &mut b.fhe,
            &enc[0],
            &enc[1],
            &enc[2],
            b.token0.address(),
            b.alice,
            &mut b.token0,
            &mut b.token1,
        );
        assert_eq!(result, Err(PoolError::SlippageExceeded));
        assert_eq!(reserves(&b), (1000, 1000));

        // alice's input balance is untouched
        let balance = b.token0.confidential_balance_of(b.alice).unwrap();
        b.token0
            .authorize_self(&ctx(b.alice), &mut b.fhe, balance)
            .unwrap();
        assert_eq!(b.fhe.user_decrypt(balance, b.alice).unwrap(), 100);
    }

    #[test]
    fn test_swap_cannot_drain_reserve() {
        let mut b = bench();
        let enc = encrypt3(&mut b.fhe, &b.pool, b.alice, 100, 1001, 0);
        let result = b.pool.swap(
            &ctx(b.alice),
            &mut b.fhe,
            &enc[0],
            &enc[1],
            &enc[2],
            b.token0.address(),
            b.alice,
            &mut b.token0,
            &mut b.token1,
        );
        assert_eq!(result, Err(PoolError::InsufficientReserve));
        assert_eq!(reserves(&b), (1000, 1000));
    }

    #[test]
    fn test_zero_amount_swap_is_value_neutral() {
        let mut b = bench();
        let enc = encrypt3(&mut b.fhe, &b.pool, b.alice, 0, 0, 0);
        b.pool
            .swap(
                &ctx(b.alice),
                &mut b.fhe,
                &enc[0],
                &enc[1],
                &enc[2],
                b.token0.address(),
                b.alice,
                &mut b.token0,
                &mut b.token1,
            )
            .unwrap();

        assert_eq!(reserves(&b), (1000, 1000));
        let balance = b.token1.confidential_balance_of(b.alice).unwrap();
        b.token1
            .authorize_self(&ctx(b.alice), &mut b.fhe, balance)
            .unwrap();
        assert_eq!(b.fhe.user_decrypt(balance, b.alice).unwrap(), 0);
    }

    #[test]
    fn test_swap_requires_operator_approval() {
        let mut b = bench();
        let bob = Address::derive("bob");
        let enc = encrypt3(&mut b.fhe, &b.pool, bob, 10, 5, 0);
        let result = b.pool.swap(
            &ctx(bob),
            &mut b.fhe,
            &enc[0],
            &enc[1],
            &enc[2],
            b.token0.address(),
            bob,
            &mut b.token0,
            &mut b.token1,
        );
        assert!(matches!(
            result,
            Err(PoolError::Token(TokenError::OperatorNotApproved { .. }))
        ));
    }

    #[test]
    fn test_swap_rejects_stranger_token() {
        let mut b = bench();
        let stranger = Address::derive("token-c");
        let enc = encrypt3(&mut b.fhe, &b.pool, b.alice, 10, 5, 0);
        let result = b.pool.swap(
            &ctx(b.alice),
            &mut b.fhe,
            &enc[0],
            &enc[1],
            &enc[2],
            stranger,
            b.alice,
            &mut b.token0,
            &mut b.token1,
        );
        assert_eq!(result, Err(PoolError::InvalidToken(stranger)));
    }
}
