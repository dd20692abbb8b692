//! shared multi-party test fixture: coprocessor, two token ledgers, pool
#![allow(dead_code)]

use std::sync::Once;

use veilswap_fhe::{Address, CallContext, Coprocessor};
use veilswap_pool::SwapPool;
use veilswap_token::ConfidentialToken;

pub const NOW: u64 = 1_700_000_000;
pub const OPERATOR_EXPIRY: u64 = NOW + 3_600;

pub struct World {
    pub fhe: Coprocessor,
    pub token0: ConfidentialToken,
    pub token1: ConfidentialToken,
    pub pool: SwapPool,
    pub owner: Address,
    pub alice: Address,
    pub bob: Address,
}

pub fn ctx(caller: Address) -> CallContext {
    CallContext::new(caller, NOW)
}

static TRACING: Once = Once::new();

/// RUST_LOG=debug shows the encrypted call trace when a test fails
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

impl World {
    pub fn new() -> Self {
        init_tracing();
        let mut fhe = Coprocessor::new();
        let owner = Address::derive("deployer");
        let alice = Address::derive("alice");
        let bob = Address::derive("bob");
        let token0 = ConfidentialToken::new(owner, "TokenA", "TKA");
        let token1 = ConfidentialToken::new(owner, "TokenB", "TKB");
        let pool = SwapPool::new(&mut fhe, owner, token0.address(), token1.address());
        Self {
            fhe,
            token0,
            token1,
            pool,
            owner,
            alice,
            bob,
        }
    }

    /// owner mints `amount` of both tokens to `who`
    pub fn mint_both(&mut self, who: Address, amount: u64) {
        for token in [&mut self.token0, &mut self.token1] {
            let inputs = self
                .fhe
                .create_encrypted_input(token.address(), self.owner)
                .add64(amount)
                .encrypt();
            token
                .mint(&ctx(self.owner), &mut self.fhe, who, &inputs[0])
                .unwrap();
        }
    }

    /// owner mints `amount` of token0 only
    pub fn mint0(&mut self, who: Address, amount: u64) {
        let inputs = self
            .fhe
            .create_encrypted_input(self.token0.address(), self.owner)
            .add64(amount)
            .encrypt();
        self.token0
            .mint(&ctx(self.owner), &mut self.fhe, who, &inputs[0])
            .unwrap();
    }

    /// `who` approves the pool as operator on both ledgers
    pub fn approve_pool(&mut self, who: Address) {
        self.token0
            .set_operator(&ctx(who), self.pool.address(), OPERATOR_EXPIRY);
        self.token1
            .set_operator(&ctx(who), self.pool.address(), OPERATOR_EXPIRY);
    }

    /// `who` deposits (amount0, amount1); assumes funding and approval
    pub fn add_liquidity(&mut self, who: Address, amount0: u64, amount1: u64) {
        let inputs = self
            .fhe
            .create_encrypted_input(self.pool.address(), who)
            .add64(amount0)
            .add64(amount1)
            .encrypt();
        self.pool
            .add_liquidity(
                &ctx(who),
                &mut self.fhe,
                &inputs[0],
                &inputs[1],
                &mut self.token0,
                &mut self.token1,
            )
            .unwrap();
    }

    /// seed the pool: fund the owner, approve, deposit (r0, r1)
    pub fn seed(&mut self, r0: u64, r1: u64) {
        self.mint_both(self.owner, r0.max(r1));
        self.approve_pool(self.owner);
        self.add_liquidity(self.owner, r0, r1);
    }

    pub fn reserves(&self) -> (u64, u64) {
        (
            self.fhe
                .user_decrypt(self.pool.encrypted_reserve0(), self.owner)
                .unwrap(),
            self.fhe
                .user_decrypt(self.pool.encrypted_reserve1(), self.owner)
                .unwrap(),
        )
    }

    pub fn total_supply(&self) -> u64 {
        self.fhe
            .user_decrypt(self.pool.encrypted_total_supply(), self.owner)
            .unwrap()
    }

    /// `who` burns `liquidity` shares, claiming (amount0, amount1)
    pub fn remove_liquidity(&mut self, who: Address, liquidity: u64, amount0: u64, amount1: u64) {
        let inputs = self
            .fhe
            .create_encrypted_input(self.pool.address(), who)
            .add64(liquidity)
            .add64(amount0)
            .add64(amount1)
            .encrypt();
        self.pool
            .remove_liquidity(
                &ctx(who),
                &mut self.fhe,
                &inputs[0],
                &inputs[1],
                &inputs[2],
                &mut self.token0,
                &mut self.token1,
            )
            .unwrap();
    }

    pub fn lp_of(&mut self, who: Address) -> u64 {
        let handle = self.pool.encrypted_lp_balance(&mut self.fhe, who);
        self.fhe.user_decrypt(handle, who).unwrap()
    }

    /// decrypt `who`'s token0 balance, authorizing first like a real holder
    pub fn balance0(&mut self, who: Address) -> u64 {
        let handle = match self.token0.confidential_balance_of(who) {
            Some(h) => h,
            None => return 0,
        };
        self.token0
            .authorize_self(&ctx(who), &mut self.fhe, handle)
            .unwrap();
        self.fhe.user_decrypt(handle, who).unwrap()
    }

    pub fn balance1(&mut self, who: Address) -> u64 {
        let handle = match self.token1.confidential_balance_of(who) {
            Some(h) => h,
            None => return 0,
        };
        self.token1
            .authorize_self(&ctx(who), &mut self.fhe, handle)
            .unwrap();
        self.fhe.user_decrypt(handle, who).unwrap()
    }
}
