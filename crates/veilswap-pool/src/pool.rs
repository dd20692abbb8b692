//! encrypted pool state
//!
//! reserves, lp balances and total lp supply are ciphertext handles; the only
//! plaintext state is the token pair and the owner identity. reserves are
//! mutated exclusively by the swap executor and the liquidity manager, and
//! the pool's ledger balances always equal its reserves (every reserve delta
//! is paired with the matching token transfer in the same call).

use std::collections::HashMap;

use veilswap_fhe::{Address, Coprocessor, Handle};
use veilswap_token::ConfidentialToken;

use crate::error::{PoolError, Result};
use crate::quote::Quote;

/// which pool token a swap feeds in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    ZeroIn,
    OneIn,
}

/// a confidential two-asset constant-product pool
#[derive(Clone, Debug)]
pub struct SwapPool {
    address: Address,
    owner: Address,
    token0: Address,
    token1: Address,
    pub(crate) reserve0: Handle,
    pub(crate) reserve1: Handle,
    pub(crate) total_lp_supply: Handle,
    pub(crate) lp_balances: HashMap<Address, Handle>,
    pub(crate) quotes: HashMap<Address, Quote>,
}

impl SwapPool {
    /// create an empty pool for (token0, token1), owned by `owner`
    pub fn new(fhe: &mut Coprocessor, owner: Address, token0: Address, token1: Address) -> Self {
        let address = Address::derive(&format!("veilswap.pool.{token0}.{token1}"));
        let pool = Self {
            address,
            owner,
            token0,
            token1,
            reserve0: fhe.trivial_encrypt(0),
            reserve1: fhe.trivial_encrypt(0),
            total_lp_supply: fhe.trivial_encrypt(0),
            lp_balances: HashMap::new(),
            quotes: HashMap::new(),
        };
        pool.grant_state_access(fhe);
        pool
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn token0(&self) -> Address {
        self.token0
    }

    pub fn token1(&self) -> Address {
        self.token1
    }

    pub fn encrypted_reserve0(&self) -> Handle {
        self.reserve0
    }

    pub fn encrypted_reserve1(&self) -> Handle {
        self.reserve1
    }

    pub fn encrypted_total_supply(&self) -> Handle {
        self.total_lp_supply
    }

    /// lp share handle for an account; accounts that never provided
    /// liquidity read as an encrypted zero, minted and granted on first use
    pub fn encrypted_lp_balance(&mut self, fhe: &mut Coprocessor, account: Address) -> Handle {
        match self.lp_balances.get(&account) {
            Some(&handle) => handle,
            None => {
                let zero = fhe.trivial_encrypt(0);
                fhe.allow(zero, account);
                self.lp_balances.insert(account, zero);
                zero
            }
        }
    }

    /// classify an input token address, rejecting strangers
    pub(crate) fn side_of(&self, token_in: Address) -> Result<Side> {
        if token_in == self.token0 {
            Ok(Side::ZeroIn)
        } else if token_in == self.token1 {
            Ok(Side::OneIn)
        } else {
            Err(PoolError::InvalidToken(token_in))
        }
    }

    /// (reserve_in, reserve_out) for the given side
    pub(crate) fn oriented_reserves(&self, side: Side) -> (Handle, Handle) {
        match side {
            Side::ZeroIn => (self.reserve0, self.reserve1),
            Side::OneIn => (self.reserve1, self.reserve0),
        }
    }

    pub(crate) fn set_oriented_reserves(&mut self, side: Side, reserve_in: Handle, reserve_out: Handle) {
        match side {
            Side::ZeroIn => {
                self.reserve0 = reserve_in;
                self.reserve1 = reserve_out;
            }
            Side::OneIn => {
                self.reserve1 = reserve_in;
                self.reserve0 = reserve_out;
            }
        }
    }

    /// the pool owner may decrypt reserves and total supply
    pub(crate) fn grant_state_access(&self, fhe: &mut Coprocessor) {
        fhe.allow(self.reserve0, self.owner);
        fhe.allow(self.reserve1, self.owner);
        fhe.allow(self.total_lp_supply, self.owner);
    }

    /// the ledgers handed to a call must be the pool's own pair, in order
    pub(crate) fn check_ledgers(
        &self,
        token0: &ConfidentialToken,
        token1: &ConfidentialToken,
    ) -> Result<()> {
        if token0.address() != self.token0 {
            return Err(PoolError::LedgerMismatch {
                expected: self.token0,
                got: token0.address(),
            });
        }
        if token1.address() != self.token1 {
            return Err(PoolError::LedgerMismatch {
                expected: self.token1,
                got: token1.address(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool_has_zero_reserves() {
        let mut fhe = Coprocessor::new();
        let owner = Address::derive("owner");
        let t0 = Address::derive("token-a");
        let t1 = Address::derive("token-b");
        let pool = SwapPool::new(&mut fhe, owner, t0, t1);

        assert_eq!(pool.token0(), t0);
        assert_eq!(pool.token1(), t1);
        assert_eq!(pool.owner(), owner);
        assert_eq!(fhe.user_decrypt(pool.encrypted_reserve0(), owner).unwrap(), 0);
        assert_eq!(fhe.user_decrypt(pool.encrypted_reserve1(), owner).unwrap(), 0);
        assert_eq!(
            fhe.user_decrypt(pool.encrypted_total_supply(), owner).unwrap(),
            0
        );
    }

    #[test]
    fn test_lp_balance_of_unknown_account_reads_zero() {
        let mut fhe = Coprocessor::new();
        let owner = Address::derive("owner");
        let alice = Address::derive("alice");
        let mut pool = SwapPool::new(
            &mut fhe,
            owner,
            Address::derive("token-a"),
            Address::derive("token-b"),
        );

        let handle = pool.encrypted_lp_balance(&mut fhe, alice);
        assert_eq!(fhe.user_decrypt(handle, alice).unwrap(), 0);
        // the handle is stable across reads
        assert_eq!(pool.encrypted_lp_balance(&mut fhe, alice), handle);
    }

    #[test]
    fn test_side_of_rejects_stranger_token() {
        let mut fhe = Coprocessor::new();
        let owner = Address::derive("owner");
        let t0 = Address::derive("token-a");
        let t1 = Address::derive("token-b");
        let pool = SwapPool::new(&mut fhe, owner, t0, t1);

        assert_eq!(pool.side_of(t0).unwrap(), Side::ZeroIn);
        assert_eq!(pool.side_of(t1).unwrap(), Side::OneIn);
        let stranger = Address::derive("token-c");
        assert_eq!(
            pool.side_of(stranger),
            Err(PoolError::InvalidToken(stranger))
        );
    }
}
