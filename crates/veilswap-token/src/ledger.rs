//! the encrypted balance ledger

use std::collections::HashMap;

use tracing::debug;
use veilswap_fhe::{Address, CallContext, Coprocessor, ExternalCiphertext, Handle};

use crate::error::{Result, TokenError};

/// a confidential fungible token
///
/// balances and transfer amounts are ciphertext handles end to end; the only
/// plaintext state is the operator approval table, whose expiries are public
/// by design (they gate who may move tokens, not how many)
#[derive(Clone, Debug)]
pub struct ConfidentialToken {
    address: Address,
    owner: Address,
    name: String,
    symbol: String,
    balances: HashMap<Address, Handle>,
    /// (holder, operator) -> approval expiry (unix seconds)
    operators: HashMap<(Address, Address), u64>,
}

impl ConfidentialToken {
    pub fn new(owner: Address, name: &str, symbol: &str) -> Self {
        Self {
            address: Address::derive(&format!("veilswap.token.{symbol}")),
            owner,
            name: name.to_string(),
            symbol: symbol.to_string(),
            balances: HashMap::new(),
            operators: HashMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// current balance handle for an account, if it ever held tokens
    pub fn confidential_balance_of(&self, account: Address) -> Option<Handle> {
        self.balances.get(&account).copied()
    }

    /// balance handle for an account, minting an encrypted zero if absent
    fn balance_or_zero(&mut self, fhe: &mut Coprocessor, account: Address) -> Handle {
        *self
            .balances
            .entry(account)
            .or_insert_with(|| fhe.trivial_encrypt(0))
    }

    /// grant the caller decrypt access to their own balance handle
    pub fn authorize_self(
        &self,
        ctx: &CallContext,
        fhe: &mut Coprocessor,
        handle: Handle,
    ) -> Result<()> {
        if self.confidential_balance_of(ctx.caller) != Some(handle) {
            return Err(TokenError::NotHolder);
        }
        fhe.allow(handle, ctx.caller);
        Ok(())
    }

    /// owner-only mint of an encrypted amount to `to`
    pub fn mint(
        &mut self,
        ctx: &CallContext,
        fhe: &mut Coprocessor,
        to: Address,
        amount: &ExternalCiphertext,
    ) -> Result<()> {
        if ctx.caller != self.owner {
            return Err(TokenError::NotOwner);
        }
        let amount = fhe.verify_input(amount, self.address, ctx.caller)?;
        self.credit(fhe, to, amount)?;
        debug!(token = %self.symbol, %to, "minted encrypted amount");
        Ok(())
    }

    /// approve `operator` to pull the caller's tokens until `expiry`
    pub fn set_operator(&mut self, ctx: &CallContext, operator: Address, expiry: u64) {
        debug!(token = %self.symbol, holder = %ctx.caller, %operator, expiry, "operator set");
        self.operators.insert((ctx.caller, operator), expiry);
    }

    /// check that `operator` holds an unexpired approval from `holder`
    pub fn ensure_operator(&self, holder: Address, operator: Address, now: u64) -> Result<()> {
        let expiry = self
            .operators
            .get(&(holder, operator))
            .copied()
            .ok_or(TokenError::OperatorNotApproved { holder, operator })?;
        if now >= expiry {
            return Err(TokenError::OperatorExpired { expiry, now });
        }
        Ok(())
    }

    /// move the caller's own tokens to `to`
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        fhe: &mut Coprocessor,
        to: Address,
        amount: Handle,
    ) -> Result<()> {
        self.execute_transfer(fhe, ctx.caller, to, amount)
    }

    /// operator pull: the caller moves `from`'s tokens under an approval
    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        fhe: &mut Coprocessor,
        from: Address,
        to: Address,
        amount: Handle,
    ) -> Result<()> {
        if ctx.caller != from {
            self.ensure_operator(from, ctx.caller, ctx.now)?;
        }
        self.execute_transfer(fhe, from, to, amount)
    }

    /// encrypted requirement that `account`'s balance covers `amount`
    ///
    /// callers that chain several pulls in one logical transaction run this
    /// for every leg up front, so no pull can fail after the first applied
    pub fn ensure_covers(
        &mut self,
        fhe: &mut Coprocessor,
        account: Address,
        amount: Handle,
    ) -> Result<()> {
        let balance = self.balance_or_zero(fhe, account);
        let covered = fhe.le(amount, balance)?;
        fhe.req(covered)
            .map_err(|_| TokenError::InsufficientBalance)
    }

    /// debit `from`, credit `to`; the debit requirement runs before any
    /// balance is touched, so a failed transfer changes nothing
    fn execute_transfer(
        &mut self,
        fhe: &mut Coprocessor,
        from: Address,
        to: Address,
        amount: Handle,
    ) -> Result<()> {
        self.ensure_covers(fhe, from, amount)?;
        let from_balance = self.balance_or_zero(fhe, from);

        // self-transfer is a no-op once the requirement holds
        if from == to {
            return Ok(());
        }

        let new_from = fhe.sub(from_balance, amount)?;
        let to_balance = self.balance_or_zero(fhe, to);
        let new_to = fhe.add(to_balance, amount)?;
        self.balances.insert(from, new_from);
        self.balances.insert(to, new_to);
        debug!(token = %self.symbol, %from, %to, "encrypted transfer");
        Ok(())
    }

    fn credit(&mut self, fhe: &mut Coprocessor, account: Address, amount: Handle) -> Result<()> {
        let balance = self.balance_or_zero(fhe, account);
        let new_balance = fhe.add(balance, amount)?;
        self.balances.insert(account, new_balance);
        Ok(())
    }
}
