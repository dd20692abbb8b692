//! off-chain side of the veilswap round trip
//!
//! the on-chain engine cannot divide ciphertexts, so a swap spans several
//! transactions with off-chain work in between:
//!
//! 1. encrypt the input amount for the pool and submit `get_amount_out`
//! 2. read the scratch numerator/denominator handles
//! 3. `user_decrypt` both (the acl grants exactly the quoting caller),
//!    floor-divide in plaintext
//! 4. re-encrypt the quotient and a slippage floor, submit `swap`
//!
//! reserves may move between step 1 and step 4 - that window is the reason
//! `min_out` exists, and this crate computes it from a tolerance in basis
//! points the way a router front-end would.

use tracing::debug;
use veilswap_fhe::{Address, CallContext, Coprocessor, ExternalCiphertext};
use veilswap_pool::SwapPool;
use veilswap_token::ConfidentialToken;

pub mod error;

pub use error::{ClientError, Result};

/// encrypt a single amount for `contract`, proof-bound to `sender`
pub fn encrypt_amount(
    fhe: &mut Coprocessor,
    contract: Address,
    sender: Address,
    value: u64,
) -> ExternalCiphertext {
    fhe.create_encrypted_input(contract, sender)
        .add64(value)
        .encrypt()[0]
}

/// decrypt the caller's quote scratch and floor-divide
///
/// the plaintext division the coprocessor cannot do homomorphically
pub fn resolve_quote(fhe: &Coprocessor, pool: &SwapPool, caller: Address) -> Result<u64> {
    let numerator = fhe.user_decrypt(pool.encrypted_numerator(caller)?, caller)?;
    let denominator = fhe.user_decrypt(pool.encrypted_denominator(caller)?, caller)?;
    if denominator == 0 {
        return Err(ClientError::EmptyPool);
    }
    let expected = numerator / denominator;
    debug!(%caller, numerator, denominator, expected, "quote resolved off-chain");
    Ok(expected)
}

/// slippage floor: `expected` reduced by `tolerance_bps` basis points
pub fn min_out_with_slippage(expected: u64, tolerance_bps: u64) -> u64 {
    // u128 keeps the intermediate product exact for any u64 expected
    let kept = 10_000u128.saturating_sub(tolerance_bps as u128);
    ((expected as u128 * kept) / 10_000) as u64
}

/// per-side redemption payout for burning `shares`:
/// `floor(shares * reserve / total_supply)`
///
/// the plaintext division the pool bounds by cross-multiplication on-chain
pub fn proportional_share(shares: u64, reserve: u64, total_supply: u64) -> u64 {
    if total_supply == 0 {
        return 0;
    }
    ((shares as u128 * reserve as u128) / total_supply as u128) as u64
}

/// the full quote -> decrypt -> divide -> re-encrypt -> swap round trip
///
/// returns the expected output amount the swap transferred. each step is its
/// own logical transaction, which is why the quote must not be reused across
/// interleaved calls by the same caller.
#[allow(clippy::too_many_arguments)]
pub fn swap_exact_in(
    fhe: &mut Coprocessor,
    pool: &mut SwapPool,
    token0: &mut ConfidentialToken,
    token1: &mut ConfidentialToken,
    caller: Address,
    now: u64,
    amount_in: u64,
    token_in: Address,
    recipient: Address,
    tolerance_bps: u64,
) -> Result<u64> {
    let ctx = CallContext::new(caller, now);

    // tx 1: on-chain homomorphic quote
    let enc_amount_in = encrypt_amount(fhe, pool.address(), caller, amount_in);
    pool.get_amount_out(&ctx, fhe, &enc_amount_in, token_in)?;

    // off-chain: decrypt, divide, pick a floor
    let expected_out = resolve_quote(fhe, pool, caller)?;
    let min_out = min_out_with_slippage(expected_out, tolerance_bps);

    // tx 2: re-encrypt and execute
    let enc_expected = encrypt_amount(fhe, pool.address(), caller, expected_out);
    let enc_min = encrypt_amount(fhe, pool.address(), caller, min_out);
    pool.swap(
        &ctx,
        fhe,
        &enc_amount_in,
        &enc_expected,
        &enc_min,
        token_in,
        recipient,
        token0,
        token1,
    )?;
    Ok(expected_out)
}
