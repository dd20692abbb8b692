//! confidential constant-product amm
//!
//! a two-asset pool whose reserves, trade amounts and lp shares only ever
//! exist as euint64 ciphertext handles. the engine achieves uniswap-v2
//! semantics with the restricted fhe op set - in particular with no
//! encrypted division:
//!
//! ```text
//! caller                          pool (on-chain)
//!   │                                │
//!   │ get_amount_out(enc amountIn)   │
//!   ├───────────────────────────────►│  numerator   = in*997 * reserveOut
//!   │                                │  denominator = reserveIn*1000 + in*997
//!   │ read scratch handles           │  (stored per caller, acl-granted)
//!   │◄───────────────────────────────┤
//!   │ user_decrypt both, divide      │
//!   │ off-chain, re-encrypt quotient │
//!   │                                │
//!   │ swap(in, expectedOut, minOut)  │
//!   ├───────────────────────────────►│  req(expectedOut <= reserveOut)
//!   │                                │  req(expectedOut >= minOut)
//!   │                                │  pull in, push out, update reserves
//! ```
//!
//! the division step is a deliberate trust boundary: the contract bounds the
//! caller's quotient homomorphically instead of recomputing it. see the swap
//! module for the exact checks.
//!
//! every entry point is checks-before-effects: all proof verifications,
//! operator gates and encrypted requirements run before the first state
//! mutation, so a failed call leaves pool and ledgers untouched.

pub mod error;
pub mod liquidity;
pub mod pool;
pub mod quote;
pub mod swap;

pub use error::{PoolError, Result};
pub use pool::SwapPool;
pub use quote::Quote;

/// swap fee numerator: a 0.3% fee keeps 997/1000 of the input working
pub const FEE_NUMERATOR: u64 = 997;
/// swap fee denominator
pub const FEE_DENOMINATOR: u64 = 1000;
