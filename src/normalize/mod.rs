//! Token amount normalization
//!
//! On-chain balances are integers in a token's smallest unit. Everything
//! downstream works in human units, so every raw value passes through here
//! on its way in, and every submitted amount passes back out through
//! [`to_raw`]. Arithmetic is decimal throughout; binary floating point never
//! touches an 18-decimal amount.

mod amount;

pub use amount::{
    parse_raw, serialize_raw, shift, shift_raw, to_decimal, to_raw, Decimals, MAX_DECIMALS,
};
