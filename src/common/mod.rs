//! Common types and utilities shared across the crate

pub mod errors;
pub mod rounding;
pub mod traits;
pub mod types;
