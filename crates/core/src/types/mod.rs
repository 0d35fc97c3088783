//! Core types for Apola.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{
    DecimalDigits, Rupiah, decimal_digits, format_number_id, is_numeric, parse_decimal,
};
