//! Apola Core - Shared types library.
//!
//! This crate provides common types used across all Apola components:
//! - `storefront` - Public-facing shop site
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no database access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and rupiah amounts
//! - [`validation`] - Declarative form validation rules
//! - [`storage`] - Paths and URLs for uploaded files
//! - [`text`] - Truncation helpers for listings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod storage;
pub mod text;
pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{ExistsCheck, FormInput, Lookup, Rule, Ruleset, Validation, ValidationErrors};
