//! Apola Storefront library.
//!
//! The public shop site as a library, so the router can be tested without a
//! running server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod routes;
pub mod state;
