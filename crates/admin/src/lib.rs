//! Apola admin library.
//!
//! This crate provides the admin panel as a library, allowing it to be
//! tested and reused by the CLI.
//!
//! # Security
//!
//! The panel has no login of its own. Only expose it on a private network.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
