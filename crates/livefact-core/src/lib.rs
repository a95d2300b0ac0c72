//! # livefact-core
//!
//! Foundation types, errors, branded IDs, and logging for the LiveFact client.
//!
//! This crate provides the shared vocabulary the other LiveFact crates depend on:
//!
//! - **Fact-check results**: [`fact::FactCheckResult`], [`fact::Citation`], [`fact::FactStatus`]
//! - **Branded IDs**: [`ids::SessionId`] for log correlation
//! - **Errors**: [`errors::LiveFactError`] and the per-layer enums it wraps
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other livefact crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod fact;
pub mod ids;
pub mod logging;
