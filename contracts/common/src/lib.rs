//! Shared utilities for the incentives contract suite.
//!
//! This crate provides:
//! - [`ownable`] — single-owner storage and guard helpers.
//! - [`versioning`] — the initialized-version slot backing the
//!   stub → active upgrade state machine.
//!
//! Helpers operate directly on `Env` and report failures as plain values;
//! each contract maps them onto its own `#[contracterror]` enum.

#![no_std]

pub mod ownable;
pub mod versioning;

pub use ownable::*;
pub use versioning::*;
