//! Shared building blocks for the farm, referral and timelock contracts.
//!
//! This crate provides:
//! - [`math`]: checked fixed-point helpers for reward-per-share accounting.
//! - [`access`]: the single capability check every privileged entry point
//!   runs before touching state.
//! - [`ttl`]: storage TTL extension constants and helpers.
//! - [`referral`]: the cross-contract interface the farm uses to reach the
//!   referral ledger.
//!
//! # Error code ranges
//! Each contract declares its own `ContractError` but keeps to these ranges:
//!
//! | Range   | Purpose                          |
//! |---------|----------------------------------|
//! | 1 – 9   | Lifecycle / initialisation       |
//! | 10 – 19 | Authentication & authorisation   |
//! | 30 – 39 | Validation / input               |
//! | 40 – 49 | Contract state / balances        |
//! | 50 – 59 | Temporal windows and saturation  |
//! | 60+     | Internal (reentrancy, overflow)  |

#![no_std]

pub mod access;
pub mod math;
pub mod referral;
pub mod ttl;

pub use access::Capability;
pub use math::{BPS_DENOMINATOR, PRECISION};
