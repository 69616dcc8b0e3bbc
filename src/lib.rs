//! Liquid staking on Casper (Odra)
//!
//! Users deposit CSPR and receive sCSPR, a receipt for a share of a pooled,
//! delegated position. Redemptions are either instant (discounted, paid from
//! the liquid buffer) or delayed through an unbonding position whose reward
//! portion vests linearly. sCSPR can also be staked into a Boost engine that
//! accrues points on a utilization-dependent curve.
//!
//! - ProtocolConfig: roles, pause flags, fee and treasury
//! - ReceiptToken: sCSPR, mint/burn restricted to the vault
//! - UnbondingRegistry: transferable delayed-redemption positions
//! - BoostEngine: accumulator-per-share points for staked sCSPR
//! - LiquidVault: exchange-rate accounting and orchestration

#![cfg_attr(target_arch = "wasm32", no_std)]

extern crate alloc;

pub mod auth;
pub mod boost;
pub mod config;
pub mod guard;
pub mod interfaces;
pub mod math;
pub mod receipt;
pub mod registry;
pub mod types;
pub mod vault;
