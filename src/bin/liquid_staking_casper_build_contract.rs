//! Build contract binary for Odra WASM generation
//!
//! Compiled to WASM; carries the entry points of every protocol contract.

#![cfg_attr(target_arch = "wasm32", no_std)]
#![cfg_attr(target_arch = "wasm32", no_main)]

#[cfg(target_arch = "wasm32")]
extern crate odra_casper_wasm_env;

#[cfg(target_arch = "wasm32")]
use liquid_staking_casper::boost::BoostEngine;
#[cfg(target_arch = "wasm32")]
use liquid_staking_casper::config::ProtocolConfig;
#[cfg(target_arch = "wasm32")]
use liquid_staking_casper::receipt::ReceiptToken;
#[cfg(target_arch = "wasm32")]
use liquid_staking_casper::registry::UnbondingRegistry;
#[cfg(target_arch = "wasm32")]
use liquid_staking_casper::vault::LiquidVault;
#[cfg(target_arch = "wasm32")]
use odra_casper_wasm_env as _;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    panic!("liquid_staking_casper_build_contract is intended to be built for wasm32-unknown-unknown only");
}
