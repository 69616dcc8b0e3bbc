//! Shared deployment and unit helpers for the integration tests.

#![allow(dead_code)]

use odra::casper_types::bytesrepr::ToBytes;
use odra::casper_types::{PublicKey, U256, U512};
use odra::host::{Deployer, HostEnv, HostRef};
use odra::prelude::*;

use liquid_staking_casper::boost::{BoostEngine, BoostEngineHostRef, BoostEngineInitArgs};
use liquid_staking_casper::config::{
    ProtocolConfig, ProtocolConfigHostRef, ProtocolConfigInitArgs,
};
use liquid_staking_casper::receipt::{ReceiptToken, ReceiptTokenHostRef, ReceiptTokenInitArgs};
use liquid_staking_casper::registry::{
    UnbondingRegistry, UnbondingRegistryHostRef, UnbondingRegistryInitArgs,
};
use liquid_staking_casper::types::Role;
use liquid_staking_casper::vault::{LiquidVault, LiquidVaultHostRef, LiquidVaultInitArgs};

pub const MOTES_PER_CSPR: u64 = 1_000_000_000;
pub const ONE_DAY_MS: u64 = 86_400 * 1000;
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Fee on instant redemptions used by every deployment = 1%
pub const STAKING_FEE_BPS: u64 = 100;
pub const BOOST_MIN_RATE_BPS: u64 = 500;
pub const BOOST_MAX_RATE_BPS: u64 = 2_000;

pub fn cspr_to_motes(cspr: u64) -> U512 {
    U512::from(cspr) * U512::from(MOTES_PER_CSPR)
}

/// sCSPR units; 9 decimals like motes
pub fn receipts(amount: u64) -> U256 {
    U256::from(amount) * U256::from(MOTES_PER_CSPR)
}

pub fn public_key_to_hex(public_key: &PublicKey) -> String {
    let bytes = public_key.to_bytes().expect("public key to_bytes");
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Current block time in seconds
pub fn now_secs(env: &HostEnv) -> u64 {
    env.block_time() / 1000
}

pub struct Protocol {
    pub config: ProtocolConfigHostRef,
    pub receipt: ReceiptTokenHostRef,
    pub registry: UnbondingRegistryHostRef,
    pub boost: BoostEngineHostRef,
    pub vault: LiquidVaultHostRef,
}

/// Accounts: 0 admin, 1..=3 users, 4 keeper, 5 treasury
pub fn admin(env: &HostEnv) -> Address {
    env.get_account(0)
}

pub fn keeper(env: &HostEnv) -> Address {
    env.get_account(4)
}

pub fn treasury(env: &HostEnv) -> Address {
    env.get_account(5)
}

/// Deploy without a validator: delegation only moves accounting.
pub fn deploy_protocol(env: &HostEnv) -> Protocol {
    deploy_protocol_with(env, String::new(), 0)
}

/// Deploy the five contracts, hand control to the vault and grant the keeper role.
pub fn deploy_protocol_with(
    env: &HostEnv,
    validator_public_key: String,
    rewards_unlock_time: u64,
) -> Protocol {
    let admin = admin(env);
    env.set_caller(admin);

    let mut config = ProtocolConfig::deploy(
        env,
        ProtocolConfigInitArgs {
            treasury: treasury(env),
            staking_fee_bps: STAKING_FEE_BPS,
        },
    );
    let mut receipt = ReceiptToken::deploy(env, ReceiptTokenInitArgs { minter: admin });
    let mut registry = UnbondingRegistry::deploy(env, UnbondingRegistryInitArgs { vault: admin });
    let mut boost = BoostEngine::deploy(
        env,
        BoostEngineInitArgs {
            vault: admin,
            receipt: receipt.address(),
            min_rate_bps: BOOST_MIN_RATE_BPS,
            max_rate_bps: BOOST_MAX_RATE_BPS,
            target_utilization: receipts(1_000),
        },
    );

    let vault = LiquidVault::deploy(
        env,
        LiquidVaultInitArgs {
            config: config.address(),
            receipt: receipt.address(),
            registry: registry.address(),
            boost: boost.address(),
            validator_public_key,
            rewards_unlock_time,
        },
    );

    receipt.set_minter(vault.address());
    registry.set_vault(vault.address());
    boost.set_vault(vault.address());
    config.grant_role(Role::Keeper, keeper(env));

    Protocol {
        config,
        receipt,
        registry,
        boost,
        vault,
    }
}

/// Deposit `cspr` from `user` and return the receipts minted.
pub fn deposit(env: &HostEnv, protocol: &mut Protocol, user: Address, cspr: u64) -> U256 {
    env.set_caller(user);
    protocol.vault.with_tokens(cspr_to_motes(cspr)).deposit()
}

pub fn push_yield(env: &HostEnv, protocol: &mut Protocol, cspr: u64) {
    env.set_caller(keeper(env));
    protocol.vault.push_observed_yield(cspr_to_motes(cspr));
}
