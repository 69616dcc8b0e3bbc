//! Reentrancy Tests
//!
//! The vault is wired to a Boost stand-in that calls back into the vault
//! while the vault is in the middle of an entry point.

mod common;

use odra::casper_types::{U256, U512};
use odra::host::{Deployer, HostEnv, HostRef, NoArgs};
use odra::prelude::*;
use odra::ContractRef;

use common::*;
use liquid_staking_casper::config::{ProtocolConfig, ProtocolConfigInitArgs};
use liquid_staking_casper::guard::GuardError;
use liquid_staking_casper::receipt::{ReceiptToken, ReceiptTokenInitArgs};
use liquid_staking_casper::registry::{UnbondingRegistry, UnbondingRegistryInitArgs};
use liquid_staking_casper::vault::{
    LiquidVault, LiquidVaultContractRef, LiquidVaultHostRef, LiquidVaultInitArgs,
};

/// Boost pool that re-enters the vault from its vault-only hooks.
#[odra::module]
pub struct ReenteringBoost {
    vault: Var<Address>,
}

#[odra::module]
impl ReenteringBoost {
    pub fn set_target(&mut self, vault: Address) {
        self.vault.set(vault);
    }

    /// Called by `stake_receipts`; tries to claim points in the same call.
    pub fn stake_for(&mut self, account: Address, amount: U256) {
        self.target().claim_points();
    }

    /// Called by `claim_points`; tries to unstake in the same call.
    pub fn claim_for(&mut self, account: Address) -> U256 {
        self.target().unstake_receipts(U256::one());
        U256::zero()
    }

    pub fn staked_of(&self, account: Address) -> U256 {
        U256::zero()
    }
}

impl ReenteringBoost {
    fn target(&self) -> LiquidVaultContractRef {
        let vault = self.vault.get().expect("vault target set");
        LiquidVaultContractRef::new(self.env().clone(), vault)
    }
}

fn deploy_with_reentering_boost(env: &HostEnv) -> LiquidVaultHostRef {
    let admin = admin(env);
    env.set_caller(admin);

    let config = ProtocolConfig::deploy(
        env,
        ProtocolConfigInitArgs {
            treasury: treasury(env),
            staking_fee_bps: STAKING_FEE_BPS,
        },
    );
    let mut receipt = ReceiptToken::deploy(env, ReceiptTokenInitArgs { minter: admin });
    let mut registry = UnbondingRegistry::deploy(env, UnbondingRegistryInitArgs { vault: admin });
    let mut boost = ReenteringBoost::deploy(env, NoArgs);

    let vault = LiquidVault::deploy(
        env,
        LiquidVaultInitArgs {
            config: config.address(),
            receipt: receipt.address(),
            registry: registry.address(),
            boost: boost.address(),
            validator_public_key: String::new(),
            rewards_unlock_time: 0,
        },
    );

    receipt.set_minter(vault.address());
    registry.set_vault(vault.address());
    boost.set_target(vault.address());
    vault
}

#[test]
fn test_reentry_from_stake_hook_reverts() {
    let env = odra_test::env();
    let mut vault = deploy_with_reentering_boost(&env);
    let user = env.get_account(1);

    env.set_caller(user);
    vault.with_tokens(cspr_to_motes(100)).deposit();

    let result = vault.try_stake_receipts(receipts(10));
    assert_eq!(result, Err(GuardError::ReentrantCall.into()));
}

#[test]
fn test_reentry_from_claim_hook_reverts() {
    let env = odra_test::env();
    let mut vault = deploy_with_reentering_boost(&env);

    env.set_caller(env.get_account(1));
    let result = vault.try_claim_points();
    assert_eq!(result, Err(GuardError::ReentrantCall.into()));
}

#[test]
fn test_failed_reentry_leaves_lock_released() {
    let env = odra_test::env();
    let mut vault = deploy_with_reentering_boost(&env);
    let user = env.get_account(1);

    env.set_caller(user);
    vault.with_tokens(cspr_to_motes(100)).deposit();
    assert!(vault.try_stake_receipts(receipts(10)).is_err());

    // the reverted call rolled the lock back with it
    vault.with_tokens(cspr_to_motes(50)).deposit();
    vault.request_redemption(receipts(150));
    assert_eq!(vault.liquidity().unbonding, cspr_to_motes(150));
    assert_eq!(vault.total_pooled(), U512::zero());
}
