//! Capability interfaces between the protocol contracts.
//!
//! Each contract only holds a reference typed by the narrow trait it needs:
//! the vault mints and burns through `ReceiptLedger`, the Boost engine moves
//! custody through `ReceiptCustody`, and so on. The traits mirror entry
//! points of the concrete modules in this crate.

use odra::casper_types::{U256, U512};
use odra::prelude::*;

use crate::types::{Feature, Role, Settlement, StakeInfo, UnbondingPosition};

/// Mint/burn surface of sCSPR. Authority is restricted to the vault.
#[odra::external_contract]
pub trait ReceiptLedger {
    fn mint(&mut self, to: Address, amount: U256);
    fn burn(&mut self, from: Address, amount: U256);
    fn total_supply(&self) -> U256;
}

/// Plain CEP-18 transfers, used by the Boost engine to hold staked sCSPR.
#[odra::external_contract]
pub trait ReceiptCustody {
    fn transfer(&mut self, recipient: Address, amount: U256);
    fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256);
    fn balance_of(&self, owner: Address) -> U256;
}

/// Roles, pause flags, fee and treasury.
#[odra::external_contract]
pub trait PermissionOracle {
    fn has_role(&self, role: Role, account: Address) -> bool;
    fn is_paused(&self, feature: Feature) -> bool;
    fn staking_fee_bps(&self) -> u64;
    fn treasury_address(&self) -> Option<Address>;
}

/// Lifecycle of delayed-redemption positions, driven by the vault.
#[odra::external_contract]
pub trait PositionRegistry {
    fn create_position(
        &mut self,
        owner: Address,
        principal: U512,
        reward: U512,
        vesting_start: u64,
        finalized: bool,
    ) -> u64;
    fn settle_principal(&mut self, id: u64) -> Settlement;
    fn settle_vested_rewards(&mut self, id: u64) -> Settlement;
    fn destroy(&mut self, id: u64);
    fn finalize_vesting_date(&mut self, id: u64, new_start: u64);
    fn owner_of(&self, id: u64) -> Option<Address>;
    fn position(&self, id: u64) -> Option<UnbondingPosition>;
}

/// Receipt staking pass-through, driven by the vault.
#[odra::external_contract]
pub trait BoostPool {
    fn stake_for(&mut self, account: Address, amount: U256);
    fn unstake_for(&mut self, account: Address, amount: U256);
    fn claim_for(&mut self, account: Address) -> U256;
    fn set_rate_params(&mut self, min_rate_bps: u64, max_rate_bps: u64, target_utilization: U256);
    fn staked_of(&self, account: Address) -> U256;
    fn pending_points(&self, account: Address) -> U256;
    fn stake_of(&self, account: Address) -> StakeInfo;
}
