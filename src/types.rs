//! Value types shared across contract boundaries.

use odra::casper_types::{U256, U512};
use odra::prelude::*;

/// Roles answered by the permission oracle
#[odra::odra_type]
#[derive(Copy)]
pub enum Role {
    Admin = 0,
    Keeper = 1,
    Pauser = 2,
}

/// Independently pausable features
#[odra::odra_type]
#[derive(Copy)]
pub enum Feature {
    Deposits = 0,
    InstantRedemption = 1,
    Staking = 2,
    Claiming = 3,
}

/// A delayed-redemption claim held in the unbonding registry.
///
/// `principal_amount` is zeroed once claimed; `claimed_rewards` only grows
/// and never exceeds `reward_amount`.
#[odra::odra_type]
pub struct UnbondingPosition {
    pub owner: Address,
    pub principal_amount: U512,
    pub reward_amount: U512,
    pub unbonding_start: u64,
    pub reward_vesting_start: u64,
    pub reward_vesting_end: u64,
    pub claimed_rewards: U512,
    pub principal_claimed: bool,
    pub vesting_date_finalized: bool,
}

impl UnbondingPosition {
    /// Nothing is left to claim on either track.
    pub fn is_settled(&self) -> bool {
        self.principal_claimed
            && (self.reward_amount.is_zero() || self.claimed_rewards == self.reward_amount)
    }
}

/// Result of settling one track of a position
#[odra::odra_type]
pub struct Settlement {
    pub amount: U512,
    pub fully_settled: bool,
}

/// Exchange rate locked in for reward vesting
#[odra::odra_type]
pub struct Snapshot {
    pub rate: U512,
    pub timestamp: u64,
}

/// Where the vault's motes currently sit
#[odra::odra_type]
pub struct LiquidityBreakdown {
    pub liquid: U512,
    pub delegated: U512,
    pub unbonding: U512,
    pub reserved_rewards: U512,
    pub unclaimed_yield: U512,
}

/// Per-account Boost record
#[odra::odra_type]
#[derive(Default)]
pub struct StakeInfo {
    pub staked_amount: U256,
    pub reward_debt: U256,
    pub claimable: U256,
    pub claimed_total: U256,
}
