//! Boost Reward Engine
//!
//! sCSPR holders stake receipts (through the vault) to earn points. Points
//! are distributed with an accumulator per share:
//!
//! ```text
//! unsettled(account) = staked * acc_per_share / PRECISION - reward_debt
//! ```
//!
//! so no per-account bookkeeping happens while time passes. The emission
//! rate follows a utilization curve: `max_rate_bps` on an empty pool,
//! falling linearly to `min_rate_bps` once `target_utilization` is staked.
//!
//! The engine holds staked sCSPR itself and depends on the receipt token
//! only for custody. Every mutation is driven by the vault.

use odra::casper_types::U256;
use odra::prelude::*;
use odra::ContractRef;

use crate::auth;
use crate::guard::ReentrancyGuard;
use crate::interfaces::ReceiptCustodyContractRef;
use crate::math;
use crate::types::StakeInfo;

/// Upper bound for either end of the rate curve = 100% APY
pub const MAX_RATE_BPS: u64 = 10_000;

pub mod events {
    use odra::casper_types::U256;
    use odra::prelude::*;

    #[odra::event]
    pub struct Staked {
        pub account: Address,
        pub amount: U256,
        pub new_staked: U256,
    }

    #[odra::event]
    pub struct Unstaked {
        pub account: Address,
        pub amount: U256,
        pub new_staked: U256,
    }

    #[odra::event]
    pub struct PointsClaimed {
        pub account: Address,
        pub amount: U256,
    }

    #[odra::event]
    pub struct Accrued {
        pub reward: U256,
        pub rate_bps: u64,
        pub acc_per_share: U256,
    }

    #[odra::event]
    pub struct RateParamsUpdated {
        pub min_rate_bps: u64,
        pub max_rate_bps: u64,
        pub target_utilization: U256,
    }

    #[odra::event]
    pub struct VaultSet {
        pub old_vault: Option<Address>,
        pub new_vault: Address,
    }
}

#[odra::odra_error]
pub enum BoostError {
    Unauthorized = 30001,
    ZeroAmount = 30002,
    InsufficientStake = 30003,
    NothingToClaim = 30004,
    InvalidRateParams = 30005,
    Overflow = 30006,
}

#[odra::module(
    events = [
        events::Staked,
        events::Unstaked,
        events::PointsClaimed,
        events::Accrued,
        events::RateParamsUpdated,
        events::VaultSet
    ],
    errors = BoostError
)]
pub struct BoostEngine {
    vault: Var<Address>,
    receipt: Var<Address>,

    stakes: Mapping<Address, StakeInfo>,
    total_staked: Var<U256>,
    acc_per_share: Var<U256>,
    last_accrual: Var<u64>,
    total_claimed: Var<U256>,

    // Rate curve
    min_rate_bps: Var<u64>,
    max_rate_bps: Var<u64>,
    target_utilization: Var<U256>,

    guard: SubModule<ReentrancyGuard>,
}

#[odra::module]
impl BoostEngine {
    /// Deploy with a temporary controller, then hand over to the vault.
    pub fn init(
        &mut self,
        vault: Address,
        receipt: Address,
        min_rate_bps: u64,
        max_rate_bps: u64,
        target_utilization: U256,
    ) {
        self.validate_rate_params(min_rate_bps, max_rate_bps, target_utilization);
        self.vault.set(vault);
        self.receipt.set(receipt);
        self.total_staked.set(U256::zero());
        self.acc_per_share.set(U256::zero());
        self.total_claimed.set(U256::zero());
        self.last_accrual.set(self.now());
        self.min_rate_bps.set(min_rate_bps);
        self.max_rate_bps.set(max_rate_bps);
        self.target_utilization.set(target_utilization);
        self.env().emit_event(events::VaultSet {
            old_vault: None,
            new_vault: vault,
        });
    }

    /// Only the current vault can hand over control.
    pub fn set_vault(&mut self, new_vault: Address) {
        self.require_vault();
        let old_vault = self.vault.get();
        self.vault.set(new_vault);
        self.env().emit_event(events::VaultSet {
            old_vault,
            new_vault,
        });
    }

    // ==========================================
    // Vault Operations
    // ==========================================

    /// Pull `amount` sCSPR from `account` (needs allowance to this engine)
    /// and add it to the account's stake.
    pub fn stake_for(&mut self, account: Address, amount: U256) {
        self.require_vault();
        if amount.is_zero() {
            self.env().revert(BoostError::ZeroAmount);
        }
        self.guard.enter();
        self.accrue();

        let mut info = self.settle(account);
        info.staked_amount += amount;
        info.reward_debt = self.debt_for(info.staked_amount);
        let new_staked = info.staked_amount;
        self.stakes.set(&account, info);
        self.total_staked
            .set(self.total_staked.get_or_default() + amount);

        let self_address = self.env().self_address();
        self.custody().transfer_from(account, self_address, amount);

        self.env().emit_event(events::Staked {
            account,
            amount,
            new_staked,
        });
        self.guard.exit();
    }

    /// Return `amount` staked sCSPR to `account`. Never pausable.
    pub fn unstake_for(&mut self, account: Address, amount: U256) {
        self.require_vault();
        if amount.is_zero() {
            self.env().revert(BoostError::ZeroAmount);
        }
        self.guard.enter();
        self.accrue();

        let mut info = self.settle(account);
        if amount > info.staked_amount {
            self.env().revert(BoostError::InsufficientStake);
        }
        info.staked_amount -= amount;
        info.reward_debt = self.debt_for(info.staked_amount);
        let new_staked = info.staked_amount;
        self.stakes.set(&account, info);
        let total = self.total_staked.get_or_default();
        self.total_staked.set(total.saturating_sub(amount));

        self.custody().transfer(account, amount);

        self.env().emit_event(events::Unstaked {
            account,
            amount,
            new_staked,
        });
        self.guard.exit();
    }

    /// Move the account's settled points into its claimed total.
    pub fn claim_for(&mut self, account: Address) -> U256 {
        self.require_vault();
        self.guard.enter();
        self.accrue();

        let mut info = self.settle(account);
        let amount = info.claimable;
        if amount.is_zero() {
            self.env().revert(BoostError::NothingToClaim);
        }
        info.claimable = U256::zero();
        info.claimed_total += amount;
        self.stakes.set(&account, info);
        self.total_claimed
            .set(self.total_claimed.get_or_default() + amount);

        self.env().emit_event(events::PointsClaimed { account, amount });
        self.guard.exit();
        amount
    }

    /// Replace the rate curve. Time already elapsed is paid at the old curve.
    pub fn set_rate_params(
        &mut self,
        min_rate_bps: u64,
        max_rate_bps: u64,
        target_utilization: U256,
    ) {
        self.require_vault();
        self.validate_rate_params(min_rate_bps, max_rate_bps, target_utilization);
        self.accrue();
        self.min_rate_bps.set(min_rate_bps);
        self.max_rate_bps.set(max_rate_bps);
        self.target_utilization.set(target_utilization);
        self.env().emit_event(events::RateParamsUpdated {
            min_rate_bps,
            max_rate_bps,
            target_utilization,
        });
    }

    // ==========================================
    // View Functions
    // ==========================================

    /// Current APY in basis points
    pub fn current_rate_bps(&self) -> u64 {
        math::utilization_rate_bps(
            self.total_staked.get_or_default(),
            self.target_utilization.get_or_default(),
            self.min_rate_bps.get_or_default(),
            self.max_rate_bps.get_or_default(),
        )
    }

    /// Settled plus unsettled points of `account`, as of now
    pub fn pending_points(&self, account: Address) -> U256 {
        let info = self.stakes.get(&account).unwrap_or_default();
        let acc = self.projected_acc_per_share();
        let gross = math::accumulated_for(info.staked_amount, acc).unwrap_or_default();
        info.claimable + gross.saturating_sub(info.reward_debt)
    }

    pub fn stake_of(&self, account: Address) -> StakeInfo {
        self.stakes.get(&account).unwrap_or_default()
    }

    pub fn staked_of(&self, account: Address) -> U256 {
        self.stake_of(account).staked_amount
    }

    pub fn total_staked(&self) -> U256 {
        self.total_staked.get_or_default()
    }

    pub fn total_claimed(&self) -> U256 {
        self.total_claimed.get_or_default()
    }

    pub fn accumulated_per_share(&self) -> U256 {
        self.acc_per_share.get_or_default()
    }

    pub fn min_rate_bps(&self) -> u64 {
        self.min_rate_bps.get_or_default()
    }

    pub fn max_rate_bps(&self) -> u64 {
        self.max_rate_bps.get_or_default()
    }

    pub fn target_utilization(&self) -> U256 {
        self.target_utilization.get_or_default()
    }

    pub fn vault(&self) -> Option<Address> {
        self.vault.get()
    }

    // ==========================================
    // Internal Functions
    // ==========================================

    fn require_vault(&self) {
        let caller = self.env().caller();
        if !auth::is_controller(self.vault.get(), &caller) {
            self.env().revert(BoostError::Unauthorized);
        }
    }

    fn validate_rate_params(&self, min_rate_bps: u64, max_rate_bps: u64, target: U256) {
        if min_rate_bps > max_rate_bps || max_rate_bps > MAX_RATE_BPS || target.is_zero() {
            self.env().revert(BoostError::InvalidRateParams);
        }
    }

    fn now(&self) -> u64 {
        self.env().get_block_time() / 1000
    }

    fn custody(&self) -> ReceiptCustodyContractRef {
        let receipt = self.receipt.get_or_revert_with(BoostError::Unauthorized);
        ReceiptCustodyContractRef::new(self.env().clone(), receipt)
    }

    /// Bring the accumulator up to now.
    fn accrue(&mut self) {
        let now = self.now();
        let last = self.last_accrual.get_or_default();
        if now <= last {
            return;
        }
        let total = self.total_staked.get_or_default();
        if total.is_zero() {
            self.last_accrual.set(now);
            return;
        }

        let rate_bps = self.current_rate_bps();
        let reward = math::accrued_reward(total, rate_bps, now - last)
            .unwrap_or_else(|| self.env().revert(BoostError::Overflow));
        let increment = math::per_share_increment(reward, total)
            .unwrap_or_else(|| self.env().revert(BoostError::Overflow));
        let acc = self.acc_per_share.get_or_default() + increment;
        self.acc_per_share.set(acc);
        self.last_accrual.set(now);

        if !reward.is_zero() {
            self.env().emit_event(events::Accrued {
                reward,
                rate_bps,
                acc_per_share: acc,
            });
        }
    }

    /// Accumulator value if `accrue` ran now
    fn projected_acc_per_share(&self) -> U256 {
        let acc = self.acc_per_share.get_or_default();
        let now = self.now();
        let last = self.last_accrual.get_or_default();
        let total = self.total_staked.get_or_default();
        if now <= last || total.is_zero() {
            return acc;
        }
        math::accrued_reward(total, self.current_rate_bps(), now - last)
            .and_then(|reward| math::per_share_increment(reward, total))
            .map(|increment| acc + increment)
            .unwrap_or(acc)
    }

    /// Move the account's unsettled points into `claimable`.
    /// The caller must reset `reward_debt` after changing the stake.
    fn settle(&self, account: Address) -> StakeInfo {
        let mut info = self.stakes.get(&account).unwrap_or_default();
        let gross = self.debt_for(info.staked_amount);
        info.claimable += gross.saturating_sub(info.reward_debt);
        info.reward_debt = gross;
        info
    }

    fn debt_for(&self, staked: U256) -> U256 {
        math::accumulated_for(staked, self.acc_per_share.get_or_default())
            .unwrap_or_else(|| self.env().revert(BoostError::Overflow))
    }
}
