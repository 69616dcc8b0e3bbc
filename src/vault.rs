//! Liquid Vault
//!
//! Accounting core of the protocol.
//! - Users deposit CSPR and receive sCSPR at the pool exchange rate
//! - Deposits wait in the liquid buffer until a keeper delegates them
//! - Delayed redemptions open an unbonding position (principal after the
//!   unbonding period, reward portion vesting linearly)
//! - Instant redemptions are paid from the liquid buffer minus a fee
//! - sCSPR can be staked into the Boost engine through the vault
//!
//! ## Exchange rate
//! `rate = (active_delegated + pending_liquid + unclaimed_yield) / supply`.
//! Motes reserved for unbonding principal and vesting rewards are taken out
//! of the liquid buffer and delegation, so a redemption never moves the rate
//! of remaining holders. `unclaimed_yield` mirrors the keeper's observation
//! and only changes through `push_observed_yield` and `harvest_yield`.
//!
//! ## Snapshot
//! Once taken (admin, before `config_deadline`), later redemptions cap their
//! reward at the snapshot rate and vest from the snapshot time.
//!
//! Every entry point that pays out, mints or burns runs under the vault's
//! reentrancy lock and finishes all bookkeeping before the external call.

use odra::casper_types::{AsymmetricType, PublicKey, U256, U512};
use odra::prelude::*;
use odra::ContractRef;
use alloc::vec::Vec;

use crate::guard::ReentrancyGuard;
use crate::interfaces::{
    BoostPoolContractRef, PermissionOracleContractRef, PositionRegistryContractRef,
    ReceiptLedgerContractRef,
};
use crate::math;
use crate::types::{Feature, LiquidityBreakdown, Role, Snapshot, UnbondingPosition};

// ==========================================
// Constants
// ==========================================

/// Snapshot can be taken up to 181 days after deployment
const CONFIG_WINDOW_SECS: u64 = 181 * 86_400;
/// Minimum time between two delegation sweeps = 1 day
const DELEGATION_COOLDOWN_SECS: u64 = 86_400;
/// Minimum delegation = 500 CSPR
const MIN_DELEGATION_MOTES: u64 = 500_000_000_000;

// ==========================================
// Events
// ==========================================

pub mod events {
    use odra::casper_types::{U256, U512};
    use odra::prelude::*;

    #[odra::event]
    pub struct Deposited {
        pub user: Address,
        pub amount_motes: U512,
        pub receipts: U256,
    }

    #[odra::event]
    pub struct RedemptionRequested {
        pub user: Address,
        pub position_id: u64,
        pub receipts: U256,
        pub principal_motes: U512,
        pub reward_motes: U512,
    }

    #[odra::event]
    pub struct InstantRedeemed {
        pub user: Address,
        pub receipts: U256,
        pub amount_motes: U512,
        pub fee_motes: U512,
    }

    #[odra::event]
    pub struct PrincipalClaimed {
        pub user: Address,
        pub position_id: u64,
        pub amount_motes: U512,
    }

    #[odra::event]
    pub struct RewardsClaimed {
        pub user: Address,
        pub position_id: u64,
        pub amount_motes: U512,
    }

    #[odra::event]
    pub struct DelegationTriggered {
        pub amount_motes: U512,
        pub active_delegated: U512,
    }

    #[odra::event]
    pub struct UndelegationRequested {
        pub amount_motes: U512,
    }

    #[odra::event]
    pub struct YieldObserved {
        pub previous_motes: U512,
        pub observed_motes: U512,
    }

    #[odra::event]
    pub struct YieldHarvested {
        pub amount_motes: U512,
        pub active_delegated: U512,
    }

    #[odra::event]
    pub struct SnapshotTaken {
        pub rate: U512,
        pub timestamp: u64,
    }

    #[odra::event]
    pub struct VestingDateFinalized {
        pub position_id: u64,
        pub vesting_start: u64,
    }

    #[odra::event]
    pub struct ValidatorUpdated {
        pub validator_public_key: String,
    }
}

// ==========================================
// Errors
// ==========================================

#[odra::odra_error]
pub enum VaultError {
    ZeroAmount = 1,
    FeaturePaused = 2,
    Unauthorized = 3,
    StakedInBoost = 4,
    NotPositionOwner = 5,
    InsufficientLiquidity = 6,
    InsufficientLiquidBalance = 7,
    SlippageExceeded = 8,
    CooldownActive = 9,
    NothingToDelegate = 10,
    BelowMinDelegation = 11,
    ConfigWindowClosed = 12,
    SnapshotAlreadyTaken = 13,
    NothingMinted = 14,
    InvalidValidatorKey = 15,
    Overflow = 16,
    TreasuryNotSet = 17,
    NotConfigured = 18,
}

// ==========================================
// Contract
// ==========================================

#[odra::module(
    events = [
        events::Deposited,
        events::RedemptionRequested,
        events::InstantRedeemed,
        events::PrincipalClaimed,
        events::RewardsClaimed,
        events::DelegationTriggered,
        events::UndelegationRequested,
        events::YieldObserved,
        events::YieldHarvested,
        events::SnapshotTaken,
        events::VestingDateFinalized,
        events::ValidatorUpdated
    ],
    errors = VaultError
)]
pub struct LiquidVault {
    // Collaborators
    config: Var<Address>,
    receipt: Var<Address>,
    registry: Var<Address>,
    boost: Var<Address>,

    // Staking config
    validator_public_key: Var<String>,

    // Pool accounting (motes)
    active_delegated: Var<U512>,  // earning with the validator
    pending_liquid: Var<U512>,    // liquid buffer, not yet delegated
    unclaimed_yield: Var<U512>,   // observed, not yet folded into active
    pending_unbonding: Var<U512>, // reserved for unbonding principal
    reserved_rewards: Var<U512>,  // reserved for vesting rewards
    total_principal: Var<U512>,   // informational

    // Snapshot and timing (seconds)
    snapshot: Var<Snapshot>,
    config_deadline: Var<u64>,
    rewards_unlock_time: Var<u64>,
    last_delegation_time: Var<u64>,

    guard: SubModule<ReentrancyGuard>,
}

#[odra::module]
impl LiquidVault {
    // ==========================================
    // Initialization
    // ==========================================

    /// Wire the vault to its collaborators.
    ///
    /// `validator_public_key` may be empty, in which case delegation only
    /// moves accounting. `rewards_unlock_time` is the earliest vesting start
    /// for positions opened before a snapshot.
    pub fn init(
        &mut self,
        config: Address,
        receipt: Address,
        registry: Address,
        boost: Address,
        validator_public_key: String,
        rewards_unlock_time: u64,
    ) {
        if !validator_public_key.is_empty() {
            self.parse_validator_key(&validator_public_key);
        }
        self.config.set(config);
        self.receipt.set(receipt);
        self.registry.set(registry);
        self.boost.set(boost);
        self.validator_public_key.set(validator_public_key);

        self.active_delegated.set(U512::zero());
        self.pending_liquid.set(U512::zero());
        self.unclaimed_yield.set(U512::zero());
        self.pending_unbonding.set(U512::zero());
        self.reserved_rewards.set(U512::zero());
        self.total_principal.set(U512::zero());

        self.config_deadline.set(self.now() + CONFIG_WINDOW_SECS);
        self.rewards_unlock_time.set(rewards_unlock_time);
    }

    // ==========================================
    // User Functions
    // ==========================================

    /// Deposit CSPR and receive sCSPR at the current exchange rate.
    #[odra(payable)]
    pub fn deposit(&mut self) -> U256 {
        self.require_not_paused(Feature::Deposits);
        let caller = self.env().caller();
        let amount = self.env().attached_value();
        if amount.is_zero() {
            self.env().revert(VaultError::ZeroAmount);
        }
        self.guard.enter();

        let minted = math::receipts_for_value(
            amount,
            self.receipt_supply(),
            self.pool_value(),
        )
        .unwrap_or_else(|| self.overflow());
        if minted.is_zero() {
            self.env().revert(VaultError::NothingMinted);
        }

        // pool grows before the mint call
        self.pending_liquid
            .set(self.pending_liquid.get_or_default() + amount);
        self.total_principal
            .set(self.total_principal.get_or_default() + amount);

        let receipts = math::motes_to_receipts(minted).unwrap_or_else(|| self.overflow());
        self.receipt_ledger().mint(caller, receipts);

        self.env().emit_event(events::Deposited {
            user: caller,
            amount_motes: amount,
            receipts,
        });
        self.guard.exit();
        receipts
    }

    /// Burn sCSPR and open an unbonding position for its value.
    /// Returns the position id.
    pub fn request_redemption(&mut self, receipt_amount: U256) -> u64 {
        let caller = self.env().caller();
        if receipt_amount.is_zero() {
            self.env().revert(VaultError::ZeroAmount);
        }
        self.require_not_boosted(caller);
        self.guard.enter();

        let receipts = math::receipts_to_motes(receipt_amount);
        let current_value = self.value_of_motes(receipts);
        if current_value.is_zero() {
            self.env().revert(VaultError::ZeroAmount);
        }

        let snapshot = self.snapshot.get();
        let split = math::split_redemption(
            receipts,
            current_value,
            snapshot.as_ref().map(|s| s.rate),
        )
        .unwrap_or_else(|| self.overflow());
        let (vesting_start, finalized) = match snapshot {
            Some(s) => (s.timestamp, true),
            None => {
                let cliff = self.rewards_unlock_time.get_or_default();
                (self.now().max(cliff), false)
            }
        };

        self.take_from_pool(split.principal, split.reward);
        self.pending_unbonding
            .set(self.pending_unbonding.get_or_default() + split.principal);
        self.reserved_rewards
            .set(self.reserved_rewards.get_or_default() + split.reward);
        self.retire_principal(split.principal);

        self.receipt_ledger().burn(caller, receipt_amount);
        let position_id = self.position_registry().create_position(
            caller,
            split.principal,
            split.reward,
            vesting_start,
            finalized,
        );

        self.env().emit_event(events::RedemptionRequested {
            user: caller,
            position_id,
            receipts: receipt_amount,
            principal_motes: split.principal,
            reward_motes: split.reward,
        });
        self.guard.exit();
        position_id
    }

    /// Redeem sCSPR immediately from the liquid buffer, minus the fee.
    /// Reverts if the caller would receive less than `min_out`.
    pub fn instant_redeem(&mut self, receipt_amount: U256, min_out: U512) -> U512 {
        self.require_not_paused(Feature::InstantRedemption);
        let caller = self.env().caller();
        if receipt_amount.is_zero() {
            self.env().revert(VaultError::ZeroAmount);
        }
        self.require_not_boosted(caller);
        self.guard.enter();

        let receipts = math::receipts_to_motes(receipt_amount);
        let value = self.value_of_motes(receipts);
        if value.is_zero() {
            self.env().revert(VaultError::ZeroAmount);
        }
        let liquid = self.pending_liquid.get_or_default();
        if value > liquid {
            self.env().revert(VaultError::InsufficientLiquidity);
        }

        let oracle = self.oracle();
        let fee = math::bps_of(value, oracle.staking_fee_bps())
            .unwrap_or_else(|| self.overflow());
        let amount_out = value - fee;
        if amount_out < min_out {
            self.env().revert(VaultError::SlippageExceeded);
        }
        let treasury = if fee.is_zero() {
            None
        } else {
            match oracle.treasury_address() {
                Some(t) => Some(t),
                None => self.env().revert(VaultError::TreasuryNotSet),
            }
        };
        self.require_balance(value);

        self.pending_liquid.set(liquid - value);
        self.retire_principal(value.min(receipts));
        self.receipt_ledger().burn(caller, receipt_amount);

        self.env().emit_event(events::InstantRedeemed {
            user: caller,
            receipts: receipt_amount,
            amount_motes: amount_out,
            fee_motes: fee,
        });

        if let Some(treasury) = treasury {
            self.env().transfer_tokens(&treasury, &fee);
        }
        self.env().transfer_tokens(&caller, &amount_out);
        self.guard.exit();
        amount_out
    }

    /// Claim the principal of a matured position.
    pub fn claim_principal(&mut self, position_id: u64) -> U512 {
        let caller = self.env().caller();
        self.require_position_owner(position_id, caller);
        self.guard.enter();

        let mut registry = self.position_registry();
        let settlement = registry.settle_principal(position_id);
        let amount = settlement.amount;

        let (_, remaining) =
            math::deduct_capped(self.pending_unbonding.get_or_default(), amount);
        self.pending_unbonding.set(remaining);
        if settlement.fully_settled {
            registry.destroy(position_id);
        }
        self.require_balance(amount);

        self.env().emit_event(events::PrincipalClaimed {
            user: caller,
            position_id,
            amount_motes: amount,
        });
        self.env().transfer_tokens(&caller, &amount);
        self.guard.exit();
        amount
    }

    /// Claim the vested, unclaimed part of a position's reward.
    pub fn claim_vested_rewards(&mut self, position_id: u64) -> U512 {
        let caller = self.env().caller();
        self.require_position_owner(position_id, caller);
        self.guard.enter();

        let mut registry = self.position_registry();
        let settlement = registry.settle_vested_rewards(position_id);
        let amount = settlement.amount;

        let (_, remaining) =
            math::deduct_capped(self.reserved_rewards.get_or_default(), amount);
        self.reserved_rewards.set(remaining);
        if settlement.fully_settled {
            registry.destroy(position_id);
        }
        self.require_balance(amount);

        self.env().emit_event(events::RewardsClaimed {
            user: caller,
            position_id,
            amount_motes: amount,
        });
        self.env().transfer_tokens(&caller, &amount);
        self.guard.exit();
        amount
    }

    // ==========================================
    // Boost Pass-through
    // ==========================================

    /// Stake sCSPR into Boost. The caller approves the Boost engine first.
    pub fn stake_receipts(&mut self, amount: U256) {
        self.require_not_paused(Feature::Staking);
        if amount.is_zero() {
            self.env().revert(VaultError::ZeroAmount);
        }
        let caller = self.env().caller();
        self.guard.enter();
        self.boost_pool().stake_for(caller, amount);
        self.guard.exit();
    }

    /// Withdraw staked sCSPR from Boost. Not subject to any pause.
    pub fn unstake_receipts(&mut self, amount: U256) {
        if amount.is_zero() {
            self.env().revert(VaultError::ZeroAmount);
        }
        let caller = self.env().caller();
        self.guard.enter();
        self.boost_pool().unstake_for(caller, amount);
        self.guard.exit();
    }

    /// Claim accrued Boost points. Returns the amount claimed.
    pub fn claim_points(&mut self) -> U256 {
        self.require_not_paused(Feature::Claiming);
        let caller = self.env().caller();
        self.guard.enter();
        let amount = self.boost_pool().claim_for(caller);
        self.guard.exit();
        amount
    }

    // ==========================================
    // Keeper Functions
    // ==========================================

    /// Sweep the liquid buffer into the validator.
    pub fn trigger_delegation(&mut self) {
        self.require_role(Role::Keeper);
        let now = self.now();
        if let Some(last) = self.last_delegation_time.get() {
            if now < last + DELEGATION_COOLDOWN_SECS {
                self.env().revert(VaultError::CooldownActive);
            }
        }
        let pending = self.pending_liquid.get_or_default();
        if pending.is_zero() {
            self.env().revert(VaultError::NothingToDelegate);
        }
        self.guard.enter();

        let active = self.active_delegated.get_or_default() + pending;
        self.active_delegated.set(active);
        self.pending_liquid.set(U512::zero());
        self.last_delegation_time.set(now);

        let validator_key = self.validator_public_key.get_or_default();
        if !validator_key.is_empty() {
            if pending < U512::from(MIN_DELEGATION_MOTES) {
                self.env().revert(VaultError::BelowMinDelegation);
            }
            let validator_pk = self.parse_validator_key(&validator_key);
            self.env().delegate(validator_pk, pending);
        }

        self.env().emit_event(events::DelegationTriggered {
            amount_motes: pending,
            active_delegated: active,
        });
        self.guard.exit();
    }

    /// Overwrite the observed, not yet harvested yield with a fresh total.
    pub fn push_observed_yield(&mut self, amount: U512) {
        self.require_role(Role::Keeper);
        let previous_motes = self.unclaimed_yield.get_or_default();
        self.unclaimed_yield.set(amount);
        self.env().emit_event(events::YieldObserved {
            previous_motes,
            observed_motes: amount,
        });
    }

    /// Fold observed yield into the delegated balance. Rate is unchanged.
    pub fn harvest_yield(&mut self) {
        self.require_role(Role::Keeper);
        let amount = self.unclaimed_yield.get_or_default();
        if amount.is_zero() {
            return;
        }
        let active = self.active_delegated.get_or_default() + amount;
        self.active_delegated.set(active);
        self.unclaimed_yield.set(U512::zero());
        self.env().emit_event(events::YieldHarvested {
            amount_motes: amount,
            active_delegated: active,
        });
    }

    // ==========================================
    // Admin Functions
    // ==========================================

    /// Lock in the current exchange rate for reward vesting. One-time,
    /// only before the configuration deadline.
    pub fn take_snapshot(&mut self) {
        self.require_role(Role::Admin);
        let now = self.now();
        if now >= self.config_deadline.get_or_default() {
            self.env().revert(VaultError::ConfigWindowClosed);
        }
        if self.snapshot.get().is_some() {
            self.env().revert(VaultError::SnapshotAlreadyTaken);
        }
        let rate = self.exchange_rate();
        self.snapshot.set(Snapshot {
            rate,
            timestamp: now,
        });
        self.env().emit_event(events::SnapshotTaken {
            rate,
            timestamp: now,
        });
    }

    /// Replace the provisional vesting start of a pre-snapshot position.
    pub fn finalize_vesting_date(&mut self, position_id: u64, vesting_start: u64) {
        self.require_role(Role::Admin);
        self.position_registry()
            .finalize_vesting_date(position_id, vesting_start);
        self.env().emit_event(events::VestingDateFinalized {
            position_id,
            vesting_start,
        });
    }

    pub fn set_validator_public_key(&mut self, new_key: String) {
        self.require_role(Role::Admin);
        if !new_key.is_empty() {
            self.parse_validator_key(&new_key);
        }
        self.validator_public_key.set(new_key.clone());
        self.env().emit_event(events::ValidatorUpdated {
            validator_public_key: new_key,
        });
    }

    pub fn set_boost_rate_params(
        &mut self,
        min_rate_bps: u64,
        max_rate_bps: u64,
        target_utilization: U256,
    ) {
        self.require_role(Role::Admin);
        self.boost_pool()
            .set_rate_params(min_rate_bps, max_rate_bps, target_utilization);
    }

    // ==========================================
    // View Functions
    // ==========================================

    /// Motes per sCSPR unit, scaled by 1e18
    pub fn exchange_rate(&self) -> U512 {
        math::exchange_rate(self.receipt_supply(), self.pool_value())
            .unwrap_or_else(|| self.overflow())
    }

    /// Motes currently redeemable for `receipt_amount`
    pub fn value_of(&self, receipt_amount: U256) -> U512 {
        self.value_of_motes(math::receipts_to_motes(receipt_amount))
    }

    /// sCSPR minted for depositing `value` motes now
    pub fn receipts_for(&self, value: U512) -> U256 {
        let receipts = math::receipts_for_value(
            value,
            self.receipt_supply(),
            self.pool_value(),
        )
        .unwrap_or_else(|| self.overflow());
        math::motes_to_receipts(receipts).unwrap_or_else(|| self.overflow())
    }

    /// Unclaimed Boost points of `account`
    pub fn pending_points(&self, account: Address) -> U256 {
        self.boost_pool().pending_points(account)
    }

    pub fn position(&self, position_id: u64) -> Option<UnbondingPosition> {
        self.position_registry().position(position_id)
    }

    pub fn liquidity(&self) -> LiquidityBreakdown {
        LiquidityBreakdown {
            liquid: self.pending_liquid.get_or_default(),
            delegated: self.active_delegated.get_or_default(),
            unbonding: self.pending_unbonding.get_or_default(),
            reserved_rewards: self.reserved_rewards.get_or_default(),
            unclaimed_yield: self.unclaimed_yield.get_or_default(),
        }
    }

    /// Exchange-rate denominator: delegated + liquid + unclaimed yield
    pub fn total_pooled(&self) -> U512 {
        self.pool_value()
    }

    pub fn total_principal(&self) -> U512 {
        self.total_principal.get_or_default()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.get()
    }

    pub fn config_deadline(&self) -> u64 {
        self.config_deadline.get_or_default()
    }

    pub fn rewards_unlock_time(&self) -> u64 {
        self.rewards_unlock_time.get_or_default()
    }

    pub fn last_delegation_time(&self) -> Option<u64> {
        self.last_delegation_time.get()
    }

    pub fn validator_public_key(&self) -> String {
        self.validator_public_key.get_or_default()
    }

    /// Native delegation actually recorded on chain for the validator
    pub fn delegated_amount(&self) -> U512 {
        let validator_key = self.validator_public_key.get_or_default();
        if validator_key.is_empty() {
            return U512::zero();
        }
        let validator_pk = self.parse_validator_key(&validator_key);
        self.env().delegated_amount(validator_pk)
    }

    pub fn config_address(&self) -> Option<Address> {
        self.config.get()
    }

    pub fn receipt_address(&self) -> Option<Address> {
        self.receipt.get()
    }

    pub fn registry_address(&self) -> Option<Address> {
        self.registry.get()
    }

    pub fn boost_address(&self) -> Option<Address> {
        self.boost.get()
    }

    // ==========================================
    // Internal Functions
    // ==========================================

    fn now(&self) -> u64 {
        self.env().get_block_time() / 1000
    }

    fn overflow(&self) -> ! {
        self.env().revert(VaultError::Overflow)
    }

    fn require_role(&self, role: Role) {
        let caller = self.env().caller();
        if !self.oracle().has_role(role, caller) {
            self.env().revert(VaultError::Unauthorized);
        }
    }

    fn require_not_paused(&self, feature: Feature) {
        if self.oracle().is_paused(feature) {
            self.env().revert(VaultError::FeaturePaused);
        }
    }

    /// Receipts in Boost must be unstaked before redeeming.
    fn require_not_boosted(&self, account: Address) {
        if !self.boost_pool().staked_of(account).is_zero() {
            self.env().revert(VaultError::StakedInBoost);
        }
    }

    fn require_position_owner(&self, position_id: u64, caller: Address) {
        if self.position_registry().owner_of(position_id) != Some(caller) {
            self.env().revert(VaultError::NotPositionOwner);
        }
    }

    /// Payouts need the motes to be back in the purse.
    fn require_balance(&self, amount: U512) {
        if self.env().self_balance() < amount {
            self.env().revert(VaultError::InsufficientLiquidBalance);
        }
    }

    fn pool_value(&self) -> U512 {
        self.active_delegated.get_or_default()
            + self.pending_liquid.get_or_default()
            + self.unclaimed_yield.get_or_default()
    }

    fn receipt_supply(&self) -> U512 {
        math::receipts_to_motes(self.receipt_ledger().total_supply())
    }

    fn value_of_motes(&self, receipts: U512) -> U512 {
        math::value_of_receipts(
            receipts,
            self.receipt_supply(),
            self.pool_value(),
        )
        .unwrap_or_else(|| self.overflow())
    }

    /// Remove a redemption's value from the pool. Principal, then reward,
    /// come from the liquid buffer and then delegation, each step capped.
    /// `unclaimed_yield` is a keeper-reported total and is never drawn down.
    fn take_from_pool(&mut self, principal: U512, reward: U512) {
        let owed = principal + reward;
        let (from_liquid, liquid) =
            math::deduct_capped(self.pending_liquid.get_or_default(), owed);
        let (from_active, active) =
            math::deduct_capped(self.active_delegated.get_or_default(), owed - from_liquid);

        self.pending_liquid.set(liquid);
        self.active_delegated.set(active);

        self.request_undelegation(from_active);
    }

    fn retire_principal(&mut self, amount: U512) {
        let (_, remaining) =
            math::deduct_capped(self.total_principal.get_or_default(), amount);
        self.total_principal.set(remaining);
    }

    fn request_undelegation(&mut self, amount: U512) {
        if amount.is_zero() {
            return;
        }
        let validator_key = self.validator_public_key.get_or_default();
        if validator_key.is_empty() {
            return;
        }
        let validator_pk = self.parse_validator_key(&validator_key);
        self.env().undelegate(validator_pk, amount);
        self.env().emit_event(events::UndelegationRequested {
            amount_motes: amount,
        });
    }

    // ==========================================
    // Collaborators
    // ==========================================

    fn oracle(&self) -> PermissionOracleContractRef {
        let address = self.config.get_or_revert_with(VaultError::NotConfigured);
        PermissionOracleContractRef::new(self.env().clone(), address)
    }

    fn receipt_ledger(&self) -> ReceiptLedgerContractRef {
        let address = self.receipt.get_or_revert_with(VaultError::NotConfigured);
        ReceiptLedgerContractRef::new(self.env().clone(), address)
    }

    fn position_registry(&self) -> PositionRegistryContractRef {
        let address = self.registry.get_or_revert_with(VaultError::NotConfigured);
        PositionRegistryContractRef::new(self.env().clone(), address)
    }

    fn boost_pool(&self) -> BoostPoolContractRef {
        let address = self.boost.get_or_revert_with(VaultError::NotConfigured);
        BoostPoolContractRef::new(self.env().clone(), address)
    }

    // ==========================================
    // Validator Key Parsing
    // ==========================================

    fn parse_validator_key(&self, validator_key: &str) -> PublicKey {
        let bytes = self.hex_decode(validator_key);
        if bytes.is_empty() {
            self.env().revert(VaultError::InvalidValidatorKey);
        }

        let algo_tag = bytes[0];
        let key_bytes = &bytes[1..];

        match algo_tag {
            0x01 if key_bytes.len() == 32 => PublicKey::ed25519_from_bytes(key_bytes)
                .unwrap_or_else(|_| self.env().revert(VaultError::InvalidValidatorKey)),
            0x02 if key_bytes.len() == 33 => PublicKey::secp256k1_from_bytes(key_bytes)
                .unwrap_or_else(|_| self.env().revert(VaultError::InvalidValidatorKey)),
            _ => self.env().revert(VaultError::InvalidValidatorKey),
        }
    }

    fn hex_decode(&self, hex_str: &str) -> Vec<u8> {
        if hex_str.len() % 2 != 0 {
            return Vec::new();
        }
        let mut bytes = Vec::with_capacity(hex_str.len() / 2);
        let mut chars = hex_str.chars();
        while let (Some(hi), Some(lo)) = (chars.next(), chars.next()) {
            match (hi.to_digit(16), lo.to_digit(16)) {
                (Some(hi), Some(lo)) => bytes.push(((hi as u8) << 4) | lo as u8),
                _ => return Vec::new(),
            }
        }
        bytes
    }
}
