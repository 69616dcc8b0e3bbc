//! Unbonding Position Registry
//!
//! Ledger of delayed-redemption claims. Each position carries two
//! independent tracks:
//! - principal: claimable once after `UNBONDING_PERIOD_SECS`
//! - reward: vests linearly over `[reward_vesting_start, reward_vesting_end]`
//!
//! A position is destroyed only after both tracks are complete. Positions
//! are transferable; a transfer only rewrites ownership metadata.
//!
//! Mutations other than `transfer` are restricted to the vault.

use alloc::vec::Vec;
use odra::casper_types::U512;
use odra::prelude::*;

use crate::auth;
use crate::math;
use crate::types::{Settlement, UnbondingPosition};

// ==========================================
// Constants
// ==========================================

/// Delay before principal becomes claimable = 7 days
pub const UNBONDING_PERIOD_SECS: u64 = 7 * 86_400;
/// Length of the reward vesting window = 90 days
pub const REWARD_VESTING_PERIOD_SECS: u64 = 90 * 86_400;
/// How far past "now" an operator may push a vesting start = 1 year
pub const MAX_VESTING_DEFERRAL_SECS: u64 = 365 * 86_400;

// ==========================================
// Events
// ==========================================

pub mod events {
    use odra::casper_types::U512;
    use odra::prelude::*;

    #[odra::event]
    pub struct PositionCreated {
        pub id: u64,
        pub owner: Address,
        pub principal: U512,
        pub reward: U512,
        pub vesting_start: u64,
        pub finalized: bool,
    }

    #[odra::event]
    pub struct PrincipalSettled {
        pub id: u64,
        pub amount: U512,
    }

    #[odra::event]
    pub struct RewardsSettled {
        pub id: u64,
        pub amount: U512,
        pub claimed_total: U512,
    }

    #[odra::event]
    pub struct PositionTransferred {
        pub id: u64,
        pub from: Address,
        pub to: Address,
    }

    #[odra::event]
    pub struct PositionDestroyed {
        pub id: u64,
        pub owner: Address,
    }

    #[odra::event]
    pub struct VestingDateFinalized {
        pub id: u64,
        pub vesting_start: u64,
        pub vesting_end: u64,
    }

    #[odra::event]
    pub struct VaultSet {
        pub old_vault: Option<Address>,
        pub new_vault: Address,
    }
}

// ==========================================
// Errors
// ==========================================

#[odra::odra_error]
pub enum RegistryError {
    Unauthorized = 20001,
    PositionNotFound = 20002,
    NoPrincipal = 20003,
    UnbondingNotComplete = 20004,
    NoRewards = 20005,
    VestingNotStarted = 20006,
    RewardsFullyClaimed = 20007,
    NothingToClaim = 20008,
    OutstandingClaims = 20009,
    AlreadyFinalized = 20010,
    VestingStartTooEarly = 20011,
    VestingStartTooLate = 20012,
    NotOwner = 20013,
    InvalidRecipient = 20014,
}

// ==========================================
// Contract
// ==========================================

#[odra::module(
    events = [
        events::PositionCreated,
        events::PrincipalSettled,
        events::RewardsSettled,
        events::PositionTransferred,
        events::PositionDestroyed,
        events::VestingDateFinalized,
        events::VaultSet
    ],
    errors = RegistryError
)]
pub struct UnbondingRegistry {
    vault: Var<Address>,
    last_id: Var<u64>,
    positions: Mapping<u64, Option<UnbondingPosition>>,

    // Owner index: a dense list per owner with swap-and-pop removal
    owned_count: Mapping<Address, u32>,
    owned_at: Mapping<(Address, u32), u64>,
    owned_index: Mapping<u64, u32>,
}

#[odra::module]
impl UnbondingRegistry {
    /// Deploy with a temporary controller, then hand over to the vault.
    pub fn init(&mut self, vault: Address) {
        self.vault.set(vault);
        self.last_id.set(0);
        self.env().emit_event(events::VaultSet {
            old_vault: None,
            new_vault: vault,
        });
    }

    pub fn vault(&self) -> Option<Address> {
        self.vault.get()
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

    /// Record a new position and return its id. Ids start at 1.
    pub fn create_position(
        &mut self,
        owner: Address,
        principal: U512,
        reward: U512,
        vesting_start: u64,
        finalized: bool,
    ) -> u64 {
        self.require_vault();
        let id = self.last_id.get_or_default() + 1;
        self.last_id.set(id);

        let position = UnbondingPosition {
            owner,
            principal_amount: principal,
            reward_amount: reward,
            unbonding_start: self.now(),
            reward_vesting_start: vesting_start,
            reward_vesting_end: vesting_start + REWARD_VESTING_PERIOD_SECS,
            claimed_rewards: U512::zero(),
            // nothing to wait for on the principal track
            principal_claimed: principal.is_zero(),
            vesting_date_finalized: finalized,
        };
        self.positions.set(&id, Some(position));
        self.index_add(owner, id);

        self.env().emit_event(events::PositionCreated {
            id,
            owner,
            principal,
            reward,
            vesting_start,
            finalized,
        });
        id
    }

    /// Release the principal once the unbonding period has elapsed.
    pub fn settle_principal(&mut self, id: u64) -> Settlement {
        self.require_vault();
        let mut position = self.load(id);

        if position.principal_claimed || position.principal_amount.is_zero() {
            self.env().revert(RegistryError::NoPrincipal);
        }
        if self.now() < position.unbonding_start + UNBONDING_PERIOD_SECS {
            self.env().revert(RegistryError::UnbondingNotComplete);
        }

        let amount = position.principal_amount;
        position.principal_claimed = true;
        position.principal_amount = U512::zero();
        let fully_settled = position.is_settled();
        self.positions.set(&id, Some(position));

        self.env().emit_event(events::PrincipalSettled { id, amount });
        Settlement {
            amount,
            fully_settled,
        }
    }

    /// Release whatever part of the reward has vested and is unclaimed.
    pub fn settle_vested_rewards(&mut self, id: u64) -> Settlement {
        self.require_vault();
        let mut position = self.load(id);
        let now = self.now();

        if position.reward_amount.is_zero() {
            self.env().revert(RegistryError::NoRewards);
        }
        if now < position.reward_vesting_start {
            self.env().revert(RegistryError::VestingNotStarted);
        }
        if position.claimed_rewards >= position.reward_amount {
            self.env().revert(RegistryError::RewardsFullyClaimed);
        }

        let amount = Self::claimable_of(&position, now);
        if amount.is_zero() {
            self.env().revert(RegistryError::NothingToClaim);
        }

        position.claimed_rewards += amount;
        let claimed_total = position.claimed_rewards;
        let fully_settled = position.is_settled();
        self.positions.set(&id, Some(position));

        self.env().emit_event(events::RewardsSettled {
            id,
            amount,
            claimed_total,
        });
        Settlement {
            amount,
            fully_settled,
        }
    }

    /// Remove a fully settled position.
    pub fn destroy(&mut self, id: u64) {
        self.require_vault();
        let position = self.load(id);
        if !position.is_settled() {
            self.env().revert(RegistryError::OutstandingClaims);
        }
        self.remove(id, position.owner);
    }

    /// Replace the provisional vesting start of a pre-snapshot position.
    /// The window keeps its length.
    pub fn finalize_vesting_date(&mut self, id: u64, new_start: u64) {
        self.require_vault();
        let mut position = self.load(id);

        if position.vesting_date_finalized {
            self.env().revert(RegistryError::AlreadyFinalized);
        }
        if new_start < position.reward_vesting_start {
            self.env().revert(RegistryError::VestingStartTooEarly);
        }
        if new_start > self.now() + MAX_VESTING_DEFERRAL_SECS {
            self.env().revert(RegistryError::VestingStartTooLate);
        }

        let window = position.reward_vesting_end - position.reward_vesting_start;
        position.reward_vesting_start = new_start;
        position.reward_vesting_end = new_start + window;
        position.vesting_date_finalized = true;
        let vesting_end = position.reward_vesting_end;
        self.positions.set(&id, Some(position));

        self.env().emit_event(events::VestingDateFinalized {
            id,
            vesting_start: new_start,
            vesting_end,
        });
    }

    // ==========================================
    // Ownership
    // ==========================================

    /// Move a position to a new owner (current owner only).
    pub fn transfer(&mut self, to: Address, id: u64) {
        let caller = self.env().caller();
        let mut position = self.load(id);
        if position.owner != caller {
            self.env().revert(RegistryError::NotOwner);
        }
        if to == caller {
            self.env().revert(RegistryError::InvalidRecipient);
        }

        self.index_remove(caller, id);
        self.index_add(to, id);
        position.owner = to;
        self.positions.set(&id, Some(position));

        self.env().emit_event(events::PositionTransferred {
            id,
            from: caller,
            to,
        });
    }

    // ==========================================
    // View Functions
    // ==========================================

    pub fn position(&self, id: u64) -> Option<UnbondingPosition> {
        self.positions.get(&id).flatten()
    }

    pub fn owner_of(&self, id: u64) -> Option<Address> {
        self.position(id).map(|p| p.owner)
    }

    /// Number of live positions held by `owner`
    pub fn balance_of(&self, owner: Address) -> u32 {
        self.owned_count.get(&owner).unwrap_or_default()
    }

    pub fn positions_of(&self, owner: Address) -> Vec<u64> {
        let count = self.balance_of(owner);
        (0..count)
            .filter_map(|i| self.owned_at.get(&(owner, i)))
            .collect()
    }

    /// Reward claimable right now (0 for unknown ids)
    pub fn claimable_rewards(&self, id: u64) -> U512 {
        match self.position(id) {
            Some(position) => Self::claimable_of(&position, self.now()),
            None => U512::zero(),
        }
    }

    /// Time at which the principal becomes claimable
    pub fn unbonding_end(&self, id: u64) -> Option<u64> {
        self.position(id)
            .map(|p| p.unbonding_start + UNBONDING_PERIOD_SECS)
    }

    /// Highest id handed out so far
    pub fn last_position_id(&self) -> u64 {
        self.last_id.get_or_default()
    }

    // ==========================================
    // Internal Functions
    // ==========================================

    fn require_vault(&self) {
        let caller = self.env().caller();
        if !auth::is_controller(self.vault.get(), &caller) {
            self.env().revert(RegistryError::Unauthorized);
        }
    }

    fn now(&self) -> u64 {
        self.env().get_block_time() / 1000
    }

    fn load(&self, id: u64) -> UnbondingPosition {
        match self.position(id) {
            Some(position) => position,
            None => self.env().revert(RegistryError::PositionNotFound),
        }
    }

    fn claimable_of(position: &UnbondingPosition, now: u64) -> U512 {
        let vested = math::vested_amount(
            position.reward_amount,
            position.reward_vesting_start,
            position.reward_vesting_end,
            now,
        );
        vested.saturating_sub(position.claimed_rewards)
    }

    fn remove(&mut self, id: u64, owner: Address) {
        self.index_remove(owner, id);
        self.positions.set(&id, None);
        self.env().emit_event(events::PositionDestroyed { id, owner });
    }

    fn index_add(&mut self, owner: Address, id: u64) {
        let count = self.owned_count.get(&owner).unwrap_or_default();
        self.owned_at.set(&(owner, count), id);
        self.owned_index.set(&id, count);
        self.owned_count.set(&owner, count + 1);
    }

    fn index_remove(&mut self, owner: Address, id: u64) {
        let count = self.owned_count.get(&owner).unwrap_or_default();
        if count == 0 {
            return;
        }
        let last = count - 1;
        let index = self.owned_index.get(&id).unwrap_or(last);
        if index != last {
            if let Some(moved) = self.owned_at.get(&(owner, last)) {
                self.owned_at.set(&(owner, index), moved);
                self.owned_index.set(&moved, index);
            }
        }
        self.owned_count.set(&owner, last);
    }
}
