//! Protocol configuration: roles, pause flags, fee and treasury.
//!
//! Answers the vault's permission questions. Holds no funds.

use odra::prelude::*;

use crate::types::{Feature, Role};

/// Instant-redemption fee ceiling = 10%
pub const MAX_STAKING_FEE_BPS: u64 = 1_000;

pub mod events {
    use crate::types::{Feature, Role};
    use odra::prelude::*;

    #[odra::event]
    pub struct RoleGranted {
        pub role: Role,
        pub account: Address,
        pub by: Address,
    }

    #[odra::event]
    pub struct RoleRevoked {
        pub role: Role,
        pub account: Address,
        pub by: Address,
    }

    #[odra::event]
    pub struct PauseToggled {
        pub feature: Feature,
        pub paused: bool,
        pub by: Address,
    }

    #[odra::event]
    pub struct StakingFeeUpdated {
        pub old_bps: u64,
        pub new_bps: u64,
    }

    #[odra::event]
    pub struct TreasuryUpdated {
        pub old_treasury: Option<Address>,
        pub new_treasury: Address,
    }
}

#[odra::odra_error]
pub enum ConfigError {
    Unauthorized = 50001,
    FeeTooHigh = 50002,
    CannotRevokeLastAdmin = 50003,
}

#[odra::module(
    events = [
        events::RoleGranted,
        events::RoleRevoked,
        events::PauseToggled,
        events::StakingFeeUpdated,
        events::TreasuryUpdated
    ],
    errors = ConfigError
)]
pub struct ProtocolConfig {
    roles: Mapping<(Role, Address), bool>,
    admin_count: Var<u32>,
    paused: Mapping<Feature, bool>,
    staking_fee_bps: Var<u64>,
    treasury: Var<Address>,
}

#[odra::module]
impl ProtocolConfig {
    /// Initialize; the deployer becomes the first admin.
    pub fn init(&mut self, treasury: Address, staking_fee_bps: u64) {
        if staking_fee_bps > MAX_STAKING_FEE_BPS {
            self.env().revert(ConfigError::FeeTooHigh);
        }
        let deployer = self.env().caller();
        self.roles.set(&(Role::Admin, deployer), true);
        self.admin_count.set(1);
        self.staking_fee_bps.set(staking_fee_bps);
        self.treasury.set(treasury);
        self.env().emit_event(events::RoleGranted {
            role: Role::Admin,
            account: deployer,
            by: deployer,
        });
    }

    // ==========================================
    // Roles
    // ==========================================

    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.roles.get(&(role, account)).unwrap_or_default()
    }

    pub fn grant_role(&mut self, role: Role, account: Address) {
        self.require_admin();
        if self.has_role(role, account) {
            return;
        }
        self.roles.set(&(role, account), true);
        if role == Role::Admin {
            self.admin_count.set(self.admin_count.get_or_default() + 1);
        }
        self.env().emit_event(events::RoleGranted {
            role,
            account,
            by: self.env().caller(),
        });
    }

    pub fn revoke_role(&mut self, role: Role, account: Address) {
        self.require_admin();
        if !self.has_role(role, account) {
            return;
        }
        if role == Role::Admin {
            let admins = self.admin_count.get_or_default();
            if admins <= 1 {
                self.env().revert(ConfigError::CannotRevokeLastAdmin);
            }
            self.admin_count.set(admins - 1);
        }
        self.roles.set(&(role, account), false);
        self.env().emit_event(events::RoleRevoked {
            role,
            account,
            by: self.env().caller(),
        });
    }

    // ==========================================
    // Pause Flags
    // ==========================================

    pub fn is_paused(&self, feature: Feature) -> bool {
        self.paused.get(&feature).unwrap_or_default()
    }

    /// Pause or unpause one feature (pauser or admin)
    pub fn set_paused(&mut self, feature: Feature, paused: bool) {
        let caller = self.env().caller();
        if !self.has_role(Role::Pauser, caller) && !self.has_role(Role::Admin, caller) {
            self.env().revert(ConfigError::Unauthorized);
        }
        self.paused.set(&feature, paused);
        self.env().emit_event(events::PauseToggled {
            feature,
            paused,
            by: caller,
        });
    }

    // ==========================================
    // Fee and Treasury
    // ==========================================

    /// Fee charged on instant redemptions, in basis points
    pub fn staking_fee_bps(&self) -> u64 {
        self.staking_fee_bps.get_or_default()
    }

    pub fn set_staking_fee_bps(&mut self, new_bps: u64) {
        self.require_admin();
        if new_bps > MAX_STAKING_FEE_BPS {
            self.env().revert(ConfigError::FeeTooHigh);
        }
        let old_bps = self.staking_fee_bps.get_or_default();
        self.staking_fee_bps.set(new_bps);
        self.env().emit_event(events::StakingFeeUpdated { old_bps, new_bps });
    }

    pub fn treasury_address(&self) -> Option<Address> {
        self.treasury.get()
    }

    pub fn set_treasury(&mut self, new_treasury: Address) {
        self.require_admin();
        let old_treasury = self.treasury.get();
        self.treasury.set(new_treasury);
        self.env().emit_event(events::TreasuryUpdated {
            old_treasury,
            new_treasury,
        });
    }

    fn require_admin(&self) {
        if !self.has_role(Role::Admin, self.env().caller()) {
            self.env().revert(ConfigError::Unauthorized);
        }
    }
}
