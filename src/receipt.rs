//! sCSPR: CEP-18 receipt for a share of the staking pool.
//!
//! Only the minter (the vault) can mint and burn. Burning takes from the
//! target address directly, so redemptions need no prior approval.

use alloc::string::String;
use odra::casper_types::U256;
use odra::prelude::*;
use odra_modules::cep18::events::{
    Burn, DecreaseAllowance, IncreaseAllowance, Mint, SetAllowance, Transfer, TransferFrom,
};
use odra_modules::cep18_token::Cep18;

use crate::auth;

/// 9 decimals, so an empty pool mints one receipt unit per mote
pub const RECEIPT_DECIMALS: u8 = 9;

pub mod events {
    use odra::prelude::*;

    #[odra::event]
    pub struct MinterSet {
        pub old_minter: Option<Address>,
        pub new_minter: Address,
    }
}

#[odra::odra_error]
pub enum TokenError {
    Unauthorized = 60004,
}

#[odra::module(
    events = [
        Mint,
        Burn,
        SetAllowance,
        IncreaseAllowance,
        DecreaseAllowance,
        Transfer,
        TransferFrom,
        events::MinterSet
    ],
    errors = TokenError
)]
pub struct ReceiptToken {
    token: SubModule<Cep18>,
    minter: Var<Address>,
}

#[odra::module]
impl ReceiptToken {
    /// Deploy with a temporary minter, then hand over to the vault.
    pub fn init(&mut self, minter: Address) {
        self.token.init(
            "sCSPR".to_string(),
            "Staked CSPR".to_string(),
            RECEIPT_DECIMALS,
            U256::zero(),
        );
        self.minter.set(minter);
        self.env().emit_event(events::MinterSet {
            old_minter: None,
            new_minter: minter,
        });
    }

    pub fn minter(&self) -> Option<Address> {
        self.minter.get()
    }

    /// Only the current minter can hand over minting authority.
    pub fn set_minter(&mut self, new_minter: Address) {
        let caller = self.env().caller();
        let current_minter = self.minter.get();
        if !auth::is_controller(current_minter, &caller) {
            self.env().revert(TokenError::Unauthorized);
        }
        self.minter.set(new_minter);
        self.env().emit_event(events::MinterSet {
            old_minter: current_minter,
            new_minter,
        });
    }

    pub fn name(&self) -> String {
        self.token.name()
    }

    pub fn symbol(&self) -> String {
        self.token.symbol()
    }

    pub fn decimals(&self) -> u8 {
        self.token.decimals()
    }

    pub fn total_supply(&self) -> U256 {
        self.token.total_supply()
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.token.balance_of(&owner)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.token.allowance(&owner, &spender)
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) {
        self.token.transfer(&recipient, &amount);
    }

    pub fn approve(&mut self, spender: Address, amount: U256) {
        self.token.approve(&spender, &amount);
    }

    pub fn increase_allowance(&mut self, spender: Address, amount: U256) {
        self.token.increase_allowance(&spender, &amount);
    }

    pub fn decrease_allowance(&mut self, spender: Address, amount: U256) {
        self.token.decrease_allowance(&spender, &amount);
    }

    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) {
        self.token.transfer_from(&owner, &recipient, &amount);
    }

    /// Mint receipts (minter only)
    pub fn mint(&mut self, to: Address, amount: U256) {
        self.require_minter();
        self.token.raw_mint(&to, &amount);
    }

    /// Burn receipts held by `from` (minter only)
    pub fn burn(&mut self, from: Address, amount: U256) {
        self.require_minter();
        self.token.raw_burn(&from, &amount);
    }

    fn require_minter(&self) {
        let caller = self.env().caller();
        if !auth::is_controller(self.minter.get(), &caller) {
            self.env().revert(TokenError::Unauthorized);
        }
    }
}
