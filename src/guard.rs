//! Per-contract reentrancy lock.
//!
//! Every entry point that moves value out (CSPR payouts, receipt transfers,
//! mint/burn) takes the lock on entry and releases it on exit. A nested
//! call into any locked entry point of the same contract reverts. A revert
//! anywhere rolls the lock back together with the rest of the call.

use odra::prelude::*;

#[odra::odra_error]
pub enum GuardError {
    ReentrantCall = 40001,
}

#[odra::module(errors = GuardError)]
pub struct ReentrancyGuard {
    locked: Var<bool>,
}

#[odra::module]
impl ReentrancyGuard {
    pub fn enter(&mut self) {
        if self.locked.get_or_default() {
            self.env().revert(GuardError::ReentrantCall);
        }
        self.locked.set(true);
    }

    pub fn exit(&mut self) {
        self.locked.set(false);
    }
}
