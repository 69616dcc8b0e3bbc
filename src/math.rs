//! Fixed-point arithmetic shared by the vault, the registry and Boost.
//!
//! ## Units
//! - CSPR: motes (U512), 1 CSPR = 1e9 motes
//! - sCSPR receipts and Boost points: U256, 9 decimals
//! - Exchange rates and the Boost accumulator: scaled by `PRECISION` (1e18)
//!
//! Functions returning `Option` yield `None` on multiplication overflow; the
//! calling contract turns that into an `Overflow` revert.

use odra::casper_types::{U256, U512};

/// 1e18 fixed-point scale
pub const PRECISION: u128 = 1_000_000_000_000_000_000;
/// Basis points divisor
pub const BPS_DIVISOR: u64 = 10_000;
/// Seconds per year (365 days)
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Principal/reward split of a delayed redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedemptionSplit {
    pub principal: U512,
    pub reward: U512,
}

// ==========================================
// Unit Conversion
// ==========================================

/// Receipt units (9 decimals) to motes. Every U256 fits in a U512.
pub fn receipts_to_motes(amount: U256) -> U512 {
    let U256(limbs) = amount;
    U512([limbs[0], limbs[1], limbs[2], limbs[3], 0, 0, 0, 0])
}

/// Motes to receipt units (9 decimals). `None` above `U256::MAX`.
pub fn motes_to_receipts(amount: U512) -> Option<U256> {
    let U512(limbs) = amount;
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

// ==========================================
// Exchange Rate
// ==========================================

/// Receipts worth `value` motes. An empty pool mints 1:1.
/// A pool that lost all its value while receipts are outstanding mints nothing.
pub fn receipts_for_value(value: U512, supply: U512, pool: U512) -> Option<U512> {
    if supply.is_zero() {
        return Some(value);
    }
    if pool.is_zero() {
        return Some(U512::zero());
    }
    value.checked_mul(supply).map(|x| x / pool)
}

/// Motes redeemable for `receipts`.
pub fn value_of_receipts(receipts: U512, supply: U512, pool: U512) -> Option<U512> {
    if supply.is_zero() {
        return Some(receipts);
    }
    receipts.checked_mul(pool).map(|x| x / supply)
}

/// Motes per receipt, scaled by `PRECISION`.
pub fn exchange_rate(supply: U512, pool: U512) -> Option<U512> {
    if supply.is_zero() {
        return Some(U512::from(PRECISION));
    }
    pool.checked_mul(U512::from(PRECISION)).map(|x| x / supply)
}

/// Split a redemption of `receipts` currently worth `current_value`.
///
/// Without a snapshot the reward is whatever the receipts are worth above
/// 1:1. With a snapshot the reward is capped at what the snapshot rate
/// implies, so yield earned after the snapshot lands in principal. The
/// reward never exceeds the current value.
pub fn split_redemption(
    receipts: U512,
    current_value: U512,
    snapshot_rate: Option<U512>,
) -> Option<RedemptionSplit> {
    let reference = match snapshot_rate {
        None => current_value,
        Some(rate) => receipts.checked_mul(rate)? / U512::from(PRECISION),
    };
    let reward = reference.saturating_sub(receipts).min(current_value);
    Some(RedemptionSplit {
        principal: current_value - reward,
        reward,
    })
}

/// Take up to `amount` out of `available`.
/// Returns `(taken, remaining)`; never underflows.
pub fn deduct_capped(available: U512, amount: U512) -> (U512, U512) {
    let taken = amount.min(available);
    (taken, available - taken)
}

/// `amount * bps / 10_000`, rounded down.
pub fn bps_of(amount: U512, bps: u64) -> Option<U512> {
    amount
        .checked_mul(U512::from(bps))
        .map(|x| x / U512::from(BPS_DIVISOR))
}

// ==========================================
// Vesting
// ==========================================

/// Linearly vested part of `total` over `[start, end]` at `now`.
/// A zero-length window vests everything at `start`.
pub fn vested_amount(total: U512, start: u64, end: u64, now: u64) -> U512 {
    if now < start {
        return U512::zero();
    }
    if end <= start {
        return total;
    }
    let window = end - start;
    let elapsed = (now - start).min(window);
    total * U512::from(elapsed) / U512::from(window)
}

// ==========================================
// Boost Curve and Accumulator
// ==========================================

/// Piecewise-linear rate: `max` on an empty pool, falling linearly to `min`
/// at `target` and flat beyond it.
pub fn utilization_rate_bps(total_staked: U256, target: U256, min_bps: u64, max_bps: u64) -> u64 {
    if target.is_zero() || total_staked >= target {
        return min_bps;
    }
    let span = max_bps.saturating_sub(min_bps);
    let drop = U256::from(span) * total_staked / target;
    max_bps - drop.as_u64()
}

/// Points accrued by `total_staked` at `rate_bps` APY over `elapsed` seconds.
pub fn accrued_reward(total_staked: U256, rate_bps: u64, elapsed: u64) -> Option<U256> {
    total_staked
        .checked_mul(U256::from(rate_bps))?
        .checked_mul(U256::from(elapsed))
        .map(|x| x / (U256::from(BPS_DIVISOR) * U256::from(SECONDS_PER_YEAR)))
}

/// Accumulator increase for `reward` spread over `total_staked`.
pub fn per_share_increment(reward: U256, total_staked: U256) -> Option<U256> {
    if total_staked.is_zero() {
        return Some(U256::zero());
    }
    reward
        .checked_mul(U256::from(PRECISION))
        .map(|x| x / total_staked)
}

/// `staked * acc_per_share`, descaled. Used both for reward debt and for
/// the gross entitlement of a stake.
pub fn accumulated_for(staked: U256, acc_per_share: U256) -> Option<U256> {
    staked
        .checked_mul(acc_per_share)
        .map(|x| x / U256::from(PRECISION))
}
