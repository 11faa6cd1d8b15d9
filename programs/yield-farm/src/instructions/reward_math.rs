use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::FarmError,
    state::{Pool, UserPosition},
};

/// Result of a reward settlement, shared by `deposit`, `withdraw` and the
/// harvest-only path (deposit of zero).
pub struct Settlement {
    /// Reward to mint to the beneficiary now (pending + released lockup).
    pub payout: u64,
    /// Pending reward newly withheld because the lockup has not elapsed.
    pub newly_locked: u64,
    /// Previously locked reward released as part of the payout.
    pub released: u64,
}

impl Settlement {
    pub const NONE: Settlement = Settlement {
        payout: 0,
        newly_locked: 0,
        released: 0,
    };
}

/// Settle newly accrued reward for a position against the harvest lockup.
///
/// Pool accumulator must already be advanced to the current slot. Does not
/// touch `reward_debt` — callers recompute it after any stake change.
///
/// Lockup clock rules (pinned by tests):
///   - a settlement whose total is zero never touches `next_harvest_at`;
///   - the clock refreshes only on an actual payout;
///   - locking pending while the clock runs leaves the deadline unchanged.
pub fn settle(pool: &Pool, user: &mut UserPosition, now: i64) -> Result<Settlement> {
    // Zero stake can still hold a locked balance from before a full
    // withdrawal; it stays claimable once the lockup elapses.
    if user.staked_amount == 0 && user.reward_locked_up == 0 {
        return Ok(Settlement::NONE);
    }

    let pending = pool.pending_for(user)?;
    let total = pending
        .checked_add(user.reward_locked_up)
        .ok_or(FarmError::MathOverflow)?;
    if total == 0 {
        return Ok(Settlement::NONE);
    }

    if user.can_harvest(now) {
        let released = user.reward_locked_up;
        user.reward_locked_up = 0;
        user.next_harvest_at = now
            .checked_add(pool.harvest_interval)
            .ok_or(FarmError::MathOverflow)?;
        Ok(Settlement {
            payout: total,
            newly_locked: 0,
            released,
        })
    } else {
        user.reward_locked_up = user
            .reward_locked_up
            .checked_add(pending)
            .ok_or(FarmError::MathOverflow)?;
        Ok(Settlement {
            payout: 0,
            newly_locked: pending,
            released: 0,
        })
    }
}

/// Split a withdrawn principal amount into (fee, net-to-user).
pub fn split_withdrawal_fee(amount: u64, fee_bps: u16) -> Result<(u64, u64)> {
    let fee = (amount as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(FarmError::MathOverflow)?
        / BPS_DENOMINATOR;
    let fee = fee as u64;
    // fee_bps is capped at 10% so fee < amount always
    Ok((fee, amount - fee))
}
