use anchor_lang::prelude::*;

use crate::{constants::*, error::FarmError};

// ─── Farm ──────────────────────────────────────────────────────────────────
// Singleton configuration + emission schedule. The farm PDA is the mint
// authority of the reward mint: reward supply is only ever created by this
// program, at payout time.
#[account]
pub struct Farm {
    pub authority: Pubkey,          // 32
    /// Reward token minted to users on harvest
    pub reward_mint: Pubkey,        // 32
    /// Wallet that receives withdrawal fees and swept external yield
    pub fee_collector: Pubkey,      // 32
    /// Emission rate, reward base units per slot, split across pools
    pub reward_per_slot: u64,       // 8
    /// Slot before which no pool accrues
    pub start_slot: u64,            // 8
    /// sum(pool.alloc_points) over all pools
    pub total_alloc_points: u64,    // 8
    /// Append-only pool counter; also the next pool id
    pub pool_count: u64,            // 8
    /// Reward accrued but withheld by harvest lockups, across all users
    pub total_locked_up: u64,       // 8
    pub paused: bool,               // 1
    pub bump: u8,                   // 1
}

impl Farm {
    // 8 discriminator + 32*3 + 8*5 + 1 + 1 = 146
    pub const LEN: usize = 146;
}

// ─── Yield source ──────────────────────────────────────────────────────────
// The pluggable backend a pool delegates its principal to. Two shapes:
//   ChildFarm — legacy adapter convention: an external farm identified by
//               (program, pool id), paying yield in a conversion token.
//   Strategy  — purpose-built adapter with a hot-swappable downstream venue
//               and an enable/disable switch.
// Each variant carries its own total_staked mirror; outside of a single
// instruction it always equals pool.total_staked.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, Debug)]
pub enum YieldSource {
    None,
    ChildFarm {
        farm_program: Pubkey,
        child_pool_id: u64,
        conversion_token_mint: Pubkey,
        /// Referral account passed to the child farm's deposit, if supported
        referrer: Pubkey,
        /// Token account collecting the conversion-token yield
        yield_vault: Pubkey,
        total_staked: u64,
    },
    Strategy {
        /// Downstream venue the adapter deploys into (hot-swappable)
        venue: Pubkey,
        yield_mint: Pubkey,
        yield_vault: Pubkey,
        total_staked: u64,
        active: bool,
    },
}

impl YieldSource {
    // 1 tag + largest variant (ChildFarm: 32+8+32+32+32+8 = 144)
    pub const LEN: usize = 145;

    pub fn is_attached(&self) -> bool {
        !matches!(self, YieldSource::None)
    }

    /// Whether the backend accepts new deposits. A disabled strategy still
    /// allows withdrawals; a detached pool always accepts.
    pub fn is_active(&self) -> bool {
        match self {
            YieldSource::None => true,
            YieldSource::ChildFarm { .. } => true,
            YieldSource::Strategy { active, .. } => *active,
        }
    }

    /// Principal the backend reports as held, when one is attached.
    pub fn total_staked(&self) -> Option<u64> {
        match self {
            YieldSource::None => None,
            YieldSource::ChildFarm { total_staked, .. }
            | YieldSource::Strategy { total_staked, .. } => Some(*total_staked),
        }
    }

    /// Token account its incidental external yield accumulates in.
    pub fn yield_vault(&self) -> Option<Pubkey> {
        match self {
            YieldSource::None => None,
            YieldSource::ChildFarm { yield_vault, .. }
            | YieldSource::Strategy { yield_vault, .. } => Some(*yield_vault),
        }
    }

    /// Mint of the incidental yield token.
    pub fn yield_mint(&self) -> Option<Pubkey> {
        match self {
            YieldSource::None => None,
            YieldSource::ChildFarm {
                conversion_token_mint,
                ..
            } => Some(*conversion_token_mint),
            YieldSource::Strategy { yield_mint, .. } => Some(*yield_mint),
        }
    }

    /// Credit net-deposited principal to the backend's mirror.
    pub fn record_deposit(&mut self, net: u64) -> Result<()> {
        match self {
            YieldSource::None => Ok(()),
            YieldSource::ChildFarm { total_staked, .. }
            | YieldSource::Strategy { total_staked, .. } => {
                *total_staked = total_staked
                    .checked_add(net)
                    .ok_or(FarmError::MathOverflow)?;
                Ok(())
            }
        }
    }

    /// Debit withdrawn principal from the backend's mirror. Saturating:
    /// emergency exits may debit more than a best-effort backend returned.
    pub fn record_withdraw(&mut self, amount: u64) {
        match self {
            YieldSource::None => {}
            YieldSource::ChildFarm { total_staked, .. }
            | YieldSource::Strategy { total_staked, .. } => {
                *total_staked = total_staked.saturating_sub(amount);
            }
        }
    }
}

// ─── Pool ──────────────────────────────────────────────────────────────────
// One staked asset, one share of the global emission, one optional backend.
// Pools are append-only: they can be deactivated and detached but never
// deleted, so pool ids and historical accumulators stay addressable.
#[account]
pub struct Pool {
    pub farm: Pubkey,                   // 32
    pub pool_id: u64,                   // 8
    pub staked_mint: Pubkey,            // 32
    /// Principal custody, owned by the pool authority PDA
    pub stake_vault: Pubkey,            // 32
    pub authority_bump: u8,             // 1
    /// Share of global emission = alloc_points / farm.total_alloc_points
    pub alloc_points: u64,              // 8
    /// Slot at which acc_reward_per_share was last advanced
    pub last_accrual_slot: u64,         // 8
    /// Reward per staked unit since pool creation, ×ACC_PRECISION.
    /// Monotonically non-decreasing.
    pub acc_reward_per_share: u128,     // 16
    /// Sum of all user principal attributed to this pool
    pub total_staked: u64,              // 8
    /// Fee on withdrawn principal, routed to the fee collector
    pub withdrawal_fee_bps: u16,        // 2
    /// Minimum spacing between reward payouts per user, seconds
    pub harvest_interval: i64,          // 8
    /// Deposits allowed (independent of the global pause)
    pub active: bool,                   // 1
    /// Bumped on every yield-source attach; seeds that attachment's vault
    pub generation: u32,                // 4
    pub yield_source: YieldSource,      // 145
    pub bump: u8,                       // 1
}

impl Pool {
    // 8 discriminator + 32+8+32+32+1+8+8+16+8+2+8+1+4+145+1 = 314
    pub const LEN: usize = 314;

    /// Advance the reward accumulator to `current_slot`.
    ///
    /// Zero supply (or a zero-weight pool) advances the clock without
    /// accruing: idle periods do not retroactively reward future
    /// depositors. Must run before any other state is read in every
    /// deposit, withdraw, harvest, or backend switch.
    pub fn accrue(
        &mut self,
        current_slot: u64,
        reward_per_slot: u64,
        total_alloc_points: u64,
    ) -> Result<()> {
        if current_slot <= self.last_accrual_slot {
            return Ok(());
        }
        let supply = self.total_staked;
        if supply == 0 || self.alloc_points == 0 || total_alloc_points == 0 {
            self.last_accrual_slot = current_slot;
            return Ok(());
        }
        let elapsed = (current_slot - self.last_accrual_slot) as u128;
        let reward = elapsed
            .checked_mul(reward_per_slot as u128)
            .ok_or(FarmError::MathOverflow)?
            .checked_mul(self.alloc_points as u128)
            .ok_or(FarmError::MathOverflow)?
            / total_alloc_points as u128;
        self.acc_reward_per_share = self
            .acc_reward_per_share
            .checked_add(
                reward
                    .checked_mul(ACC_PRECISION)
                    .ok_or(FarmError::MathOverflow)?
                    / supply as u128,
            )
            .ok_or(FarmError::MathOverflow)?;
        self.last_accrual_slot = current_slot;
        Ok(())
    }

    /// Reward debt snapshot for a given stake at the current accumulator.
    pub fn reward_debt_for(&self, staked: u64) -> Result<u128> {
        Ok((staked as u128)
            .checked_mul(self.acc_reward_per_share)
            .ok_or(FarmError::MathOverflow)?
            / ACC_PRECISION)
    }

    /// Newly accrued (unsettled) reward for a position at the current
    /// accumulator. Excludes reward_locked_up.
    pub fn pending_for(&self, user: &UserPosition) -> Result<u64> {
        let owed = self.reward_debt_for(user.staked_amount)?;
        Ok(owed.saturating_sub(user.reward_debt) as u64)
    }
}

// ─── User position ─────────────────────────────────────────────────────────
// Created on first deposit, never closed: reward_locked_up / next_harvest_at
// must survive zero-stake periods.
#[account]
pub struct UserPosition {
    pub owner: Pubkey,              // 32
    pub pool: Pubkey,               // 32
    pub staked_amount: u64,         // 8
    /// staked_amount × acc_reward_per_share / ACC_PRECISION at last settle
    pub reward_debt: u128,          // 16
    /// Reward accrued but withheld by the harvest lockup
    pub reward_locked_up: u64,      // 8
    /// Timestamp after which a payout is permitted; 0 until first stake
    pub next_harvest_at: i64,       // 8
    pub bump: u8,                   // 1
}

impl UserPosition {
    // 8 discriminator + 32+32+8+16+8+8+1 = 113
    pub const LEN: usize = 113;

    pub fn can_harvest(&self, now: i64) -> bool {
        now >= self.next_harvest_at
    }
}

// ─── Delegate approval ─────────────────────────────────────────────────────
// (user, delegate) authorization table entry for deposit_for/withdraw_for.
#[account]
pub struct DelegateApproval {
    pub user: Pubkey,       // 32
    pub delegate: Pubkey,   // 32
    pub approved: bool,     // 1
    pub bump: u8,           // 1
}

impl DelegateApproval {
    // 8 discriminator + 32+32+1+1 = 74
    pub const LEN: usize = 74;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(alloc: u64, staked: u64) -> Pool {
        Pool {
            farm: Pubkey::default(),
            pool_id: 0,
            staked_mint: Pubkey::default(),
            stake_vault: Pubkey::default(),
            authority_bump: 255,
            alloc_points: alloc,
            last_accrual_slot: 0,
            acc_reward_per_share: 0,
            total_staked: staked,
            withdrawal_fee_bps: 0,
            harvest_interval: 0,
            active: true,
            generation: 0,
            yield_source: YieldSource::None,
            bump: 255,
        }
    }

    fn position(staked: u64) -> UserPosition {
        UserPosition {
            owner: Pubkey::default(),
            pool: Pubkey::default(),
            staked_amount: staked,
            reward_debt: 0,
            reward_locked_up: 0,
            next_harvest_at: 0,
            bump: 255,
        }
    }

    #[test]
    fn accrual_single_pool_five_slots() {
        // alloc=100, sole pool (total=100), 1e6 base units per slot,
        // 10 units staked, 5 slots elapsed => pool earns 5e6 total.
        let mut p = pool(100, 10);
        p.accrue(5, 1_000_000, 100).unwrap();
        assert_eq!(p.acc_reward_per_share, 500_000 * ACC_PRECISION);
        assert_eq!(p.pending_for(&position(10)).unwrap(), 5_000_000);
    }

    #[test]
    fn accrual_is_monotone_and_idempotent_per_slot() {
        let mut p = pool(50, 1_000);
        let mut last = 0u128;
        for slot in [1, 3, 3, 10, 10, 11] {
            p.accrue(slot, 777, 50).unwrap();
            assert!(p.acc_reward_per_share >= last);
            last = p.acc_reward_per_share;
        }
        // same-slot second call changes nothing
        let snapshot = p.acc_reward_per_share;
        p.accrue(11, 777, 50).unwrap();
        assert_eq!(p.acc_reward_per_share, snapshot);
    }

    #[test]
    fn zero_supply_advances_clock_without_accruing() {
        let mut p = pool(100, 0);
        p.accrue(100, 1_000, 100).unwrap();
        assert_eq!(p.acc_reward_per_share, 0);
        assert_eq!(p.last_accrual_slot, 100);
        // a depositor arriving now is not rewarded for the idle period
        p.total_staked = 10;
        p.accrue(100, 1_000, 100).unwrap();
        assert_eq!(p.acc_reward_per_share, 0);
    }

    #[test]
    fn zero_weight_pool_earns_nothing() {
        let mut p = pool(0, 500);
        p.accrue(40, 1_000, 100).unwrap();
        assert_eq!(p.acc_reward_per_share, 0);
        assert_eq!(p.last_accrual_slot, 40);
    }

    #[test]
    fn emission_splits_by_alloc_points() {
        // a pool holding 1/4 of the weight earns 1/4 of the emission
        let mut quarter = pool(25, 100);
        let mut full = pool(100, 100);
        quarter.accrue(10, 4_000, 100).unwrap();
        full.accrue(10, 4_000, 100).unwrap();
        assert_eq!(quarter.acc_reward_per_share * 4, full.acc_reward_per_share);
    }

    #[test]
    fn backend_mirror_tracks_deposits_and_withdrawals() {
        let mut src = YieldSource::Strategy {
            venue: Pubkey::new_unique(),
            yield_mint: Pubkey::new_unique(),
            yield_vault: Pubkey::new_unique(),
            total_staked: 0,
            active: true,
        };
        src.record_deposit(70).unwrap();
        src.record_withdraw(20);
        assert_eq!(src.total_staked(), Some(50));
        // best-effort exits may debit more than the mirror holds
        src.record_withdraw(200);
        assert_eq!(src.total_staked(), Some(0));
        assert!(src.is_active());
    }

    #[test]
    fn detached_pool_accepts_deposits_and_reports_no_total() {
        let src = YieldSource::None;
        assert!(src.is_active());
        assert!(!src.is_attached());
        assert_eq!(src.total_staked(), None);
        assert_eq!(src.yield_vault(), None);
    }
}
