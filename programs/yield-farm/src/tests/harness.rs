//! Ledger simulation: one farm, N pools, a fixed set of wallets.
//!
//! Each operation performs the same sequence as the corresponding handler
//! (accrue, settle, move principal, recompute debt) with token transfers
//! replaced by balance arithmetic. `emitted` tracks the total reward the
//! emission schedule attributed to staked pools, so tests can assert that
//! payouts never exceed it.

use anchor_lang::prelude::Pubkey;

use crate::constants::*;
use crate::instructions::reward_math::{settle, split_withdrawal_fee};
use crate::state::{Pool, UserPosition, YieldSource};

pub const USERS: usize = 4;
const STARTING_BALANCE: u64 = 1_000_000_000_000;

pub struct PoolSim {
    pub pool: Pool,
    /// Stake vault balance (principal custody)
    pub vault: u64,
    /// Withdrawal fees collected, in the staked token
    pub fees_collected: u64,
    /// Incidental backend yield accumulated, in the backend's yield token
    pub yield_vault: u64,
    /// Backend yield swept to the fee collector so far
    pub yield_swept: u64,
    /// Deposit fee the attached backend skims before crediting, in bps
    pub deposit_skim_bps: u16,
    pub positions: [UserPosition; USERS],
    /// Staked-token wallet balances
    pub wallets: [u64; USERS],
    /// Reward-token balances (minted on payout)
    pub rewards: [u64; USERS],
}

pub struct Sim {
    pub slot: u64,
    pub now: i64,
    pub paused: bool,
    pub reward_per_slot: u64,
    pub total_alloc_points: u64,
    pub total_locked_up: u64,
    /// Total reward minted to users
    pub minted: u64,
    /// Total reward the schedule attributed to staked, weighted pools
    pub emitted: u128,
    pub pools: Vec<PoolSim>,
}

fn blank_position() -> UserPosition {
    UserPosition {
        owner: Pubkey::default(),
        pool: Pubkey::default(),
        staked_amount: 0,
        reward_debt: 0,
        reward_locked_up: 0,
        next_harvest_at: 0,
        bump: 255,
    }
}

impl Sim {
    pub fn new(reward_per_slot: u64) -> Self {
        Self {
            slot: 0,
            now: 0,
            paused: false,
            reward_per_slot,
            total_alloc_points: 0,
            total_locked_up: 0,
            minted: 0,
            emitted: 0,
            pools: Vec::new(),
        }
    }

    pub fn add_pool(
        &mut self,
        alloc_points: u64,
        withdrawal_fee_bps: u16,
        harvest_interval: i64,
    ) -> usize {
        assert!(withdrawal_fee_bps <= MAX_WITHDRAWAL_FEE_BPS);
        assert!(harvest_interval <= MAX_HARVEST_INTERVAL);
        if alloc_points > 0 {
            self.mass_accrue();
        }
        self.total_alloc_points += alloc_points;
        let pool = Pool {
            farm: Pubkey::default(),
            pool_id: self.pools.len() as u64,
            staked_mint: Pubkey::new_unique(),
            stake_vault: Pubkey::new_unique(),
            authority_bump: 255,
            alloc_points,
            last_accrual_slot: self.slot,
            acc_reward_per_share: 0,
            total_staked: 0,
            withdrawal_fee_bps,
            harvest_interval,
            active: true,
            generation: 0,
            yield_source: YieldSource::None,
            bump: 255,
        };
        self.pools.push(PoolSim {
            pool,
            vault: 0,
            fees_collected: 0,
            yield_vault: 0,
            yield_swept: 0,
            deposit_skim_bps: 0,
            positions: std::array::from_fn(|_| blank_position()),
            wallets: [STARTING_BALANCE; USERS],
            rewards: [0; USERS],
        });
        self.pools.len() - 1
    }

    /// Advance the chain clock. One slot ≈ 400ms; tests pass both
    /// explicitly so lockup timing stays readable.
    pub fn advance(&mut self, slots: u64, secs: i64) {
        self.slot += slots;
        self.now += secs;
    }

    pub fn accrue_pool(&mut self, pid: usize) {
        let pool = &self.pools[pid].pool;
        if self.slot > pool.last_accrual_slot
            && pool.total_staked > 0
            && pool.alloc_points > 0
            && self.total_alloc_points > 0
        {
            let elapsed = (self.slot - pool.last_accrual_slot) as u128;
            self.emitted += elapsed * self.reward_per_slot as u128 * pool.alloc_points as u128
                / self.total_alloc_points as u128;
        }
        self.pools[pid]
            .pool
            .accrue(self.slot, self.reward_per_slot, self.total_alloc_points)
            .unwrap();
    }

    pub fn mass_accrue(&mut self) {
        for pid in 0..self.pools.len() {
            self.accrue_pool(pid);
        }
    }

    // ── Settlement plumbing shared by deposit and withdraw ──────────────────

    fn settle_position(&mut self, pid: usize, uid: usize) -> u64 {
        let now = self.now;
        let s = {
            let ps = &mut self.pools[pid];
            settle(&ps.pool, &mut ps.positions[uid], now).unwrap()
        };
        self.total_locked_up = self
            .total_locked_up
            .checked_add(s.newly_locked)
            .unwrap()
            .saturating_sub(s.released);
        self.minted += s.payout;
        self.pools[pid].rewards[uid] += s.payout;
        s.payout
    }

    // ── User operations ─────────────────────────────────────────────────────

    /// Stake `amount` (0 = harvest only). Returns the reward paid out.
    pub fn deposit(&mut self, pid: usize, uid: usize, amount: u64) -> Result<u64, &'static str> {
        if self.paused {
            return Err("farm paused");
        }
        // A failed instruction leaves no trace, so reject before settling
        if amount > 0 {
            if !self.pools[pid].pool.active {
                return Err("pool inactive");
            }
            if !self.pools[pid].pool.yield_source.is_active() {
                return Err("backend disabled");
            }
        }
        self.accrue_pool(pid);
        let payout = self.settle_position(pid, uid);

        if amount > 0 {
            let ps = &mut self.pools[pid];
            let skim =
                ((amount as u128 * ps.deposit_skim_bps as u128) / BPS_DENOMINATOR) as u64;
            let net = amount - skim;
            ps.wallets[uid] -= amount;
            ps.vault += net;

            let position = &mut ps.positions[uid];
            let was_unstaked = position.staked_amount == 0;
            position.staked_amount += net;
            ps.pool.total_staked += net;
            ps.pool.yield_source.record_deposit(net).unwrap();
            if was_unstaked && position.staked_amount > 0 && position.next_harvest_at == 0 {
                position.next_harvest_at = self.now + ps.pool.harvest_interval;
            }
        }

        let ps = &mut self.pools[pid];
        ps.positions[uid].reward_debt =
            ps.pool.reward_debt_for(ps.positions[uid].staked_amount).unwrap();
        Ok(payout)
    }

    pub fn harvest(&mut self, pid: usize, uid: usize) -> Result<u64, &'static str> {
        self.deposit(pid, uid, 0)
    }

    /// Unstake `amount`. Returns (fee, net principal, reward paid out).
    pub fn withdraw(
        &mut self,
        pid: usize,
        uid: usize,
        amount: u64,
    ) -> Result<(u64, u64, u64), &'static str> {
        if self.paused {
            return Err("farm paused");
        }
        if amount > self.pools[pid].positions[uid].staked_amount {
            return Err("insufficient stake");
        }
        self.accrue_pool(pid);
        let payout = self.settle_position(pid, uid);

        let mut fee = 0;
        let mut net = 0;
        if amount > 0 {
            let ps = &mut self.pools[pid];
            let (f, n) = split_withdrawal_fee(amount, ps.pool.withdrawal_fee_bps).unwrap();
            fee = f;
            net = n;
            ps.vault -= amount;
            ps.fees_collected += fee;
            ps.wallets[uid] += net;
            ps.positions[uid].staked_amount -= amount;
            ps.pool.total_staked -= amount;
            ps.pool.yield_source.record_withdraw(amount);
        }

        let ps = &mut self.pools[pid];
        ps.positions[uid].reward_debt =
            ps.pool.reward_debt_for(ps.positions[uid].staked_amount).unwrap();
        Ok((fee, net, payout))
    }

    /// Best-effort exit: no settlement, no fee, ignores the pause.
    /// Returns (amount recovered, reward forfeited).
    pub fn emergency_withdraw(&mut self, pid: usize, uid: usize) -> (u64, u64) {
        self.accrue_pool(pid);
        let ps = &mut self.pools[pid];
        let staked = ps.positions[uid].staked_amount;
        let forfeited = ps.positions[uid].reward_locked_up;

        let amount_out = staked.min(ps.vault);
        ps.vault -= amount_out;
        ps.wallets[uid] += amount_out;

        ps.pool.total_staked -= staked;
        ps.pool.yield_source.record_withdraw(staked);
        self.total_locked_up = self.total_locked_up.saturating_sub(forfeited);

        let position = &mut ps.positions[uid];
        position.staked_amount = 0;
        position.reward_debt = 0;
        position.reward_locked_up = 0;
        (amount_out, forfeited)
    }

    // ── Admin operations ────────────────────────────────────────────────────

    pub fn set_alloc_points(&mut self, pid: usize, alloc_points: u64) {
        self.mass_accrue();
        let old = self.pools[pid].pool.alloc_points;
        self.total_alloc_points = self.total_alloc_points - old + alloc_points;
        self.pools[pid].pool.alloc_points = alloc_points;
    }

    pub fn set_reward_per_slot(&mut self, reward_per_slot: u64) {
        self.mass_accrue();
        self.reward_per_slot = reward_per_slot;
    }

    pub fn attach_child_farm(&mut self, pid: usize, skim_bps: u16) -> Result<(), &'static str> {
        self.accrue_pool(pid);
        let ps = &mut self.pools[pid];
        assert!(!ps.pool.yield_source.is_attached());
        ps.pool.generation = ps
            .pool
            .generation
            .checked_add(1)
            .ok_or("generation overflow")?;
        ps.pool.yield_source = YieldSource::ChildFarm {
            farm_program: Pubkey::new_unique(),
            child_pool_id: 0,
            conversion_token_mint: Pubkey::new_unique(),
            referrer: Pubkey::new_unique(),
            yield_vault: Pubkey::new_unique(),
            total_staked: ps.pool.total_staked,
        };
        ps.deposit_skim_bps = skim_bps;
        Ok(())
    }

    pub fn attach_strategy(&mut self, pid: usize) -> Result<(), &'static str> {
        self.accrue_pool(pid);
        let ps = &mut self.pools[pid];
        assert!(!ps.pool.yield_source.is_attached());
        ps.pool.generation = ps
            .pool
            .generation
            .checked_add(1)
            .ok_or("generation overflow")?;
        ps.pool.yield_source = new_strategy(ps.pool.total_staked);
        ps.deposit_skim_bps = 0;
        Ok(())
    }

    pub fn switch_to_strategy(&mut self, pid: usize) -> Result<(), &'static str> {
        self.accrue_pool(pid);
        let ps = &mut self.pools[pid];
        assert_eq!(
            ps.pool.yield_source.total_staked(),
            Some(ps.pool.total_staked),
            "backend books must balance before a switch"
        );
        // the outgoing backend's yield vault is swept on exit
        ps.yield_swept += ps.yield_vault;
        ps.yield_vault = 0;
        ps.pool.generation = ps
            .pool
            .generation
            .checked_add(1)
            .ok_or("generation overflow")?;
        ps.pool.yield_source = new_strategy(ps.pool.total_staked);
        ps.deposit_skim_bps = 0;
        Ok(())
    }

    pub fn detach(&mut self, pid: usize) {
        self.accrue_pool(pid);
        let ps = &mut self.pools[pid];
        assert_eq!(
            ps.pool.yield_source.total_staked(),
            Some(ps.pool.total_staked),
            "backend books must balance before a detach"
        );
        ps.yield_swept += ps.yield_vault;
        ps.yield_vault = 0;
        ps.pool.yield_source = YieldSource::None;
        ps.deposit_skim_bps = 0;
    }

    /// External yield the backend dropped into its vault.
    pub fn credit_external_yield(&mut self, pid: usize, amount: u64) {
        assert!(self.pools[pid].pool.yield_source.is_attached());
        self.pools[pid].yield_vault += amount;
    }

    /// Sweep the backend's yield vault to the fee collector. Returns the
    /// swept amount; principal and reward accounting are untouched.
    pub fn drain(&mut self, pid: usize) -> u64 {
        let ps = &mut self.pools[pid];
        assert!(ps.pool.yield_source.is_attached(), "no yield source");
        let swept = ps.yield_vault;
        ps.yield_vault = 0;
        ps.yield_swept += swept;
        swept
    }

    pub fn set_strategy_active(&mut self, pid: usize, active: bool) {
        match &mut self.pools[pid].pool.yield_source {
            YieldSource::Strategy { active: a, .. } => *a = active,
            other => panic!("not a strategy: {other:?}"),
        }
    }

    // ── Invariant checks ────────────────────────────────────────────────────

    /// Position sum equals the pool total, and the backend mirror agrees.
    pub fn assert_books(&self, pid: usize) {
        let ps = &self.pools[pid];
        let staked_sum: u64 = ps.positions.iter().map(|p| p.staked_amount).sum();
        assert_eq!(staked_sum, ps.pool.total_staked, "position sum vs pool total");
        if let Some(mirror) = ps.pool.yield_source.total_staked() {
            assert_eq!(mirror, ps.pool.total_staked, "backend mirror drifted");
        }
    }

    /// Nothing paid or withheld beyond what the schedule emitted.
    pub fn assert_emission_bound(&self) {
        assert!(
            self.minted as u128 + self.total_locked_up as u128 <= self.emitted,
            "minted {} + locked {} exceeds emitted {}",
            self.minted,
            self.total_locked_up,
            self.emitted
        );
    }
}

fn new_strategy(total_staked: u64) -> YieldSource {
    YieldSource::Strategy {
        venue: Pubkey::new_unique(),
        yield_mint: Pubkey::new_unique(),
        yield_vault: Pubkey::new_unique(),
        total_staked,
        active: true,
    }
}
