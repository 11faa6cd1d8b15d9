//! On-chain account layouts, decoded without an Anchor dependency.
//!
//! Offsets mirror the Borsh layout of `programs/yield-farm/src/state.rs`;
//! every account starts with an 8-byte Anchor discriminator.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::error::{Error, Result};

/// Fixed-point scale of `acc_reward_per_share` (reward per staked unit, ×1e12).
pub const ACC_PRECISION: u128 = 1_000_000_000_000;

// ─── Byte cursor ──────────────────────────────────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(Error::ParseError {
                offset: self.pos,
                reason: format!("need {n} bytes, {} remain", self.data.len() - self.pos),
            });
        }
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn pubkey(&mut self) -> Result<Pubkey> {
        Ok(Pubkey::new_from_array(self.take(32)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn u128(&mut self) -> Result<u128> {
        Ok(u128::from_le_bytes(self.take(16)?.try_into().unwrap()))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn bool(&mut self) -> Result<bool> {
        Ok(self.u8()? != 0)
    }

    fn skip_discriminator(&mut self) -> Result<()> {
        self.take(8).map(|_| ())
    }
}

// ─── Farm ─────────────────────────────────────────────────────────────────────

/// Decoded `Farm` singleton.
#[derive(Debug, Clone, Serialize)]
pub struct FarmAccount {
    pub authority: Pubkey,
    pub reward_mint: Pubkey,
    pub fee_collector: Pubkey,
    pub reward_per_slot: u64,
    pub start_slot: u64,
    pub total_alloc_points: u64,
    pub pool_count: u64,
    pub total_locked_up: u64,
    pub paused: bool,
    pub bump: u8,
}

impl FarmAccount {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(data);
        c.skip_discriminator()?;
        Ok(Self {
            authority: c.pubkey()?,
            reward_mint: c.pubkey()?,
            fee_collector: c.pubkey()?,
            reward_per_slot: c.u64()?,
            start_slot: c.u64()?,
            total_alloc_points: c.u64()?,
            pool_count: c.u64()?,
            total_locked_up: c.u64()?,
            paused: c.bool()?,
            bump: c.u8()?,
        })
    }
}

// ─── Yield source ─────────────────────────────────────────────────────────────

/// Decoded `YieldSource` enum — the pool's pluggable backend.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum YieldSourceView {
    None,
    ChildFarm {
        farm_program: Pubkey,
        child_pool_id: u64,
        conversion_token_mint: Pubkey,
        referrer: Pubkey,
        yield_vault: Pubkey,
        total_staked: u64,
    },
    Strategy {
        venue: Pubkey,
        yield_mint: Pubkey,
        yield_vault: Pubkey,
        total_staked: u64,
        active: bool,
    },
}

impl YieldSourceView {
    fn parse(c: &mut Cursor) -> Result<Self> {
        let offset = c.pos;
        match c.u8()? {
            0 => Ok(Self::None),
            1 => Ok(Self::ChildFarm {
                farm_program: c.pubkey()?,
                child_pool_id: c.u64()?,
                conversion_token_mint: c.pubkey()?,
                referrer: c.pubkey()?,
                yield_vault: c.pubkey()?,
                total_staked: c.u64()?,
            }),
            2 => Ok(Self::Strategy {
                venue: c.pubkey()?,
                yield_mint: c.pubkey()?,
                yield_vault: c.pubkey()?,
                total_staked: c.u64()?,
                active: c.bool()?,
            }),
            tag => Err(Error::ParseError {
                offset,
                reason: format!("unknown yield source tag {tag}"),
            }),
        }
    }

    /// Whether new deposits into the pool currently reach a live backend.
    pub fn accepts_deposits(&self) -> bool {
        !matches!(self, Self::Strategy { active: false, .. })
    }
}

// ─── Pool ─────────────────────────────────────────────────────────────────────

/// Decoded `Pool` account.
#[derive(Debug, Clone, Serialize)]
pub struct PoolAccount {
    pub farm: Pubkey,
    pub pool_id: u64,
    pub staked_mint: Pubkey,
    pub stake_vault: Pubkey,
    pub authority_bump: u8,
    pub alloc_points: u64,
    pub last_accrual_slot: u64,
    pub acc_reward_per_share: u128,
    pub total_staked: u64,
    pub withdrawal_fee_bps: u16,
    pub harvest_interval: i64,
    pub active: bool,
    pub generation: u32,
    pub yield_source: YieldSourceView,
    pub bump: u8,
}

impl PoolAccount {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(data);
        c.skip_discriminator()?;
        Ok(Self {
            farm: c.pubkey()?,
            pool_id: c.u64()?,
            staked_mint: c.pubkey()?,
            stake_vault: c.pubkey()?,
            authority_bump: c.u8()?,
            alloc_points: c.u64()?,
            last_accrual_slot: c.u64()?,
            acc_reward_per_share: c.u128()?,
            total_staked: c.u64()?,
            withdrawal_fee_bps: c.u16()?,
            harvest_interval: c.i64()?,
            active: c.bool()?,
            generation: c.u32()?,
            yield_source: YieldSourceView::parse(&mut c)?,
            bump: c.u8()?,
        })
    }

    /// Project the accumulator forward to `current_slot` without touching
    /// the chain — the same math the program runs on the next accrual.
    pub fn projected_acc(
        &self,
        current_slot: u64,
        reward_per_slot: u64,
        total_alloc_points: u64,
    ) -> Result<u128> {
        if current_slot <= self.last_accrual_slot
            || self.total_staked == 0
            || self.alloc_points == 0
            || total_alloc_points == 0
        {
            return Ok(self.acc_reward_per_share);
        }
        let elapsed = (current_slot - self.last_accrual_slot) as u128;
        let reward = elapsed
            .checked_mul(reward_per_slot as u128)
            .ok_or(Error::MathOverflow)?
            .checked_mul(self.alloc_points as u128)
            .ok_or(Error::MathOverflow)?
            / total_alloc_points as u128;
        self.acc_reward_per_share
            .checked_add(
                reward
                    .checked_mul(ACC_PRECISION)
                    .ok_or(Error::MathOverflow)?
                    / self.total_staked as u128,
            )
            .ok_or(Error::MathOverflow)
    }
}

// ─── User position ────────────────────────────────────────────────────────────

/// Decoded `UserPosition` account.
#[derive(Debug, Clone, Serialize)]
pub struct PositionAccount {
    pub owner: Pubkey,
    pub pool: Pubkey,
    pub staked_amount: u64,
    pub reward_debt: u128,
    pub reward_locked_up: u64,
    pub next_harvest_at: i64,
    pub bump: u8,
}

impl PositionAccount {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(data);
        c.skip_discriminator()?;
        Ok(Self {
            owner: c.pubkey()?,
            pool: c.pubkey()?,
            staked_amount: c.u64()?,
            reward_debt: c.u128()?,
            reward_locked_up: c.u64()?,
            next_harvest_at: c.i64()?,
            bump: c.u8()?,
        })
    }

    /// Total claimable reward at `projected_acc`: newly accrued plus the
    /// balance held back by earlier lockups.
    pub fn pending_reward(&self, projected_acc: u128) -> Result<u64> {
        let owed = (self.staked_amount as u128)
            .checked_mul(projected_acc)
            .ok_or(Error::MathOverflow)?
            / ACC_PRECISION;
        let fresh = owed.saturating_sub(self.reward_debt) as u64;
        fresh
            .checked_add(self.reward_locked_up)
            .ok_or(Error::MathOverflow)
    }

    pub fn can_harvest(&self, now: i64) -> bool {
        now >= self.next_harvest_at
    }
}

// ─── Delegate approval ────────────────────────────────────────────────────────

/// Decoded `DelegateApproval` account.
#[derive(Debug, Clone, Serialize)]
pub struct DelegateApprovalAccount {
    pub user: Pubkey,
    pub delegate: Pubkey,
    pub approved: bool,
    pub bump: u8,
}

impl DelegateApprovalAccount {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(data);
        c.skip_discriminator()?;
        Ok(Self {
            user: c.pubkey()?,
            delegate: c.pubkey()?,
            approved: c.bool()?,
            bump: c.u8()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm_bytes() -> Vec<u8> {
        let mut v = vec![0u8; 8]; // discriminator
        v.extend_from_slice(Pubkey::new_unique().as_ref()); // authority
        v.extend_from_slice(Pubkey::new_unique().as_ref()); // reward_mint
        v.extend_from_slice(Pubkey::new_unique().as_ref()); // fee_collector
        v.extend_from_slice(&5_000u64.to_le_bytes()); // reward_per_slot
        v.extend_from_slice(&100u64.to_le_bytes()); // start_slot
        v.extend_from_slice(&300u64.to_le_bytes()); // total_alloc_points
        v.extend_from_slice(&3u64.to_le_bytes()); // pool_count
        v.extend_from_slice(&7u64.to_le_bytes()); // total_locked_up
        v.push(1); // paused
        v.push(254); // bump
        v
    }

    #[test]
    fn parses_farm_fields_in_order() {
        let f = FarmAccount::parse(&farm_bytes()).unwrap();
        assert_eq!(f.reward_per_slot, 5_000);
        assert_eq!(f.start_slot, 100);
        assert_eq!(f.total_alloc_points, 300);
        assert_eq!(f.pool_count, 3);
        assert_eq!(f.total_locked_up, 7);
        assert!(f.paused);
        assert_eq!(f.bump, 254);
    }

    #[test]
    fn truncated_account_reports_offset() {
        let mut v = farm_bytes();
        v.truncate(40);
        match FarmAccount::parse(&v) {
            Err(Error::ParseError { offset, .. }) => assert_eq!(offset, 40),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn pending_reward_includes_locked_balance() {
        let p = PositionAccount {
            owner: Pubkey::new_unique(),
            pool: Pubkey::new_unique(),
            staked_amount: 10,
            reward_debt: 0,
            reward_locked_up: 1_000,
            next_harvest_at: 500,
            bump: 255,
        };
        // acc = 2e5 per unit → 10 units owed 2e6, plus the locked 1e3
        let acc = 200_000 * ACC_PRECISION;
        assert_eq!(p.pending_reward(acc).unwrap(), 2_001_000);
        assert!(!p.can_harvest(499));
        assert!(p.can_harvest(500));
    }

    #[test]
    fn strategy_backend_gates_deposits_when_disabled() {
        let on = YieldSourceView::Strategy {
            venue: Pubkey::new_unique(),
            yield_mint: Pubkey::new_unique(),
            yield_vault: Pubkey::new_unique(),
            total_staked: 0,
            active: true,
        };
        let mut off = on.clone();
        if let YieldSourceView::Strategy { active, .. } = &mut off {
            *active = false;
        }
        assert!(on.accepts_deposits());
        assert!(!off.accepts_deposits());
        assert!(YieldSourceView::None.accepts_deposits());
    }
}
