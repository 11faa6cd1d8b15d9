use anchor_lang::prelude::*;

use crate::constants::FARM_SEED;
use crate::state::{Farm, Pool};

/// Permissionless crank: advance a pool's reward accumulator to the
/// current slot. Every user-facing operation accrues on its own; this
/// exists so idle pools can be settled on a schedule.
pub fn handler(ctx: Context<UpdatePool>) -> Result<()> {
    let clock = Clock::get()?;
    let farm = &ctx.accounts.farm;
    ctx.accounts
        .pool
        .accrue(clock.slot, farm.reward_per_slot, farm.total_alloc_points)?;
    msg!(
        "Pool {} accrued to slot {}",
        ctx.accounts.pool.pool_id,
        clock.slot
    );
    Ok(())
}

#[derive(Accounts)]
pub struct UpdatePool<'info> {
    #[account(seeds = [FARM_SEED], bump = farm.bump)]
    pub farm: Account<'info, Farm>,

    #[account(mut, constraint = pool.farm == farm.key())]
    pub pool: Account<'info, Pool>,
}
