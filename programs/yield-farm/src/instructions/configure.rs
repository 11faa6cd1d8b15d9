use anchor_lang::prelude::*;

use super::set_pool::mass_accrue;
use crate::{
    constants::*,
    error::FarmError,
    state::{Farm, Pool},
};

// ─── Global switches ───────────────────────────────────────────────────────

/// Pause or resume user flows. Pausing blocks deposit/withdraw (and their
/// delegated forms) but never emergency withdraw or admin operations —
/// incident response must not trap funds.
pub fn set_paused(ctx: Context<ConfigureFarm>, paused: bool) -> Result<()> {
    ctx.accounts.farm.paused = paused;
    msg!("Farm paused={}", paused);
    Ok(())
}

pub fn set_fee_collector(ctx: Context<ConfigureFarm>, fee_collector: Pubkey) -> Result<()> {
    ctx.accounts.farm.fee_collector = fee_collector;
    msg!("Fee collector set: {}", fee_collector);
    Ok(())
}

/// Change the global emission rate. Every pool must be supplied as a
/// remaining account, in ascending pool-id order: elapsed slots settle at
/// the old rate first.
pub fn set_reward_per_slot<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, ConfigureFarm<'info>>,
    reward_per_slot: u64,
) -> Result<()> {
    let clock = Clock::get()?;
    let farm_key = ctx.accounts.farm.key();
    let seen = mass_accrue(
        &farm_key,
        &ctx.accounts.farm,
        ctx.remaining_accounts,
        clock.slot,
    )?;
    require!(
        seen == ctx.accounts.farm.pool_count,
        FarmError::IncompleteMassUpdate
    );

    ctx.accounts.farm.reward_per_slot = reward_per_slot;
    msg!("Emission rate set: {}/slot", reward_per_slot);
    Ok(())
}

// ─── Per-pool switch ───────────────────────────────────────────────────────

/// Open or close a pool for deposits. Withdrawals are never gated by this.
pub fn set_pool_active(ctx: Context<ConfigurePool>, active: bool) -> Result<()> {
    ctx.accounts.pool.active = active;
    msg!("Pool {} active={}", ctx.accounts.pool.pool_id, active);
    Ok(())
}

#[derive(Accounts)]
pub struct ConfigureFarm<'info> {
    pub authority: Signer<'info>,

    #[account(mut, seeds = [FARM_SEED], bump = farm.bump, has_one = authority)]
    pub farm: Account<'info, Farm>,
}

#[derive(Accounts)]
pub struct ConfigurePool<'info> {
    pub authority: Signer<'info>,

    #[account(seeds = [FARM_SEED], bump = farm.bump, has_one = authority)]
    pub farm: Account<'info, Farm>,

    #[account(mut, constraint = pool.farm == farm.key())]
    pub pool: Account<'info, Pool>,
}
