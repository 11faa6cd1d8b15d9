use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use super::set_pool::mass_accrue;
use crate::{
    constants::*,
    error::FarmError,
    state::{Farm, Pool, YieldSource},
};

/// Register a new pool. Pool ids are append-only (`farm.pool_count`); a
/// pool is never deleted, only deactivated or detached. When the new pool
/// carries weight, every existing pool must be supplied as a remaining
/// account, in ascending pool-id order, so it settles under the old total
/// first.
pub fn handler<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, AddPool<'info>>,
    alloc_points: u64,
    withdrawal_fee_bps: u16,
    harvest_interval: i64,
) -> Result<()> {
    require!(
        withdrawal_fee_bps <= MAX_WITHDRAWAL_FEE_BPS,
        FarmError::WithdrawalFeeTooHigh
    );
    require!(
        (0..=MAX_HARVEST_INTERVAL).contains(&harvest_interval),
        FarmError::HarvestIntervalTooLong
    );

    let clock = Clock::get()?;
    let farm_key = ctx.accounts.farm.key();

    if alloc_points > 0 && ctx.accounts.farm.pool_count > 0 {
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
    }

    let pool_id = ctx.accounts.farm.pool_count;
    let pool = &mut ctx.accounts.pool;
    pool.farm = farm_key;
    pool.pool_id = pool_id;
    pool.staked_mint = ctx.accounts.staked_mint.key();
    pool.stake_vault = ctx.accounts.stake_vault.key();
    pool.authority_bump = ctx.bumps.pool_authority;
    pool.alloc_points = alloc_points;
    pool.last_accrual_slot = clock.slot.max(ctx.accounts.farm.start_slot);
    pool.acc_reward_per_share = 0;
    pool.total_staked = 0;
    pool.withdrawal_fee_bps = withdrawal_fee_bps;
    pool.harvest_interval = harvest_interval;
    pool.active = true;
    pool.generation = 0;
    pool.yield_source = YieldSource::None;
    pool.bump = ctx.bumps.pool;

    let farm = &mut ctx.accounts.farm;
    farm.total_alloc_points = farm
        .total_alloc_points
        .checked_add(alloc_points)
        .ok_or(FarmError::MathOverflow)?;
    farm.pool_count = farm
        .pool_count
        .checked_add(1)
        .ok_or(FarmError::MathOverflow)?;

    msg!(
        "Pool {} added: mint={} alloc={} fee={}bps interval={}s",
        pool_id,
        ctx.accounts.staked_mint.key(),
        alloc_points,
        withdrawal_fee_bps,
        harvest_interval
    );
    Ok(())
}

#[derive(Accounts)]
pub struct AddPool<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(mut, seeds = [FARM_SEED], bump = farm.bump, has_one = authority)]
    pub farm: Account<'info, Farm>,

    pub staked_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = authority,
        space = Pool::LEN,
        seeds = [POOL_SEED, farm.key().as_ref(), &farm.pool_count.to_le_bytes()],
        bump,
    )]
    pub pool: Account<'info, Pool>,

    /// CHECK: PDA vault authority — owns the stake vault, holds no data
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        init,
        payer = authority,
        token::mint = staked_mint,
        token::authority = pool_authority,
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
