use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, Token, TokenAccount};

use super::drain::sweep_yield_vault;
use crate::{
    constants::*,
    error::FarmError,
    state::{Farm, Pool},
};

// ─── Full backend exit ─────────────────────────────────────────────────────
// Settle the outgoing backend: harvest its incidental yield to the fee
// collector, close its yield vault, and report any custody residue beyond
// the attributed principal. Principal and reward accounting are untouched.
// Shared with switch_yield_source.
pub fn exit_source<'info>(
    token_program: &Program<'info, Token>,
    old_yield_vault: &Account<'info, TokenAccount>,
    fee_collector_token: &Account<'info, TokenAccount>,
    pool_authority: &UncheckedAccount<'info>,
    rent_destination: &AccountInfo<'info>,
    pool: &Account<'info, Pool>,
    stake_vault: &Account<'info, TokenAccount>,
) -> Result<u64> {
    // Divergence here means an earlier operation broke the books; abort
    // rather than silently rebase.
    require!(
        pool.yield_source.total_staked() == Some(pool.total_staked),
        FarmError::BackendAccounting
    );

    let pool_key = pool.key();
    let swept = sweep_yield_vault(
        token_program,
        old_yield_vault,
        fee_collector_token,
        pool_authority,
        &pool_key,
        pool.authority_bump,
    )?;

    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[pool.authority_bump]];
    token::close_account(CpiContext::new_with_signer(
        token_program.to_account_info(),
        CloseAccount {
            account: old_yield_vault.to_account_info(),
            destination: rent_destination.to_account_info(),
            authority: pool_authority.to_account_info(),
        },
        &[seeds],
    ))?;

    // Rounding residue a backend left behind never inflates total_staked
    let residue = stake_vault.amount.saturating_sub(pool.total_staked);
    if residue > 0 {
        msg!("Yield source exit residue: {} (left in custody)", residue);
    }
    Ok(swept)
}

/// Remove a pool's backend. Principal stays in custody and keeps earning
/// the base emission; only the external-yield layer goes away.
pub fn handler(ctx: Context<DetachYieldSource>) -> Result<()> {
    require!(
        ctx.accounts.pool.yield_source.is_attached(),
        FarmError::NoYieldSource
    );

    let clock = Clock::get()?;
    {
        let farm = &ctx.accounts.farm;
        ctx.accounts
            .pool
            .accrue(clock.slot, farm.reward_per_slot, farm.total_alloc_points)?;
    }

    let swept = exit_source(
        &ctx.accounts.token_program,
        &ctx.accounts.old_yield_vault,
        &ctx.accounts.fee_collector_token,
        &ctx.accounts.pool_authority,
        &ctx.accounts.authority.to_account_info(),
        &ctx.accounts.pool,
        &ctx.accounts.stake_vault,
    )?;

    ctx.accounts.pool.yield_source = crate::state::YieldSource::None;

    msg!(
        "Pool {} yield source detached: swept={}",
        ctx.accounts.pool.pool_id,
        swept
    );
    Ok(())
}

#[derive(Accounts)]
pub struct DetachYieldSource<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [FARM_SEED], bump = farm.bump, has_one = authority)]
    pub farm: Account<'info, Farm>,

    #[account(mut, constraint = pool.farm == farm.key())]
    pub pool: Account<'info, Pool>,

    /// CHECK: PDA owning the pool's vaults
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump = pool.authority_bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = Some(old_yield_vault.key()) == pool.yield_source.yield_vault()
            @ FarmError::NoYieldSource,
    )]
    pub old_yield_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = Some(fee_collector_token.mint) == pool.yield_source.yield_mint()
            @ FarmError::MintMismatch,
        constraint = fee_collector_token.owner == farm.fee_collector,
    )]
    pub fee_collector_token: Account<'info, TokenAccount>,

    #[account(
        constraint = stake_vault.key() == pool.stake_vault @ FarmError::MintMismatch,
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}
