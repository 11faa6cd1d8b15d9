use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use super::attach_yield_source::{build_source, YieldSourceParams};
use super::detach_yield_source::exit_source;
use crate::{
    constants::*,
    error::FarmError,
    state::{Farm, Pool},
};

/// Migrate a pool to a new backend in one atomic step: settle the
/// accumulator, exit the old backend (yield swept to the fee collector,
/// vault closed), then delegate the full principal to the new one.
///
/// Invisible to reward accounting: `total_staked`, `acc_reward_per_share`
/// and every position's `reward_debt` are unchanged.
pub fn handler(ctx: Context<SwitchYieldSource>, params: YieldSourceParams) -> Result<()> {
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

    let new_vault = ctx.accounts.new_yield_vault.key();
    let new_mint = ctx.accounts.new_yield_mint.key();
    let pool = &mut ctx.accounts.pool;
    pool.generation = pool
        .generation
        .checked_add(1)
        .ok_or(FarmError::MathOverflow)?;
    pool.yield_source = build_source(params, new_mint, new_vault, pool.total_staked);

    msg!(
        "Pool {} yield source switched: gen={} swept={} delegated={}",
        pool.pool_id,
        pool.generation,
        swept,
        pool.total_staked
    );
    Ok(())
}

#[derive(Accounts)]
pub struct SwitchYieldSource<'info> {
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

    /// Yield token of the incoming backend
    pub new_yield_mint: Account<'info, Mint>,

    // Seeds take the wrapping successor; the handler's checked bump
    // rejects a generation wrap before anything can commit.
    #[account(
        init,
        payer = authority,
        token::mint = new_yield_mint,
        token::authority = pool_authority,
        seeds = [
            YIELD_VAULT_SEED,
            pool.key().as_ref(),
            &pool.generation.wrapping_add(1).to_le_bytes(),
        ],
        bump,
    )]
    pub new_yield_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
