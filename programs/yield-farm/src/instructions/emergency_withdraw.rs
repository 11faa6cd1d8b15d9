use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    error::FarmError,
    state::{Farm, Pool, UserPosition},
};

/// Circuit breaker: return the caller's principal best-effort, forfeiting
/// unclaimed reward. No settlement, no withdrawal fee, and deliberately not
/// blocked by the global pause or a disabled backend.
pub fn handler(ctx: Context<EmergencyWithdraw>) -> Result<()> {
    let clock = Clock::get()?;

    // Accrual still advances so remaining stakers' accounting stays exact
    {
        let farm = &ctx.accounts.farm;
        ctx.accounts
            .pool
            .accrue(clock.slot, farm.reward_per_slot, farm.total_alloc_points)?;
    }

    let staked = ctx.accounts.position.staked_amount;
    let forfeited = ctx.accounts.position.reward_locked_up;

    // Best effort: an unhealthy backend may hold less than attributed
    let available = ctx.accounts.stake_vault.amount;
    let amount_out = staked.min(available);

    if amount_out > 0 {
        let pool_key = ctx.accounts.pool.key();
        let authority_bump = ctx.accounts.pool.authority_bump;
        let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[authority_bump]];
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.stake_vault.to_account_info(),
                    to: ctx.accounts.owner_token.to_account_info(),
                    authority: ctx.accounts.pool_authority.to_account_info(),
                },
                &[seeds],
            ),
            amount_out,
        )?;
    }
    if amount_out < staked {
        msg!(
            "Emergency exit shortfall: attributed={} recovered={}",
            staked,
            amount_out
        );
    }

    // The full attributed amount leaves the ledger even on a shortfall
    {
        let pool = &mut ctx.accounts.pool;
        pool.total_staked = pool
            .total_staked
            .checked_sub(staked)
            .ok_or(FarmError::MathOverflow)?;
        pool.yield_source.record_withdraw(staked);
    }
    ctx.accounts.farm.total_locked_up =
        ctx.accounts.farm.total_locked_up.saturating_sub(forfeited);

    let position = &mut ctx.accounts.position;
    position.staked_amount = 0;
    position.reward_debt = 0;
    position.reward_locked_up = 0;

    msg!(
        "EmergencyWithdraw: pool={} user={} out={} forfeited={}",
        ctx.accounts.pool.pool_id,
        ctx.accounts.owner.key(),
        amount_out,
        forfeited
    );
    Ok(())
}

#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
    pub owner: Signer<'info>,

    #[account(mut, seeds = [FARM_SEED], bump = farm.bump)]
    pub farm: Account<'info, Farm>,

    #[account(mut, constraint = pool.farm == farm.key())]
    pub pool: Account<'info, Pool>,

    /// CHECK: PDA owning the stake vault
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump = pool.authority_bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key(),
    )]
    pub position: Account<'info, UserPosition>,

    #[account(
        mut,
        constraint = stake_vault.key() == pool.stake_vault @ FarmError::MintMismatch,
    )]
    pub stake_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_token.mint == pool.staked_mint @ FarmError::MintMismatch,
        constraint = owner_token.owner == owner.key(),
    )]
    pub owner_token: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
