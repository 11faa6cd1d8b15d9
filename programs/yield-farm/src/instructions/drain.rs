use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    error::FarmError,
    state::{Farm, Pool},
};

// ─── Yield sweep ───────────────────────────────────────────────────────────
// Forward everything the backend's yield vault holds to the fee collector.
// External yield is never principal and never reaches users directly; the
// converter pipeline downstream of the fee collector handles it. Shared
// with switch/detach.
pub fn sweep_yield_vault<'info>(
    token_program: &Program<'info, Token>,
    yield_vault: &Account<'info, TokenAccount>,
    fee_collector_token: &Account<'info, TokenAccount>,
    pool_authority: &UncheckedAccount<'info>,
    pool_key: &Pubkey,
    authority_bump: u8,
) -> Result<u64> {
    let amount = yield_vault.amount;
    if amount > 0 {
        let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[authority_bump]];
        token::transfer(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                Transfer {
                    from: yield_vault.to_account_info(),
                    to: fee_collector_token.to_account_info(),
                    authority: pool_authority.to_account_info(),
                },
                &[seeds],
            ),
            amount,
        )?;
    }
    Ok(amount)
}

/// Sweep the backend's accumulated external yield to the fee collector
/// without touching principal, the accumulator, or any position. Run
/// periodically so backend-native emissions don't sit idle between user
/// interactions.
pub fn handler(ctx: Context<Drain>) -> Result<()> {
    require!(
        ctx.accounts.pool.yield_source.is_attached(),
        FarmError::NoYieldSource
    );

    let pool_key = ctx.accounts.pool.key();
    let swept = sweep_yield_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.yield_vault,
        &ctx.accounts.fee_collector_token,
        &ctx.accounts.pool_authority,
        &pool_key,
        ctx.accounts.pool.authority_bump,
    )?;

    msg!("Drain: pool={} swept={}", ctx.accounts.pool.pool_id, swept);
    Ok(())
}

#[derive(Accounts)]
pub struct Drain<'info> {
    pub authority: Signer<'info>,

    #[account(seeds = [FARM_SEED], bump = farm.bump, has_one = authority)]
    pub farm: Account<'info, Farm>,

    #[account(constraint = pool.farm == farm.key())]
    pub pool: Account<'info, Pool>,

    /// CHECK: PDA owning the pool's vaults
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump = pool.authority_bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = Some(yield_vault.key()) == pool.yield_source.yield_vault()
            @ FarmError::MintMismatch,
    )]
    pub yield_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = Some(fee_collector_token.mint) == pool.yield_source.yield_mint()
            @ FarmError::MintMismatch,
        constraint = fee_collector_token.owner == farm.fee_collector,
    )]
    pub fee_collector_token: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}
