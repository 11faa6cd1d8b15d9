use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    error::FarmError,
    state::{Farm, Pool, YieldSource},
};

// ─── Backend selection ─────────────────────────────────────────────────────
// Caller-supplied shape of the backend being attached. The yield mint and
// the freshly created yield vault come from the account context.
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub enum YieldSourceParams {
    ChildFarm {
        farm_program: Pubkey,
        child_pool_id: u64,
        referrer: Pubkey,
    },
    Strategy {
        venue: Pubkey,
    },
}

pub fn build_source(
    params: YieldSourceParams,
    yield_mint: Pubkey,
    yield_vault: Pubkey,
    total_staked: u64,
) -> YieldSource {
    match params {
        YieldSourceParams::ChildFarm {
            farm_program,
            child_pool_id,
            referrer,
        } => YieldSource::ChildFarm {
            farm_program,
            child_pool_id,
            conversion_token_mint: yield_mint,
            referrer,
            yield_vault,
            total_staked,
        },
        YieldSourceParams::Strategy { venue } => YieldSource::Strategy {
            venue,
            yield_mint,
            yield_vault,
            total_staked,
            active: true,
        },
    }
}

/// Attach a backend to a pool that has none. The pool's entire principal is
/// delegated to it, so the backend's mirror starts at `pool.total_staked`.
/// Reward accounting is untouched — attaching is invisible to users.
pub fn handler(ctx: Context<AttachYieldSource>, params: YieldSourceParams) -> Result<()> {
    require!(
        !ctx.accounts.pool.yield_source.is_attached(),
        FarmError::YieldSourceAttached
    );

    let clock = Clock::get()?;
    {
        let farm = &ctx.accounts.farm;
        ctx.accounts
            .pool
            .accrue(clock.slot, farm.reward_per_slot, farm.total_alloc_points)?;
    }

    let yield_vault = ctx.accounts.yield_vault.key();
    let yield_mint = ctx.accounts.yield_mint.key();
    let pool = &mut ctx.accounts.pool;
    pool.generation = pool
        .generation
        .checked_add(1)
        .ok_or(FarmError::MathOverflow)?;
    pool.yield_source = build_source(params, yield_mint, yield_vault, pool.total_staked);

    msg!(
        "Pool {} yield source attached: gen={} delegated={}",
        pool.pool_id,
        pool.generation,
        pool.total_staked
    );
    Ok(())
}

#[derive(Accounts)]
pub struct AttachYieldSource<'info> {
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

    /// Conversion/yield token the backend pays out in
    pub yield_mint: Account<'info, Mint>,

    // Seeds take the wrapping successor; the handler's checked bump
    // rejects a generation wrap before anything can commit.
    #[account(
        init,
        payer = authority,
        token::mint = yield_mint,
        token::authority = pool_authority,
        seeds = [
            YIELD_VAULT_SEED,
            pool.key().as_ref(),
            &pool.generation.wrapping_add(1).to_le_bytes(),
        ],
        bump,
    )]
    pub yield_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
