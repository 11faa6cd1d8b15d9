use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use super::deposit::require_delegate;
use super::reward_math::{settle, split_withdrawal_fee};
use crate::{
    constants::*,
    error::FarmError,
    state::{DelegateApproval, Farm, Pool, UserPosition},
};

/// Unstake principal. Reward settlement mirrors deposit; the withdrawn
/// amount is then split between the beneficiary and the fee collector per
/// the pool's withdrawal fee. Works against a disabled strategy — only new
/// deposits are rejected there.
pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    require!(!ctx.accounts.farm.paused, FarmError::FarmPaused);
    require_delegate(
        &ctx.accounts.withdrawer.key(),
        &ctx.accounts.beneficiary.key(),
        &ctx.accounts.delegate_approval,
    )?;
    require!(
        amount <= ctx.accounts.position.staked_amount,
        FarmError::InsufficientStake
    );

    // Accrue before any other state is read
    {
        let farm = &ctx.accounts.farm;
        ctx.accounts
            .pool
            .accrue(clock.slot, farm.reward_per_slot, farm.total_alloc_points)?;
    }

    let settlement = settle(&ctx.accounts.pool, &mut ctx.accounts.position, now)?;
    {
        let farm = &mut ctx.accounts.farm;
        farm.total_locked_up = farm
            .total_locked_up
            .checked_add(settlement.newly_locked)
            .ok_or(FarmError::MathOverflow)?
            .saturating_sub(settlement.released);
    }
    if settlement.payout > 0 {
        let farm_bump = ctx.accounts.farm.bump;
        let seeds: &[&[u8]] = &[FARM_SEED, &[farm_bump]];
        token::mint_to(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                MintTo {
                    mint: ctx.accounts.reward_mint.to_account_info(),
                    to: ctx.accounts.beneficiary_reward.to_account_info(),
                    authority: ctx.accounts.farm.to_account_info(),
                },
                &[seeds],
            ),
            settlement.payout,
        )?;
    }

    let mut fee = 0u64;
    if amount > 0 {
        let (fee_part, net) = split_withdrawal_fee(amount, ctx.accounts.pool.withdrawal_fee_bps)?;
        fee = fee_part;

        let pool_key = ctx.accounts.pool.key();
        let authority_bump = ctx.accounts.pool.authority_bump;
        let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[authority_bump]];
        let signer = &[seeds];

        if fee > 0 {
            token::transfer(
                CpiContext::new_with_signer(
                    ctx.accounts.token_program.to_account_info(),
                    Transfer {
                        from: ctx.accounts.stake_vault.to_account_info(),
                        to: ctx.accounts.fee_collector_token.to_account_info(),
                        authority: ctx.accounts.pool_authority.to_account_info(),
                    },
                    signer,
                ),
                fee,
            )?;
        }
        if net > 0 {
            token::transfer(
                CpiContext::new_with_signer(
                    ctx.accounts.token_program.to_account_info(),
                    Transfer {
                        from: ctx.accounts.stake_vault.to_account_info(),
                        to: ctx.accounts.beneficiary_token.to_account_info(),
                        authority: ctx.accounts.pool_authority.to_account_info(),
                    },
                    signer,
                ),
                net,
            )?;
        }

        let pool = &mut ctx.accounts.pool;
        let position = &mut ctx.accounts.position;
        position.staked_amount = position
            .staked_amount
            .checked_sub(amount)
            .ok_or(FarmError::InsufficientStake)?;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(FarmError::MathOverflow)?;
        pool.yield_source.record_withdraw(amount);
    }

    let debt = ctx
        .accounts
        .pool
        .reward_debt_for(ctx.accounts.position.staked_amount)?;
    ctx.accounts.position.reward_debt = debt;

    msg!(
        "Withdraw: pool={} user={} amount={} fee={} paid={} locked={}",
        ctx.accounts.pool.pool_id,
        ctx.accounts.beneficiary.key(),
        amount,
        fee,
        settlement.payout,
        settlement.newly_locked
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The beneficiary or an approved delegate
    pub withdrawer: Signer<'info>,

    /// CHECK: position owner; principal is always paid to accounts they own
    pub beneficiary: UncheckedAccount<'info>,

    #[account(
        seeds = [DELEGATE_SEED, beneficiary.key().as_ref(), withdrawer.key().as_ref()],
        bump = delegate_approval.bump,
    )]
    pub delegate_approval: Option<Account<'info, DelegateApproval>>,

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
        seeds = [POSITION_SEED, pool.key().as_ref(), beneficiary.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == beneficiary.key(),
    )]
    pub position: Account<'info, UserPosition>,

    #[account(
        mut,
        constraint = stake_vault.key() == pool.stake_vault @ FarmError::MintMismatch,
    )]
    pub stake_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = beneficiary_token.mint == pool.staked_mint @ FarmError::MintMismatch,
        constraint = beneficiary_token.owner == beneficiary.key(),
    )]
    pub beneficiary_token: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = fee_collector_token.mint == pool.staked_mint @ FarmError::MintMismatch,
        constraint = fee_collector_token.owner == farm.fee_collector,
    )]
    pub fee_collector_token: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = reward_mint.key() == farm.reward_mint @ FarmError::MintMismatch,
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = beneficiary_reward.mint == farm.reward_mint @ FarmError::MintMismatch,
        constraint = beneficiary_reward.owner == beneficiary.key(),
    )]
    pub beneficiary_reward: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
