use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use super::reward_math::settle;
use crate::{
    constants::*,
    error::FarmError,
    state::{DelegateApproval, Farm, Pool, UserPosition},
};

// ─── Delegate gate ─────────────────────────────────────────────────────────
// A caller acting for someone else must hold an approval PDA. Shared with
// withdraw.
pub fn require_delegate(
    caller: &Pubkey,
    beneficiary: &Pubkey,
    approval: &Option<Account<'_, DelegateApproval>>,
) -> Result<()> {
    if caller == beneficiary {
        return Ok(());
    }
    match approval {
        Some(a) if a.approved => Ok(()),
        _ => err!(FarmError::DelegateNotApproved),
    }
}

// ─── Handler ───────────────────────────────────────────────────────────────
/// Stake into a pool, crediting `beneficiary`. `amount == 0` is a
/// harvest-only call. Order is fixed: accrue, settle rewards against the
/// lockup, pull principal, recompute reward debt.
pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    require!(!ctx.accounts.farm.paused, FarmError::FarmPaused);
    require_delegate(
        &ctx.accounts.depositor.key(),
        &ctx.accounts.beneficiary.key(),
        &ctx.accounts.delegate_approval,
    )?;

    // Accrue before any other state is read
    {
        let farm = &ctx.accounts.farm;
        ctx.accounts
            .pool
            .accrue(clock.slot, farm.reward_per_slot, farm.total_alloc_points)?;
    }

    // Fresh position (init_if_needed zeroes the fields)
    if ctx.accounts.position.owner == Pubkey::default() {
        let position = &mut ctx.accounts.position;
        position.owner = ctx.accounts.beneficiary.key();
        position.pool = ctx.accounts.pool.key();
        position.bump = ctx.bumps.position;
    }

    // Settle accrued reward against the harvest lockup
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

    // Pull principal into custody and credit the net amount
    if amount > 0 {
        require!(ctx.accounts.pool.active, FarmError::PoolInactive);
        require!(
            ctx.accounts.pool.yield_source.is_active(),
            FarmError::BackendDisabled
        );

        let vault_before = ctx.accounts.stake_vault.amount;
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.depositor_token.to_account_info(),
                    to: ctx.accounts.stake_vault.to_account_info(),
                    authority: ctx.accounts.depositor.to_account_info(),
                },
            ),
            amount,
        )?;
        ctx.accounts.stake_vault.reload()?;
        // Net credited may be below `amount` if the backend levies its own
        // deposit fee (legacy child farms do)
        let net = ctx.accounts.stake_vault.amount - vault_before;

        let pool = &mut ctx.accounts.pool;
        let position = &mut ctx.accounts.position;
        let was_unstaked = position.staked_amount == 0;
        position.staked_amount = position
            .staked_amount
            .checked_add(net)
            .ok_or(FarmError::MathOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(net)
            .ok_or(FarmError::MathOverflow)?;
        pool.yield_source.record_deposit(net)?;

        // Lockup clock starts on the first non-zero stake
        if was_unstaked && position.staked_amount > 0 && position.next_harvest_at == 0 {
            position.next_harvest_at = now
                .checked_add(pool.harvest_interval)
                .ok_or(FarmError::MathOverflow)?;
        }
    }

    let debt = ctx
        .accounts
        .pool
        .reward_debt_for(ctx.accounts.position.staked_amount)?;
    ctx.accounts.position.reward_debt = debt;

    msg!(
        "Deposit: pool={} user={} amount={} paid={} locked={}",
        ctx.accounts.pool.pool_id,
        ctx.accounts.beneficiary.key(),
        amount,
        settlement.payout,
        settlement.newly_locked
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    /// Wallet funding the stake — the beneficiary or an approved delegate
    #[account(mut)]
    pub depositor: Signer<'info>,

    /// CHECK: position owner being credited; validated against the
    /// delegate approval when it differs from the depositor
    pub beneficiary: UncheckedAccount<'info>,

    #[account(
        seeds = [DELEGATE_SEED, beneficiary.key().as_ref(), depositor.key().as_ref()],
        bump = delegate_approval.bump,
    )]
    pub delegate_approval: Option<Account<'info, DelegateApproval>>,

    #[account(mut, seeds = [FARM_SEED], bump = farm.bump)]
    pub farm: Account<'info, Farm>,

    #[account(mut, constraint = pool.farm == farm.key())]
    pub pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = depositor,
        space = UserPosition::LEN,
        seeds = [POSITION_SEED, pool.key().as_ref(), beneficiary.key().as_ref()],
        bump,
    )]
    pub position: Account<'info, UserPosition>,

    #[account(
        mut,
        constraint = stake_vault.key() == pool.stake_vault @ FarmError::MintMismatch,
    )]
    pub stake_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = depositor_token.mint == pool.staked_mint @ FarmError::MintMismatch,
    )]
    pub depositor_token: Box<Account<'info, TokenAccount>>,

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
    pub system_program: Program<'info, System>,
}
