use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::Mint;

use crate::{constants::*, error::FarmError, state::Farm};

/// Create the farm singleton. The reward mint must already exist with the
/// farm PDA as its sole mint authority, so reward supply can only ever be
/// created by this program.
pub fn handler(
    ctx: Context<Initialize>,
    reward_per_slot: u64,
    start_slot: u64,
    fee_collector: Pubkey,
) -> Result<()> {
    require!(
        ctx.accounts.reward_mint.mint_authority == COption::Some(ctx.accounts.farm.key()),
        FarmError::RewardMintAuthority
    );

    let farm = &mut ctx.accounts.farm;
    farm.authority = ctx.accounts.authority.key();
    farm.reward_mint = ctx.accounts.reward_mint.key();
    farm.fee_collector = fee_collector;
    farm.reward_per_slot = reward_per_slot;
    farm.start_slot = start_slot;
    farm.total_alloc_points = 0;
    farm.pool_count = 0;
    farm.total_locked_up = 0;
    farm.paused = false;
    farm.bump = ctx.bumps.farm;

    msg!(
        "Farm initialized: reward_mint={} rate={}/slot start={}",
        farm.reward_mint,
        reward_per_slot,
        start_slot
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = Farm::LEN,
        seeds = [FARM_SEED],
        bump,
    )]
    pub farm: Account<'info, Farm>,

    pub reward_mint: Account<'info, Mint>,

    pub system_program: Program<'info, System>,
}
