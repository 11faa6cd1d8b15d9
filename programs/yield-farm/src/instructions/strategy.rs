use anchor_lang::prelude::*;

use super::configure::ConfigurePool;
use crate::{error::FarmError, state::YieldSource};

/// Enable or disable the attached strategy adapter. Disabled adapters
/// reject new deposits but still allow withdrawals and emergency exits.
pub fn set_strategy_active(ctx: Context<ConfigurePool>, active: bool) -> Result<()> {
    match &mut ctx.accounts.pool.yield_source {
        YieldSource::Strategy { active: flag, .. } => {
            *flag = active;
            msg!(
                "Pool {} strategy active={}",
                ctx.accounts.pool.pool_id,
                active
            );
            Ok(())
        }
        YieldSource::None => err!(FarmError::NoYieldSource),
        YieldSource::ChildFarm { .. } => err!(FarmError::NotAStrategy),
    }
}

/// Hot-swap the strategy adapter's downstream venue. Accounting is
/// untouched: the venue is where the adapter's keeper deploys principal,
/// not where this ledger tracks it.
pub fn set_strategy_venue(ctx: Context<ConfigurePool>, venue: Pubkey) -> Result<()> {
    match &mut ctx.accounts.pool.yield_source {
        YieldSource::Strategy { venue: slot, .. } => {
            *slot = venue;
            msg!("Pool {} strategy venue={}", ctx.accounts.pool.pool_id, venue);
            Ok(())
        }
        YieldSource::None => err!(FarmError::NoYieldSource),
        YieldSource::ChildFarm { .. } => err!(FarmError::NotAStrategy),
    }
}
