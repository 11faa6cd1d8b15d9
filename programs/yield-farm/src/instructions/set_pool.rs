use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::FarmError,
    state::{Farm, Pool},
};

// ─── Mass accrual ──────────────────────────────────────────────────────────
// Advance every pool passed as a remaining account, in ascending pool-id
// order. Changing total_alloc_points or the emission rate without first
// settling every pool's accumulator would retroactively re-weight
// already-elapsed slots. Ascending ids make the count trustworthy: a
// duplicated pool (a same-slot no-op on its second pass) cannot stand in
// for an omitted one.
pub fn mass_accrue<'info>(
    farm_key: &Pubkey,
    farm: &Farm,
    pools: &'info [AccountInfo<'info>],
    current_slot: u64,
) -> Result<u64> {
    let mut seen = 0u64;
    let mut last_id: Option<u64> = None;
    for info in pools {
        let mut pool: Account<'info, Pool> = Account::try_from(info)?;
        require_keys_eq!(pool.farm, *farm_key);
        if let Some(prev) = last_id {
            require!(pool.pool_id > prev, FarmError::IncompleteMassUpdate);
        }
        last_id = Some(pool.pool_id);
        pool.accrue(current_slot, farm.reward_per_slot, farm.total_alloc_points)?;
        pool.exit(&crate::ID)?;
        seen = seen
            .checked_add(1)
            .ok_or(FarmError::MathOverflow)?;
    }
    Ok(seen)
}

// ─── Handler ───────────────────────────────────────────────────────────────
/// Update a pool's weight, withdrawal fee, and harvest interval. With
/// `mass_update`, every *other* pool must be supplied as a remaining
/// account, in ascending pool-id order, so its accumulator settles under
/// the old weights first.
pub fn handler<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, SetPool<'info>>,
    alloc_points: u64,
    withdrawal_fee_bps: u16,
    harvest_interval: i64,
    mass_update: bool,
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

    // Settle this pool under the old weights before anything changes
    {
        let farm = &ctx.accounts.farm;
        ctx.accounts
            .pool
            .accrue(clock.slot, farm.reward_per_slot, farm.total_alloc_points)?;
    }
    if mass_update {
        let seen = mass_accrue(
            &farm_key,
            &ctx.accounts.farm,
            ctx.remaining_accounts,
            clock.slot,
        )?;
        require!(
            seen + 1 == ctx.accounts.farm.pool_count,
            FarmError::IncompleteMassUpdate
        );
    }

    let old_alloc = ctx.accounts.pool.alloc_points;
    let farm = &mut ctx.accounts.farm;
    farm.total_alloc_points = farm
        .total_alloc_points
        .checked_sub(old_alloc)
        .ok_or(FarmError::MathOverflow)?
        .checked_add(alloc_points)
        .ok_or(FarmError::MathOverflow)?;

    let pool = &mut ctx.accounts.pool;
    pool.alloc_points = alloc_points;
    pool.withdrawal_fee_bps = withdrawal_fee_bps;
    pool.harvest_interval = harvest_interval;

    msg!(
        "Pool {} configured: alloc={} fee={}bps interval={}s",
        pool.pool_id,
        alloc_points,
        withdrawal_fee_bps,
        harvest_interval
    );
    Ok(())
}

#[derive(Accounts)]
pub struct SetPool<'info> {
    pub authority: Signer<'info>,

    #[account(mut, seeds = [FARM_SEED], bump = farm.bump, has_one = authority)]
    pub farm: Account<'info, Farm>,

    #[account(mut, constraint = pool.farm == farm.key())]
    pub pool: Account<'info, Pool>,
}
