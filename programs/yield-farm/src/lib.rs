/// Yield Farm — multi-pool reward-distribution ledger with pluggable
/// yield backends.
///
/// Stakers deposit a pool's asset and earn a single reward token minted at
/// a fixed per-slot rate, split across pools by allocation points. Each
/// pool may delegate its principal to a yield source — a legacy child farm
/// or a modern strategy adapter — which can be attached, hot-swapped, or
/// detached without disturbing reward accounting.
///
/// Instructions:
///   initialize            — create the farm; reward mint gated to the farm PDA
///   add_pool              — register a staked asset (append-only pool ids)
///   set_pool              — reweight / refee / relock a pool (optional mass update)
///   set_pool_active       — open or close a pool for deposits
///   set_paused            — global pause; never blocks emergency exits
///   set_fee_collector     — reroute fees and swept yield
///   set_reward_per_slot   — change emission (mass update enforced)
///   approve_delegate      — (user, delegate) whitelist for *_for calls
///   deposit / deposit_for — stake; amount 0 is harvest-only
///   withdraw / withdraw_for — unstake net of the pool's withdrawal fee
///   emergency_withdraw    — best-effort principal exit, forfeits rewards
///   attach_yield_source / switch_yield_source / detach_yield_source
///   set_strategy_active / set_strategy_venue — strategy adapter controls
///   drain                 — sweep backend yield to the fee collector
///   update_pool           — permissionless accrual crank

// ─── Security contact ─────────────────────────────────────────────────────────

use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name:             "Yield Farm",
    project_url:      "https://github.com/yield-farm/yield-farm",
    contacts:         "email:security@yieldfarm.dev",
    policy:           "Please report security vulnerabilities by email. \
                       We aim to respond within 48 hours.",
    source_code:      "https://github.com/yield-farm/yield-farm",
    preferred_languages: "en"
}

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;

#[cfg(test)]
mod tests;

use anchor_lang::prelude::*;
pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod yield_farm {
    use super::*;

    /// Create the farm singleton and bind the reward mint to its PDA.
    pub fn initialize(
        ctx: Context<Initialize>,
        reward_per_slot: u64,
        start_slot: u64,
        fee_collector: Pubkey,
    ) -> Result<()> {
        initialize::handler(ctx, reward_per_slot, start_slot, fee_collector)
    }

    /// Register a new pool. Pass every existing pool as a remaining
    /// account when the new pool carries weight.
    pub fn add_pool<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, AddPool<'info>>,
        alloc_points: u64,
        withdrawal_fee_bps: u16,
        harvest_interval: i64,
    ) -> Result<()> {
        add_pool::handler(ctx, alloc_points, withdrawal_fee_bps, harvest_interval)
    }

    /// Reconfigure a pool's weight, withdrawal fee, and harvest interval.
    pub fn set_pool<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, SetPool<'info>>,
        alloc_points: u64,
        withdrawal_fee_bps: u16,
        harvest_interval: i64,
        mass_update: bool,
    ) -> Result<()> {
        set_pool::handler(
            ctx,
            alloc_points,
            withdrawal_fee_bps,
            harvest_interval,
            mass_update,
        )
    }

    /// Open or close a pool for new deposits.
    pub fn set_pool_active(ctx: Context<ConfigurePool>, active: bool) -> Result<()> {
        configure::set_pool_active(ctx, active)
    }

    /// Global pause for deposit/withdraw; emergency exits stay open.
    pub fn set_paused(ctx: Context<ConfigureFarm>, paused: bool) -> Result<()> {
        configure::set_paused(ctx, paused)
    }

    /// Reroute withdrawal fees and swept backend yield.
    pub fn set_fee_collector(ctx: Context<ConfigureFarm>, fee_collector: Pubkey) -> Result<()> {
        configure::set_fee_collector(ctx, fee_collector)
    }

    /// Change the emission rate; all pools settle at the old rate first.
    pub fn set_reward_per_slot<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, ConfigureFarm<'info>>,
        reward_per_slot: u64,
    ) -> Result<()> {
        configure::set_reward_per_slot(ctx, reward_per_slot)
    }

    /// Approve or revoke a delegate for deposit_for/withdraw_for.
    pub fn approve_delegate(ctx: Context<ApproveDelegate>, approved: bool) -> Result<()> {
        approve_delegate::handler(ctx, approved)
    }

    /// Stake into a pool. `amount == 0` harvests without staking.
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        require_keys_eq!(
            ctx.accounts.depositor.key(),
            ctx.accounts.beneficiary.key()
        );
        deposit::handler(ctx, amount)
    }

    /// Stake on behalf of `beneficiary`; caller must be whitelisted.
    pub fn deposit_for(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        deposit::handler(ctx, amount)
    }

    /// Unstake principal, net of the pool's withdrawal fee.
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        require_keys_eq!(
            ctx.accounts.withdrawer.key(),
            ctx.accounts.beneficiary.key()
        );
        withdraw::handler(ctx, amount)
    }

    /// Unstake on behalf of `beneficiary`; principal goes to accounts
    /// the beneficiary owns.
    pub fn withdraw_for(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        withdraw::handler(ctx, amount)
    }

    /// Best-effort principal exit, forfeiting unclaimed reward. Never
    /// blocked by pause or a disabled backend.
    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>) -> Result<()> {
        emergency_withdraw::handler(ctx)
    }

    /// Attach a backend to a pool that has none.
    pub fn attach_yield_source(
        ctx: Context<AttachYieldSource>,
        params: YieldSourceParams,
    ) -> Result<()> {
        attach_yield_source::handler(ctx, params)
    }

    /// Atomically migrate a pool's principal to a new backend.
    pub fn switch_yield_source(
        ctx: Context<SwitchYieldSource>,
        params: YieldSourceParams,
    ) -> Result<()> {
        switch_yield_source::handler(ctx, params)
    }

    /// Remove a pool's backend; principal idles in custody.
    pub fn detach_yield_source(ctx: Context<DetachYieldSource>) -> Result<()> {
        detach_yield_source::handler(ctx)
    }

    /// Enable/disable the attached strategy adapter.
    pub fn set_strategy_active(ctx: Context<ConfigurePool>, active: bool) -> Result<()> {
        strategy::set_strategy_active(ctx, active)
    }

    /// Hot-swap the strategy adapter's downstream venue.
    pub fn set_strategy_venue(ctx: Context<ConfigurePool>, venue: Pubkey) -> Result<()> {
        strategy::set_strategy_venue(ctx, venue)
    }

    /// Sweep backend-native yield to the fee collector.
    pub fn drain(ctx: Context<Drain>) -> Result<()> {
        drain::handler(ctx)
    }

    /// Permissionless accrual crank.
    pub fn update_pool(ctx: Context<UpdatePool>) -> Result<()> {
        update_pool::handler(ctx)
    }
}
