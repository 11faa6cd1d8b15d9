use anchor_lang::prelude::*;

#[error_code]
pub enum FarmError {
    #[msg("Deposits and withdrawals are paused")]
    FarmPaused,
    #[msg("Pool is not accepting deposits")]
    PoolInactive,
    #[msg("Amount exceeds staked balance")]
    InsufficientStake,
    #[msg("Withdrawal fee exceeds the 10% cap")]
    WithdrawalFeeTooHigh,
    #[msg("Harvest interval exceeds the 14-day cap")]
    HarvestIntervalTooLong,
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Caller is not an approved delegate for this user")]
    DelegateNotApproved,
    #[msg("Pool already has a yield source attached")]
    YieldSourceAttached,
    #[msg("Pool has no yield source attached")]
    NoYieldSource,
    #[msg("Yield source is not a strategy adapter")]
    NotAStrategy,
    #[msg("Yield source is disabled and rejects new deposits")]
    BackendDisabled,
    #[msg("Reward mint authority must be the farm PDA")]
    RewardMintAuthority,
    #[msg("Token account does not match the expected mint")]
    MintMismatch,
    #[msg("Mass update requires every other pool as a remaining account")]
    IncompleteMassUpdate,
    #[msg("Backend stake mirror diverged from pool accounting")]
    BackendAccounting,
}
