/// PDA seeds
pub const FARM_SEED: &[u8] = b"farm";
pub const POOL_SEED: &[u8] = b"pool";
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool_authority";
pub const POSITION_SEED: &[u8] = b"position";
pub const DELEGATE_SEED: &[u8] = b"delegate";
pub const YIELD_VAULT_SEED: &[u8] = b"yield_vault";

/// Fixed-point scale for acc_reward_per_share (reward per staked unit, ×1e12)
pub const ACC_PRECISION: u128 = 1_000_000_000_000;

/// Denominator for basis-point math (u128 to avoid up-cast noise)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Withdrawal fee cap: 10 %
pub const MAX_WITHDRAWAL_FEE_BPS: u16 = 1_000;

/// Harvest interval cap: 14 days
pub const MAX_HARVEST_INTERVAL: i64 = 14 * 24 * 60 * 60;
