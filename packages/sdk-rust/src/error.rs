//! SDK error type.

use solana_sdk::pubkey::Pubkey;

/// All errors returned by the Yield Farm SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── RPC / network ────────────────────────────────────────────────────────
    /// A Solana JSON-RPC call failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    // ── Discovery ────────────────────────────────────────────────────────────
    /// The farm singleton has not been initialized for this program id.
    #[error("Farm not initialized for program {0}")]
    FarmNotFound(Pubkey),

    /// No pool exists with the given id (ids are append-only from 0).
    #[error("Pool {0} not found — farm has {1} pools")]
    PoolNotFound(u64, u64),

    /// The wallet has never deposited into this pool.
    #[error("No position for owner {owner} in pool {pool}")]
    PositionNotFound { owner: Pubkey, pool: Pubkey },

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("Integer overflow in reward projection")]
    MathOverflow,

    // ── Account parsing ──────────────────────────────────────────────────────
    /// Raw account bytes could not be deserialized.
    #[error("Account parse error at offset {offset}: {reason}")]
    ParseError { offset: usize, reason: String },

    // ── Validation ───────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;
