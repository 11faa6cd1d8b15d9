//! Yield Farm Rust SDK
//!
//! Multi-pool staking and reward client for Solana.
//! Any Rust service can stake, harvest, and query farm state with zero
//! boilerplate — no Anchor dependency required.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use yield_farm_sdk::YieldFarmClient;
//! use solana_sdk::signature::{Keypair, Signer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YieldFarmClient::devnet();
//!     let keypair = Keypair::new(); // use your funded keypair
//!
//!     // 1. Check the claimable balance first
//!     let pending = client.pending_reward(0, &keypair.pubkey()).await?;
//!     println!("Claimable: {pending}");
//!
//!     // 2. Stake into pool 0
//!     let sig = client.stake(&keypair, 0, 1_000_000_000).await?;
//!     println!("Staked! tx: {sig}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature Overview
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`YieldFarmClient::stake`] | Deposit a pool's asset, settling rewards |
//! | [`YieldFarmClient::unstake`] | Withdraw principal net of the pool fee |
//! | [`YieldFarmClient::harvest`] | Claim accrued reward (zero-amount deposit) |
//! | [`YieldFarmClient::emergency_exit`] | Best-effort exit, forfeits rewards |
//! | [`YieldFarmClient::approve_delegate`] | Whitelist a wallet for `*_for` calls |
//! | [`YieldFarmClient::pending_reward`] | Off-chain claimable projection |
//! | [`YieldFarmClient::pool`] | Pool weight, fee, backend, totals |

pub mod client;
pub mod error;
pub mod instructions;
pub mod state;

pub use client::YieldFarmClient;
pub use error::{Error, Result};
pub use state::{
    DelegateApprovalAccount, FarmAccount, PoolAccount, PositionAccount, YieldSourceView,
};
