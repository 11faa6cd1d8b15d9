//! High-level async client.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::instructions::{
    self, derive_ata, derive_farm, derive_pool, derive_position,
};
use crate::state::{FarmAccount, PoolAccount, PositionAccount};

/// Default program id (override with [`YieldFarmClient::new_with_program`]).
pub const PROGRAM_ID: &str = "Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS";

/// Async client for the Yield Farm program.
///
/// Every write method signs with the supplied keypair, submits, and waits
/// for confirmation.  Read methods decode raw account bytes directly — no
/// Anchor or IDL needed.
pub struct YieldFarmClient {
    rpc: RpcClient,
    program_id: Pubkey,
}

impl YieldFarmClient {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self::new_with_program(rpc_url, Pubkey::from_str(PROGRAM_ID).unwrap())
    }

    pub fn new_with_program(rpc_url: impl Into<String>, program_id: Pubkey) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.into(), CommitmentConfig::confirmed()),
            program_id,
        }
    }

    pub fn devnet() -> Self {
        Self::new("https://api.devnet.solana.com")
    }

    pub fn mainnet() -> Self {
        Self::new("https://api.mainnet-beta.solana.com")
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    /// Fetch and decode the farm singleton.
    pub async fn farm(&self) -> Result<FarmAccount> {
        let (farm_pda, _) = derive_farm(&self.program_id);
        let account = self
            .rpc
            .get_account_with_commitment(&farm_pda, self.rpc.commitment())
            .await?
            .value
            .ok_or(Error::FarmNotFound(self.program_id))?;
        FarmAccount::parse(&account.data)
    }

    /// Fetch and decode a pool by id.
    pub async fn pool(&self, pool_id: u64) -> Result<PoolAccount> {
        let farm = self.farm().await?;
        if pool_id >= farm.pool_count {
            return Err(Error::PoolNotFound(pool_id, farm.pool_count));
        }
        let (farm_pda, _) = derive_farm(&self.program_id);
        let (pool_pda, _) = derive_pool(&farm_pda, pool_id, &self.program_id);
        let account = self
            .rpc
            .get_account_with_commitment(&pool_pda, self.rpc.commitment())
            .await?
            .value
            .ok_or(Error::PoolNotFound(pool_id, farm.pool_count))?;
        PoolAccount::parse(&account.data)
    }

    /// Fetch and decode a wallet's position in a pool.
    pub async fn position(&self, pool_id: u64, owner: &Pubkey) -> Result<PositionAccount> {
        let (farm_pda, _) = derive_farm(&self.program_id);
        let (pool_pda, _) = derive_pool(&farm_pda, pool_id, &self.program_id);
        let (position_pda, _) = derive_position(&pool_pda, owner, &self.program_id);
        let account = self
            .rpc
            .get_account_with_commitment(&position_pda, self.rpc.commitment())
            .await?
            .value
            .ok_or(Error::PositionNotFound {
                owner: *owner,
                pool: pool_pda,
            })?;
        PositionAccount::parse(&account.data)
    }

    /// Claimable reward for a wallet right now, projected to the current
    /// slot with the same math the program runs on the next accrual.
    pub async fn pending_reward(&self, pool_id: u64, owner: &Pubkey) -> Result<u64> {
        let farm = self.farm().await?;
        let pool = self.pool(pool_id).await?;
        let position = self.position(pool_id, owner).await?;
        let slot = self.rpc.get_slot().await?;
        let acc = pool.projected_acc(slot, farm.reward_per_slot, farm.total_alloc_points)?;
        position.pending_reward(acc)
    }

    // ── Writes ───────────────────────────────────────────────────────────────

    /// Stake `amount` into a pool (0 harvests without staking).  Token
    /// accounts default to the signer's ATAs.
    pub async fn stake(&self, signer: &Keypair, pool_id: u64, amount: u64) -> Result<Signature> {
        let farm = self.farm().await?;
        let pool = self.pool(pool_id).await?;
        let owner = signer.pubkey();
        let ix = instructions::deposit_ix(
            &self.program_id,
            &owner,
            &owner,
            pool_id,
            &pool.stake_vault,
            &derive_ata(&owner, &pool.staked_mint),
            &farm.reward_mint,
            &derive_ata(&owner, &farm.reward_mint),
            amount,
            false,
        );
        self.send(signer, ix).await
    }

    /// Harvest accrued reward without moving principal.
    pub async fn harvest(&self, signer: &Keypair, pool_id: u64) -> Result<Signature> {
        self.stake(signer, pool_id, 0).await
    }

    /// Unstake `amount`, net of the pool's withdrawal fee.
    pub async fn unstake(&self, signer: &Keypair, pool_id: u64, amount: u64) -> Result<Signature> {
        let farm = self.farm().await?;
        let pool = self.pool(pool_id).await?;
        let owner = signer.pubkey();
        let ix = instructions::withdraw_ix(
            &self.program_id,
            &owner,
            &owner,
            pool_id,
            &pool.stake_vault,
            &derive_ata(&owner, &pool.staked_mint),
            &derive_ata(&farm.fee_collector, &pool.staked_mint),
            &farm.reward_mint,
            &derive_ata(&owner, &farm.reward_mint),
            amount,
            false,
        );
        self.send(signer, ix).await
    }

    /// Pull all principal best-effort, forfeiting unclaimed reward.
    pub async fn emergency_exit(&self, signer: &Keypair, pool_id: u64) -> Result<Signature> {
        let pool = self.pool(pool_id).await?;
        let owner = signer.pubkey();
        let ix = instructions::emergency_withdraw_ix(
            &self.program_id,
            &owner,
            pool_id,
            &pool.stake_vault,
            &derive_ata(&owner, &pool.staked_mint),
        );
        self.send(signer, ix).await
    }

    /// Approve or revoke a delegate for deposit_for/withdraw_for.
    pub async fn approve_delegate(
        &self,
        signer: &Keypair,
        delegate: &Pubkey,
        approved: bool,
    ) -> Result<Signature> {
        let ix = instructions::approve_delegate_ix(
            &self.program_id,
            &signer.pubkey(),
            delegate,
            approved,
        );
        self.send(signer, ix).await
    }

    /// Crank a pool's accumulator forward (permissionless).
    pub async fn crank(&self, signer: &Keypair, pool_id: u64) -> Result<Signature> {
        let ix = instructions::update_pool_ix(&self.program_id, pool_id);
        self.send(signer, ix).await
    }

    async fn send(
        &self,
        signer: &Keypair,
        ix: solana_sdk::instruction::Instruction,
    ) -> Result<Signature> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let tx = Transaction::new_signed_with_payer(
            &[ix],
            Some(&signer.pubkey()),
            &[signer],
            blockhash,
        );
        Ok(self.rpc.send_and_confirm_transaction(&tx).await?)
    }
}
