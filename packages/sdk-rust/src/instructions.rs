//! Low-level Anchor instruction builders.
//!
//! Each function constructs a [`solana_sdk::instruction::Instruction`] ready
//! for signing and submission.  Account order mirrors the Anchor
//! `#[derive(Accounts)]` structs in the on-chain program exactly.
//!
//! Anchor instruction discriminators: `sha256("global:{name}")[..8]`.
//! Anchor account discriminators:    `sha256("account:{TypeName}")[..8]`.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use std::str::FromStr;

// ─── Well-known program IDs ───────────────────────────────────────────────────

pub(crate) fn spl_token_id() -> Pubkey {
    Pubkey::from_str("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").unwrap()
}

pub(crate) fn ata_program_id() -> Pubkey {
    Pubkey::from_str("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL").unwrap()
}

// ─── PDA seeds (mirrors programs/yield-farm/src/constants.rs) ────────────────

pub const FARM_SEED:           &[u8] = b"farm";
pub const POOL_SEED:           &[u8] = b"pool";
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool_authority";
pub const POSITION_SEED:       &[u8] = b"position";
pub const DELEGATE_SEED:       &[u8] = b"delegate";
pub const YIELD_VAULT_SEED:    &[u8] = b"yield_vault";

// ─── PDA derivation helpers ───────────────────────────────────────────────────

/// Derive the farm singleton PDA.
pub fn derive_farm(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FARM_SEED], program_id)
}

/// Derive the pool PDA for a pool id (ids are append-only from 0).
pub fn derive_pool(farm: &Pubkey, pool_id: u64, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POOL_SEED, farm.as_ref(), &pool_id.to_le_bytes()],
        program_id,
    )
}

/// Derive the pool-authority PDA that signs for vault transfers.
pub fn derive_pool_authority(pool: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_AUTHORITY_SEED, pool.as_ref()], program_id)
}

/// Derive the per-user position PDA for a pool.
pub fn derive_position(pool: &Pubkey, owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POSITION_SEED, pool.as_ref(), owner.as_ref()],
        program_id,
    )
}

/// Derive the (user, delegate) approval PDA.
pub fn derive_delegate_approval(
    user: &Pubkey,
    delegate: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[DELEGATE_SEED, user.as_ref(), delegate.as_ref()],
        program_id,
    )
}

/// Derive the yield vault for a given attachment generation.
pub fn derive_yield_vault(pool: &Pubkey, generation: u32, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[YIELD_VAULT_SEED, pool.as_ref(), &generation.to_le_bytes()],
        program_id,
    )
}

/// Derive the Associated Token Account for a wallet + mint.
pub fn derive_ata(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    let token_prog = spl_token_id();
    Pubkey::find_program_address(
        &[wallet.as_ref(), token_prog.as_ref(), mint.as_ref()],
        &ata_program_id(),
    )
    .0
}

// ─── Discriminator ────────────────────────────────────────────────────────────

fn disc(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let h = solana_sdk::hash::hash(preimage.as_bytes());
    h.to_bytes()[..8].try_into().unwrap()
}

// ─── initialize ──────────────────────────────────────────────────────────────

/// Build the `initialize` instruction.
///
/// `reward_mint` must already exist with the farm PDA as its sole mint
/// authority — derive it with [`derive_farm`] before creating the mint.
pub fn initialize_ix(
    program_id:      &Pubkey,
    authority:       &Pubkey,
    reward_mint:     &Pubkey,
    reward_per_slot: u64,
    start_slot:      u64,
    fee_collector:   &Pubkey,
) -> Instruction {
    let (farm, _) = derive_farm(program_id);

    let mut data = disc("initialize").to_vec();
    data.extend_from_slice(&reward_per_slot.to_le_bytes());
    data.extend_from_slice(&start_slot.to_le_bytes());
    data.extend_from_slice(fee_collector.as_ref());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority,              true),   // mut + signer
            AccountMeta::new(farm,                    false),  // mut PDA (init)
            AccountMeta::new_readonly(*reward_mint,   false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
        ],
        data,
    }
}

// ─── approve_delegate ────────────────────────────────────────────────────────

/// Build the `approve_delegate` instruction.  One approval PDA per
/// (user, delegate) pair; `approved = false` revokes without closing.
pub fn approve_delegate_ix(
    program_id: &Pubkey,
    user:       &Pubkey,
    delegate:   &Pubkey,
    approved:   bool,
) -> Instruction {
    let (approval, _) = derive_delegate_approval(user, delegate, program_id);

    let mut data = disc("approve_delegate").to_vec();
    data.push(approved as u8);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*user,              true),   // mut + signer
            AccountMeta::new_readonly(*delegate, false),
            AccountMeta::new(approval,           false),  // mut PDA (init_if_needed)
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
        ],
        data,
    }
}

// ─── deposit / deposit_for ───────────────────────────────────────────────────

/// Build a `deposit` (self) or `deposit_for` (delegated) instruction.
///
/// Pass `delegate: false` when the depositor is the beneficiary.  With
/// `delegate: true` the depositor must hold an approval from the
/// beneficiary, and the approval PDA is included automatically.
/// `amount == 0` harvests without staking.
#[allow(clippy::too_many_arguments)]
pub fn deposit_ix(
    program_id:         &Pubkey,
    depositor:          &Pubkey,
    beneficiary:        &Pubkey,
    pool_id:            u64,
    stake_vault:        &Pubkey,
    depositor_token:    &Pubkey,
    reward_mint:        &Pubkey,
    beneficiary_reward: &Pubkey,
    amount:             u64,
    delegate:           bool,
) -> Instruction {
    let (farm, _)     = derive_farm(program_id);
    let (pool, _)     = derive_pool(&farm, pool_id, program_id);
    let (position, _) = derive_position(&pool, beneficiary, program_id);
    // Anchor optional account: the program id stands in when absent
    let approval = if delegate {
        derive_delegate_approval(beneficiary, depositor, program_id).0
    } else {
        *program_id
    };

    let name = if delegate { "deposit_for" } else { "deposit" };
    let mut data = disc(name).to_vec();
    data.extend_from_slice(&amount.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*depositor,               true),   // mut + signer
            AccountMeta::new_readonly(*beneficiary,     false),
            AccountMeta::new_readonly(approval,         false),
            AccountMeta::new(farm,                      false),  // mut
            AccountMeta::new(pool,                      false),  // mut
            AccountMeta::new(position,                  false),  // mut PDA (init_if_needed)
            AccountMeta::new(*stake_vault,              false),  // mut
            AccountMeta::new(*depositor_token,          false),  // mut
            AccountMeta::new(*reward_mint,              false),  // mut (payout mint_to)
            AccountMeta::new(*beneficiary_reward,       false),  // mut
            AccountMeta::new_readonly(spl_token_id(),   false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
        ],
        data,
    }
}

// ─── withdraw / withdraw_for ─────────────────────────────────────────────────

/// Build a `withdraw` (self) or `withdraw_for` (delegated) instruction.
///
/// Principal is paid net of the pool's withdrawal fee; both the principal
/// and reward accounts must be owned by the beneficiary.
#[allow(clippy::too_many_arguments)]
pub fn withdraw_ix(
    program_id:          &Pubkey,
    withdrawer:          &Pubkey,
    beneficiary:         &Pubkey,
    pool_id:             u64,
    stake_vault:         &Pubkey,
    beneficiary_token:   &Pubkey,
    fee_collector_token: &Pubkey,
    reward_mint:         &Pubkey,
    beneficiary_reward:  &Pubkey,
    amount:              u64,
    delegate:            bool,
) -> Instruction {
    let (farm, _)           = derive_farm(program_id);
    let (pool, _)           = derive_pool(&farm, pool_id, program_id);
    let (pool_authority, _) = derive_pool_authority(&pool, program_id);
    let (position, _)       = derive_position(&pool, beneficiary, program_id);
    let approval = if delegate {
        derive_delegate_approval(beneficiary, withdrawer, program_id).0
    } else {
        *program_id
    };

    let name = if delegate { "withdraw_for" } else { "withdraw" };
    let mut data = disc(name).to_vec();
    data.extend_from_slice(&amount.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*withdrawer,      true),   // signer
            AccountMeta::new_readonly(*beneficiary,     false),
            AccountMeta::new_readonly(approval,         false),
            AccountMeta::new(farm,                      false),  // mut
            AccountMeta::new(pool,                      false),  // mut
            AccountMeta::new_readonly(pool_authority,   false),
            AccountMeta::new(position,                  false),  // mut
            AccountMeta::new(*stake_vault,              false),  // mut
            AccountMeta::new(*beneficiary_token,        false),  // mut
            AccountMeta::new(*fee_collector_token,      false),  // mut
            AccountMeta::new(*reward_mint,              false),  // mut
            AccountMeta::new(*beneficiary_reward,       false),  // mut
            AccountMeta::new_readonly(spl_token_id(),   false),
        ],
        data,
    }
}

// ─── emergency_withdraw ──────────────────────────────────────────────────────

/// Build the `emergency_withdraw` instruction.  Returns principal
/// best-effort and forfeits all unclaimed reward; never blocked by the
/// global pause.
pub fn emergency_withdraw_ix(
    program_id:  &Pubkey,
    owner:       &Pubkey,
    pool_id:     u64,
    stake_vault: &Pubkey,
    owner_token: &Pubkey,
) -> Instruction {
    let (farm, _)           = derive_farm(program_id);
    let (pool, _)           = derive_pool(&farm, pool_id, program_id);
    let (pool_authority, _) = derive_pool_authority(&pool, program_id);
    let (position, _)       = derive_position(&pool, owner, program_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner,         true),   // signer
            AccountMeta::new(farm,                    false),  // mut
            AccountMeta::new(pool,                    false),  // mut
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(position,                false),  // mut
            AccountMeta::new(*stake_vault,            false),  // mut
            AccountMeta::new(*owner_token,            false),  // mut
            AccountMeta::new_readonly(spl_token_id(), false),
        ],
        data: disc("emergency_withdraw").to_vec(),
    }
}

// ─── update_pool ─────────────────────────────────────────────────────────────

/// Build the permissionless `update_pool` crank instruction.
pub fn update_pool_ix(program_id: &Pubkey, pool_id: u64) -> Instruction {
    let (farm, _) = derive_farm(program_id);
    let (pool, _) = derive_pool(&farm, pool_id, program_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(farm, false),
            AccountMeta::new(pool,          false),  // mut
        ],
        data: disc("update_pool").to_vec(),
    }
}
