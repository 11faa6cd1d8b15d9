use anchor_lang::prelude::*;

use crate::{constants::*, state::DelegateApproval};

/// Grant or revoke a delegate's right to call deposit_for/withdraw_for on
/// the signer's behalf. Approval is per (user, delegate) pair.
pub fn handler(ctx: Context<ApproveDelegate>, approved: bool) -> Result<()> {
    let approval = &mut ctx.accounts.approval;
    approval.user = ctx.accounts.user.key();
    approval.delegate = ctx.accounts.delegate.key();
    approval.approved = approved;
    approval.bump = ctx.bumps.approval;

    msg!(
        "Delegate {} {} for {}",
        ctx.accounts.delegate.key(),
        if approved { "approved" } else { "revoked" },
        ctx.accounts.user.key()
    );
    Ok(())
}

#[derive(Accounts)]
pub struct ApproveDelegate<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    /// CHECK: the delegate being (dis)approved; any address
    pub delegate: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = user,
        space = DelegateApproval::LEN,
        seeds = [DELEGATE_SEED, user.key().as_ref(), delegate.key().as_ref()],
        bump,
    )]
    pub approval: Account<'info, DelegateApproval>,

    pub system_program: Program<'info, System>,
}
