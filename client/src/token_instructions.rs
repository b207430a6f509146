//! SPL token instruction builders used to set up mints and token accounts for a sale.
//!
//! The presale program only accepts accounts owned by the classic token program, so every builder
//! targets [`spl_token_interface::ID`].

use solana_address::Address;
use solana_instruction::Instruction;
use solana_sdk::program_pack::Pack;
use spl_associated_token_account_interface::{
    address::get_associated_token_address,
    instruction::create_associated_token_account_idempotent,
};
use spl_token_interface::state::Mint;

use crate::error::StepError;

pub fn create_and_initialize_mint_instructions(
    mint_authority_and_payer: &Address,
    mint: &Address,
    rent_lamports: u64,
    mint_decimals: u8,
) -> Result<(Instruction, Instruction), StepError> {
    let create_mint_account = solana_system_interface::instruction::create_account(
        mint_authority_and_payer,
        mint,
        rent_lamports,
        Mint::LEN as u64,
        &spl_token_interface::ID,
    );

    let initialize_mint = spl_token_2022_interface::instruction::initialize_mint2(
        &spl_token_interface::ID,
        mint,
        mint_authority_and_payer,
        None,
        mint_decimals,
    )
    .map_err(|e| StepError::Rejected {
        code: None,
        reason: format!("initialize mint: {e}"),
        from_presale: false,
    })?;

    Ok((create_mint_account, initialize_mint))
}

/// Returns the idempotent associated token account creation instruction along with the account's
/// address. Works for off-curve owners such as the sale manager PDA.
pub fn create_token_account_instruction(
    payer: &Address,
    owner: &Address,
    mint: &Address,
) -> (Instruction, Address) {
    let instruction =
        create_associated_token_account_idempotent(payer, owner, mint, &spl_token_interface::ID);
    (instruction, get_associated_token_address(owner, mint))
}

pub fn mint_to_instruction(
    mint: &Address,
    destination: &Address,
    mint_authority: &Address,
    amount: u64,
) -> Result<Instruction, StepError> {
    spl_token_2022_interface::instruction::mint_to(
        &spl_token_interface::ID,
        mint,
        destination,
        mint_authority,
        &[],
        amount,
    )
    .map_err(|e| StepError::Rejected {
        code: None,
        reason: format!("mint to: {e}"),
        from_presale: false,
    })
}
