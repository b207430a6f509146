//! Read-only view helpers for decoding presale program accounts from a [`Ledger`].

use presale_interface::state::{
    AccountRecord,
    SaleManager,
    SalePot,
};
use solana_address::Address;

use crate::{
    error::StepError,
    ledger::Ledger,
};

/// Fetches and decodes a program record, failing with [`StepError::Resolution`] if the account
/// is missing or holds something else.
pub async fn fetch_record<T: AccountRecord, L: Ledger>(
    ledger: &L,
    address: &Address,
) -> Result<T, StepError> {
    try_fetch_record(ledger, address)
        .await?
        .ok_or_else(|| StepError::Resolution(format!("{} {address} doesn't exist", T::ACCOUNT_NAME)))
}

/// Like [`fetch_record`], but a missing account is `Ok(None)`.
pub async fn try_fetch_record<T: AccountRecord, L: Ledger>(
    ledger: &L,
    address: &Address,
) -> Result<Option<T>, StepError> {
    let Some(data) = ledger.fetch_account_data(address).await? else {
        return Ok(None);
    };
    T::try_from_account_data(&data)
        .map(Some)
        .map_err(|e| StepError::Resolution(format!("{} {address}: {e}", T::ACCOUNT_NAME)))
}

/// A sale manager together with the sale pot it currently points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSale {
    pub sale_manager_address: Address,
    pub sale_manager: SaleManager,
    pub sale_pot_address: Address,
    pub sale_pot: SalePot,
}

/// Reads the sale manager, then the sale pot recorded in it.
///
/// The sale pot's address is generated by the seller at sell time and can't be derived, so this
/// is the only way to find it. Fails with [`StepError::Resolution`] if no sale has been recorded.
pub async fn resolve_sale<L: Ledger>(
    ledger: &L,
    sale_manager_address: &Address,
) -> Result<ResolvedSale, StepError> {
    let sale_manager: SaleManager = fetch_record(ledger, sale_manager_address).await?;
    if !sale_manager.has_sale_pot() {
        return Err(StepError::Resolution(format!(
            "sale manager {sale_manager_address} has no sale recorded"
        )));
    }
    let sale_pot_address = sale_manager.sale_pot;
    let sale_pot: SalePot = fetch_record(ledger, &sale_pot_address).await?;

    Ok(ResolvedSale {
        sale_manager_address: *sale_manager_address,
        sale_manager,
        sale_pot_address,
        sale_pot,
    })
}
