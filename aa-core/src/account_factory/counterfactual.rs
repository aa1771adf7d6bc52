use alloy::primitives::{Address, U256};
use custom_account_core::{error::AccountError, rpc::AccountRpc};

use super::AccountFactory;

/// Resolves the address the factory deploys (or deployed) the account to,
/// by asking the EntryPoint to simulate the account's init code.
pub async fn resolve_account_address(
    rpc: &impl AccountRpc,
    factory: &AccountFactory,
    entrypoint: Address,
    owner: Option<Address>,
    index: U256,
) -> Result<Address, AccountError> {
    let owner_address = owner.ok_or(AccountError::MissingOwnerAddress)?;
    let init_code = factory.init_code(Some(owner_address), index)?;

    let address = rpc
        .get_sender_address(init_code, entrypoint)
        .await?
        .ok_or(AccountError::AccountAddressUnresolved {
            factory_address: factory.factory_address,
            owner_address,
            index,
        })?;

    tracing::debug!(
        %address,
        factory = %factory.factory_address,
        %index,
        "Account address resolved"
    );

    Ok(address)
}
