use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};
use custom_account_core::error::AccountError;

mod counterfactual;

pub use counterfactual::resolve_account_address;

sol! {
    function createAccount(address owner, uint256 salt) returns (address ret);
}

/// ABI-encoded `createAccount(owner, salt)` call for the account factory
pub fn encode_factory_data(owner: Option<Address>, index: U256) -> Result<Bytes, AccountError> {
    let owner = owner.ok_or(AccountError::MissingOwnerAddress)?;

    Ok(createAccountCall { owner, salt: index }.abi_encode().into())
}

/// Factory contract that deploys the account on its first operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountFactory {
    pub factory_address: Address,
}

impl AccountFactory {
    pub fn new(factory_address: Address) -> Self {
        Self { factory_address }
    }

    pub fn factory_data(&self, owner: Option<Address>, index: U256) -> Result<Bytes, AccountError> {
        encode_factory_data(owner, index)
    }

    /// Factory address (20 raw bytes) followed by the factory call data
    pub fn init_code(&self, owner: Option<Address>, index: U256) -> Result<Bytes, AccountError> {
        let factory_data = self.factory_data(owner, index)?;

        let mut init_code = Vec::with_capacity(20 + factory_data.len());
        init_code.extend_from_slice(self.factory_address.as_slice());
        init_code.extend_from_slice(&factory_data);

        Ok(init_code.into())
    }
}
