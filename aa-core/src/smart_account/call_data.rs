use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};
use custom_account_core::{entrypoint::EntrypointVersion, error::AccountError};
use serde::{Deserialize, Serialize};

sol! {
    function execute(address dest, uint256 value, bytes func);
}

/// The v0.6 account has no value array in its batch entry point
pub mod v0_6 {
    alloy::sol! {
        function executeBatch(address[] dest, bytes[] func);
    }
}

pub mod v0_7 {
    alloy::sol! {
        function executeBatch(address[] dest, uint256[] value, bytes[] func);
    }
}

/// One unit of execution performed by the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub to: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
}

/// A single call, or an ordered batch executed in sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountCalls {
    Single(Call),
    Batch(Vec<Call>),
}

impl From<Call> for AccountCalls {
    fn from(call: Call) -> Self {
        AccountCalls::Single(call)
    }
}

impl From<Vec<Call>> for AccountCalls {
    fn from(batch: Vec<Call>) -> Self {
        AccountCalls::Batch(batch)
    }
}

pub fn encode_execute(call: &Call) -> Bytes {
    executeCall {
        dest: call.to,
        value: call.value,
        func: call.data.clone(),
    }
    .abi_encode()
    .into()
}

/// Encodes `executeBatch` in the shape the EntryPoint version's account expects.
///
/// For v0.6, per-call values are dropped: that account's batch entry point
/// cannot forward native currency.
pub fn encode_execute_batch(
    batch: &[Call],
    version: EntrypointVersion,
) -> Result<Bytes, AccountError> {
    if batch.is_empty() {
        return Err(AccountError::ValidationError {
            message: "Call batch must contain at least one call".to_string(),
        });
    }

    let dest = batch.iter().map(|call| call.to).collect();
    let func = batch.iter().map(|call| call.data.clone()).collect();

    let encoded = match version {
        EntrypointVersion::V0_6 => {
            if batch.iter().any(|call| !call.value.is_zero()) {
                tracing::trace!("Dropping call values from v0.6 executeBatch");
            }
            v0_6::executeBatchCall { dest, func }.abi_encode()
        }
        EntrypointVersion::V0_7 => v0_7::executeBatchCall {
            dest,
            value: batch.iter().map(|call| call.value).collect(),
            func,
        }
        .abi_encode(),
    };

    Ok(encoded.into())
}

pub fn encode_call_data(
    calls: &AccountCalls,
    version: EntrypointVersion,
) -> Result<Bytes, AccountError> {
    match calls {
        AccountCalls::Single(call) => Ok(encode_execute(call)),
        AccountCalls::Batch(batch) => encode_execute_batch(batch, version),
    }
}

/// Standalone deployment call data is never produced; the account is deployed
/// through the init code of its first operation.
pub fn encode_deploy_call_data(_deployment: &Bytes) -> Result<Bytes, AccountError> {
    Err(AccountError::unsupported(
        "Custom account doesn't support account deployment",
    ))
}
