use alloy::{
    core::sol_types::SolValue,
    primitives::{Address, B256, Bytes, ChainId, U256, keccak256},
    rpc::types::{PackedUserOperation, UserOperation},
};
use serde::{Deserialize, Serialize};

/// Account-abstraction operation, in the layout of the EntryPoint it targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionedUserOp {
    V0_6(UserOperation),
    V0_7(PackedUserOperation),
}

/// Error type for UserOp operations
#[derive(Debug, Clone, thiserror::Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserOpError {
    #[error("Gas field `{field}` does not fit in 128 bits")]
    GasFieldOverflow { field: String },
}

impl VersionedUserOp {
    pub fn sender(&self) -> Address {
        match self {
            VersionedUserOp::V0_6(op) => op.sender,
            VersionedUserOp::V0_7(op) => op.sender,
        }
    }

    pub fn signature(&self) -> &Bytes {
        match self {
            VersionedUserOp::V0_6(op) => &op.signature,
            VersionedUserOp::V0_7(op) => &op.signature,
        }
    }

    pub fn set_signature(&mut self, signature: Bytes) {
        match self {
            VersionedUserOp::V0_6(op) => op.signature = signature,
            VersionedUserOp::V0_7(op) => op.signature = signature,
        }
    }

    /// Canonical hash the EntryPoint asks the account to validate a signature over
    pub fn hash(&self, entrypoint: Address, chain_id: ChainId) -> Result<B256, UserOpError> {
        match self {
            VersionedUserOp::V0_6(op) => compute_user_op_v06_hash(op, entrypoint, chain_id),
            VersionedUserOp::V0_7(op) => compute_user_op_v07_hash(op, entrypoint, chain_id),
        }
    }
}

fn to_u128(value: U256, field: &str) -> Result<u128, UserOpError> {
    value.try_into().map_err(|_| UserOpError::GasFieldOverflow {
        field: field.to_string(),
    })
}

/// Two 128-bit values packed high ‖ low into one word
fn pack_u128_pair(high: u128, low: u128) -> B256 {
    let mut packed = [0u8; 32];
    packed[0..16].copy_from_slice(&high.to_be_bytes());
    packed[16..32].copy_from_slice(&low.to_be_bytes());
    B256::from(packed)
}

fn wrap_with_entrypoint(inner_hash: B256, entrypoint: Address, chain_id: ChainId) -> B256 {
    keccak256((inner_hash, entrypoint, U256::from(chain_id)).abi_encode())
}

/// Compute UserOperation v0.6 hash
pub fn compute_user_op_v06_hash(
    op: &UserOperation,
    entrypoint: Address,
    chain_id: ChainId,
) -> Result<B256, UserOpError> {
    // Signature is deliberately absent from the tuple
    let inner_tuple = (
        op.sender,
        op.nonce,
        keccak256(&op.init_code),
        keccak256(&op.call_data),
        op.call_gas_limit,
        op.verification_gas_limit,
        op.pre_verification_gas,
        op.max_fee_per_gas,
        op.max_priority_fee_per_gas,
        keccak256(&op.paymaster_and_data),
    );

    let inner_hash = keccak256(inner_tuple.abi_encode());
    Ok(wrap_with_entrypoint(inner_hash, entrypoint, chain_id))
}

/// Compute UserOperation v0.7 hash
pub fn compute_user_op_v07_hash(
    op: &PackedUserOperation,
    entrypoint: Address,
    chain_id: ChainId,
) -> Result<B256, UserOpError> {
    let init_code: Bytes = match op.factory {
        Some(factory) => [
            &factory[..],
            &op.factory_data.clone().unwrap_or_default()[..],
        ]
        .concat()
        .into(),
        None => Bytes::default(),
    };

    let account_gas_limits = pack_u128_pair(
        to_u128(op.verification_gas_limit, "verification_gas_limit")?,
        to_u128(op.call_gas_limit, "call_gas_limit")?,
    );

    let gas_fees = pack_u128_pair(
        to_u128(op.max_priority_fee_per_gas, "max_priority_fee_per_gas")?,
        to_u128(op.max_fee_per_gas, "max_fee_per_gas")?,
    );

    let paymaster_and_data: Bytes = match op.paymaster {
        Some(paymaster) => {
            let verification_gas = to_u128(
                op.paymaster_verification_gas_limit.unwrap_or_default(),
                "paymaster_verification_gas_limit",
            )?;
            let post_op_gas = to_u128(
                op.paymaster_post_op_gas_limit.unwrap_or_default(),
                "paymaster_post_op_gas_limit",
            )?;
            [
                &paymaster[..],
                &verification_gas.to_be_bytes()[..],
                &post_op_gas.to_be_bytes()[..],
                &op.paymaster_data.clone().unwrap_or_default()[..],
            ]
            .concat()
            .into()
        }
        None => Bytes::default(),
    };

    let inner_tuple = (
        op.sender,
        op.nonce,
        keccak256(&init_code),
        keccak256(&op.call_data),
        account_gas_limits,
        op.pre_verification_gas,
        gas_fees,
        keccak256(&paymaster_and_data),
    );

    let inner_hash = keccak256(inner_tuple.abi_encode());
    Ok(wrap_with_entrypoint(inner_hash, entrypoint, chain_id))
}
