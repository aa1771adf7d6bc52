use alloy::{
    primitives::{Address, U256},
    transports::{RpcError as AlloyRpcError, TransportErrorKind},
};
use custom_account_aa_types::UserOpError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcErrorKind {
    /// Server returned an error response.
    #[error("server returned an error response: {0}")]
    ErrorResp(RpcErrorResponse),

    /// Server returned a null response when a non-null response was expected.
    #[error("server returned a null response when a non-null response was expected")]
    NullResp,

    /// Rpc server returned an unsupported feature.
    #[error("unsupported feature: {message}")]
    UnsupportedFeature { message: String },

    /// Returned when a local pre-processing step fails.
    #[error("local usage error: {message}")]
    InternalError { message: String },

    /// JSON serialization error.
    #[error("serialization error: {message}")]
    SerError { message: String },

    /// JSON deserialization error.
    #[error("deserialization error: {message}, text: {text}")]
    DeserError {
        message: String,
        /// The text that failed to deserialize.
        text: String,
    },

    #[error("HTTP error {status}")]
    TransportHttpError { status: u16, body: String },

    #[error("Other transport error: {message}")]
    OtherTransportError { message: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcErrorResponse {
    /// The error code.
    pub code: i64,
    /// The error message (if any).
    pub message: String,
    /// The error data (if any).
    pub data: Option<String>,
}

impl std::fmt::Display for RpcErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code {}: {}", self.code, self.message)?;
        if let Some(data) = &self.data {
            write!(f, ", data: {data}")?;
        }
        Ok(())
    }
}

/// A serializable contract interaction error type
#[derive(Debug, Error, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractInteractionErrorKind {
    /// The contract returned no data.
    #[error(
        "contract call to `{function}` returned no data (\"0x\"); the called address might not be a contract"
    )]
    ZeroData { function: String, message: String },

    /// An error occurred ABI encoding or decoding.
    #[error("ABI error: {message}")]
    AbiError { message: String },

    /// Any other contract-binding failure.
    #[error("contract call failed: {message}")]
    Other { message: String },
}

#[derive(Error, Debug, Serialize, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "type")]
pub enum AccountError {
    #[error("Owner account has no address")]
    MissingOwnerAddress,

    #[error(
        "Account address not found for owner {owner_address} via factory {factory_address} (index {index})"
    )]
    #[serde(rename_all = "camelCase")]
    AccountAddressUnresolved {
        factory_address: Address,
        owner_address: Address,
        index: U256,
    },

    #[error("Smart accounts cannot sign native transactions; submit an account-abstraction operation instead")]
    SignTransactionUnsupported,

    #[error("Unsupported operation: {message}")]
    UnsupportedOperation { message: String },

    #[error("RPC error at {rpc_url}: {message}")]
    #[serde(rename_all = "camelCase")]
    RpcError {
        rpc_url: String,
        message: String,
        kind: RpcErrorKind,
    },

    #[error("Contract interaction error: {message}")]
    #[serde(rename_all = "camelCase")]
    ContractInteractionError {
        contract_address: Option<Address>,
        message: String,
        kind: ContractInteractionErrorKind,
    },

    #[error("Signer error: {message}")]
    SignerError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl AccountError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        AccountError::UnsupportedOperation {
            message: message.into(),
        }
    }
}

impl From<UserOpError> for AccountError {
    fn from(err: UserOpError) -> Self {
        AccountError::ValidationError {
            message: err.to_string(),
        }
    }
}

impl From<alloy::signers::Error> for AccountError {
    fn from(err: alloy::signers::Error) -> Self {
        AccountError::SignerError {
            message: err.to_string(),
        }
    }
}

pub trait AlloyRpcErrorToAccountError {
    fn to_account_error(&self, rpc_url: &str) -> AccountError;
}

fn to_rpc_error_kind(err: &AlloyRpcError<TransportErrorKind>) -> RpcErrorKind {
    match err {
        AlloyRpcError::ErrorResp(err) => RpcErrorKind::ErrorResp(RpcErrorResponse {
            code: err.code,
            message: err.message.to_string(),
            data: err.data.as_ref().map(|data| data.to_string()),
        }),
        AlloyRpcError::NullResp => RpcErrorKind::NullResp,
        AlloyRpcError::UnsupportedFeature(feature) => RpcErrorKind::UnsupportedFeature {
            message: feature.to_string(),
        },
        AlloyRpcError::LocalUsageError(err) => RpcErrorKind::InternalError {
            message: err.to_string(),
        },
        AlloyRpcError::SerError(err) => RpcErrorKind::SerError {
            message: err.to_string(),
        },
        AlloyRpcError::DeserError { err, text } => RpcErrorKind::DeserError {
            message: err.to_string(),
            text: text.to_string(),
        },
        AlloyRpcError::Transport(err) => match err {
            TransportErrorKind::HttpError(err) => RpcErrorKind::TransportHttpError {
                status: err.status,
                body: err.body.to_string(),
            },
            _ => RpcErrorKind::OtherTransportError {
                message: err.to_string(),
            },
        },
    }
}

impl AlloyRpcErrorToAccountError for AlloyRpcError<TransportErrorKind> {
    fn to_account_error(&self, rpc_url: &str) -> AccountError {
        AccountError::RpcError {
            rpc_url: rpc_url.to_string(),
            message: self.to_string(),
            kind: to_rpc_error_kind(self),
        }
    }
}

pub trait ContractErrorToAccountError {
    fn to_account_error(self, rpc_url: &str, contract_address: Option<Address>) -> AccountError;
}

impl ContractErrorToAccountError for alloy::contract::Error {
    fn to_account_error(self, rpc_url: &str, contract_address: Option<Address>) -> AccountError {
        let (message, kind) = match self {
            // Transport failures keep their JSON-RPC detail
            alloy::contract::Error::TransportError(err) => {
                return err.to_account_error(rpc_url);
            }
            alloy::contract::Error::ZeroData(function, err) => (
                format!("Zero data returned from contract call to {function}"),
                ContractInteractionErrorKind::ZeroData {
                    function,
                    message: err.to_string(),
                },
            ),
            alloy::contract::Error::AbiError(err) => (
                format!("ABI error: {err}"),
                ContractInteractionErrorKind::AbiError {
                    message: err.to_string(),
                },
            ),
            other => (
                other.to_string(),
                ContractInteractionErrorKind::Other {
                    message: other.to_string(),
                },
            ),
        };

        AccountError::ContractInteractionError {
            contract_address,
            message,
            kind,
        }
    }
}
