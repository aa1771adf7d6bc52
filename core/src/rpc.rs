use alloy::{
    primitives::{Address, Bytes, U256, aliases::U192},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    sol,
    sol_types::{SolCall, SolError},
    transports::{RpcError, http::reqwest::Url},
};

use crate::error::{AccountError, AlloyRpcErrorToAccountError, ContractErrorToAccountError};

sol! {
    #[sol(rpc)]
    contract IEntryPoint {
        error SenderAddressResult(address sender);

        function getSenderAddress(bytes initCode) external;
        function getNonce(address sender, uint192 key) external view returns (uint256 nonce);
    }
}

/// Chain access the account needs. Every call suspends on network I/O;
/// timeouts and retries belong to the implementation, not to callers here.
pub trait AccountRpc: Send + Sync {
    /// Endpoint used for error context
    fn rpc_url(&self) -> String;

    fn chain_id(&self) -> impl Future<Output = Result<u64, AccountError>> + Send;

    fn get_code(&self, address: Address)
    -> impl Future<Output = Result<Bytes, AccountError>> + Send;

    /// Address the EntryPoint would deploy `init_code` to, without committing state.
    /// `None` when the simulation produced no address.
    fn get_sender_address(
        &self,
        init_code: Bytes,
        entrypoint: Address,
    ) -> impl Future<Output = Result<Option<Address>, AccountError>> + Send;

    fn get_nonce(
        &self,
        sender: Address,
        entrypoint: Address,
        key: U192,
    ) -> impl Future<Output = Result<U256, AccountError>> + Send;
}

pub struct RpcChainConfig<'a> {
    pub rpc_url: &'a str,
}

impl RpcChainConfig<'_> {
    pub fn to_chain(&self) -> Result<RpcChain, AccountError> {
        let rpc_url = Url::parse(self.rpc_url).map_err(|e| AccountError::ValidationError {
            message: format!("Failed to parse RPC URL: {e}"),
        })?;

        Ok(RpcChain {
            provider: ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_http(rpc_url.clone()),
            rpc_url,
        })
    }
}

/// [`AccountRpc`] over an HTTP JSON-RPC node
#[derive(Clone)]
pub struct RpcChain {
    rpc_url: Url,
    provider: RootProvider,
}

impl AccountRpc for RpcChain {
    fn rpc_url(&self) -> String {
        self.rpc_url.to_string()
    }

    async fn chain_id(&self) -> Result<u64, AccountError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| e.to_account_error(self.rpc_url.as_str()))
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, AccountError> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| e.to_account_error(self.rpc_url.as_str()))
    }

    async fn get_sender_address(
        &self,
        init_code: Bytes,
        entrypoint: Address,
    ) -> Result<Option<Address>, AccountError> {
        let call = IEntryPoint::getSenderAddressCall {
            initCode: init_code,
        };

        let call_request = TransactionRequest::default()
            .to(entrypoint)
            .input(call.abi_encode().into());

        // getSenderAddress always reverts; the address travels in the revert data
        match self.provider.call(call_request).await {
            Ok(_) => {
                tracing::debug!(%entrypoint, "getSenderAddress returned without reverting");
                Ok(None)
            }
            Err(RpcError::ErrorResp(payload)) => {
                let sender = payload.as_revert_data().and_then(|data| {
                    IEntryPoint::SenderAddressResult::abi_decode(&data)
                        .ok()
                        .map(|result| result.sender)
                });

                if sender.is_none() {
                    tracing::debug!(
                        %entrypoint,
                        message = %payload.message,
                        "getSenderAddress reverted without SenderAddressResult"
                    );
                }

                Ok(sender)
            }
            Err(e) => Err(e.to_account_error(self.rpc_url.as_str())),
        }
    }

    async fn get_nonce(
        &self,
        sender: Address,
        entrypoint: Address,
        key: U192,
    ) -> Result<U256, AccountError> {
        let entrypoint_contract = IEntryPoint::new(entrypoint, self.provider.clone());

        entrypoint_contract
            .getNonce(sender, key)
            .call()
            .await
            .map_err(|e| e.to_account_error(self.rpc_url.as_str(), Some(entrypoint)))
    }
}
