use alloy::{
    dyn_abi::TypedData,
    primitives::{Address, Bytes, U256, aliases::U192},
    rpc::types::TransactionRequest,
};
use custom_account_aa_types::VersionedUserOp;
use custom_account_core::{
    constants::{CUSTOM_ACCOUNT_SOURCE, DUMMY_SIGNATURE},
    entrypoint::{EntrypointDetails, EntrypointVersion},
    error::AccountError,
    rpc::AccountRpc,
    signer::{OwnerSigner, SignableMessage},
};
use serde::{Deserialize, Serialize};

use crate::{
    account_factory::{AccountFactory, encode_factory_data, resolve_account_address},
    smart_account::{
        AccountCalls, DeploymentStatus, encode_call_data, encode_deploy_call_data,
        is_smart_account_deployed,
    },
};

/// Inputs for assembling a [`CustomSmartAccount`]
#[derive(Debug, Clone)]
pub struct CustomSmartAccountParams<S> {
    pub owner: S,
    pub factory_address: Address,
    pub entrypoint: EntrypointDetails,
    /// Salt passed to the factory; distinct indices give distinct accounts for one owner
    pub index: U256,
    /// Known account address. Skips counterfactual derivation when set.
    pub address: Option<Address>,
}

impl<S: OwnerSigner> CustomSmartAccountParams<S> {
    pub fn new(owner: S, factory_address: Address, entrypoint_address: Address) -> Self {
        Self {
            owner,
            factory_address,
            entrypoint: EntrypointDetails::new(entrypoint_address),
            index: U256::ZERO,
            address: None,
        }
    }

    pub fn with_index(mut self, index: U256) -> Self {
        self.index = index;
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_entrypoint_details(mut self, entrypoint: EntrypointDetails) -> Self {
        self.entrypoint = entrypoint;
        self
    }
}

pub struct CustomSmartAccountBuilder<R, S> {
    rpc: R,
    params: CustomSmartAccountParams<S>,
}

impl<R: AccountRpc, S: OwnerSigner> CustomSmartAccountBuilder<R, S> {
    pub fn new(rpc: R, params: CustomSmartAccountParams<S>) -> Self {
        Self { rpc, params }
    }

    /// Resolves the account address and chain id together, then probes
    /// deployment once. Either resolution failing fails the whole build.
    pub async fn build(self) -> Result<CustomSmartAccount<R, S>, AccountError> {
        let CustomSmartAccountParams {
            owner,
            factory_address,
            entrypoint,
            index,
            address,
        } = self.params;
        let rpc = self.rpc;

        let factory = AccountFactory::new(factory_address);
        let owner_address = owner.address();

        let resolve_address = async {
            match address {
                Some(address) => {
                    tracing::debug!(%address, "Using provided account address, skipping derivation");
                    Ok(address)
                }
                None => {
                    resolve_account_address(
                        &rpc,
                        &factory,
                        entrypoint.entrypoint_address,
                        owner_address,
                        index,
                    )
                    .await
                }
            }
        };

        let (address, chain_id) = tokio::try_join!(resolve_address, rpc.chain_id())?;

        let deployed = is_smart_account_deployed(&rpc, address).await?;

        tracing::debug!(
            %address,
            chain_id,
            entrypoint = %entrypoint.entrypoint_address,
            version = %entrypoint.version,
            deployed,
            "Custom smart account assembled"
        );

        Ok(CustomSmartAccount {
            rpc,
            owner,
            factory,
            entrypoint,
            index,
            address,
            chain_id,
            deployment: DeploymentStatus::new(deployed),
        })
    }
}

/// Serialisable snapshot of an assembled account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDescriptor {
    pub address: Address,
    pub public_key: Address,
    pub source: String,
    pub entrypoint: Address,
    pub entrypoint_version: EntrypointVersion,
    pub factory_address: Address,
    pub owner_address: Option<Address>,
    pub index: U256,
    pub chain_id: u64,
    pub deployed: bool,
}

/// Smart account whose operations are authorized by a single owner and
/// which is deployed by a `createAccount(owner, salt)` factory.
///
/// Everything except the deployment flag is fixed at construction.
pub struct CustomSmartAccount<R, S> {
    rpc: R,
    owner: S,
    factory: AccountFactory,
    entrypoint: EntrypointDetails,
    index: U256,
    address: Address,
    chain_id: u64,
    deployment: DeploymentStatus,
}

impl<R: AccountRpc, S: OwnerSigner> CustomSmartAccount<R, S> {
    pub fn address(&self) -> Address {
        self.address
    }

    /// Same as the address for this account type
    pub fn public_key(&self) -> Address {
        self.address
    }

    pub fn source(&self) -> &'static str {
        CUSTOM_ACCOUNT_SOURCE
    }

    pub fn entrypoint(&self) -> Address {
        self.entrypoint.entrypoint_address
    }

    pub fn entrypoint_version(&self) -> EntrypointVersion {
        self.entrypoint.version
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn index(&self) -> U256 {
        self.index
    }

    pub fn factory_address(&self) -> Address {
        self.factory.factory_address
    }

    pub fn descriptor(&self) -> AccountDescriptor {
        AccountDescriptor {
            address: self.address,
            public_key: self.public_key(),
            source: CUSTOM_ACCOUNT_SOURCE.to_string(),
            entrypoint: self.entrypoint(),
            entrypoint_version: self.entrypoint_version(),
            factory_address: self.factory_address(),
            owner_address: self.owner.address(),
            index: self.index,
            chain_id: self.chain_id,
            deployed: self.deployment.cached(),
        }
    }

    /// Re-probes the chain while the cached state is still undeployed
    pub async fn is_deployed(&self) -> Result<bool, AccountError> {
        let was_deployed = self.deployment.cached();
        let deployed = self
            .deployment
            .refresh(is_smart_account_deployed(&self.rpc, self.address))
            .await?;

        if deployed && !was_deployed {
            tracing::debug!(address = %self.address, "Account deployment observed");
        }

        Ok(deployed)
    }

    /// Records a deployment the caller already observed, without probing
    pub fn mark_deployed(&self) {
        self.deployment.mark_deployed();
    }

    pub async fn sign_message(&self, message: &SignableMessage) -> Result<Bytes, AccountError> {
        self.owner.sign_message(message).await
    }

    /// Always fails: execution goes through account-abstraction operations
    pub fn sign_transaction(&self, _transaction: &TransactionRequest) -> Result<Bytes, AccountError> {
        Err(AccountError::SignTransactionUnsupported)
    }

    pub async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, AccountError> {
        self.owner.sign_typed_data(typed_data).await
    }

    pub async fn get_nonce(&self) -> Result<U256, AccountError> {
        self.get_nonce_with_key(U192::ZERO).await
    }

    pub async fn get_nonce_with_key(&self, key: U192) -> Result<U256, AccountError> {
        self.rpc
            .get_nonce(self.address, self.entrypoint(), key)
            .await
    }

    /// Signs the operation hash bound to this account's EntryPoint and chain
    pub async fn sign_user_operation(
        &self,
        user_op: &VersionedUserOp,
    ) -> Result<Bytes, AccountError> {
        let hash = user_op.hash(self.entrypoint(), self.chain_id)?;

        tracing::debug!(
            sender = %user_op.sender(),
            %hash,
            "Signing user operation hash"
        );

        self.owner
            .sign_message(&SignableMessage::Raw(Bytes::copy_from_slice(
                hash.as_slice(),
            )))
            .await
    }

    /// Empty once deployed, otherwise the factory-prefixed deployment call
    pub async fn get_init_code(&self) -> Result<Bytes, AccountError> {
        if self.is_deployed().await? {
            return Ok(Bytes::new());
        }

        self.factory.init_code(self.owner.address(), self.index)
    }

    pub async fn get_factory(&self) -> Result<Option<Address>, AccountError> {
        if self.is_deployed().await? {
            return Ok(None);
        }

        Ok(Some(self.factory.factory_address))
    }

    pub async fn get_factory_data(&self) -> Result<Option<Bytes>, AccountError> {
        if self.is_deployed().await? {
            return Ok(None);
        }

        encode_factory_data(self.owner.address(), self.index).map(Some)
    }

    pub fn encode_deploy_call_data(&self, deployment: &Bytes) -> Result<Bytes, AccountError> {
        encode_deploy_call_data(deployment)
    }

    pub fn encode_call_data(&self, calls: &AccountCalls) -> Result<Bytes, AccountError> {
        encode_call_data(calls, self.entrypoint.version)
    }

    /// Placeholder for gas estimation. Identical for every operation.
    pub fn get_dummy_signature(&self, _user_op: &VersionedUserOp) -> Bytes {
        Bytes::copy_from_slice(&DUMMY_SIGNATURE)
    }
}

/// Builds a [`CustomSmartAccount`] for `owner` behind `factory_address`.
pub async fn create_custom_smart_account<R: AccountRpc, S: OwnerSigner>(
    rpc: R,
    params: CustomSmartAccountParams<S>,
) -> Result<CustomSmartAccount<R, S>, AccountError> {
    CustomSmartAccountBuilder::new(rpc, params).build().await
}
