use alloy::{
    dyn_abi::TypedData,
    primitives::{Address, Bytes},
    signers::{Signer, local::PrivateKeySigner},
};
use serde::{Deserialize, Serialize};

use crate::error::AccountError;

/// Payload for EIP-191 personal-message signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignableMessage {
    /// UTF-8 text, signed as its bytes
    Text(String),
    /// Arbitrary bytes, e.g. an operation hash
    Raw(Bytes),
}

impl SignableMessage {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SignableMessage::Text(text) => text.as_bytes(),
            SignableMessage::Raw(raw) => raw.as_ref(),
        }
    }
}

/// Identity that authorizes the smart account's operations.
///
/// Signs messages and typed data only; an owner never signs native transactions.
pub trait OwnerSigner: Send + Sync {
    /// `None` while the signer has no resolved account
    fn address(&self) -> Option<Address>;

    fn sign_message(
        &self,
        message: &SignableMessage,
    ) -> impl Future<Output = Result<Bytes, AccountError>> + Send;

    fn sign_typed_data(
        &self,
        typed_data: &TypedData,
    ) -> impl Future<Output = Result<Bytes, AccountError>> + Send;
}

/// Owner backed by an in-process private key
#[derive(Clone, Debug)]
pub struct LocalOwner {
    signer: PrivateKeySigner,
}

impl LocalOwner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    pub fn from_private_key(private_key: &str) -> Result<Self, AccountError> {
        let signer = private_key
            .parse::<PrivateKeySigner>()
            .map_err(|e| AccountError::SignerError {
                message: format!("Invalid owner private key: {e}"),
            })?;

        Ok(Self::new(signer))
    }
}

impl OwnerSigner for LocalOwner {
    fn address(&self) -> Option<Address> {
        Some(self.signer.address())
    }

    async fn sign_message(&self, message: &SignableMessage) -> Result<Bytes, AccountError> {
        let signature = self.signer.sign_message(message.as_bytes()).await?;
        Ok(Bytes::from(signature.as_bytes()))
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, AccountError> {
        let signature = self.signer.sign_dynamic_typed_data(typed_data).await?;
        Ok(Bytes::from(signature.as_bytes()))
    }
}
