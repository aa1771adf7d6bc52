use std::sync::atomic::{AtomicBool, Ordering};

use alloy::primitives::Address;
use custom_account_core::{error::AccountError, rpc::AccountRpc};

/// Whether the account has code on chain.
///
/// The flag only ever moves from `false` to `true`. Once deployment is
/// observed it is never re-checked or reset.
#[derive(Debug, Default)]
pub struct DeploymentStatus {
    deployed: AtomicBool,
}

impl DeploymentStatus {
    pub fn new(deployed: bool) -> Self {
        Self {
            deployed: AtomicBool::new(deployed),
        }
    }

    /// Last known state, without touching the chain
    pub fn cached(&self) -> bool {
        self.deployed.load(Ordering::Acquire)
    }

    pub fn mark_deployed(&self) {
        self.deployed.store(true, Ordering::Release);
    }

    /// Runs `check_chain` only while the cached state is still `false`.
    /// A `false` probe result leaves the flag untouched.
    pub async fn refresh<F>(&self, check_chain: F) -> Result<bool, AccountError>
    where
        F: Future<Output = Result<bool, AccountError>>,
    {
        if self.cached() {
            return Ok(true);
        }

        if check_chain.await? {
            self.mark_deployed();
        }

        Ok(self.cached())
    }
}

/// Non-empty code at the address means the account is deployed
pub async fn is_smart_account_deployed(
    rpc: &impl AccountRpc,
    address: Address,
) -> Result<bool, AccountError> {
    let code = rpc.get_code(address).await?;
    Ok(!code.is_empty())
}
