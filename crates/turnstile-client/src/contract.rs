use alloy::providers::RootProvider;
use alloy::rpc::client::RpcClient;
use alloy::sol;
use alloy::transports::http::{Client, Http};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use url::Url;

use crate::reader::{LockReader, ReadError};

sol! {
    /// View interface shared by Unlock Protocol locks and plain ERC-721
    /// ticket contracts. `getHasValidKey` / `keyExpirationTimestampFor`
    /// are the Unlock extension; `name` / `balanceOf` exist on any
    /// token-style contract.
    #[sol(rpc)]
    contract TicketLock {
        function name() external view returns (string);
        function balanceOf(address owner) external view returns (uint256);
        function getHasValidKey(address user) external view returns (bool);
        function keyExpirationTimestampFor(address user) external view returns (uint256);
    }
}

type HttpTransport = Http<Client>;

/// Production [`LockReader`] backed by an HTTP JSON-RPC provider.
///
/// Read-only: no signer, no fillers, no transaction support. Each call
/// is issued once; retry policy belongs to the caller.
pub struct RpcLockReader {
    lock: TicketLock::TicketLockInstance<HttpTransport, RootProvider<HttpTransport>>,
}

impl RpcLockReader {
    pub fn new(rpc_url: Url, contract: Address) -> Self {
        let client = RpcClient::new_http(rpc_url);
        let provider = RootProvider::new(client);
        Self {
            lock: TicketLock::new(contract, provider),
        }
    }

    /// Address of the lock contract this reader is bound to.
    pub fn contract_address(&self) -> Address {
        *self.lock.address()
    }
}

#[async_trait]
impl LockReader for RpcLockReader {
    async fn name(&self) -> Result<String, ReadError> {
        self.lock
            .name()
            .call()
            .await
            .map(|ret| ret._0)
            .map_err(|e| ReadError::new("name", e))
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, ReadError> {
        self.lock
            .balanceOf(owner)
            .call()
            .await
            .map(|ret| ret._0)
            .map_err(|e| ReadError::new("balanceOf", e))
    }

    async fn has_valid_key(&self, owner: Address) -> Result<bool, ReadError> {
        self.lock
            .getHasValidKey(owner)
            .call()
            .await
            .map(|ret| ret._0)
            .map_err(|e| ReadError::new("getHasValidKey", e))
    }

    async fn key_expiration(&self, owner: Address) -> Result<U256, ReadError> {
        self.lock
            .keyExpirationTimestampFor(owner)
            .call()
            .await
            .map(|ret| ret._0)
            .map_err(|e| ReadError::new("keyExpirationTimestampFor", e))
    }
}
