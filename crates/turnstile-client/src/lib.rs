//! On-chain ticket validation for Unlock-style lock contracts.
//!
//! Given a checksum-normalized wallet address, [`TicketClient`] queries
//! the lock contract over JSON-RPC and produces a [`ValidationResult`]:
//! the capability-aware `getHasValidKey` path is preferred (it also
//! yields the key expiration), with a generic `balanceOf` fallback so
//! the check still works against any minimal ERC-721 contract.
//!
//! The decision procedure itself lives in [`validate::validate_with_reader`]
//! and is written against the [`LockReader`] trait, so it can be tested
//! without a node.

use alloy_primitives::{address, Address};
use url::Url;

pub mod contract;
pub mod reader;
pub mod validate;

pub use contract::RpcLockReader;
pub use reader::{LockReader, ReadError};
pub use validate::{
    validate_with_reader, DisplayLabels, ValidationResult, EVENT_NAME, FALLBACK_CONTRACT_NAME,
};

/// Gnosis Chain public RPC endpoint used by default.
pub const DEFAULT_RPC_URL: &str = "https://rpc.gnosischain.com";

/// Lock contract checked when no override is configured.
pub const DEFAULT_LOCK_ADDRESS: Address = address!("9340184741D938453bF66D77d551Cc04Ab2F4925");

/// Configuration for a [`TicketClient`].
#[derive(Debug, Clone)]
pub struct TicketClientConfig {
    /// Address of the lock contract that issues the tickets.
    pub contract_address: Address,

    /// Labels attached to results for display.
    pub labels: DisplayLabels,
}

impl Default for TicketClientConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_LOCK_ADDRESS,
            labels: DisplayLabels::default(),
        }
    }
}

/// High-level validator bound to one lock contract on one endpoint.
///
/// Stateless per call: concurrent `validate` invocations are safe but
/// never coordinated or deduplicated here; callers that want mutual
/// exclusion must gate their own triggers.
pub struct TicketClient {
    reader: RpcLockReader,
    labels: DisplayLabels,
}

impl TicketClient {
    /// Create a client for the given endpoint and configuration.
    pub fn new(rpc_url: Url, config: TicketClientConfig) -> Self {
        let reader = RpcLockReader::new(rpc_url, config.contract_address);
        Self {
            reader,
            labels: config.labels,
        }
    }

    /// Access the underlying reader for lower-level queries.
    pub fn reader(&self) -> &RpcLockReader {
        &self.reader
    }

    /// Decide whether `holder` currently holds a valid ticket.
    ///
    /// Total over [`ValidationResult`]: read failures end up either
    /// absorbed (name, expiration, capability probe) or reported in the
    /// result's `error` field, never as a panic or an `Err`.
    pub async fn validate(&self, holder: Address) -> ValidationResult {
        validate_with_reader(&self.reader, holder, &self.labels).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_binds_configured_contract() {
        let config = TicketClientConfig::default();
        let client = TicketClient::new(DEFAULT_RPC_URL.parse().unwrap(), config);
        assert_eq!(client.reader().contract_address(), DEFAULT_LOCK_ADDRESS);
    }
}
