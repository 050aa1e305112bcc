use std::fmt;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;

/// A single failed read against the lock contract.
///
/// Carries the method that failed and the underlying error text. Whether
/// a failure is absorbed or fatal is decided by the validation
/// procedure, not here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{method} read failed: {message}")]
pub struct ReadError {
    pub method: &'static str,
    pub message: String,
}

impl ReadError {
    pub fn new(method: &'static str, source: impl fmt::Display) -> Self {
        Self {
            method,
            message: source.to_string(),
        }
    }
}

/// Read seam over the lock contract's view methods.
///
/// The validation procedure is written against this trait so it can be
/// exercised without a network; the production implementation is
/// [`crate::contract::RpcLockReader`].
///
/// `getHasValidKey` and `keyExpirationTimestampFor` are Unlock-specific
/// and may simply not exist on a given contract; callers must treat
/// their errors as "method unavailable", not as a fault.
#[async_trait]
pub trait LockReader {
    /// `name()` — human-readable contract name.
    async fn name(&self) -> Result<String, ReadError>;

    /// `balanceOf(owner)` — token balance under the lock contract.
    async fn balance_of(&self, owner: Address) -> Result<U256, ReadError>;

    /// `getHasValidKey(owner)` — whether the owner currently holds a
    /// valid, unexpired key.
    async fn has_valid_key(&self, owner: Address) -> Result<bool, ReadError>;

    /// `keyExpirationTimestampFor(owner)` — key expiration in seconds
    /// since epoch. Only meaningful when a valid key exists.
    async fn key_expiration(&self, owner: Address) -> Result<U256, ReadError>;
}
