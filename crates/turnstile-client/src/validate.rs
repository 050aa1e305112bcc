use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::reader::LockReader;

/// Substitute contract name when the `name()` read fails.
pub const FALLBACK_CONTRACT_NAME: &str = "Unlock Protocol NFT";

/// Fixed display label for the event a valid ticket admits to.
pub const EVENT_NAME: &str = "Unlock Event";

/// Display labels attached to validation results.
#[derive(Debug, Clone)]
pub struct DisplayLabels {
    pub event_name: String,
    pub contract_name_fallback: String,
}

impl Default for DisplayLabels {
    fn default() -> Self {
        Self {
            event_name: EVENT_NAME.to_string(),
            contract_name_fallback: FALLBACK_CONTRACT_NAME.to_string(),
        }
    }
}

/// Outcome of one validation request.
///
/// Created fresh per request and never mutated. `error` being set means
/// validity could not be determined; this is distinct from a
/// definitively false `is_valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub contract_name: String,
    pub event_name: String,

    /// Key expiration, present only when the capability-aware path
    /// succeeded end to end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Decide ticket validity for `holder` against any [`LockReader`].
///
/// Decision procedure:
/// 1. `name()` — failure absorbed, fallback label substituted.
/// 2. `getHasValidKey(holder)`:
///    - true → try `keyExpirationTimestampFor`; its failure only drops
///      the expiration field,
///    - false → definitively invalid, no further calls,
///    - read error (method missing on this contract) → step 3.
/// 3. `balanceOf(holder)` — valid iff balance > 0. Failure here is
///    fatal: the result carries an error message instead of a verdict.
///
/// Calls are sequential and issued at most once; the procedure is
/// stateless and reentrant.
pub async fn validate_with_reader<R: LockReader + ?Sized>(
    reader: &R,
    holder: Address,
    labels: &DisplayLabels,
) -> ValidationResult {
    let contract_name = match reader.name().await {
        Ok(name) => {
            debug!(%name, "contract name resolved");
            name
        }
        Err(e) => {
            warn!(error = %e, "contract name unavailable, using fallback label");
            labels.contract_name_fallback.clone()
        }
    };

    match reader.has_valid_key(holder).await {
        Ok(true) => {
            debug!(%holder, "getHasValidKey: true");
            let expiration = match reader.key_expiration(holder).await {
                Ok(seconds) => {
                    let ts = timestamp_from_seconds(seconds);
                    if ts.is_none() {
                        warn!(%seconds, "expiration out of representable range, omitting");
                    }
                    ts
                }
                Err(e) => {
                    warn!(error = %e, "expiration lookup failed, omitting");
                    None
                }
            };
            ValidationResult {
                is_valid: true,
                contract_name,
                event_name: labels.event_name.clone(),
                expiration,
                error: None,
            }
        }
        Ok(false) => {
            debug!(%holder, "getHasValidKey: false");
            ValidationResult {
                is_valid: false,
                contract_name,
                event_name: labels.event_name.clone(),
                expiration: None,
                error: None,
            }
        }
        Err(e) => {
            debug!(error = %e, "capability check unavailable, falling back to balanceOf");
            match reader.balance_of(holder).await {
                Ok(balance) => {
                    debug!(%holder, %balance, "balanceOf resolved");
                    ValidationResult {
                        is_valid: balance > U256::ZERO,
                        contract_name,
                        event_name: labels.event_name.clone(),
                        expiration: None,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "balance fallback failed, validity undetermined");
                    ValidationResult {
                        is_valid: false,
                        contract_name,
                        event_name: labels.event_name.clone(),
                        expiration: None,
                        error: Some(format!("could not determine ticket validity: {e}")),
                    }
                }
            }
        }
    }
}

/// Convert seconds-since-epoch from the contract into a UTC timestamp.
///
/// Unlock encodes "never expires" as `uint256::MAX`; anything outside
/// chrono's representable range yields `None` and the field is omitted.
fn timestamp_from_seconds(seconds: U256) -> Option<DateTime<Utc>> {
    let secs: i64 = u64::try_from(seconds).ok()?.try_into().ok()?;
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ReadError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn holder() -> Address {
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            .parse()
            .unwrap()
    }

    fn unavailable(method: &'static str) -> ReadError {
        ReadError::new(method, "execution reverted")
    }

    /// Scripted reader that records call order.
    struct MockReader {
        name: Result<String, ReadError>,
        has_valid_key: Result<bool, ReadError>,
        key_expiration: Result<U256, ReadError>,
        balance_of: Result<U256, ReadError>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockReader {
        fn new() -> Self {
            Self {
                name: Ok("Concert Lock".to_string()),
                has_valid_key: Ok(true),
                key_expiration: Ok(U256::from(1_767_225_600u64)),
                balance_of: Ok(U256::from(1u64)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, method: &'static str) {
            self.calls.lock().unwrap().push(method);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LockReader for MockReader {
        async fn name(&self) -> Result<String, ReadError> {
            self.record("name");
            self.name.clone()
        }

        async fn balance_of(&self, _owner: Address) -> Result<U256, ReadError> {
            self.record("balanceOf");
            self.balance_of.clone()
        }

        async fn has_valid_key(&self, _owner: Address) -> Result<bool, ReadError> {
            self.record("getHasValidKey");
            self.has_valid_key.clone()
        }

        async fn key_expiration(&self, _owner: Address) -> Result<U256, ReadError> {
            self.record("keyExpirationTimestampFor");
            self.key_expiration.clone()
        }
    }

    async fn run(reader: &MockReader) -> ValidationResult {
        validate_with_reader(reader, holder(), &DisplayLabels::default()).await
    }

    #[tokio::test]
    async fn valid_key_with_expiration() {
        let reader = MockReader::new();
        let result = run(&reader).await;

        assert!(result.is_valid);
        assert_eq!(result.contract_name, "Concert Lock");
        assert_eq!(result.event_name, EVENT_NAME);
        assert!(result.expiration.is_some());
        assert!(result.error.is_none());
        assert_eq!(
            reader.calls(),
            ["name", "getHasValidKey", "keyExpirationTimestampFor"]
        );
    }

    #[tokio::test]
    async fn expiration_failure_is_absorbed() {
        let mut reader = MockReader::new();
        reader.key_expiration = Err(unavailable("keyExpirationTimestampFor"));
        let result = run(&reader).await;

        assert!(result.is_valid);
        assert!(result.expiration.is_none());
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn invalid_key_short_circuits() {
        let mut reader = MockReader::new();
        reader.has_valid_key = Ok(false);
        let result = run(&reader).await;

        assert!(!result.is_valid);
        assert!(result.error.is_none());
        // Neither the expiration nor the balance fallback is attempted.
        assert_eq!(reader.calls(), ["name", "getHasValidKey"]);
    }

    #[tokio::test]
    async fn missing_capability_falls_back_to_positive_balance() {
        let mut reader = MockReader::new();
        reader.has_valid_key = Err(unavailable("getHasValidKey"));
        let result = run(&reader).await;

        assert!(result.is_valid);
        assert!(result.expiration.is_none());
        assert!(result.error.is_none());
        assert_eq!(reader.calls(), ["name", "getHasValidKey", "balanceOf"]);
    }

    #[tokio::test]
    async fn missing_capability_with_zero_balance_is_invalid_without_error() {
        let mut reader = MockReader::new();
        reader.has_valid_key = Err(unavailable("getHasValidKey"));
        reader.balance_of = Ok(U256::ZERO);
        let result = run(&reader).await;

        assert!(!result.is_valid);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn balance_failure_is_a_hard_error() {
        let mut reader = MockReader::new();
        reader.has_valid_key = Err(unavailable("getHasValidKey"));
        reader.balance_of = Err(ReadError::new("balanceOf", "connection refused"));
        let result = run(&reader).await;

        assert!(!result.is_valid);
        let message = result.error.expect("hard failure must carry an error");
        assert!(message.contains("balanceOf"));
    }

    #[tokio::test]
    async fn name_failure_substitutes_fallback_label() {
        let mut reader = MockReader::new();
        reader.name = Err(unavailable("name"));
        let result = run(&reader).await;

        assert!(result.is_valid);
        assert_eq!(result.contract_name, FALLBACK_CONTRACT_NAME);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn unrepresentable_expiration_is_omitted() {
        let mut reader = MockReader::new();
        reader.key_expiration = Ok(U256::MAX);
        let result = run(&reader).await;

        assert!(result.is_valid);
        assert!(result.expiration.is_none());
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn validation_is_idempotent_per_ledger_state() {
        let reader = MockReader::new();
        let first = run(&reader).await;
        let second = run(&reader).await;
        assert_eq!(first, second);
    }

    #[test]
    fn result_serializes_without_empty_optionals() {
        let result = ValidationResult {
            is_valid: false,
            contract_name: FALLBACK_CONTRACT_NAME.to_string(),
            event_name: EVENT_NAME.to_string(),
            expiration: None,
            error: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("expiration").is_none());
        assert!(json.get("error").is_none());
    }
}
