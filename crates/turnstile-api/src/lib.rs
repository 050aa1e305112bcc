//! Public facade over the Turnstile crates.
//!
//! One entry point for callers that just want "string in, verdict out":
//! feed [`TurnstileApi::check_payload`] whatever a QR decoder or a paste
//! box produced and get a [`ValidationResult`] back. Lower-level pieces
//! remain reachable through the re-exports.

use alloy_primitives::Address;
use thiserror::Error;
use url::Url;

use turnstile_client::{TicketClient, TicketClientConfig};

pub use turnstile_client::{
    DisplayLabels, LockReader, ReadError, RpcLockReader, ValidationResult, DEFAULT_LOCK_ADDRESS,
    DEFAULT_RPC_URL, EVENT_NAME, FALLBACK_CONTRACT_NAME,
};
pub use turnstile_extract::{extract, is_address_shaped, normalize, AddressError, ExtractError};

/// Returns `"Turnstile vX.Y.Z"` using this crate's package version.
///
/// Useful for logging, CLI banners, or diagnostic output.
#[macro_export]
macro_rules! turnstile_version {
    () => {
        concat!("Turnstile v", env!("CARGO_PKG_VERSION"))
    };
}

/// Network options for the API.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub rpc_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
        }
    }
}

/// Which lock contract to check and how to label the results.
#[derive(Debug, Clone)]
pub struct TicketConfig {
    pub contract_address: Address,
    pub labels: DisplayLabels,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_LOCK_ADDRESS,
            labels: DisplayLabels::default(),
        }
    }
}

/// High-level configuration for the Turnstile API.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    pub network: NetworkConfig,
    pub ticket: TicketConfig,
}

impl ApiConfig {
    pub fn new(rpc_url: impl Into<String>, contract_address: Address) -> Self {
        Self {
            network: NetworkConfig {
                rpc_url: rpc_url.into(),
            },
            ticket: TicketConfig {
                contract_address,
                ..TicketConfig::default()
            },
        }
    }
}

/// Errors surfaced by the facade before any validation verdict exists.
///
/// Read failures during validation never appear here; they are folded
/// into the returned [`ValidationResult`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid RPC endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Facade wrapping the extractor and the ticket client.
pub struct TurnstileApi {
    client: TicketClient,
}

impl TurnstileApi {
    /// Create an API instance with the provided configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let rpc_url: Url = config.network.rpc_url.parse()?;
        let client_config = TicketClientConfig {
            contract_address: config.ticket.contract_address,
            labels: config.ticket.labels,
        };
        Ok(Self {
            client: TicketClient::new(rpc_url, client_config),
        })
    }

    /// Run the extraction heuristics over a decoded payload.
    pub fn extract_address(&self, payload: &str) -> Result<Address, ExtractError> {
        extract(payload)
    }

    /// Checksum-validate a manually entered address.
    ///
    /// A failure here means no network call is made.
    pub fn normalize_address(&self, raw: &str) -> Result<Address, AddressError> {
        normalize(raw)
    }

    /// Validate an already-normalized address against the lock contract.
    pub async fn validate(&self, holder: Address) -> ValidationResult {
        self.client.validate(holder).await
    }

    /// Normalize then validate a manually entered address.
    pub async fn validate_entry(&self, raw: &str) -> Result<ValidationResult, ApiError> {
        let holder = normalize(raw)?;
        Ok(self.client.validate(holder).await)
    }

    /// Scan flow: extract an address from a decoded payload, then
    /// validate it. Extraction failure is reported without touching the
    /// network.
    pub async fn check_payload(&self, payload: &str) -> Result<ValidationResult, ApiError> {
        let holder = extract(payload)?;
        Ok(self.client.validate(holder).await)
    }

    /// Access the underlying ticket client.
    pub fn client(&self) -> &TicketClient {
        &self.client
    }
}
