//! Wallet-address extraction for scanned ticket payloads.
//!
//! This crate is intentionally pure:
//! - It performs no network or camera I/O.
//! - It only parses payload strings already decoded by the caller
//!   (a QR scanner, a paste box, a test fixture).
//!
//! Responsibilities:
//! - Recognize and checksum-normalize wallet addresses.
//! - Probe opaque payloads (plain text, JSON, URLs) for an embedded
//!   address using an ordered set of heuristics.
//!
//! Higher layers can feed the extracted address into the ticket
//! validator (turnstile-client) to decide entry.

pub mod address;
pub mod payload;

pub use address::{
    is_address_shaped, normalize, preview, AddressError, NOT_FOUND_PREVIEW_CHARS,
    RAW_PREVIEW_CHARS,
};
pub use payload::{extract, ExtractError};

pub use alloy_primitives::Address;
