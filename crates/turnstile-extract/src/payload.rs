use std::sync::LazyLock;

use alloy_primitives::Address;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::address::{parse_candidate, preview, NOT_FOUND_PREVIEW_CHARS};

/// Label some wallet apps print next to the address in their QR payload,
/// e.g. `Wallet Address: 0x...`.
static LABELED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)wallet\s+address\s*[:=]?\s*(0x[0-9a-fA-F]{40})").expect("valid label regex")
});

/// Any address-shaped substring.
static EMBEDDED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"0x[0-9a-fA-F]{40}").expect("valid embedded regex"));

/// Metri profile URLs embed the wallet address as the trailing segment.
/// Handled with a dedicated pattern, independent of generic URL parsing.
static METRI_PROFILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)app\.metri\.xyz/p/profile/(0x[0-9a-fA-F]{40})").expect("valid profile regex")
});

/// Errors produced while probing a scanned payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// No address-shaped value anywhere in the payload. Carries a
    /// truncated preview of the raw content for diagnostic display.
    #[error("no wallet address found in payload (raw content: {preview})")]
    NotFound { preview: String },
}

/// Extract a wallet address from an arbitrary decoded payload.
///
/// Stages are tried in strict order; the first syntactically valid
/// address wins and later stages never run:
///
/// 1. the trimmed payload is itself an address,
/// 2. a `Wallet Address:`-style labeled field,
/// 3. any embedded address-shaped substring,
/// 4. a JSON object (`address` field, then `wallet`, then every string
///    property in order),
/// 5. an absolute URL (`address`/`wallet`/`a` query params, then path
///    segments),
/// 6. a Metri profile URL.
///
/// Malformed JSON or URLs are expected negative probe outcomes, not
/// faults; this function never panics on them. The extractor never
/// guesses: either a pattern matched or the result is `NotFound`.
pub fn extract(payload: &str) -> Result<Address, ExtractError> {
    if let Some(addr) = match_direct(payload) {
        return Ok(addr);
    }
    if let Some(addr) = match_labeled(payload) {
        return Ok(addr);
    }
    if let Some(addr) = match_embedded(payload) {
        return Ok(addr);
    }
    if let Some(addr) = match_json(payload) {
        return Ok(addr);
    }
    if let Some(addr) = match_url(payload) {
        return Ok(addr);
    }
    if let Some(addr) = match_metri_profile(payload) {
        return Ok(addr);
    }

    Err(ExtractError::NotFound {
        preview: preview(payload, NOT_FOUND_PREVIEW_CHARS),
    })
}

/// Stage 1: the payload, trimmed, is exactly an address.
fn match_direct(payload: &str) -> Option<Address> {
    parse_candidate(payload.trim())
}

/// Stage 2: a labeled `Wallet Address` field.
fn match_labeled(payload: &str) -> Option<Address> {
    let caps = LABELED_RE.captures(payload)?;
    parse_candidate(caps.get(1)?.as_str())
}

/// Stage 3: first address-shaped substring anywhere.
fn match_embedded(payload: &str) -> Option<Address> {
    let m = EMBEDDED_RE.find(payload)?;
    parse_candidate(m.as_str())
}

/// Stage 4: payload is a JSON object carrying the address in a field.
///
/// `address` takes priority over `wallet`; failing both, every own
/// property value is checked in enumeration order.
fn match_json(payload: &str) -> Option<Address> {
    let value: Value = serde_json::from_str(payload).ok()?;
    let obj = value.as_object()?;

    for key in ["address", "wallet"] {
        if let Some(addr) = obj.get(key).and_then(value_as_address) {
            return Some(addr);
        }
    }

    obj.values().find_map(value_as_address)
}

fn value_as_address(value: &Value) -> Option<Address> {
    parse_candidate(value.as_str()?)
}

/// Stage 5: payload is an absolute URL.
///
/// Query parameters `address`, `wallet`, `a` are checked in that
/// priority order; failing those, the first address-shaped path segment
/// wins.
fn match_url(payload: &str) -> Option<Address> {
    let url = Url::parse(payload.trim()).ok()?;

    for key in ["address", "wallet", "a"] {
        let param = url
            .query_pairs()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.into_owned());
        if let Some(addr) = param.as_deref().and_then(parse_candidate) {
            return Some(addr);
        }
    }

    url.path_segments()?.find_map(parse_candidate)
}

/// Stage 6: Metri profile URL with the address as trailing segment.
fn match_metri_profile(payload: &str) -> Option<Address> {
    let caps = METRI_PROFILE_RE.captures(payload)?;
    parse_candidate(caps.get(1)?.as_str())
}
