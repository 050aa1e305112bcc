use std::str::FromStr;
use std::sync::LazyLock;

use alloy_primitives::Address;
use regex::Regex;
use thiserror::Error;

/// A full-payload match: `0x` + 40 hex digits, nothing else.
static DIRECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address regex"));

/// Preview length used in "no address found" diagnostics.
pub const NOT_FOUND_PREVIEW_CHARS: usize = 50;

/// Preview length used when echoing raw scanned content back to the user.
pub const RAW_PREVIEW_CHARS: usize = 100;

/// Errors produced while validating a manually entered address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("wallet address missing")]
    Empty,

    #[error("invalid wallet address format: expected 0x followed by 40 hex digits")]
    Pattern,

    #[error("mixed-case address failed checksum verification")]
    Checksum,
}

/// Whether `s` (as a whole) has the shape of a wallet address.
///
/// This is the checksum-independent pattern test; letter casing is
/// ignored here and only enforced by [`normalize`].
pub fn is_address_shaped(s: &str) -> bool {
    DIRECT_RE.is_match(s)
}

/// Parse an address-shaped candidate without enforcing its checksum.
///
/// Returns `None` when `s` does not match the address pattern. Used by
/// the payload extraction stages, where casing comes from whatever the
/// QR code happened to contain.
pub(crate) fn parse_candidate(s: &str) -> Option<Address> {
    if !is_address_shaped(s) {
        return None;
    }
    Address::from_str(s).ok()
}

/// Checksum-normalize a manually entered address.
///
/// Accepts all-lowercase and all-uppercase hex unconditionally; a
/// mixed-case string must carry a valid EIP-55 checksum. The returned
/// `Address` displays in canonical checksummed form.
///
/// This runs before any network call; a failure here means the
/// validator is never invoked.
pub fn normalize(raw: &str) -> Result<Address, AddressError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }
    if !is_address_shaped(trimmed) {
        return Err(AddressError::Pattern);
    }

    let hex = &trimmed[2..];
    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(trimmed, None).map_err(|_| AddressError::Checksum)
    } else {
        // Uniform casing carries no checksum information.
        Address::from_str(trimmed).map_err(|_| AddressError::Pattern)
    }
}

/// Truncate `payload` to at most `max` characters for display.
///
/// Appends an ellipsis marker when truncation happened. Matching always
/// runs over the full payload; only what we show is bounded.
pub fn preview(payload: &str, max: usize) -> String {
    if payload.chars().count() <= max {
        payload.to_string()
    } else {
        let head: String = payload.chars().take(max).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOWER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    // EIP-55 form of LOWER.
    const CHECKSUMMED: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn shape_test_ignores_case() {
        assert!(is_address_shaped(LOWER));
        assert!(is_address_shaped(&LOWER.to_uppercase().replace("0X", "0x")));
        assert!(!is_address_shaped("0x1234"));
        assert!(!is_address_shaped("not an address"));
    }

    #[test]
    fn normalize_accepts_lowercase_and_emits_checksum() {
        let addr = normalize(LOWER).unwrap();
        assert_eq!(addr.to_checksum(None), CHECKSUMMED);
    }

    #[test]
    fn normalize_accepts_valid_checksum() {
        assert!(normalize(CHECKSUMMED).is_ok());
    }

    #[test]
    fn normalize_rejects_bad_checksum() {
        // Flip the case of one letter in the checksummed form.
        let bad = CHECKSUMMED.replace("f39F", "F39F");
        assert_eq!(normalize(&bad), Err(AddressError::Checksum));
    }

    #[test]
    fn normalize_rejects_empty_and_malformed() {
        assert_eq!(normalize(""), Err(AddressError::Empty));
        assert_eq!(normalize("   "), Err(AddressError::Empty));
        assert_eq!(normalize("0xabc"), Err(AddressError::Pattern));
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        let long = "a".repeat(120);
        let p = preview(&long, 100);
        assert_eq!(p.len(), 103);
        assert!(p.ends_with("..."));

        assert_eq!(preview("short", 100), "short");
    }
}
