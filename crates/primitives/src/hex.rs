//! Sanitization and validation of user-supplied hex strings.
//!
//! Contract addresses and topics arrive as free-form strings (CLI flags,
//! environment variables, API parameters). They are rejected here, before any
//! network or database I/O happens.

use std::str::FromStr;

use alloy_primitives::Address;

/// A user-supplied hex string rejected before any I/O.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    /// The input is not a 20-byte hex address.
    #[error("invalid contract address: {0}")]
    InvalidAddress(String),
    /// The input is not a 32-byte hex topic.
    #[error("invalid topic: {0}")]
    InvalidTopic(String),
}

fn strip_0x(input: &str) -> &str {
    if input.len() >= 2 && input.starts_with('0') && matches!(input.as_bytes()[1], b'x' | b'X') {
        &input[2..]
    } else {
        input
    }
}

/// Normalizes a hex string: trims whitespace, drops a leading `0x`/`0X`,
/// removes any non-hex characters and re-applies the `0x` prefix.
///
/// Returns an empty string if no hex digits remain.
pub fn sanitize_hex(input: &str) -> String {
    let digits: String =
        strip_0x(input.trim()).chars().filter(char::is_ascii_hexdigit).collect();
    if digits.is_empty() { String::new() } else { format!("0x{digits}") }
}

/// Returns true if `input` is a 20-byte hex address, with or without prefix.
pub fn is_valid_address(input: &str) -> bool {
    let hex = strip_0x(input);
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Returns true if `input` is a 32-byte hex topic, with or without prefix.
pub fn is_valid_topic(input: &str) -> bool {
    let hex = strip_0x(input);
    hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Parses a user-supplied contract address, failing fast on malformed input.
pub fn parse_address(input: &str) -> Result<Address, InputError> {
    let trimmed = input.trim();
    if !is_valid_address(trimmed) {
        return Err(InputError::InvalidAddress(sanitize_hex(trimmed)));
    }
    Address::from_str(trimmed).map_err(|_| InputError::InvalidAddress(sanitize_hex(trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

    #[test]
    fn sanitize_strips_prefix_and_garbage() {
        assert_eq!(sanitize_hex("  0xAbC123  "), "0xAbC123");
        assert_eq!(sanitize_hex("0Xde-ad be:ef"), "0xdeadbeef");
        assert_eq!(sanitize_hex("zz--"), "");
        assert_eq!(sanitize_hex(""), "");
    }

    #[test]
    fn address_validation() {
        assert!(is_valid_address(WETH));
        assert!(is_valid_address(&WETH[2..]));
        assert!(!is_valid_address("0x1234"));
        assert!(!is_valid_address(&format!("{WETH}00")));
        assert!(!is_valid_address("0xzz2aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
    }

    #[test]
    fn topic_validation() {
        let transfer = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
        assert!(is_valid_topic(transfer));
        assert!(is_valid_topic(&transfer[2..]));
        assert!(!is_valid_topic("0xddf252ad"));
    }

    #[test]
    fn parse_address_accepts_mixed_case() {
        let parsed = parse_address(WETH).unwrap();
        assert_eq!(parsed, address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
    }

    #[test]
    fn parse_address_rejects_malformed_input() {
        let err = parse_address("0x1234").unwrap_err();
        assert_eq!(err, InputError::InvalidAddress("0x1234".to_owned()));
    }
}
