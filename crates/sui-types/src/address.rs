//! Package and object ID normalization.
//!
//! IDs typed into a builder arrive in any of the usual spellings:
//! - Short form: "0x2"
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000002"
//! - Without prefix: "2"
//!
//! Lookups and comparisons go through [`normalize_address`]; display goes
//! through [`normalize_address_short`].

use move_core_types::account_address::AccountAddress;

/// Normalize an ID to lowercase, `0x`-prefixed, 64 characters.
///
/// Never fails: non-hex input is padded or cut by character, not validated.
/// Use [`parse_address`] to check user input first.
///
/// # Examples
///
/// ```
/// use sui_ptb_types::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x2"),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// assert_eq!(
///     normalize_address(" ABC "),
///     "0x0000000000000000000000000000000000000000000000000000000000000abc"
/// );
/// ```
pub fn normalize_address(addr: &str) -> String {
    let addr = addr.trim();
    let hex = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr)
        .to_lowercase();
    let hex: String = hex.chars().take(64).collect();
    format!("0x{:0>64}", hex)
}

/// Normalize an ID to its shortest form, e.g. `0x2`.
///
/// # Examples
///
/// ```
/// use sui_ptb_types::address::normalize_address_short;
///
/// assert_eq!(normalize_address_short("0x0000000000000000000000000000000000000000000000000000000000000002"), "0x2");
/// assert_eq!(normalize_address_short("0x0"), "0x0");
/// ```
pub fn normalize_address_short(addr: &str) -> String {
    let normalized = normalize_address(addr);
    let trimmed = normalized[2..].trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed)
    }
}

/// Parse an ID typed by a user. `None` for blank or non-hex input.
///
/// Unlike [`normalize_address`], input longer than 64 hex digits is rejected
/// rather than truncated.
pub fn parse_address(addr: &str) -> Option<AccountAddress> {
    let addr = addr.trim();
    if addr.is_empty() {
        return None;
    }
    let literal = if addr.starts_with("0x") || addr.starts_with("0X") {
        format!("0x{}", &addr[2..])
    } else {
        format!("0x{}", addr)
    };
    AccountAddress::from_hex_literal(&literal).ok()
}
