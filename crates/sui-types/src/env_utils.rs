//! Environment variable helpers for builder configuration.
//!
//! ```
//! use sui_ptb_types::env_utils::{env_string_or, env_var_or};
//!
//! let timeout: u64 = env_var_or("SUI_RPC_TIMEOUT_SECS", 30);
//! let url = env_string_or("SUI_RPC_URL", "https://fullnode.testnet.sui.io:443");
//! # let _ = (timeout, url);
//! ```

use std::str::FromStr;

/// Parse `key` into `T`; `None` when unset, blank or unparseable.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
}

/// Parse `key` into `T`, falling back to `default`.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// `key` as a string, falling back to `default` when unset or blank.
pub fn env_string_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
