//! Environment variable utilities
//!
//! Generic `env_get<T>` for parsing configuration overrides with
//! defaults, e.g. `SERIALQ_CAPACITY`.

use std::str::FromStr;

/// Get environment variable parsed as type T, or return default
///
/// Works with any type that implements `FromStr`. Unset variables and
/// parse failures both fall back to the default.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
