//! Configuration validation.
//!
//! # Responsibilities
//! - Presence checks for required environment variables
//! - Interpret values that carry meaning beyond a string (expiration window)
//!
//! # Design Decisions
//! - Stops at the first missing variable; the error names it
//! - An empty value counts as missing
//! - The expiration window takes its leading digits and never fails validation
//! - Validation is pure: lookup in, value or error out

use crate::config::loader::ConfigError;

/// Signing key for the auth layer.
pub const JWT_KEY: &str = "JWT_KEY";
/// Order expiration window, in seconds.
pub const EXPIRATION_WINDOW_SECONDS: &str = "EXPIRATION_WINDOW_SECONDS";
/// Persistence store location.
pub const MONGO_URI: &str = "MONGO_URI";
/// Broker cluster identity.
pub const NATS_CLUSTER_ID: &str = "NATS_CLUSTER_ID";
/// Broker client identity.
pub const NATS_CLIENT_ID: &str = "NATS_CLIENT_ID";
/// Broker address.
pub const NATS_URL: &str = "NATS_URL";

/// Optional queue group override.
pub const NATS_QUEUE_GROUP: &str = "NATS_QUEUE_GROUP";

/// Required variables, in the order they are checked.
pub const REQUIRED_VARS: [&str; 6] = [
    JWT_KEY,
    EXPIRATION_WINDOW_SECONDS,
    MONGO_URI,
    NATS_CLUSTER_ID,
    NATS_CLIENT_ID,
    NATS_URL,
];

/// Fetch a required variable, rejecting absent or empty values.
pub fn require<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing { var }),
    }
}

/// Fetch an optional variable; empty is treated as unset.
pub fn optional<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).filter(|value| !value.is_empty())
}

/// Read the expiration window from the leading digits of `raw`.
///
/// `"900"` and `"900s"` both give 900. Returns `None` when no digits lead the
/// value or they overflow.
pub fn parse_expiration_window(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
