//! Configuration loading from the environment.

use secrecy::SecretString;
use thiserror::Error;

use crate::config::schema::{
    AuthConfig, ListenerConfig, MessagingConfig, OrdersConfig, PersistenceConfig, ServiceConfig,
    DEFAULT_QUEUE_GROUP,
};
use crate::config::validation::{self, require};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("{var} must be defined")]
    Missing { var: &'static str },
}

impl ConfigError {
    /// The variable this error is about.
    pub fn var(&self) -> &'static str {
        match self {
            ConfigError::Missing { var } => var,
        }
    }
}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<ServiceConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Load and validate configuration through `lookup`.
///
/// Variables are checked in [`validation::REQUIRED_VARS`] order and the first
/// missing one is returned. Nothing else is attempted on failure.
pub fn load_with<F>(lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let jwt_key = require(&lookup, validation::JWT_KEY)?;

    let raw_window = require(&lookup, validation::EXPIRATION_WINDOW_SECONDS)?;
    let orders = OrdersConfig {
        expiration_window_secs: validation::parse_expiration_window(&raw_window),
    };
    match orders.expiration_window_minutes() {
        Some(minutes) => tracing::info!(
            expiration_window_secs = orders.expiration_window_secs,
            "Order expiration window set to {} minutes",
            minutes
        ),
        None => tracing::warn!(
            value = %raw_window,
            "Order expiration window is not a number of seconds"
        ),
    }

    let mongo_uri = require(&lookup, validation::MONGO_URI)?;
    let cluster_id = require(&lookup, validation::NATS_CLUSTER_ID)?;
    let client_id = require(&lookup, validation::NATS_CLIENT_ID)?;
    let url = require(&lookup, validation::NATS_URL)?;

    tracing::info!("All required environment variables verified");

    let queue_group = validation::optional(&lookup, validation::NATS_QUEUE_GROUP)
        .unwrap_or_else(|| DEFAULT_QUEUE_GROUP.to_string());

    Ok(ServiceConfig {
        listener: ListenerConfig::default(),
        messaging: MessagingConfig {
            cluster_id,
            client_id,
            url,
            queue_group,
        },
        persistence: PersistenceConfig::new(mongo_uri),
        auth: AuthConfig {
            jwt_key: SecretString::new(jwt_key),
        },
        orders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::REQUIRED_VARS;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("JWT_KEY", "asdf".to_string()),
            ("EXPIRATION_WINDOW_SECONDS", "900".to_string()),
            ("MONGO_URI", "mongodb://orders-mongo-srv:27017/orders".to_string()),
            ("NATS_CLUSTER_ID", "ticketing".to_string()),
            ("NATS_CLIENT_ID", "orders-abc".to_string()),
            ("NATS_URL", "nats://nats-srv:4222".to_string()),
        ])
    }

    #[test]
    fn test_load_full_env() {
        let env = full_env();
        let config = load_with(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.auth.jwt_key.expose_secret(), "asdf");
        assert_eq!(config.orders.expiration_window_secs, Some(900));
        assert_eq!(config.persistence.uri, "mongodb://orders-mongo-srv:27017/orders");
        assert_eq!(config.messaging.cluster_id, "ticketing");
        assert_eq!(config.messaging.client_id, "orders-abc");
        assert_eq!(config.messaging.url, "nats://nats-srv:4222");
        assert_eq!(config.messaging.queue_group, "orders-service");
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_each_missing_var_is_reported() {
        for var in REQUIRED_VARS {
            let mut env = full_env();
            env.remove(var);
            let err = load_with(|k| env.get(k).cloned()).unwrap_err();
            assert!(matches!(err, ConfigError::Missing { .. }));
            assert_eq!(err.var(), var);
            assert!(err.to_string().contains(var));
        }
    }

    #[test]
    fn test_first_missing_var_wins() {
        let mut env = full_env();
        env.remove("NATS_URL");
        env.remove("JWT_KEY");
        let err = load_with(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(err.var(), "JWT_KEY");
    }

    #[test]
    fn test_expiration_window_with_suffix_loads() {
        let mut env = full_env();
        env.insert("EXPIRATION_WINDOW_SECONDS", "900s".to_string());
        let config = load_with(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.orders.expiration_window_secs, Some(900));
    }

    #[test]
    fn test_unreadable_expiration_window_is_not_fatal() {
        let mut env = full_env();
        env.insert("EXPIRATION_WINDOW_SECONDS", "fifteen".to_string());
        let config = load_with(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.orders.expiration_window_secs, None);
        assert_eq!(config.messaging.url, "nats://nats-srv:4222");
    }

    #[test]
    fn test_queue_group_override() {
        let mut env = full_env();
        env.insert("NATS_QUEUE_GROUP", "orders-canary".to_string());
        let config = load_with(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.messaging.queue_group, "orders-canary");
    }

    #[test]
    fn test_signing_key_not_in_debug_output() {
        let env = full_env();
        let config = load_with(|k| env.get(k).cloned()).unwrap();
        assert!(!format!("{:?}", config).contains("asdf"));
    }
}
