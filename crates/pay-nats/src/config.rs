//! # NATS Configuration
//!
//! Bus connection settings, loaded from environment variables.

use async_nats::ServerAddr;
use pay_core::PaymentError;
use std::env;

/// Connection name reported to the NATS server
pub const DEFAULT_CONNECTION_NAME: &str = "payments-ms";

/// NATS connection configuration
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// Server URLs; the client picks among them and fails over
    pub servers: Vec<ServerAddr>,

    /// Connection name shown in server monitoring
    pub name: String,
}

impl NatsConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `NATS_SERVERS` (comma-separated, e.g. `nats://nats-a:4222,nats://nats-b:4222`)
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("NATS_SERVERS")
            .ok_or_else(|| PaymentError::Configuration("NATS_SERVERS not set".to_string()))?;

        Self::new(raw.split(','))
    }

    /// Build a config from a list of server URLs.
    pub fn new<I, S>(servers: I) -> Result<Self, PaymentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let servers = servers
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<ServerAddr>().map_err(|e| {
                    PaymentError::Configuration(format!("Invalid NATS server {:?}: {}", s, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if servers.is_empty() {
            return Err(PaymentError::Configuration(
                "NATS_SERVERS must list at least one server".to_string(),
            ));
        }

        Ok(Self {
            servers,
            name: DEFAULT_CONNECTION_NAME.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separated_servers() {
        let config = NatsConfig::from_lookup(|key| {
            (key == "NATS_SERVERS").then(|| "nats://nats-a:4222, nats://nats-b:4222".to_string())
        })
        .unwrap();

        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.name, "payments-ms");
    }

    #[test]
    fn test_missing_servers_fails() {
        let err = NatsConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("NATS_SERVERS not set"));
    }

    #[test]
    fn test_blank_list_fails() {
        assert!(NatsConfig::new([" ", ""]).is_err());
    }
}
