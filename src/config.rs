//! Environment-driven server configuration.

use std::time::Duration;

/// Runtime knobs, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How often each connection is probed with a Ping.
    pub keepalive_interval: Duration,
    /// Upper bound on one generate+solve attempt.
    pub engine_timeout: Duration,
}

impl ServerConfig {
    /// Load config from environment variables. Unset variables use the
    /// defaults; unparsable values fall back with a warning.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8080),
            keepalive_interval: Duration::from_secs(parse_var("KEEPALIVE_INTERVAL_SECS", 30)),
            engine_timeout: Duration::from_secs(parse_var("ENGINE_TIMEOUT_SECS", 30)),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            keepalive_interval: Duration::from_secs(30),
            engine_timeout: Duration::from_secs(30),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("invalid {} value {:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
