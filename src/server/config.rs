//! Engine configuration.

use std::env;

/// Listener and worker-pool configuration for
/// [`serve`](crate::server::serve).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address; defaults to loopback.
    pub address: String,
    /// Listen port.
    pub port: u16,
    /// Worker threads driving the shared reactor; clamped to a minimum
    /// of 1 at startup.
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            workers: 1,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by the `RESTKIT_ADDR`, `RESTKIT_PORT`, and
    /// `RESTKIT_WORKERS` environment variables where present and
    /// parseable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(address) = env::var("RESTKIT_ADDR") {
            config.address = address;
        }
        if let Some(port) = env::var("RESTKIT_PORT").ok().and_then(|v| v.parse().ok()) {
            config.port = port;
        }
        if let Some(workers) = env::var("RESTKIT_WORKERS").ok().and_then(|v| v.parse().ok()) {
            config.workers = workers;
        }
        config
    }
}
