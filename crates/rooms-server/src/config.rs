//! Configuration for the rooms TCP server.
//!
//! For now this is intentionally simple: you can either use defaults
//! or override via a few environment variables:
//!
//! - `ROOMS_BIND_ADDR`    (default: "0.0.0.0")
//! - `ROOMS_PORT`         (default: "8080")
//! - `ROOMS_MAX_CLIENTS`  (default: "1024")
//! - `ROOMS_COLOR_POLICY` (default: "first_white", or "random")

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use rooms_core::ColorPolicy;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// How room creators without an explicit color preference are seated.
    pub color_policy: ColorPolicy,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to reasonable defaults.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("ROOMS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("ROOMS_PORT", 8080u16)?;
        let max_clients = read_env_or_default("ROOMS_MAX_CLIENTS", 1024usize)?;
        let color_policy = read_env_or_default("ROOMS_COLOR_POLICY", ColorPolicy::default())?;

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            color_policy,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}")),
        Err(_) => Ok(default),
    }
}
