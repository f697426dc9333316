use std::env;

use crate::config::parse_var;
use crate::error::AppError;

pub const DEFAULT_OUTBOUND_CAPACITY: usize = 100;

/// HTTP listener and broker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-connection outbound queue size.
    pub outbound_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("BACKEND_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);
        let port = parse_var(&lookup, "BACKEND_PORT", defaults.port)?;
        let outbound_capacity = parse_var(
            &lookup,
            "SALADBOWL_OUTBOUND_CAPACITY",
            defaults.outbound_capacity,
        )?;
        if outbound_capacity == 0 {
            return Err(AppError::config(
                "SALADBOWL_OUTBOUND_CAPACITY must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            outbound_capacity,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
