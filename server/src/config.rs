//! Server settings read from the environment.
//!
//! | Variable          | Default       | Meaning                                  |
//! |-------------------|---------------|------------------------------------------|
//! | `HOST`            | `127.0.0.1`   | interface to bind                        |
//! | `PORT`            | `3000`        | TCP port                                 |
//! | `TODO_WRITE_MODE` | `interleaved` | `interleaved` or `serialized` writes     |
//!
//! Unset and blank variables fall back to their defaults; anything else
//! that does not parse is a startup error.

use std::{env, num::ParseIntError};

use thiserror::Error;
use todo_core::{ParseWriteModeError, WriteMode};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT `{value}` is not a valid port: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("TODO_WRITE_MODE: {0}")]
    InvalidWriteMode(#[from] ParseWriteModeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub write_mode: WriteMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            write_mode: WriteMode::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(host) = var("HOST") {
            config.host = host;
        }
        if let Some(port) = var("PORT") {
            config.port = port
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value: port, source })?;
        }
        if let Some(mode) = var("TODO_WRITE_MODE") {
            config.write_mode = mode.parse()?;
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
